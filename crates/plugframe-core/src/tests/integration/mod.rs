#![cfg(test)]

pub mod common;
pub mod concurrency;
pub mod lifecycle;
pub mod resolution;
