//! # Plugframe Kernel
//!
//! The `kernel` module is the control core of the framework: it owns the
//! per-instance [`PluginFrameworkContext`], the process-wide bookkeeping of
//! framework instances, and the error and diagnostics plumbing shared by
//! every subsystem.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Framework Context**: [`PluginFrameworkContext`] (in [`context`]) holds the
//!   plugin registry of one instance, runs `init()`/`uninit()` and resolves
//!   Require-Plugin constraints.
//! - **Bootstrapping**: [`Framework`](bootstrap::Framework) builds a context from
//!   [`FrameworkProperties`](crate::storage::FrameworkProperties), choosing its storage.
//! - **Global State**: [`global`] allocates framework ids under a process-wide lock
//!   and tracks which instances are alive.
//! - **Diagnostics**: [`DiagnosticSink`](diagnostics::DiagnosticSink) and the
//!   id-tagged [`FrameworkLog`](diagnostics::FrameworkLog).
//! - **Core Constants**: system plugin identity and property keys in `constants`.
//! - **Error Handling**: [`Error`](error::Error) and the `Result` alias in `error`.
pub mod bootstrap;
pub mod constants;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod global;

pub use bootstrap::Framework;
pub use context::{ContextBuilder, DebugOptions, FrameworkState, PluginFrameworkContext};
pub use diagnostics::{DiagnosticSink, FrameworkLog, LogSink};
pub use error::{Error, KernelLifecyclePhase, Result};
