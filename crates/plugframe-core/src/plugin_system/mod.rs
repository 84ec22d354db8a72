//! # Plugframe Plugin System
//!
//! Everything the framework knows about individual plugins: how versions and
//! version ranges are written and compared, how plugins declare their
//! Require-Plugin constraints, and how the registry of one framework instance
//! finds providers for those constraints.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`version`]**: The four-part [`Version`] (`major.minor.micro.qualifier`)
//!   and its total ordering.
//! - **[`version_range`]**: [`VersionRange`], the interval algebra used to decide
//!   whether a provider's version satisfies a requirement.
//! - **[`dependency`]**: [`PluginDependency`] constraints, Require-Plugin header
//!   parsing and the [`BlockingDependency`] reported by a failed resolve.
//! - **[`manifest`]**: [`PluginManifest`], the serializable description of a plugin.
//! - **[`traits`]**: The [`Plugin`] capability trait, [`PluginState`], and the
//!   activator/loader seams to the code-loading collaborator.
//! - **[`record`]**: The closed set of registry records ([`PluginRecord`]) and
//!   the caller-facing [`PluginHandle`].
//! - **[`registry`]**: [`PluginRegistry`], the per-instance plugin table and the
//!   dependency resolution walk.
//! - **[`loader`]**: [`StaticPluginLoader`], an in-process activator registry.
//! - **[`error`]**: [`PluginSystemError`](error::PluginSystemError).
pub mod dependency;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod record;
pub mod registry;
pub mod traits;
pub mod version;
pub mod version_range;

pub use dependency::{BlockingDependency, PluginDependency, Resolution};
pub use loader::{NoopActivator, StaticPluginLoader};
pub use manifest::PluginManifest;
pub use record::{InstalledPlugin, PluginHandle, PluginRecord, SystemPlugin};
pub use registry::PluginRegistry;
pub use traits::{ActivationContext, Plugin, PluginActivator, PluginId, PluginLoader, PluginState};
pub use version::{Version, VersionError};
pub use version_range::VersionRange;
