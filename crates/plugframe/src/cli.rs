use std::fs;
use std::path::Path;
use std::process::ExitCode;

use log::{debug, info};
use plugframe_core::kernel::constants::PROP_STORAGE;
use plugframe_core::plugin_system::error::PluginSystemError;
use plugframe_core::storage::StorageSystemError;
use plugframe_core::{Framework, FrameworkProperties, KernelError, Plugin, PluginManifest, Version, VersionRange};

type CliResult = Result<ExitCode, KernelError>;

pub fn range_check(range: &str, version: &str) -> CliResult {
    let range = VersionRange::parse(range)?;
    let version = Version::parse(version)?;
    println!("{}", range.includes(&version));
    Ok(ExitCode::SUCCESS)
}

pub fn range_contains(outer: &str, inner: &str) -> CliResult {
    let outer = VersionRange::parse(outer)?;
    let inner = VersionRange::parse(inner)?;
    println!("{}", outer.contains_range(&inner));
    Ok(ExitCode::SUCCESS)
}

pub fn range_parse(range: &str) -> CliResult {
    println!("{}", VersionRange::parse(range)?);
    Ok(ExitCode::SUCCESS)
}

/// Builds the framework properties from `--config` and `--storage` and launches it.
///
/// `--storage` overrides `plugframe.storage` from the config file. Plugin
/// commands need a persistent store, so one of the two has to name a directory.
pub async fn open_framework(storage: Option<&Path>, config: Option<&Path>) -> Result<Framework, KernelError> {
    let mut props = match config {
        Some(path) => {
            debug!("Loading framework properties from {}", path.display());
            FrameworkProperties::load(path)?
        }
        None => FrameworkProperties::new(),
    };
    if let Some(dir) = storage {
        props.set(PROP_STORAGE, dir.display().to_string())?;
    }
    if props.storage_location().is_none() {
        return Err(KernelError::Other(format!(
            "no plugin storage configured; pass --storage DIR or set '{}' in --config",
            PROP_STORAGE
        )));
    }

    let framework = Framework::new(props);
    framework.launch().await?;
    Ok(framework)
}

pub async fn plugin_list(framework: &Framework) -> CliResult {
    for record in framework.context().plugins().await {
        if record.is_system() {
            continue;
        }
        println!(
            "{}\t{}\t{}\t{}\t{}",
            record.id(),
            record.symbolic_name(),
            record.version(),
            record.state(),
            record.location()
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn plugin_install(framework: &Framework, manifest_path: &Path, location: Option<&str>) -> CliResult {
    let json = fs::read_to_string(manifest_path)
        .map_err(|e| StorageSystemError::io(e, "read_to_string", manifest_path.to_path_buf()))?;
    let location = location
        .map(str::to_string)
        .unwrap_or_else(|| manifest_path.display().to_string());
    let manifest = PluginManifest::from_json(&json).map_err(|e| PluginSystemError::ManifestError {
        location: location.clone(),
        message: e.to_string(),
    })?;

    let context = framework.context();
    let handle = context.install(&location, manifest).await?;
    let record = context.plugin(&handle).await?;
    info!("Installed {} from {}", record.describe(), location);
    println!(
        "Installed {} {} as plugin {}",
        record.symbolic_name(),
        record.version(),
        handle.plugin_id()
    );
    Ok(ExitCode::SUCCESS)
}

pub async fn plugin_resolve(framework: &Framework, name: &str) -> CliResult {
    let context = framework.context();
    let candidates = context.find_plugins(name, &VersionRange::unspecified()).await;
    let Some(record) = candidates.first() else {
        return Err(KernelError::Other(format!("no installed plugin named '{}'", name)));
    };

    let handle = context.handle(record.id());
    match context.resolve_plugin(&handle).await? {
        None => {
            println!("{} {}: resolved", record.symbolic_name(), record.version());
            Ok(ExitCode::SUCCESS)
        }
        Some(blocker) => {
            println!("{} {}: blocked by {}", record.symbolic_name(), record.version(), blocker);
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn plugin_uninstall(framework: &Framework, name: &str) -> CliResult {
    let context = framework.context();
    let installed = context.find_plugins(name, &VersionRange::unspecified()).await;
    if installed.is_empty() {
        return Err(KernelError::Other(format!("no installed plugin named '{}'", name)));
    }

    for record in installed {
        context.uninstall(&context.handle(record.id())).await?;
        println!("Uninstalled {} {}", record.symbolic_name(), record.version());
    }
    Ok(ExitCode::SUCCESS)
}
