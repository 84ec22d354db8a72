#![cfg(test)]

use std::sync::Arc;

use crate::kernel::context::{FrameworkState, PluginFrameworkContext};
use crate::kernel::error::Error;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::loader::StaticPluginLoader;
use crate::plugin_system::traits::{Plugin, PluginActivator, PluginState};
use crate::storage::FrameworkProperties;

use super::common::{events, location, manifest, recorded, recording_loader, Events, RecordingActivator};

async fn context_with_loader(loader: Arc<StaticPluginLoader>, system_events: &Events) -> PluginFrameworkContext {
    let context = PluginFrameworkContext::builder(FrameworkProperties::new())
        .loader(loader)
        .system_activator(Arc::new(RecordingActivator::new("system", system_events.clone())))
        .build();
    context.init().await.unwrap();
    context
}

#[tokio::test]
async fn test_start_stop_cycle() {
    let log = events();
    let context = context_with_loader(recording_loader(&log, &["a"]), &log).await;
    let a = context.install(&location("a", "1.0.0"), manifest("a", "1.0.0", &[])).await.unwrap();

    context.start_plugin(&a).await.unwrap();
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Active);
    // Starting an active plugin is a no-op
    context.start_plugin(&a).await.unwrap();

    context.stop_plugin(&a).await.unwrap();
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Resolved);
    // Stopping a resolved plugin is a no-op
    context.stop_plugin(&a).await.unwrap();

    assert_eq!(recorded(&log), vec!["start:system", "start:a", "stop:a"]);
}

#[tokio::test]
async fn test_uninit_stops_in_reverse_install_order() {
    let log = events();
    let context = context_with_loader(recording_loader(&log, &["a", "b", "c"]), &log).await;
    let mut handles = Vec::new();
    for name in ["a", "b", "c"] {
        handles.push(context.install(&location(name, "1.0.0"), manifest(name, "1.0.0", &[])).await.unwrap());
    }
    // Start order differs from install order
    for index in [2, 0, 1] {
        context.start_plugin(&handles[index]).await.unwrap();
    }

    context.uninit().await.unwrap();
    assert_eq!(context.state().await, FrameworkState::Uninitialized);
    assert!(context.plugins().await.is_empty());
    assert_eq!(
        recorded(&log),
        vec!["start:system", "start:c", "start:a", "start:b", "stop:c", "stop:b", "stop:a", "stop:system"]
    );
}

#[tokio::test]
async fn test_uninit_continues_past_stop_failures() {
    let log = events();
    let loader = recording_loader(&log, &["a", "c"]);
    let failing_events = log.clone();
    loader.register("b", move || {
        Arc::new(RecordingActivator::new("b", failing_events.clone()).failing_stop()) as Arc<dyn PluginActivator>
    });
    let context = context_with_loader(loader, &log).await;
    for name in ["a", "b", "c"] {
        let handle = context.install(&location(name, "1.0.0"), manifest(name, "1.0.0", &[])).await.unwrap();
        context.start_plugin(&handle).await.unwrap();
    }

    let err = context.uninit().await.unwrap_err();
    match err {
        Error::PluginSystem(PluginSystemError::ShutdownErrors(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("b refused to stop"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(context.state().await, FrameworkState::Uninitialized);
    let log = recorded(&log);
    assert_eq!(&log[log.len() - 4..], &["stop:c", "stop:b", "stop:a", "stop:system"]);
}

#[tokio::test]
async fn test_activator_start_failure_returns_to_resolved() {
    let log = events();
    let loader = Arc::new(StaticPluginLoader::new());
    let failing_events = log.clone();
    loader.register("a", move || {
        Arc::new(RecordingActivator::new("a", failing_events.clone()).failing_start()) as Arc<dyn PluginActivator>
    });
    let context = context_with_loader(loader, &log).await;
    let a = context.install(&location("a", "1.0.0"), manifest("a", "1.0.0", &[])).await.unwrap();

    let err = context.start_plugin(&a).await.unwrap_err();
    assert!(matches!(
        err,
        Error::PluginSystem(PluginSystemError::ActivatorFailed { ref operation, .. }) if operation == "start"
    ));
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Resolved);

    // Nothing was started, so nothing is stopped on shutdown
    context.uninit().await.unwrap();
    assert_eq!(recorded(&log), vec!["start:system", "start:a", "stop:system"]);
}

#[tokio::test]
async fn test_unknown_declared_activator_fails_start() {
    let log = events();
    let context = context_with_loader(Arc::new(StaticPluginLoader::new()), &log).await;
    let mut declared = manifest("a", "1.0.0", &[]);
    declared.set_activator("does-not-exist");
    let a = context.install("mem:a", declared).await.unwrap();

    let err = context.start_plugin(&a).await.unwrap_err();
    assert!(matches!(err, Error::PluginSystem(PluginSystemError::ActivatorFailed { .. })));
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Resolved);
}

#[tokio::test]
async fn test_stop_failure_still_ends_resolved() {
    let log = events();
    let loader = Arc::new(StaticPluginLoader::new());
    let failing_events = log.clone();
    loader.register("a", move || {
        Arc::new(RecordingActivator::new("a", failing_events.clone()).failing_stop()) as Arc<dyn PluginActivator>
    });
    let context = context_with_loader(loader, &log).await;
    let a = context.install("mem:a", manifest("a", "1.0.0", &[])).await.unwrap();
    context.start_plugin(&a).await.unwrap();

    assert!(context.stop_plugin(&a).await.is_err());
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Resolved);
}

#[tokio::test]
async fn test_uninstall_stops_and_forgets_plugin() {
    let log = events();
    let context = context_with_loader(recording_loader(&log, &["a"]), &log).await;
    let a = context.install("mem:a", manifest("a", "1.0.0", &[])).await.unwrap();
    context.start_plugin(&a).await.unwrap();

    context.uninstall(&a).await.unwrap();
    assert!(matches!(
        context.plugin(&a).await.unwrap_err(),
        Error::PluginSystem(PluginSystemError::PluginNotFound(_))
    ));
    assert!(context.storage().installed().unwrap().is_empty());
    assert_eq!(recorded(&log), vec!["start:system", "start:a", "stop:a"]);

    // The location is free again and gets a fresh id
    let again = context.install("mem:a", manifest("a", "1.0.0", &[])).await.unwrap();
    assert!(again.plugin_id() > a.plugin_id());
}

#[tokio::test]
async fn test_restart_after_uninit_restores_installed_plugins() {
    let log = events();
    let context = context_with_loader(recording_loader(&log, &["a", "b"]), &log).await;
    let b = context.install("mem:b", manifest("b", "1.0.0", &[])).await.unwrap();
    let a = context.install("mem:a", manifest("a", "1.0.0", &[("b", "1.0.0")])).await.unwrap();
    context.start_plugin(&a).await.unwrap();
    context.uninit().await.unwrap();

    context.init().await.unwrap();
    assert_eq!(context.state().await, FrameworkState::Initialized);
    let plugins = context.plugins().await;
    assert_eq!(plugins.len(), 3);
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Installed);
    assert_eq!(context.plugin(&b).await.unwrap().state(), PluginState::Installed);

    context.start_plugin(&a).await.unwrap();
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Active);
    // b was resolved alongside a but never started
    assert_eq!(context.plugin(&b).await.unwrap().state(), PluginState::Resolved);
}
