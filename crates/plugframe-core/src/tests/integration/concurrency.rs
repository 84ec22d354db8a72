#![cfg(test)]

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::kernel::context::{FrameworkState, PluginFrameworkContext};
use crate::kernel::global;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::traits::{Plugin, PluginState};
use crate::storage::FrameworkProperties;

use super::common::{events, gated_loader, location, manifest, recorded, recording_loader, Gate, GatedCall};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_construction_yields_unique_increasing_ids() {
    let tasks: Vec<_> = (0..16)
        .map(|_| {
            tokio::spawn(async {
                let mut ids = Vec::new();
                for _ in 0..10 {
                    let context = PluginFrameworkContext::new(FrameworkProperties::new());
                    ids.push(context.id());
                }
                ids
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for task in tasks {
        let ids = task.await.unwrap();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        for id in ids {
            assert!(seen.insert(id), "framework id {} issued twice", id);
            // Dropped contexts are no longer live
            assert!(!global::live_instances().contains(&id));
        }
    }
    assert_eq!(seen.len(), 160);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_init_of_distinct_contexts() {
    let first = Arc::new(PluginFrameworkContext::new(FrameworkProperties::new()));
    let second = Arc::new(PluginFrameworkContext::new(FrameworkProperties::new()));
    assert!(first.id() < second.id());

    let (a, b) = futures::join!(first.init(), second.init());
    a.unwrap();
    b.unwrap();

    for context in [&first, &second] {
        assert_eq!(context.state().await, FrameworkState::Initialized);
        let system = context.plugin(&context.system_plugin()).await.unwrap();
        assert_eq!(system.state(), PluginState::Active);
    }
    let live = global::live_instances();
    assert!(live.contains(&first.id()) && live.contains(&second.id()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_installs_get_distinct_ids() {
    let context = Arc::new(PluginFrameworkContext::new(FrameworkProperties::new()));
    context.init().await.unwrap();

    let installs = (0..32).map(|i| {
        let context = context.clone();
        async move {
            let name = format!("p{}", i);
            context
                .install(&location(&name, "1.0.0"), manifest(&name, "1.0.0", &[]))
                .await
                .unwrap()
        }
    });
    let handles = join_all(installs).await;

    let ids: HashSet<u64> = handles.iter().map(|h| h.plugin_id()).collect();
    assert_eq!(ids.len(), 32);
    assert!(!ids.contains(&0));
    assert_eq!(context.plugins().await.len(), 33);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_installs_of_same_location_collapse() {
    let context = Arc::new(PluginFrameworkContext::new(FrameworkProperties::new()));
    context.init().await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let context = context.clone();
            tokio::spawn(async move {
                context
                    .install("mem:shared", manifest("shared", "1.0.0", &[]))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut handles = HashSet::new();
    for task in tasks {
        handles.insert(task.await.unwrap());
    }
    assert_eq!(handles.len(), 1);
    assert_eq!(context.storage().installed().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_starts_share_a_dependency() {
    let log = events();
    let names: Vec<String> = (0..8).map(|i| format!("user{}", i)).collect();
    let mut activators: Vec<&str> = names.iter().map(String::as_str).collect();
    activators.push("base");
    let context = Arc::new(
        PluginFrameworkContext::builder(FrameworkProperties::new())
            .loader(recording_loader(&log, &activators))
            .build(),
    );
    context.init().await.unwrap();

    context.install("mem:base", manifest("base", "1.0.0", &[])).await.unwrap();
    let mut handles = Vec::new();
    for name in &names {
        handles.push(
            context
                .install(&location(name, "1.0.0"), manifest(name, "1.0.0", &[("base", "[1.0.0,2.0.0)")]))
                .await
                .unwrap(),
        );
    }

    let starts = handles.iter().map(|handle| {
        let context = context.clone();
        let handle = *handle;
        async move { context.start_plugin(&handle).await }
    });
    for result in join_all(starts).await {
        result.unwrap();
    }

    for record in context.plugins().await {
        let expected = match record.symbolic_name() {
            "base" => PluginState::Resolved,
            _ => PluginState::Active,
        };
        assert_eq!(record.state(), expected, "{}", record.describe());
    }
    assert_eq!(recorded(&log).len(), 8);
}

#[tokio::test]
async fn test_start_during_uninstall_finds_plugin_gone() {
    let log = events();
    let gate = Gate::new();
    let context = PluginFrameworkContext::builder(FrameworkProperties::new())
        .loader(gated_loader(&log, "a", &gate, GatedCall::Stop))
        .build();
    context.init().await.unwrap();
    let a = context.install(&location("a", "1.0.0"), manifest("a", "1.0.0", &[])).await.unwrap();
    context.start_plugin(&a).await.unwrap();

    // Park uninstall inside the activator's stop, then try to start again
    let (uninstalled, restarted) = futures::join!(context.uninstall(&a), async {
        gate.wait_entered().await;
        let restarted = context.start_plugin(&a).await;
        gate.open();
        restarted
    });

    uninstalled.unwrap();
    let err = restarted.unwrap_err();
    assert!(matches!(
        err.as_plugin_system(),
        Some(PluginSystemError::PluginNotFound(_))
    ));
    assert!(context.plugin(&a).await.is_err());
    assert!(context.storage().installed().unwrap().is_empty());
    assert_eq!(recorded(&log), vec!["start:a", "stop:a"]);
}

#[tokio::test]
async fn test_uninstall_during_start_is_rejected_then_stops_cleanly() {
    let log = events();
    let gate = Gate::new();
    let context = PluginFrameworkContext::builder(FrameworkProperties::new())
        .loader(gated_loader(&log, "a", &gate, GatedCall::Start))
        .build();
    context.init().await.unwrap();
    let a = context.install(&location("a", "1.0.0"), manifest("a", "1.0.0", &[])).await.unwrap();

    let (started, uninstalled) = futures::join!(context.start_plugin(&a), async {
        gate.wait_entered().await;
        let uninstalled = context.uninstall(&a).await;
        gate.open();
        uninstalled
    });

    started.unwrap();
    let err = uninstalled.unwrap_err();
    assert!(matches!(
        err.as_plugin_system(),
        Some(PluginSystemError::LifecycleViolation { .. })
    ));
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Active);

    // Once the start has finished the plugin can be uninstalled, and its activator is stopped
    context.uninstall(&a).await.unwrap();
    assert_eq!(recorded(&log), vec!["start:a", "stop:a"]);
    assert!(context.plugins().await.iter().all(|p| p.is_system()));
}
