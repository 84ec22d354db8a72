#![cfg(test)]

use crate::kernel::error::Error;
use crate::plugin_system::dependency::PluginDependency;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::traits::{Plugin, PluginState};
use crate::plugin_system::version::Version;
use crate::plugin_system::version_range::VersionRange;

use super::common::{initialized_context, location, manifest};

#[tokio::test]
async fn test_transitive_chain_is_resolved_together() {
    let context = initialized_context().await;
    let c = context.install(&location("c", "1.0.0"), manifest("c", "1.0.0", &[])).await.unwrap();
    let b = context
        .install(&location("b", "1.0.0"), manifest("b", "1.0.0", &[("c", "[1.0.0,2.0.0)")]))
        .await
        .unwrap();
    let a = context
        .install(&location("a", "1.0.0"), manifest("a", "1.0.0", &[("b", "1.0.0")]))
        .await
        .unwrap();

    assert_eq!(context.resolve_plugin(&a).await.unwrap(), None);
    for handle in [&a, &b, &c] {
        assert_eq!(context.plugin(handle).await.unwrap().state(), PluginState::Resolved);
    }
}

#[tokio::test]
async fn test_failed_resolve_leaves_states_untouched() {
    let context = initialized_context().await;
    let b = context
        .install(&location("b", "1.0.0"), manifest("b", "1.0.0", &[("c", "1.0.0")]))
        .await
        .unwrap();
    let a = context
        .install(&location("a", "1.0.0"), manifest("a", "1.0.0", &[("b", "1.0.0")]))
        .await
        .unwrap();

    let blocker = context.resolve_plugin(&a).await.unwrap().unwrap();
    assert_eq!(blocker.symbolic_name, "b");
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Installed);
    assert_eq!(context.plugin(&b).await.unwrap().state(), PluginState::Installed);

    // Installing the missing provider lets a retry succeed
    context.install(&location("c", "1.1.0"), manifest("c", "1.1.0", &[])).await.unwrap();
    assert_eq!(context.resolve_plugin(&a).await.unwrap(), None);
    assert_eq!(context.plugin(&b).await.unwrap().state(), PluginState::Resolved);
}

#[tokio::test]
async fn test_cycle_between_installed_plugins_resolves() {
    let context = initialized_context().await;
    let x = context
        .install(&location("x", "1.0.0"), manifest("x", "1.0.0", &[("y", "1.0.0")]))
        .await
        .unwrap();
    let y = context
        .install(&location("y", "1.0.0"), manifest("y", "1.0.0", &[("x", "1.0.0")]))
        .await
        .unwrap();

    assert_eq!(context.resolve_plugin(&y).await.unwrap(), None);
    assert_eq!(context.plugin(&x).await.unwrap().state(), PluginState::Resolved);
    assert_eq!(context.plugin(&y).await.unwrap().state(), PluginState::Resolved);
}

#[tokio::test]
async fn test_highest_matching_version_is_pulled_in() {
    let context = initialized_context().await;
    let old = context.install(&location("b", "1.0.0"), manifest("b", "1.0.0", &[])).await.unwrap();
    let newer = context.install(&location("b", "1.4.0"), manifest("b", "1.4.0", &[])).await.unwrap();
    let too_new = context.install(&location("b", "2.0.0"), manifest("b", "2.0.0", &[])).await.unwrap();
    let a = context
        .install(&location("a", "1.0.0"), manifest("a", "1.0.0", &[("b", "[1.0.0,2.0.0)")]))
        .await
        .unwrap();

    assert_eq!(context.resolve_plugin(&a).await.unwrap(), None);
    assert_eq!(context.plugin(&newer).await.unwrap().state(), PluginState::Resolved);
    assert_eq!(context.plugin(&old).await.unwrap().state(), PluginState::Installed);
    assert_eq!(context.plugin(&too_new).await.unwrap().state(), PluginState::Installed);
}

#[tokio::test]
async fn test_optional_dependency_does_not_block() {
    let context = initialized_context().await;
    let mut with_optional = PluginManifest::new("a", Version::new(1, 0, 0));
    with_optional
        .add_dependency(PluginDependency::optional("absent", VersionRange::parse("1.0.0").unwrap()))
        .add_require_header(r#"present; plugin-version="[1.0,2.0)""#)
        .unwrap();
    context.install(&location("present", "1.5.0"), manifest("present", "1.5.0", &[])).await.unwrap();
    let a = context.install("mem:a", with_optional).await.unwrap();

    assert_eq!(context.resolve_plugin(&a).await.unwrap(), None);
}

#[tokio::test]
async fn test_start_resolves_and_reports_blocker() {
    let context = initialized_context().await;
    context.install(&location("b", "2.0.0"), manifest("b", "2.0.0", &[])).await.unwrap();
    let a = context
        .install(&location("a", "1.0.0"), manifest("a", "1.0.0", &[("b", "[1.0.0,2.0.0)")]))
        .await
        .unwrap();

    let err = context.start_plugin(&a).await.unwrap_err();
    match err {
        Error::PluginSystem(PluginSystemError::UnresolvableDependency {
            plugin,
            symbolic_name,
            range,
        }) => {
            assert_eq!(plugin, "a:1.0.0");
            assert_eq!(symbolic_name, "b");
            assert_eq!(range.to_string(), "[1.0.0,2.0.0)");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(context.plugin(&a).await.unwrap().state(), PluginState::Installed);
}
