#![cfg(test)]

use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use log::Level;
use tokio::sync::Notify;

use crate::kernel::context::PluginFrameworkContext;
use crate::kernel::diagnostics::DiagnosticSink;
use crate::kernel::error::{Error, Result as KernelResult};
use crate::plugin_system::dependency::PluginDependency;
use crate::plugin_system::loader::StaticPluginLoader;
use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::traits::{ActivationContext, PluginActivator};
use crate::plugin_system::version::Version;
use crate::plugin_system::version_range::VersionRange;
use crate::storage::FrameworkProperties;

/// Shared, ordered log of activator calls such as `start:a` or `stop:b`
pub type Events = Arc<StdMutex<Vec<String>>>;

pub fn events() -> Events {
    Arc::new(StdMutex::new(Vec::new()))
}

pub fn recorded(events: &Events) -> Vec<String> {
    events.lock().unwrap().clone()
}

// ===== MOCK ACTIVATORS =====

/// Activator that records its calls and can be told to fail
pub struct RecordingActivator {
    name: String,
    events: Events,
    fail_start: bool,
    fail_stop: bool,
}

impl RecordingActivator {
    pub fn new(name: &str, events: Events) -> Self {
        Self {
            name: name.to_string(),
            events,
            fail_start: false,
            fail_stop: false,
        }
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }
}

#[async_trait]
impl PluginActivator for RecordingActivator {
    async fn start(&self, _context: &ActivationContext) -> KernelResult<()> {
        self.events.lock().unwrap().push(format!("start:{}", self.name));
        if self.fail_start {
            return Err(Error::Other(format!("{} refused to start", self.name)));
        }
        Ok(())
    }

    async fn stop(&self, _context: &ActivationContext) -> KernelResult<()> {
        self.events.lock().unwrap().push(format!("stop:{}", self.name));
        if self.fail_stop {
            return Err(Error::Other(format!("{} refused to stop", self.name)));
        }
        Ok(())
    }
}

/// Loader with a [`RecordingActivator`] registered for each symbolic name
pub fn recording_loader(events: &Events, names: &[&str]) -> Arc<StaticPluginLoader> {
    let loader = Arc::new(StaticPluginLoader::new());
    for name in names {
        let events = events.clone();
        let activator_name = name.to_string();
        loader.register(name, move || {
            Arc::new(RecordingActivator::new(&activator_name, events.clone())) as Arc<dyn PluginActivator>
        });
    }
    loader
}

/// Rendezvous that lets a test park an activator call and release it later
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Called by the activator: announce arrival, then wait to be let through
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }

    /// Waits until an activator call is parked at the gate
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn open(&self) {
        self.release.notify_one();
    }
}

/// Which activator call a [`GatedActivator`] parks at its gate
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum GatedCall {
    Start,
    Stop,
}

/// Recording activator that waits at a [`Gate`] inside one of its calls
pub struct GatedActivator {
    name: String,
    events: Events,
    gate: Arc<Gate>,
    gated: GatedCall,
}

#[async_trait]
impl PluginActivator for GatedActivator {
    async fn start(&self, _context: &ActivationContext) -> KernelResult<()> {
        if self.gated == GatedCall::Start {
            self.gate.pass().await;
        }
        self.events.lock().unwrap().push(format!("start:{}", self.name));
        Ok(())
    }

    async fn stop(&self, _context: &ActivationContext) -> KernelResult<()> {
        if self.gated == GatedCall::Stop {
            self.gate.pass().await;
        }
        self.events.lock().unwrap().push(format!("stop:{}", self.name));
        Ok(())
    }
}

/// Loader whose only activator, registered under `name`, is gated on `gated`
pub fn gated_loader(events: &Events, name: &str, gate: &Arc<Gate>, gated: GatedCall) -> Arc<StaticPluginLoader> {
    let loader = Arc::new(StaticPluginLoader::new());
    let events = events.clone();
    let gate = gate.clone();
    let activator_name = name.to_string();
    loader.register(name, move || {
        Arc::new(GatedActivator {
            name: activator_name.clone(),
            events: events.clone(),
            gate: gate.clone(),
            gated,
        }) as Arc<dyn PluginActivator>
    });
    loader
}

// ===== DIAGNOSTICS =====

/// Sink that keeps every message for later inspection
#[derive(Default)]
pub struct RecordingSink {
    entries: StdMutex<Vec<(u64, Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<(u64, Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(_, l, _)| *l == level)
            .map(|(_, _, message)| message)
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, framework_id: u64, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((framework_id, level, message.to_string()));
    }
}

// ===== FIXTURES =====

/// Manifest with mandatory dependencies given as `(symbolic name, range)` pairs
pub fn manifest(name: &str, version: &str, requires: &[(&str, &str)]) -> PluginManifest {
    let mut manifest = PluginManifest::new(name, Version::parse(version).unwrap());
    for (dependency, range) in requires {
        manifest.add_dependency(PluginDependency::required(
            dependency,
            VersionRange::parse(range).unwrap(),
        ));
    }
    manifest
}

pub fn location(name: &str, version: &str) -> String {
    format!("mem:{}-{}", name, version)
}

/// Context with default collaborators that has already been initialized
pub async fn initialized_context() -> PluginFrameworkContext {
    let context = PluginFrameworkContext::new(FrameworkProperties::new());
    context.init().await.unwrap();
    context
}
