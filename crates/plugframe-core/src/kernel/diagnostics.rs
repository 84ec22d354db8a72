use std::fmt;
use std::sync::Arc;

use log::Level;

use crate::kernel::constants::LOG_TARGET;

/// Destination of a framework instance's diagnostic messages
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, framework_id: u64, level: Level, message: &str);
}

/// Forwards diagnostics to the `log` facade under the `plugframe::framework` target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, framework_id: u64, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "[fw#{}] {}", framework_id, message);
    }
}

/// Diagnostic handle of one framework instance.
///
/// Cheap to clone; every message carries the id of the instance that
/// produced it.
#[derive(Clone)]
pub struct FrameworkLog {
    framework_id: u64,
    sink: Arc<dyn DiagnosticSink>,
}

impl FrameworkLog {
    pub fn new(framework_id: u64, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { framework_id, sink }
    }

    pub fn framework_id(&self) -> u64 {
        self.framework_id
    }

    pub fn log(&self, level: Level, message: &str) {
        self.sink.emit(self.framework_id, level, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

impl fmt::Debug for FrameworkLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkLog")
            .field("framework_id", &self.framework_id)
            .finish()
    }
}
