/// Framework name
pub const APP_NAME: &str = "plugframe";

/// Framework version, also the version of the system plugin
pub const FRAMEWORK_VERSION: &str = "0.1.0";

/// Id of the system plugin in every framework instance
pub const SYSTEM_PLUGIN_ID: u64 = 0;

/// Symbolic name of the system plugin
pub const SYSTEM_PLUGIN_SYMBOLIC_NAME: &str = "plugframe.system";

/// Location reported by the system plugin
pub const SYSTEM_PLUGIN_LOCATION: &str = "System Plugin";

/// Log target used by framework diagnostics
pub const LOG_TARGET: &str = "plugframe::framework";

/// Property: directory of the local plugin storage (absent means in-memory)
pub const PROP_STORAGE: &str = "plugframe.storage";

/// Property: storage clean policy
pub const PROP_STORAGE_CLEAN: &str = "plugframe.storage.clean";

/// Value of [`PROP_STORAGE_CLEAN`] that wipes storage on the first `init()`
pub const STORAGE_CLEAN_ON_FIRST_INIT: &str = "onFirstInit";

/// Property: trace dependency resolution
pub const PROP_DEBUG_RESOLVE: &str = "plugframe.debug.resolve";

/// Property: trace lifecycle transitions
pub const PROP_DEBUG_LIFECYCLE: &str = "plugframe.debug.lifecycle";
