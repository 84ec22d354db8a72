use std::collections::{BTreeMap, BTreeSet};

use crate::plugin_system::dependency::BlockingDependency;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::record::PluginRecord;
use crate::plugin_system::traits::{Plugin, PluginId, PluginState};
use crate::plugin_system::version_range::VersionRange;

/// All plugins of one framework instance, keyed by plugin id.
///
/// Ids grow with every install, so iterating the map yields install order.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<PluginId, PluginRecord>,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            plugins: BTreeMap::new(),
        }
    }

    /// Register a plugin record.
    ///
    /// Fails when the id is taken or when a plugin with the same symbolic
    /// name and version is already present.
    pub fn insert(&mut self, record: PluginRecord) -> Result<(), PluginSystemError> {
        let id = record.id();
        if self.plugins.contains_key(&id) {
            return Err(PluginSystemError::violation(
                "insert",
                &record.describe(),
                format!("plugin id {} is already registered", id),
            ));
        }
        if self
            .plugins
            .values()
            .any(|p| p.symbolic_name() == record.symbolic_name() && p.version() == record.version())
        {
            return Err(PluginSystemError::DuplicatePlugin {
                symbolic_name: record.symbolic_name().to_string(),
                version: record.version().to_string(),
            });
        }
        self.plugins.insert(id, record);
        Ok(())
    }

    /// Unregister a plugin by id
    pub fn remove(&mut self, id: PluginId) -> Option<PluginRecord> {
        self.plugins.remove(&id)
    }

    pub fn get(&self, id: PluginId) -> Option<&PluginRecord> {
        self.plugins.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PluginId) -> Option<&mut PluginRecord> {
        self.plugins.get_mut(&id)
    }

    /// Check if a plugin is registered by id
    pub fn contains(&self, id: PluginId) -> bool {
        self.plugins.contains_key(&id)
    }

    /// Find the plugin installed from `location`
    pub fn find_by_location(&self, location: &str) -> Option<&PluginRecord> {
        self.plugins.values().find(|p| p.location() == location)
    }

    /// Plugins named `symbolic_name` whose version lies in `range`,
    /// highest version first (ties broken by install order)
    pub fn find(&self, symbolic_name: &str, range: &VersionRange) -> Vec<&PluginRecord> {
        let mut matches: Vec<&PluginRecord> = self
            .plugins
            .values()
            .filter(|p| p.symbolic_name() == symbolic_name && range.includes(p.version()))
            .collect();
        matches.sort_by(|a, b| b.version().cmp(a.version()).then_with(|| a.id().cmp(&b.id())));
        matches
    }

    /// Iterate over all records in install order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PluginRecord> {
        self.plugins.values()
    }

    /// Get the number of registered plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.plugins.clear();
    }

    /// Checks that `plugin_id` can satisfy all its mandatory Require-Plugin
    /// constraints with plugins of this registry.
    ///
    /// On success returns the ids of every plugin that is resolvable as part
    /// of this walk (the plugin itself plus installed providers pulled in
    /// transitively). On failure returns the first mandatory constraint of
    /// `plugin_id` that no candidate satisfies. The registry is not modified.
    pub fn resolve(
        &self,
        plugin_id: PluginId,
        trace: &mut dyn FnMut(&str),
    ) -> Result<Vec<PluginId>, BlockingDependency> {
        let mut resolving = BTreeSet::new();
        resolving.insert(plugin_id);
        self.check_require_plugin(plugin_id, &mut resolving, trace)?;
        Ok(resolving.into_iter().collect())
    }

    fn check_require_plugin(
        &self,
        plugin_id: PluginId,
        resolving: &mut BTreeSet<PluginId>,
        trace: &mut dyn FnMut(&str),
    ) -> Result<(), BlockingDependency> {
        let record = match self.plugins.get(&plugin_id) {
            Some(record) => record,
            None => return Ok(()),
        };

        for dependency in record.dependencies() {
            let mut satisfied_by = None;
            for candidate in self.find(&dependency.symbolic_name, &dependency.version_range) {
                let candidate_id = candidate.id();
                if resolving.contains(&candidate_id) || candidate.state().is_resolved() {
                    satisfied_by = Some(candidate);
                    break;
                }
                if candidate.state() == PluginState::Installed {
                    // Try the candidate on a copy so a failed attempt leaves no trace
                    let mut attempt = resolving.clone();
                    attempt.insert(candidate_id);
                    match self.check_require_plugin(candidate_id, &mut attempt, trace) {
                        Ok(()) => {
                            *resolving = attempt;
                            satisfied_by = Some(candidate);
                            break;
                        }
                        Err(blocker) => trace(&format!(
                            "candidate {} for {} rejected, blocked by {}",
                            candidate.describe(),
                            record.describe(),
                            blocker
                        )),
                    }
                }
            }

            match satisfied_by {
                Some(provider) => trace(&format!(
                    "{} requires {} -> {}",
                    record.describe(),
                    dependency,
                    provider.describe()
                )),
                None if dependency.is_mandatory() => {
                    trace(&format!("{} blocked on {}", record.describe(), dependency));
                    return Err(BlockingDependency::from(dependency));
                }
                None => trace(&format!(
                    "{} skips unsatisfied optional dependency {}",
                    record.describe(),
                    dependency.symbolic_name
                )),
            }
        }
        Ok(())
    }
}
