//! Parent scenario lookup for `extends`

use crate::scenario::config::ScenarioConfig;
use crate::scenario::ConfigError;
use std::collections::BTreeMap;

/// Loads scenario documents by name
///
/// Implementations return `Ok(None)` when no scenario has that name; the
/// resolver turns that into [`ConfigError::MissingParent`].
pub trait ScenarioSource {
    fn load(&self, name: &str) -> Result<Option<ScenarioConfig>, ConfigError>;
}

/// In-memory scenario collection
#[derive(Debug, Clone, Default)]
pub struct ScenarioLibrary {
    scenarios: BTreeMap<String, ScenarioConfig>,
}

impl ScenarioLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario under its own name, replacing any previous entry
    pub fn insert(&mut self, scenario: ScenarioConfig) {
        self.scenarios.insert(scenario.name.clone(), scenario);
    }

    pub fn with(mut self, scenario: ScenarioConfig) -> Self {
        self.insert(scenario);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioConfig> {
        self.scenarios.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }
}

impl ScenarioSource for ScenarioLibrary {
    fn load(&self, name: &str) -> Result<Option<ScenarioConfig>, ConfigError> {
        Ok(self.scenarios.get(name).cloned())
    }
}
