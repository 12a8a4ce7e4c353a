//! YAML configuration loading
//!
//! Layout under the config directory:
//!
//! ```text
//! constants/agents.yaml    agents: [{name, type, ownership_ratio, market_cap_ratio?}]
//! constants/model.yaml     {farm_emission_rate, backstop_rate, surplus_buffer?}
//! scenarios/<name>.yaml    scenario documents
//! extensions.yaml          name → settings (optional)
//! ```

use anyhow::{Context, Result};
use forecast_core_rs::scenario::{ConfigError, ScenarioConfig, ScenarioSource};
use forecast_core_rs::{AgentDefinition, ModelConstants};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct AgentsFile {
    agents: Vec<AgentDefinition>,
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Paths of a configuration directory
#[derive(Debug, Clone)]
pub struct ConfigDir {
    root: PathBuf,
}

impl ConfigDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn agents_path(&self) -> PathBuf {
        self.root.join("constants").join("agents.yaml")
    }

    pub fn model_path(&self) -> PathBuf {
        self.root.join("constants").join("model.yaml")
    }

    pub fn extensions_path(&self) -> PathBuf {
        self.root.join("extensions.yaml")
    }

    pub fn scenarios_dir(&self) -> PathBuf {
        self.root.join("scenarios")
    }

    pub fn load_agents(&self) -> Result<Vec<AgentDefinition>> {
        let file: AgentsFile = read_yaml(&self.agents_path())?;
        debug!(agents = file.agents.len(), "loaded agents");
        Ok(file.agents)
    }

    pub fn load_constants(&self) -> Result<ModelConstants> {
        read_yaml(&self.model_path())
    }

    /// Extension settings; a missing or empty file means no extensions
    pub fn load_extensions(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let path = self.extensions_path();
        if !path.exists() {
            debug!(path = %path.display(), "no extensions file");
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let settings: Option<BTreeMap<String, serde_json::Value>> =
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings.unwrap_or_default())
    }

    pub fn scenarios(&self) -> ScenarioDir {
        ScenarioDir::new(self.scenarios_dir())
    }
}

/// Scenario documents stored as `<dir>/<name>.yaml`
#[derive(Debug, Clone)]
pub struct ScenarioDir {
    dir: PathBuf,
}

impl ScenarioDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.yaml"))
    }

    /// Load a scenario that must exist
    pub fn load_required(&self, name: &str) -> Result<ScenarioConfig> {
        let path = self.path_for(name);
        let mut config: ScenarioConfig = read_yaml(&path)?;
        if config.name.is_empty() {
            config.name = name.to_string();
        }
        Ok(config)
    }

    /// Names of every scenario file, sorted
    pub fn names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).with_context(|| format!("listing {}", self.dir.display()))?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl ScenarioSource for ScenarioDir {
    fn load(&self, name: &str) -> Result<Option<ScenarioConfig>, ConfigError> {
        if !self.path_for(name).exists() {
            return Ok(None);
        }
        self.load_required(name)
            .map(Some)
            .map_err(|e| ConfigError::ScenarioLoad {
                name: name.to_string(),
                reason: format!("{e:#}"),
            })
    }
}
