use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::application::DEFAULT_MAX_SPAWN_PER_REQUEST;
use crate::domains::logger::LogLevel;
use crate::domains::projection::{ProjectionBounds, DEFAULT_PROJ_DEFINITION};
use crate::domains::simulation::{
    StepLimits, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_HALVINGS, DEFAULT_MAX_STEP_LENGTH, DEFAULT_PERSON_RADIUS,
};

pub const CONFIG_ENV_VAR: &str = "TSUNAMI_EVAC_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub map: MapConfig,
    pub projection: ProjectionConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub path: PathBuf,
    pub building_tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// PROJ.4 definition of the planar frame.
    pub definition: String,
    pub bounds: ProjectionBounds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub person_radius: f64,
    pub max_step_length: f64,
    pub max_halvings: u32,
    pub max_attempts: u32,
    /// Upper bound on `n` for a single spawn-at-exit-doors request.
    pub max_spawn_per_request: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<String>,
}

impl SimulationConfig {
    pub fn step_limits(&self) -> StepLimits {
        StepLimits {
            max_halvings: self.max_halvings,
            max_attempts: self.max_attempts,
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config path precedence: TSUNAMI_EVAC_CONFIG env var -> ./config.toml
    pub fn resolve_path() -> PathBuf {
        env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load from `path`, or fall back to defaults when the file does not exist.
    /// The bool reports whether the file was found.
    pub async fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        if !tokio::fs::try_exists(path.as_ref()).await.unwrap_or(false) {
            return Ok((Config::default(), false));
        }
        Ok((Config::from_file(path).await?, true))
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if !(sim.person_radius.is_finite() && sim.person_radius > 0.0) {
            bail!("simulation.person_radius must be positive, got {}", sim.person_radius);
        }
        if !(sim.max_step_length.is_finite() && sim.max_step_length >= 0.0) {
            bail!("simulation.max_step_length must be non-negative, got {}", sim.max_step_length);
        }
        if sim.max_attempts == 0 {
            bail!("simulation.max_attempts must be at least 1");
        }
        if sim.max_spawn_per_request == 0 {
            bail!("simulation.max_spawn_per_request must be at least 1");
        }
        if self.projection.definition.trim().is_empty() {
            bail!("projection.definition must not be empty");
        }
        self.projection
            .bounds
            .validate()
            .context("projection.bounds")?;
        if self.map.building_tag.trim().is_empty() {
            bail!("map.building_tag must not be empty");
        }
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("valpo.osm.pbf"),
            building_tag: "building".to_string(),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        // Valparaíso, Chile
        Self {
            definition: DEFAULT_PROJ_DEFINITION.to_string(),
            bounds: ProjectionBounds::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            person_radius: DEFAULT_PERSON_RADIUS,
            max_step_length: DEFAULT_MAX_STEP_LENGTH,
            max_halvings: DEFAULT_MAX_HALVINGS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_spawn_per_request: DEFAULT_MAX_SPAWN_PER_REQUEST,
            seed: None,
        }
    }
}
