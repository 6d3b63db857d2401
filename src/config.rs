//! YAML Configuration File Support for Knvectis
//!
//! Loads traversal limits, engine behaviour and logging settings for a hunt
//! from a single YAML document.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # Knvectis hunt configuration
//! version: "1.0"
//! name: "knowledge-demo"
//!
//! traversal:
//!   mode: "custom"       # forward | backward | lateral | bidirectional | custom
//!   children: true       # custom only
//!   lateral: true        # custom only
//!   max_depth: 4
//!   max_nodes: 10000
//!
//! engine:
//!   failure_policy: "skip"   # skip | surface
//!   max_matches: 100
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use hunt::{EngineConfig, FailurePolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use traverse::{TraversalConfig, TraversalMode};

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for a hunt run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KnvectisConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub traversal: TraversalYamlConfig,

    #[serde(default)]
    pub engine: EngineYamlConfig,

    #[serde(default)]
    pub logging: LoggingYamlConfig,
}

impl KnvectisConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: KnvectisConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.traversal.validate()?;
        self.engine.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

impl Default for KnvectisConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            traversal: TraversalYamlConfig::default(),
            engine: EngineYamlConfig::default(),
            logging: LoggingYamlConfig::default(),
        }
    }
}

/// Traversal YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalYamlConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Resolver flags, only read when `mode` is `custom`
    #[serde(default)]
    pub children: bool,

    #[serde(default)]
    pub parent: bool,

    #[serde(default)]
    pub lateral: bool,

    #[serde(default)]
    pub max_depth: Option<usize>,

    #[serde(default)]
    pub max_nodes: Option<usize>,
}

impl TraversalYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let mode = self.to_traversal_mode()?;
        if !matches!(mode, TraversalMode::Custom { .. })
            && (self.children || self.parent || self.lateral)
        {
            return Err(ConfigLoadError::Validation(format!(
                "traversal.children/parent/lateral only apply to mode `custom`, not `{}`",
                self.mode
            )));
        }
        if mode.kinds().next().is_none() {
            return Err(ConfigLoadError::Validation(
                "traversal mode `custom` needs at least one of children, parent, lateral"
                    .to_string(),
            ));
        }
        self.to_traversal_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("traversal: {e}")))
    }

    pub fn to_traversal_mode(&self) -> Result<TraversalMode, ConfigLoadError> {
        match self.mode.to_ascii_lowercase().as_str() {
            "forward" => Ok(TraversalMode::Forward),
            "backward" => Ok(TraversalMode::Backward),
            "lateral" => Ok(TraversalMode::Lateral),
            "bidirectional" => Ok(TraversalMode::Bidirectional),
            "custom" => Ok(TraversalMode::Custom {
                children: self.children,
                parent: self.parent,
                lateral: self.lateral,
            }),
            other => Err(ConfigLoadError::Validation(format!(
                "traversal.mode must be one of: forward, backward, lateral, bidirectional, custom (got `{other}`)"
            ))),
        }
    }

    pub fn to_traversal_config(&self) -> TraversalConfig {
        TraversalConfig {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }
}

impl Default for TraversalYamlConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            children: false,
            parent: false,
            lateral: false,
            max_depth: None,
            max_nodes: None,
        }
    }
}

/// Engine YAML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineYamlConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    #[serde(default)]
    pub max_matches: Option<usize>,
}

impl EngineYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_engine_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("engine: {e}")))
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            failure_policy: self.failure_policy,
            max_matches: self.max_matches,
        }
    }
}

/// Logging YAML configuration, consumed by the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingYamlConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl LoggingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingYamlConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_mode() -> String {
    "forward".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
