//! Navigator configuration.
//!
//! Loaded from the environment (with `.env` support) or from a YAML file.
//! Every field has a default matching the stock rendering server.

use navigator_core::{TooltipPlacer, VisualizationMode};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_BASE_URL: &str = "NAVIGATOR_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "NAVIGATOR_TIMEOUT_SECS";
pub const ENV_DIAGRAM_WIDTH: &str = "NAVIGATOR_DIAGRAM_WIDTH";
pub const ENV_DIAGRAM_HEIGHT: &str = "NAVIGATOR_DIAGRAM_HEIGHT";
pub const ENV_MODE: &str = "NAVIGATOR_MODE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Root configuration for a navigator instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Base URL of the rendering server, without trailing slash.
    pub base_url: String,

    pub request_timeout_secs: u64,

    /// Canvas size the server lays the treemap out for.
    pub diagram_size: DiagramSize,

    /// Side panel widths; the panel covers the left edge of the viewport.
    pub panel: PanelConfig,

    pub tooltip: TooltipPlacer,

    pub initial_mode: VisualizationMode,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5001".to_string(),
            request_timeout_secs: 30,
            diagram_size: DiagramSize::default(),
            panel: PanelConfig::default(),
            tooltip: TooltipPlacer::default(),
            initial_mode: VisualizationMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagramSize {
    pub width: u32,
    pub height: u32,
}

impl Default for DiagramSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 930,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub expanded_width: f32,
    pub collapsed_width: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            expanded_width: 250.0,
            collapsed_width: 80.0,
        }
    }
}

impl PanelConfig {
    /// Width reserved on the left of the viewport.
    pub fn reserved_width(&self, collapsed: bool) -> f32 {
        if collapsed {
            self.collapsed_width
        } else {
            self.expanded_width
        }
    }
}

impl NavigatorConfig {
    /// Load from `NAVIGATOR_*` environment variables, reading `.env` first.
    ///
    /// Unset variables keep their defaults; unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable source. Used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = parse_var(&lookup, ENV_TIMEOUT_SECS)? {
            config.request_timeout_secs = secs;
        }
        if let Some(width) = parse_var(&lookup, ENV_DIAGRAM_WIDTH)? {
            config.diagram_size.width = width;
        }
        if let Some(height) = parse_var(&lookup, ENV_DIAGRAM_HEIGHT)? {
            config.diagram_size.height = height;
        }
        if let Some(mode) = parse_var(&lookup, ENV_MODE)? {
            config.initial_mode = mode;
        }

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut config: NavigatorConfig = serde_yaml::from_str(content)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            match parsed {
                Ok(v) => Ok(Some(v)),
                Err(e) => Err(ConfigError::InvalidEnv {
                    name,
                    reason: e.to_string(),
                    value,
                }),
            }
        }
    }
}
