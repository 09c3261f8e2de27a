//! Run configuration.
//!
//! TOML with the section and key names of the older `config.yaml` layout;
//! only the syntax differs.
//!
//! ```toml
//! [map]
//! start        = "2024-01-01T00:00:00Z"
//! end          = "2024-12-31T23:59:59Z"
//! center_point = [38.7223, -9.1393]   # lat, lon
//! dist         = 5000.0               # metres
//!
//! [compute]
//! max_workers = 4
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use lh_core::{Coord, Timestamp};
use lh_input::Window;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// `[map]`: which records to keep and which area to build networks for.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Records must start strictly after this instant.
    #[serde(with = "lh_core::time::iso")]
    pub start:        Timestamp,
    /// Records must end strictly before this instant.
    #[serde(with = "lh_core::time::iso")]
    pub end:          Timestamp,
    /// `[lat, lon]` of the network area centre.
    pub center_point: [f64; 2],
    /// Network radius around `center_point`, metres.
    pub dist:         f64,
}

/// `[compute]`: parallelism.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ComputeConfig {
    pub max_workers: usize,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    pub map:     MapConfig,
    pub compute: ComputeConfig,
}

impl Config {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compute.max_workers == 0 {
            return Err(ConfigError::Invalid("compute.max_workers must be at least 1".into()));
        }
        if !(self.map.dist.is_finite() && self.map.dist > 0.0) {
            return Err(ConfigError::Invalid(format!("map.dist must be positive, got {}", self.map.dist)));
        }
        if self.map.start >= self.map.end {
            return Err(ConfigError::Invalid(format!(
                "map.start ({}) must be before map.end ({})",
                self.map.start, self.map.end
            )));
        }
        let center = self.center();
        if !center.is_finite() || !center.in_range() {
            return Err(ConfigError::Invalid(format!("map.center_point {center} is out of range")));
        }
        Ok(())
    }

    pub fn window(&self) -> Window {
        Window::new(self.map.start, self.map.end)
    }

    pub fn center(&self) -> Coord {
        Coord::new(self.map.center_point[0], self.map.center_point[1])
    }
}
