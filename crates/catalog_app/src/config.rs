//! Application configuration, read from a RON file.
//!
//! Every field is optional; missing fields fall back to the engine defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use catalog_engine::{ControllerSettings, SourceSettings, StoreSettings};
use catalog_logging::{catalog_info, LogDestination};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILENAME: &str = "catalog.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let source = SourceSettings::default();
        Self {
            base_url: source.base_url,
            page_size: StoreSettings::default().page_size,
            debounce_ms: millis(ControllerSettings::default().debounce),
            connect_timeout_ms: millis(source.connect_timeout),
            request_timeout_ms: millis(source.request_timeout),
            max_bytes: source.max_bytes,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            page_size: self.page_size,
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

/// Loads `explicit` if given, otherwise `./catalog.ron` when present,
/// otherwise the defaults.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(AppConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config: AppConfig =
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
    config.log_level()?;
    catalog_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
