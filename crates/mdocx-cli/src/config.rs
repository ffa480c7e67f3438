//! Configuration file handling
//!
//! Settings are loaded from `mdocx.toml`:
//!
//! ```toml
//! [convert]
//! math_font = "Cambria Math"
//!
//! [images]
//! max_width_inches = 6.0
//! timeout_secs = 10
//! allow_remote = true
//! max_bytes = 20971520
//! base_dir = "assets/"
//!
//! [store]
//! database = "markdown_files.db"
//! ```
//!
//! Every section and field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use mdocx_core::{ConversionConfig, ImageSettings, TextSettings};
use mdocx_store::StoreSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mdocx.toml";

/// Errors while loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for these settings
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Text settings
    pub convert: TextSettings,
    /// Image resolution settings
    pub images: ImageSettings,
    /// Store settings
    pub store: StoreSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicit config file, else `mdocx.toml` if present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// The part of the settings the converter consumes
    pub fn conversion(&self) -> ConversionConfig {
        ConversionConfig {
            convert: self.convert.clone(),
            images: self.images.clone(),
        }
    }
}
