//! Conversion settings
//!
//! Loaded from the `[convert]` and `[images]` sections of `mdocx.toml`.
//! Every field has a default so an empty or missing file is valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::image::EMU_PER_INCH;

/// Font family used for math spans unless configured otherwise
pub const DEFAULT_MATH_FONT: &str = "Cambria Math";

/// Settings that shape a single conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConversionConfig {
    /// Text settings
    pub convert: TextSettings,
    /// Image resolution settings
    pub images: ImageSettings,
}

impl ConversionConfig {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

/// Text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Font family for math runs
    pub math_font: String,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            math_font: DEFAULT_MATH_FONT.to_string(),
        }
    }
}

/// Image resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Maximum display width in inches
    pub max_width_inches: f64,
    /// Timeout for remote fetches, in seconds
    pub timeout_secs: u64,
    /// Whether `http(s)://` sources may be fetched
    pub allow_remote: bool,
    /// Largest accepted image, in bytes
    pub max_bytes: u64,
    /// Directory relative image paths are resolved against
    pub base_dir: Option<PathBuf>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            max_width_inches: 6.0,
            timeout_secs: 10,
            allow_remote: true,
            max_bytes: 20 * 1024 * 1024,
            base_dir: None,
        }
    }
}

impl ImageSettings {
    /// Maximum display width in EMUs
    pub fn max_width_emu(&self) -> i64 {
        (self.max_width_inches * EMU_PER_INCH as f64).round() as i64
    }

    /// Remote fetch timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ConversionConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConversionConfig::default());
        assert_eq!(config.convert.math_font, "Cambria Math");
        assert!(config.images.allow_remote);
    }

    #[test]
    fn test_partial_sections() {
        let config = ConversionConfig::from_toml_str(
            r#"
[convert]
math_font = "STIX Two Math"

[images]
allow_remote = false
timeout_secs = 3
"#,
        )
        .unwrap();
        assert_eq!(config.convert.math_font, "STIX Two Math");
        assert!(!config.images.allow_remote);
        assert_eq!(config.images.timeout(), Duration::from_secs(3));
        assert_eq!(config.images.max_width_inches, 6.0);
    }

    #[test]
    fn test_max_width_emu() {
        let settings = ImageSettings {
            max_width_inches: 1.0,
            ..Default::default()
        };
        assert_eq!(settings.max_width_emu(), 914400);
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let config = ConversionConfig::from_toml_str("[store]\ndatabase = \"x.db\"\n").unwrap();
        assert_eq!(config, ConversionConfig::default());
    }
}
