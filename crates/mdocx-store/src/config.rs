//! Store settings (`[store]` section of `mdocx.toml`)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default database file, relative to the working directory
pub const DEFAULT_DATABASE: &str = "markdown_files.db";

/// Where the store keeps its data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// SQLite database file
    pub database: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default)]
        store: StoreSettings,
    }

    #[test]
    fn test_default_database() {
        let wrapper: Wrapper = toml::from_str("").unwrap();
        assert_eq!(wrapper.store.database, PathBuf::from("markdown_files.db"));
    }

    #[test]
    fn test_custom_database() {
        let wrapper: Wrapper = toml::from_str("[store]\ndatabase = \"/var/lib/mdocx.db\"\n").unwrap();
        assert_eq!(wrapper.store.database, PathBuf::from("/var/lib/mdocx.db"));
    }
}
