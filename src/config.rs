use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file location: ~/.config/driftcheck/config.json
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("driftcheck").join("config.json"))
}

/// Endpoint and deadline defaults loaded from disk. Flags and environment
/// variables always win over file values; the file only fills gaps.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub inventory_addr: Option<String>,
    #[serde(default)]
    pub directory_addr: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load a config file.
    ///
    /// An explicitly-passed path must exist and parse. The default path is
    /// optional: when it is absent, the empty config is returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config format in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parses() {
        let content = r#"{
            "inventory_addr": "https://inventory.internal",
            "directory_addr": "http://127.0.0.1:8500",
            "timeout_secs": 5
        }"#;
        let config: FileConfig = serde_json::from_str(content).unwrap();
        assert_eq!(
            config.inventory_addr.as_deref(),
            Some("https://inventory.internal")
        );
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn test_partial_config_parses() {
        let config: FileConfig = serde_json::from_str(r#"{"timeout_secs": 30}"#).unwrap();
        assert!(config.inventory_addr.is_none());
        assert!(config.directory_addr.is_none());
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_empty_config_parses() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.inventory_addr.is_none());
    }

    #[test]
    fn test_missing_explicit_path_errors() {
        let result = FileConfig::load(Some(Path::new("/nonexistent/driftcheck.json")));
        assert!(result.is_err());
    }
}
