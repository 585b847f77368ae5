//! Configuration file support.
//!
//! # Configuration File Format
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! user_agent = "gnews/0.1.0 (+news feed resolver)"
//!
//! [http.proxy]
//! https = "http://proxy:8080"
//!
//! [endpoints]
//! feed_base = "https://news.google.com/rss"
//! redirect_base = "https://news.google.com"
//! rpc_path = "/_/DotsSplashUi/data/batchexecute"
//!
//! [defaults]
//! language = "en"
//! country = "US"
//! max_results = 100
//!
//! [resolver]
//! mode = "concurrent"
//! strip_publisher_suffix = false
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory
const LOCAL_CONFIG: &str = "gnews.toml";

impl Config {
    /// Load configuration from a TOML file, without environment overrides
    pub fn load_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Default location for a user configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gnews").join("config.toml"))
}

/// Find a configuration file: `./gnews.toml`, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
