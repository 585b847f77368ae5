//! Configuration management.

mod file_config;

pub use file_config::{default_config_path, find_config_file, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::NewsError;
use crate::news::{Endpoints, GoogleNews, GoogleNewsBuilder, ResolveMode};
use crate::utils::{HttpSettings, DEFAULT_USER_AGENT};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP session settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Remote endpoints
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Query defaults used by the command line
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total timeout per request, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub proxy: ProxyConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
            proxy: ProxyConfig::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Session-wide proxy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub http: Option<String>,

    #[serde(default)]
    pub https: Option<String>,
}

/// Defaults applied to queries built by the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            country: default_country(),
            max_results: default_max_results(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_country() -> String {
    "US".to_string()
}

fn default_max_results() -> usize {
    100
}

/// Link resolution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub mode: ResolveMode,

    /// Drop ` - Publisher` from article titles
    #[serde(default)]
    pub strip_publisher_suffix: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` for JSON lines; anything else is human-readable
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// HTTP settings for the engine's session
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            user_agent: self.http.user_agent.clone(),
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            ..HttpSettings::default()
        }
    }

    /// Engine builder carrying every setting from this configuration
    pub fn engine_builder(&self) -> GoogleNewsBuilder {
        let mut builder = GoogleNews::builder()
            .http_settings(self.http_settings())
            .endpoints(self.endpoints.clone())
            .mode(self.resolver.mode)
            .strip_publisher_suffix(self.resolver.strip_publisher_suffix);

        if let Some(proxy) = &self.http.proxy.http {
            builder = builder.proxy("http", proxy);
        }
        if let Some(proxy) = &self.http.proxy.https {
            builder = builder.proxy("https", proxy);
        }
        builder
    }

    /// Build an engine from this configuration
    pub fn build_engine(&self) -> Result<GoogleNews, NewsError> {
        self.engine_builder().build()
    }
}

/// Load configuration from an optional file, overridden by `GNEWS_*`
/// environment variables (`GNEWS_HTTP__TIMEOUT_SECS=5`)
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("GNEWS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.endpoints.feed_base, "https://news.google.com/rss");
        assert_eq!(config.defaults.language, "en");
        assert_eq!(config.defaults.max_results, 100);
        assert_eq!(config.resolver.mode, ResolveMode::Concurrent);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gnews.toml");
        std::fs::write(
            &path,
            r#"
[http]
timeout_secs = 12

[endpoints]
feed_base = "http://127.0.0.1:8080/rss"

[resolver]
mode = "sequential"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.http.timeout_secs, 12);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.endpoints.feed_base, "http://127.0.0.1:8080/rss");
        assert_eq!(config.endpoints.redirect_base, "https://news.google.com");
        assert_eq!(config.resolver.mode, ResolveMode::Sequential);
    }

    #[test]
    fn test_engine_from_config() {
        let mut config = Config::default();
        config.resolver.mode = ResolveMode::Sequential;
        config.http.proxy.https = Some("http://127.0.0.1:3128".to_string());

        let engine = config.build_engine().unwrap();
        assert_eq!(engine.mode(), ResolveMode::Sequential);

        config.http.proxy.http = Some("not a url".to_string());
        assert!(config.build_engine().is_err());
    }
}
