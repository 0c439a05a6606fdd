// Relay configuration loading
//
// Settings come from an optional TOML file; command-line flags and
// environment variables override it.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::file_storage::get_global_relay_dir;

pub const DEFAULT_PORT: u16 = 4545;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Relay configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelayConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Token store settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Firebase Cloud Messaging settings
    #[serde(default)]
    pub fcm: FcmConfig,
    /// Tracking user id -> email
    #[serde(default)]
    pub identities: HashMap<String, String>,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Allowed CORS origins; empty means any origin
    #[serde(rename = "corsOrigins", alias = "cors_origins", default)]
    pub cors_origins: Vec<String>,
    /// Bearer token required on /api routes
    #[serde(rename = "apiToken", alias = "api_token", default)]
    pub api_token: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            cors_origins: Vec::new(),
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(rename = "tokensFile", alias = "tokens_file", default)]
    pub tokens_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FcmConfig {
    /// Path to the Google service-account JSON
    #[serde(rename = "credentialsFile", alias = "credentials_file", default)]
    pub credentials_file: Option<PathBuf>,
    /// FCM host override (emulators, egress proxies)
    #[serde(rename = "baseUrl", alias = "base_url", default)]
    pub base_url: Option<String>,
}

impl RelayConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: RelayConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        log::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Load the given file, or the default location if it exists, or defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = default_config_path();
        if default_path.exists() {
            return Self::load(&default_path);
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Token file path, falling back to `~/.push-relay/tokens.json`
    pub fn tokens_file(&self) -> PathBuf {
        self.storage
            .tokens_file
            .clone()
            .unwrap_or_else(|| get_global_relay_dir().join("tokens.json"))
    }
}

/// Default config file location (~/.push-relay/config.toml)
pub fn default_config_path() -> PathBuf {
    get_global_relay_dir().join("config.toml")
}

/// Values supplied on the command line or via environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub tokens_file: Option<PathBuf>,
    pub credentials_file: Option<PathBuf>,
    pub api_token: Option<String>,
    pub cors_origins: Vec<String>,
}

/// Merge command-line overrides on top of the file configuration
pub fn apply_overrides(mut config: RelayConfig, overrides: Overrides) -> RelayConfig {
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(bind) = overrides.bind {
        config.server.bind = bind;
    }
    if let Some(tokens_file) = overrides.tokens_file {
        config.storage.tokens_file = Some(tokens_file);
    }
    if let Some(credentials_file) = overrides.credentials_file {
        config.fcm.credentials_file = Some(credentials_file);
    }
    if let Some(api_token) = overrides.api_token.filter(|t| !t.is_empty()) {
        config.server.api_token = Some(api_token);
    }
    if !overrides.cors_origins.is_empty() {
        config.server.cors_origins = overrides.cors_origins;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.server.port, 4545);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert!(config.server.api_token.is_none());
        assert!(config.tokens_file().ends_with(".push-relay/tokens.json"));
    }

    #[test]
    fn test_parse_full_file() {
        let toml_str = r#"
[server]
port = 8080
bind = "127.0.0.1"
corsOrigins = ["https://app.example.com"]

[storage]
tokens_file = "/data/tokens.json"

[fcm]
credentialsFile = "/secrets/sa.json"
base_url = "http://fcm-proxy.internal:8080"

[identities]
"1" = "a@b.com"
"42" = "c@d.com"
"#;
        let config: RelayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["https://app.example.com"]);
        assert_eq!(config.tokens_file(), PathBuf::from("/data/tokens.json"));
        assert_eq!(
            config.fcm.credentials_file,
            Some(PathBuf::from("/secrets/sa.json"))
        );
        assert_eq!(
            config.fcm.base_url.as_deref(),
            Some("http://fcm-proxy.internal:8080")
        );
        assert_eq!(config.identities.get("42").map(String::as_str), Some("c@d.com"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RelayConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert!(config.identities.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(RelayConfig::load(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[identities]\n\"7\" = \"x@y.com\"\n").unwrap();

        let config = RelayConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.identities.len(), 1);
    }

    #[test]
    fn test_overrides_win() {
        let config: RelayConfig = toml::from_str(
            "[server]\nport = 9000\napiToken = \"from-file\"\ncorsOrigins = [\"https://a\"]\n",
        )
        .unwrap();

        let merged = apply_overrides(
            config,
            Overrides {
                port: Some(1234),
                api_token: Some("from-cli".to_string()),
                tokens_file: Some(PathBuf::from("/tmp/t.json")),
                ..Default::default()
            },
        );

        assert_eq!(merged.server.port, 1234);
        assert_eq!(merged.server.bind, "0.0.0.0");
        assert_eq!(merged.server.api_token.as_deref(), Some("from-cli"));
        assert_eq!(merged.server.cors_origins, vec!["https://a"]);
        assert_eq!(merged.tokens_file(), PathBuf::from("/tmp/t.json"));
    }

    #[test]
    fn test_empty_api_token_override_is_ignored() {
        let merged = apply_overrides(
            RelayConfig::default(),
            Overrides {
                api_token: Some(String::new()),
                ..Default::default()
            },
        );
        assert!(merged.server.api_token.is_none());
    }
}
