// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory holding the per-project collections
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Project served by this process
    pub db_name: String,
    /// Rules document path; defaults to `rules.json` inside the data directory
    pub rules_file: Option<PathBuf>,
    /// Session token settings
    pub token: TokenSettings,
}

/// Session token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Symmetric signing secret, raw or base64; at least 32 bytes once decoded
    pub secret: String,
    /// HMAC algorithm name: HS256, HS384 or HS512
    pub algorithm: String,
    /// Access token lifetime in seconds
    pub access_ttl_secs: u64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4444".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            db_name: "example".to_string(),
            rules_file: None,
            token: TokenSettings::default(),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            algorithm: "HS256".to_string(),
            access_ttl_secs: 60 * 60,               // 1 hour
            refresh_ttl_secs: 60 * 60 * 24 * 30,    // 30 days
        }
    }
}

impl Settings {
    /// Load settings from config files in the working directory merged with
    /// `GATEHOUSE_`-prefixed environment variables
    pub fn load() -> Result<Settings> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"))
            .merge(Yaml::file("config.yaml"))
            .merge(Json::file("config.json"))
            .merge(Env::prefixed("GATEHOUSE_").split("__"))
            .extract()?;

        Ok(settings)
    }

    /// Load settings from an explicit config file, still honoring the
    /// environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref();
        let figment = Figment::from(Serialized::defaults(Settings::default()));
        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => figment.merge(Toml::file(path)),
        };

        Ok(figment
            .merge(Env::prefixed("GATEHOUSE_").split("__"))
            .extract()?)
    }

    /// Validate settings before the server comes up
    pub fn validate(&self) -> Result<()> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => bail!("invalid log level: {other}"),
        }

        if self.db_name.is_empty() {
            bail!("db_name must not be empty");
        }

        if self.token.access_ttl_secs == 0 || self.token.refresh_ttl_secs == 0 {
            bail!("token TTLs must be positive");
        }

        Ok(())
    }

    /// Path of the rules document
    pub fn rules_path(&self) -> PathBuf {
        self.rules_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("rules.json"))
    }
}
