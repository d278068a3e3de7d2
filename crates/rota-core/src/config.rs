use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Top-level config (rota.toml + ROTA_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Write-access credentials for the HTTP Basic check.
///
/// `password_hash` is an argon2 PHC string produced ahead of time; the
/// plaintext password is never stored anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password_hash: String,
}

/// Which persistence backend to open at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    Sqlite,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_backend() -> StoreBackend {
    StoreBackend::Sqlite
}
fn default_store_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.rota/rota.db", home)
}

impl RotaConfig {
    /// Load config from a TOML file with ROTA_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.rota/rota.toml
    ///
    /// Env keys use `__` as the section separator so snake_case field names
    /// survive: `ROTA_AUTH__PASSWORD_HASH` maps to `auth.password_hash`.
    ///
    /// Credentials have no defaults — a missing `auth` section is an error,
    /// not a silently-open write surface.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: RotaConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ROTA_").split("__"))
            .extract()
            .map_err(|e| crate::error::RotaError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.rota/rota.toml", home)
}
