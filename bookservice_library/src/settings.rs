use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const CONFIG_FILE_ENV: &str = "BOOKSERVICE_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "bookservice.toml";
/// Connection string override, kept for compatibility with existing deployments
const DB_URL_ENV: &str = "DB";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Mongo,
    InMemory,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Loads settings from defaults, optional toml file, `BOOKSERVICE__*` variables and `DB`
    pub fn load() -> anyhow::Result<Self> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let config_file =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        config::Config::builder()
            .add_source(config::File::from(PathBuf::from(config_file)).required(false))
            .add_source(
                config::Environment::with_prefix("BOOKSERVICE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("database.url", std::env::var(DB_URL_ENV).ok())
            .context("Failed to apply DB override")?
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_url")]
    pub url: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_collection")]
    pub collection: String,
    /// Upper bound for a single store call
    #[serde(default = "DatabaseSettings::default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl DatabaseSettings {
    fn default_url() -> String {
        "mongodb://127.0.0.1:27017".to_string()
    }

    fn default_name() -> String {
        "fcc".to_string()
    }

    fn default_collection() -> String {
        "books".to_string()
    }

    fn default_store_timeout_ms() -> u64 {
        5000
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            name: Self::default_name(),
            collection: Self::default_collection(),
            store_timeout_ms: Self::default_store_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    /// Export spans to a local Jaeger agent
    #[serde(default)]
    pub jaeger_enabled: bool,
}
