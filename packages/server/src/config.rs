use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    100
}

/// Defaults applied by the round engine.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// `is_schedule_enforced` of newly created contests. Default: true.
    #[serde(default = "default_schedule_enforced")]
    pub schedule_enforced_by_default: bool,
    /// Task text stored when a schedule is set without one.
    #[serde(default = "default_schedule_task")]
    pub default_schedule_task: String,
}

fn default_schedule_enforced() -> bool {
    true
}
fn default_schedule_task() -> String {
    "Judging visit".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schedule_enforced_by_default: default_schedule_enforced(),
            default_schedule_task: default_schedule_task(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("log.level", "info")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., ARTCONTEST__DATABASE__URL)
            .add_source(Environment::with_prefix("ARTCONTEST").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
