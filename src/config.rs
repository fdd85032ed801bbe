use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path of the sqlite database file, created when missing.
    pub db_path: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Reads `.env`, then an optional `trivia.toml`, then `TRIVIA_*`
    /// variables (`TRIVIA_DB_PATH`, `TRIVIA_HOST`, `TRIVIA_PORT`).
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_env(Environment::with_prefix("TRIVIA").try_parsing(true))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .add_source(File::with_name("trivia").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
