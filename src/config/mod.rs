use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Administrative account every connection is opened as
pub const DEFAULT_USER: &str = "postgres";

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database name (`NAME_DB`)
    pub name_db: String,
    /// Database password (`PASSWORD_DB`)
    pub password_db: String,
    /// Database host (`DB_HOST`)
    #[serde(default = "default_host")]
    pub db_host: String,
    /// Database port (`DB_PORT`)
    #[serde(default = "default_port")]
    pub db_port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if the file exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Connection options for the configured database
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(DEFAULT_USER)
            .password(&self.password_db)
            .database(&self.name_db)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
