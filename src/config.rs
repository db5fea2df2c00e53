use std::{env, net::SocketAddr};

use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
const DEFAULT_SECRET_KEY: &str = "your_secret_key";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a valid socket address: {0}")]
    InvalidBindAddr(String),
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Loads `.env` (if any) and then reads `DATABASE_URL`, `SECRET_KEY` and `BIND_ADDR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let database_url = var_or("DATABASE_URL", DEFAULT_DATABASE_URL);

        let secret_key = match env::var("SECRET_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                warn!("SECRET_KEY not set, sessions are signed with the built-in development key");
                DEFAULT_SECRET_KEY.to_string()
            }
        };

        let raw_addr = var_or("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr))?;

        Ok(Config {
            database_url,
            secret_key,
            bind_addr,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
