use std::collections::HashMap;
use thiserror::Error;

use crate::domain::InventoryMethod;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub market_data_url: String,
    pub inventory_method: InventoryMethod,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let market_data_url = env_map
            .get("MARKET_DATA_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("MARKET_DATA_URL".to_string()))?;

        let inventory_method = env_map
            .get("INVENTORY_METHOD")
            .map(|s| s.as_str())
            .unwrap_or("fifo")
            .parse::<InventoryMethod>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "INVENTORY_METHOD".to_string(),
                    "must be fifo, lifo, or wavg".to_string(),
                )
            })?;

        Ok(Config {
            port,
            database_path,
            market_data_url,
            inventory_method,
        })
    }
}
