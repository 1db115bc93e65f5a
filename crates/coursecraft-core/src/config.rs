//! Configuration module
//!
//! Environment-driven configuration for the API binary: database, server
//! and local blob storage settings.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_STORAGE_PATH: &str = "storage/public";
const DEFAULT_STORAGE_BASE_URL: &str = "http://localhost:3000/storage";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub db_max_connections: u32,
    /// Root directory for the local blob store.
    pub storage_path: String,
    /// Public base URL stored paths are resolved against.
    pub storage_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let storage_path =
            env::var("STORAGE_PATH").unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string());

        let storage_base_url = env::var("STORAGE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_STORAGE_BASE_URL.to_string());

        Ok(Config {
            database_url,
            server_port,
            db_max_connections,
            storage_path,
            storage_base_url,
        })
    }
}
