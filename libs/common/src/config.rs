//! Listener configuration shared by the marketplace services

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Address a service binds to
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load the listener settings
    ///
    /// # Environment Variables
    /// - `HAVEN_HOST`: interface to bind (default: "0.0.0.0")
    /// - `HAVEN_PORT`: port to bind (default: `default_port`)
    pub fn load(default_port: u16) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix("HAVEN"))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
