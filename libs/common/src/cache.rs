//! Redis access for short-lived marketplace state
//!
//! The services keep exactly one kind of data in Redis: the list of revoked
//! session token ids. Every key written here carries a TTL so the keyspace
//! never outgrows the session lifetime.

use redis::{AsyncCommands, Client};
use tracing::info;

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
    /// Prefix prepended to every key, so several deployments can share a server
    pub key_prefix: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    /// - `REDIS_KEY_PREFIX`: Key namespace (default: "haven")
    pub fn from_env() -> Self {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let key_prefix = std::env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "haven".to_string());

        RedisConfig { url, key_prefix }
    }
}

/// Shared Redis client handing out multiplexed connections
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
    key_prefix: String,
}

impl RedisPool {
    /// Open a client; no connection is made until the first command
    pub fn new(config: &RedisConfig) -> redis::RedisResult<Self> {
        let client = Client::open(config.url.as_str())?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool {
            client,
            key_prefix: config.key_prefix.clone(),
        })
    }

    async fn connection(&self) -> redis::RedisResult<redis::aio::MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    /// Store a value that expires after `ttl_seconds`
    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> redis::RedisResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(self.key(key), value, ttl_seconds).await?;
        Ok(())
    }

    /// Check whether a key is present
    pub async fn exists(&self, key: &str) -> redis::RedisResult<bool> {
        let mut conn = self.connection().await?;
        conn.exists(self.key(key)).await
    }

    /// Delete a key; deleting a missing key is not an error
    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        let mut conn = self.connection().await?;
        let _: u64 = conn.del(self.key(key)).await?;
        Ok(())
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> redis::RedisResult<bool> {
        let mut conn = self.connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_redis_config_defaults() {
        unsafe {
            std::env::remove_var("REDIS_URL");
            std::env::remove_var("REDIS_KEY_PREFIX");
        }

        let config = RedisConfig::from_env();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.key_prefix, "haven");
    }

    #[test]
    fn test_keys_are_namespaced() {
        let pool = RedisPool::new(&RedisConfig {
            url: "redis://localhost:6379".to_string(),
            key_prefix: "staging".to_string(),
        })
        .expect("valid redis url");

        assert_eq!(pool.key("revoked_session:abc"), "staging:revoked_session:abc");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = RedisPool::new(&RedisConfig {
            url: "not a url".to_string(),
            key_prefix: "haven".to_string(),
        });
        assert!(result.is_err());
    }
}
