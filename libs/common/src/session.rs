//! Seller sessions carried in a signed, revocable cookie
//!
//! A session is an HS256 JWT whose subject is the seller id. The token is
//! stored in an HttpOnly cookie; every protected request verifies the
//! signature and expiry, then consults the revocation list so that logout
//! invalidates the token everywhere it may have been copied.

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::cache::RedisPool;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "haven_session";

/// Default session lifetime (7 days)
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60 * 24 * 7;

const MIN_SECRET_LEN: usize = 32;

/// Errors raised while issuing, reading or revoking sessions
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session configuration error: {0}")]
    Configuration(String),

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Session revocation store error: {0}")]
    Revocation(String),

    #[error("System clock error: {0}")]
    Clock(String),
}

impl From<redis::RedisError> for SessionError {
    fn from(err: redis::RedisError) -> Self {
        SessionError::Revocation(err.to_string())
    }
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens
    pub secret: String,
    /// Session lifetime in seconds; also the cookie Max-Age
    pub ttl_seconds: u64,
    /// Whether the cookie carries the `Secure` attribute
    pub secure_cookies: bool,
}

impl SessionConfig {
    /// Build a config with the default lifetime and secure cookies
    pub fn new(secret: impl Into<String>) -> Result<Self, SessionError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(SessionError::Configuration(format!(
                "session secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            secret,
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            secure_cookies: true,
        })
    }

    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: signing secret, at least 32 bytes (required)
    /// - `SESSION_TTL_SECONDS`: session lifetime (default: 604800)
    /// - `APP_ENV`: `development` turns off the `Secure` cookie flag (default: "production")
    pub fn from_env() -> Result<Self, SessionError> {
        let secret = std::env::var("SESSION_SECRET").map_err(|_| {
            SessionError::Configuration("SESSION_SECRET environment variable not set".to_string())
        })?;

        let ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS);

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());

        let mut config = Self::new(secret)?;
        config.ttl_seconds = ttl_seconds;
        config.secure_cookies = !app_env.eq_ignore_ascii_case("development");
        Ok(config)
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Seller id, stringified
    pub sub: String,
    /// Token id, the unit of revocation
    pub jti: String,
    /// Issued at (unix seconds)
    pub iat: u64,
    /// Expiration (unix seconds)
    pub exp: u64,
}

impl SessionClaims {
    /// The seller this session authenticates
    pub fn seller_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// A freshly minted session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// Server-side list of revoked token ids
#[async_trait]
pub trait RevocationList: Send + Sync {
    /// Mark a token id as revoked for `ttl_seconds`
    async fn revoke(&self, jti: &str, ttl_seconds: u64) -> Result<(), SessionError>;

    /// Whether a token id has been revoked
    async fn is_revoked(&self, jti: &str) -> Result<bool, SessionError>;
}

/// Revocation list backed by Redis keys with a TTL
#[derive(Clone)]
pub struct RedisRevocationList {
    redis: RedisPool,
}

impl RedisRevocationList {
    pub fn new(redis: RedisPool) -> Self {
        Self { redis }
    }

    fn key(jti: &str) -> String {
        format!("revoked_session:{}", jti)
    }
}

#[async_trait]
impl RevocationList for RedisRevocationList {
    async fn revoke(&self, jti: &str, ttl_seconds: u64) -> Result<(), SessionError> {
        self.redis
            .set_with_ttl(&Self::key(jti), "1", ttl_seconds.max(1))
            .await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, SessionError> {
        Ok(self.redis.exists(&Self::key(jti)).await?)
    }
}

/// In-process revocation list for single-instance deployments and tests
#[derive(Default)]
pub struct MemoryRevocationList {
    entries: Mutex<HashMap<String, Instant>>,
}

#[async_trait]
impl RevocationList for MemoryRevocationList {
    async fn revoke(&self, jti: &str, ttl_seconds: u64) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        entries.retain(|_, expires| *expires > now);
        entries.insert(jti.to_string(), now + Duration::from_secs(ttl_seconds));
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, SessionError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .get(jti)
            .is_some_and(|expires| *expires > Instant::now()))
    }
}

struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

/// Issues, reads and revokes seller sessions
#[derive(Clone)]
pub struct SessionManager {
    keys: Arc<SessionKeys>,
    config: SessionConfig,
    revocations: Arc<dyn RevocationList>,
}

impl SessionManager {
    pub fn new(config: SessionConfig, revocations: Arc<dyn RevocationList>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let keys = SessionKeys {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        };

        Self {
            keys: Arc::new(keys),
            config,
            revocations,
        }
    }

    /// Mint a session token for a seller
    pub fn issue(&self, seller_id: i64) -> Result<IssuedSession, SessionError> {
        self.issue_at(seller_id, unix_now()?)
    }

    pub(crate) fn issue_at(&self, seller_id: i64, now: u64) -> Result<IssuedSession, SessionError> {
        let claims = SessionClaims {
            sub: seller_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.config.ttl_seconds,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)?;
        info!("Issued session for seller {}", seller_id);

        Ok(IssuedSession { token, claims })
    }

    /// Build the cookie that carries a session token
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token))
            .http_only(true)
            .secure(self.config.secure_cookies)
            .same_site(SameSite::Strict)
            .max_age(time::Duration::seconds(
                i64::try_from(self.config.ttl_seconds).unwrap_or(i64::MAX),
            ))
            .path("/")
            .build()
    }

    /// Verify signature and expiry; any failure reads as no session
    pub fn decode(&self, token: &str) -> Option<SessionClaims> {
        match decode::<SessionClaims>(token, &self.keys.decoding, &self.keys.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                None
            }
        }
    }

    /// Resolve the session carried by a request's cookies
    ///
    /// Returns `Ok(None)` for a missing, malformed, tampered, expired or
    /// revoked token. Only a failing revocation store is an error.
    pub async fn read(&self, jar: &CookieJar) -> Result<Option<SessionClaims>, SessionError> {
        let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
            return Ok(None);
        };

        let Some(claims) = self.decode(cookie.value()) else {
            return Ok(None);
        };

        if self.revocations.is_revoked(&claims.jti).await? {
            debug!("Session {} has been revoked", claims.jti);
            return Ok(None);
        }

        Ok(Some(claims))
    }

    /// End the session carried by `jar` and clear the cookie
    ///
    /// Safe to call without a session or with an already revoked one. The
    /// cookie is cleared even when the revocation list cannot be written.
    pub async fn revoke(&self, jar: CookieJar) -> CookieJar {
        if let Some(claims) = jar
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| self.decode(cookie.value()))
        {
            match self.revoke_claims(&claims).await {
                Ok(()) => info!("Revoked session for seller {}", claims.sub),
                Err(e) => error!("Failed to revoke session {}: {}", claims.jti, e),
            }
        }

        jar.remove(Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build())
    }

    async fn revoke_claims(&self, claims: &SessionClaims) -> Result<(), SessionError> {
        let remaining = claims.exp.saturating_sub(unix_now()?);
        if remaining > 0 {
            self.revocations.revoke(&claims.jti, remaining).await?;
        }
        Ok(())
    }
}

fn unix_now() -> Result<u64, SessionError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| SessionError::Clock(e.to_string()))
}
