//! Failed-login throttle for slowing down password guessing

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Throttle configuration
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Failures allowed inside one window before the lockout starts
    pub max_attempts: u32,
    /// Window in seconds over which failures are counted
    pub window_seconds: u64,
    /// Lockout duration in seconds
    pub lockout_seconds: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,  // 5 minutes
            lockout_seconds: 900, // 15 minutes
        }
    }
}

impl ThrottleConfig {
    /// Read limits from `LOGIN_MAX_ATTEMPTS`, `LOGIN_WINDOW_SECONDS` and
    /// `LOGIN_LOCKOUT_SECONDS`, falling back to the defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        fn read<T: std::str::FromStr>(name: &str, default: T) -> T {
            env::var(name)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        }

        Self {
            max_attempts: read("LOGIN_MAX_ATTEMPTS", defaults.max_attempts),
            window_seconds: read("LOGIN_WINDOW_SECONDS", defaults.window_seconds),
            lockout_seconds: read("LOGIN_LOCKOUT_SECONDS", defaults.lockout_seconds),
        }
    }
}

#[derive(Debug)]
struct ThrottleEntry {
    failures: u32,
    window_start: Instant,
    locked_until: Option<Instant>,
}

/// Per-email failure counter shared by all login requests of one process
#[derive(Debug, Clone)]
pub struct LoginThrottle {
    config: ThrottleConfig,
    entries: Arc<Mutex<HashMap<String, ThrottleEntry>>>,
}

impl LoginThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether a login for `key` may proceed to the password check
    pub async fn is_allowed(&self, key: &str) -> bool {
        self.is_allowed_at(key, Instant::now()).await
    }

    async fn is_allowed_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = self.entries.lock().await;

        let Some(locked_until) = entries.get(key).map(|entry| entry.locked_until) else {
            return true;
        };

        match locked_until {
            Some(until) if now < until => false,
            Some(_) => {
                entries.remove(key);
                true
            }
            None => true,
        }
    }

    /// Count a failed login; locks the key once the limit is reached
    pub async fn record_failure(&self, key: &str) {
        self.record_failure_at(key, Instant::now()).await
    }

    async fn record_failure_at(&self, key: &str, now: Instant) {
        let mut entries = self.entries.lock().await;
        let window = Duration::from_secs(self.config.window_seconds);

        // Drop counters whose window and lockout have both lapsed
        entries.retain(|_, entry| match entry.locked_until {
            Some(until) => now < until,
            None => now.duration_since(entry.window_start) < window,
        });

        let entry = entries.entry(key.to_string()).or_insert(ThrottleEntry {
            failures: 0,
            window_start: now,
            locked_until: None,
        });

        if now.duration_since(entry.window_start) >= window {
            entry.failures = 0;
            entry.window_start = now;
        }

        entry.failures += 1;

        if entry.failures >= self.config.max_attempts && entry.locked_until.is_none() {
            entry.locked_until = Some(now + Duration::from_secs(self.config.lockout_seconds));
            warn!(
                "Locked out login for {} seconds after {} failed attempts",
                self.config.lockout_seconds, entry.failures
            );
        }
    }

    /// Forget failures after a successful login
    pub async fn reset(&self, key: &str) {
        if self.entries.lock().await.remove(key).is_some() {
            info!("Cleared failed login counter");
        }
    }
}
