use std::time::Duration;

/// Move-guard configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// How long a submitted move key blocks an identical submission, in
    /// milliseconds.
    pub dedupe_ttl_ms: u64,
}

impl GuardConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        GuardConfig {
            dedupe_ttl_ms: std::env::var("CHESS_DEDUPE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
        }
    }

    /// Dedupe window as a `Duration`.
    pub fn dedupe_ttl(&self) -> Duration {
        Duration::from_millis(self.dedupe_ttl_ms)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            dedupe_ttl_ms: 2000,
        }
    }
}
