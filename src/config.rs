//! Client and dashboard configuration.

use crate::core::domain::error::{ImportResult, ValidationError};
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default interval between plan-list refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Environment variable holding the gateway base URL.
pub const ENV_URL: &str = "HARVESTER_IMPORT_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "HARVESTER_IMPORT_TIMEOUT_SECS";
/// Environment variable enabling `accept_invalid_certs` when `true` or `1`.
pub const ENV_INSECURE: &str = "HARVESTER_IMPORT_INSECURE";

/// Client-side request throttling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Transport settings of the [`ImportClient`](crate::ImportClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Accept self-signed certificates (typical for lab clusters).
    pub accept_invalid_certs: bool,
    /// Optional client-side rate limit.
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            accept_invalid_certs: false,
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    pub(crate) fn validate(&self) -> ImportResult<()> {
        if self.request_timeout.is_zero() {
            return Err(ValidationError::field("request_timeout", "Timeout must be positive").into());
        }
        if let Some(rl) = self.rate_limit {
            if rl.requests_per_second == 0 || rl.burst_size == 0 {
                return Err(ValidationError::ConstraintViolation(
                    "Rate limit values must be greater than zero".to_string(),
                )
                .into());
            }
        }
        Ok(())
    }

    /// Applies `HARVESTER_IMPORT_TIMEOUT_SECS` and `HARVESTER_IMPORT_INSECURE`
    /// from `lookup` on top of `self`.
    pub(crate) fn with_env<F>(mut self, lookup: F) -> ImportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ValidationError::field(ENV_TIMEOUT_SECS, format!("'{}' is not a number of seconds", raw))
            })?;
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_INSECURE) {
            self.accept_invalid_certs = parse_flag(&raw);
        }
        Ok(self)
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Settings of the dashboard view-model.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Interval between automatic plan-list refreshes.
    pub poll_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl DashboardConfig {
    /// Interval clamped to [`MIN_POLL_INTERVAL`].
    pub fn effective_poll_interval(&self) -> Duration {
        self.poll_interval.max(MIN_POLL_INTERVAL)
    }
}
