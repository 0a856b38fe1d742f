use std::time::Duration;

use chrono_tz::Tz;

use crate::error::{AppError, Result};

/// Zone every calendar-date decision is made in. Never server-local time.
pub const REFERENCE_TZ: &str = "America/Los_Angeles";

/// Deadline for a single source read before the request fails with a retryable error.
pub const SOURCE_TIMEOUT_MS: u64 = 5_000;

/// An actual total this close to the line is a push.
pub const PUSH_EPSILON: f64 = 0.01;

/// Display name for an absent or unresolvable player identifier.
pub const FALLBACK_NAME: &str = "TBD";

/// Batting order slots per side, filled or not.
pub const LINEUP_SLOTS: usize = 9;

/// Accuracy percent when no win/loss has been recorded in scope.
pub const NO_DATA: &str = "no data";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    /// IANA zone for date boundaries (REFERENCE_TZ)
    pub reference_zone: Tz,
    /// Per-read deadline for games/predictions/players (SOURCE_TIMEOUT_MS)
    pub source_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let zone_name = std::env::var("REFERENCE_TZ").unwrap_or_else(|_| REFERENCE_TZ.to_string());
        let reference_zone = zone_name
            .parse::<Tz>()
            .map_err(|_| AppError::Config(format!("REFERENCE_TZ '{zone_name}' is not an IANA zone")))?;

        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "ledger.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            reference_zone,
            source_timeout: Duration::from_millis(
                std::env::var("SOURCE_TIMEOUT_MS")
                    .unwrap_or_else(|_| SOURCE_TIMEOUT_MS.to_string())
                    .parse::<u64>()
                    .unwrap_or(SOURCE_TIMEOUT_MS),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_zone_parses() {
        let tz: Tz = REFERENCE_TZ.parse().unwrap();
        assert_eq!(tz, chrono_tz::America::Los_Angeles);
    }
}
