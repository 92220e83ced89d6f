//! Tracing setup for the intake service.
//!
//! Filter precedence: an explicit `RUST_LOG` wins, otherwise the configured
//! `APP_LOG_LEVEL` is used. Output is compact single-line without ANSI so
//! service logs stay grep-friendly.

use crate::config::TelemetryConfig;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install tracing subscriber")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
                value: config.log_level.clone(),
                source,
            })
        }
    }
}

/// Install the global subscriber. Errors if the configured filter is
/// malformed or a subscriber is already in place.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Install)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn invalid_filter_reports_the_offending_value() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");

        let config = TelemetryConfig {
            log_level: "not=a=filter".to_string(),
        };
        let error = env_filter(&config).expect_err("malformed filter rejected");
        assert!(
            matches!(error, TelemetryError::Filter { value, .. } if value == "not=a=filter")
        );
    }

    #[test]
    fn rust_log_takes_precedence_over_the_configured_level() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var("RUST_LOG", "warn");

        let config = TelemetryConfig {
            log_level: "not=a=filter".to_string(),
        };
        assert!(env_filter(&config).is_ok());

        env::remove_var("RUST_LOG");
    }
}
