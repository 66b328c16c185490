//! # Logging
//!
//! The SDK logs through the `log` facade only; it never installs a logger on
//! its own. Applications that want output without wiring their own sink can
//! call [`init`] to install `env_logger`.

pub mod features;

pub use features::{LogFeature, RoundTripTimer};

/// Environment variable consulted by [`init`]
pub const LOG_LEVEL_ENV: &str = "NAVABILITY_LOG_LEVEL";

/// Install `env_logger`, honoring `NAVABILITY_LOG_LEVEL` (default `info`)
pub fn init() -> Result<(), log::SetLoggerError> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(log::LevelFilter::Info);
    init_with_level(level)
}

/// Install `env_logger` with SDK targets at `level`
pub fn init_with_level(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_default_env()
        .filter_module("navability", level)
        .try_init()
}

fn parse_level(value: &str) -> Option<log::LevelFilter> {
    match value.to_uppercase().as_str() {
        "TRACE" => Some(log::LevelFilter::Trace),
        "DEBUG" => Some(log::LevelFilter::Debug),
        "INFO" => Some(log::LevelFilter::Info),
        "WARN" => Some(log::LevelFilter::Warn),
        "ERROR" => Some(log::LevelFilter::Error),
        "OFF" => Some(log::LevelFilter::Off),
        _ => None,
    }
}
