use std::time::Duration;

use crate::app_config::{AppConfig, Environment, StoreBackend, TaskIntervals};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    // Zero would spin the control loop, so every period must be positive.
    let parse_period = |var: &str,
                        default: &str,
                        unit: fn(u64) -> Duration|
     -> Result<Duration, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(unit(value))
    };

    let store = match optional("SUPABASE_URL") {
        Some(url) => StoreBackend::Rest {
            url,
            service_key: require("SUPABASE_KEY")?,
        },
        None => match optional("DATABASE_URL") {
            Some(database_url) => StoreBackend::Postgres { database_url },
            None => return Err(ConfigError::MissingEnvVar("SUPABASE_URL".to_string())),
        },
    };

    let env = parse_environment(&or_default("BCW_ENV", "development"));
    let log_level = or_default("BCW_LOG_LEVEL", "info");
    let webhook_url = optional("DISCORD_WEBHOOK_URL");
    let http_timeout_secs = parse_u64("BCW_HTTP_TIMEOUT_SECS", "30")?;

    let db_max_connections = parse_u32("BCW_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("BCW_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("BCW_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let db_run_migrations = parse_bool("BCW_DB_RUN_MIGRATIONS", "false")?;

    let intervals = TaskIntervals {
        verification: parse_period("BCW_VERIFY_INTERVAL_SECS", "10", Duration::from_secs)?,
        growth: parse_period("BCW_GROWTH_INTERVAL_SECS", "60", Duration::from_secs)?,
        brand_stats: parse_period("BCW_BRAND_STATS_INTERVAL_SECS", "30", Duration::from_secs)?,
        campaign_stats: parse_period(
            "BCW_CAMPAIGN_STATS_INTERVAL_SECS",
            "30",
            Duration::from_secs,
        )?,
    };
    let scheduler_tick = parse_period("BCW_SCHEDULER_TICK_MS", "1000", Duration::from_millis)?;

    let provider_latency_ms = parse_u64("BCW_PROVIDER_LATENCY_MS", "2000")?;
    let provider_reject_marker = or_default("BCW_PROVIDER_REJECT_MARKER", "fake")
        .trim()
        .to_lowercase();

    Ok(AppConfig {
        env,
        log_level,
        store,
        webhook_url,
        http_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        db_run_migrations,
        intervals,
        scheduler_tick,
        provider_latency_ms,
        provider_reject_marker,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
