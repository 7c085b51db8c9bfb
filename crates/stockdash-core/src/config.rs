use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse. Every variable has a
/// default, so a bare environment is valid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("STOCKDASH_ENV", "development"));

    let bind_addr = parse_addr("STOCKDASH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("STOCKDASH_LOG_LEVEL", "info");

    let comments_path = PathBuf::from(or_default(
        "STOCKDASH_COMMENTS_PATH",
        "./data/lounge_thread_filtered_comments.json",
    ));
    let tickers_path = PathBuf::from(or_default(
        "STOCKDASH_TICKERS_PATH",
        "./config/tickers.json",
    ));
    let snapshot_path = lookup("STOCKDASH_SNAPSHOT_PATH").ok().map(PathBuf::from);

    let recompute_cron = or_default("STOCKDASH_RECOMPUTE_CRON", "0 */10 * * * *");

    let karma_threshold = parse_i64("STOCKDASH_KARMA_THRESHOLD", "500")?;
    let min_distinct_tickers = parse_usize("STOCKDASH_MIN_DISTINCT_TICKERS", "2")?;
    let top_tickers_limit = parse_usize("STOCKDASH_TOP_TICKERS_LIMIT", "10")?;
    let top_comments_limit = parse_usize("STOCKDASH_TOP_COMMENTS_LIMIT", "20")?;
    let latest_tickers_limit = parse_usize("STOCKDASH_LATEST_TICKERS_LIMIT", "5")?;
    let latest_comments_per_ticker = parse_usize("STOCKDASH_LATEST_COMMENTS_PER_TICKER", "5")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        comments_path,
        tickers_path,
        snapshot_path,
        recompute_cron,
        karma_threshold,
        min_distinct_tickers,
        top_tickers_limit,
        top_comments_limit,
        latest_tickers_limit,
        latest_comments_per_ticker,
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
