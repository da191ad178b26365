use crate::app_config::{AppConfig, Environment};
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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let twitter_bearer_token = lookup("TWITTER_BEARER_TOKEN")
        .map_err(|_| ConfigError::MissingEnvVar("TWITTER_BEARER_TOKEN".to_string()))?;
    if twitter_bearer_token.trim().is_empty() {
        return Err(invalid("TWITTER_BEARER_TOKEN", "must not be blank".to_string()));
    }

    let env = parse_environment(&or_default("TWEETPULSE_ENV", "development"));

    let bind_addr = or_default("TWEETPULSE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TWEETPULSE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TWEETPULSE_LOG_LEVEL", "info");

    let twitter_base_url = or_default("TWEETPULSE_TWITTER_BASE_URL", "https://api.twitter.com");

    let max_results = parse_u32("TWEETPULSE_MAX_RESULTS", "20")?;
    if !(1..=100).contains(&max_results) {
        return Err(invalid(
            "TWEETPULSE_MAX_RESULTS",
            format!("{max_results} is outside 1..=100"),
        ));
    }

    let request_timeout_secs = parse_u64("TWEETPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TWEETPULSE_USER_AGENT", "tweetpulse/0.1 (sentiment-analyzer)");

    let rate_limit_max_attempts = parse_u32("TWEETPULSE_RATE_LIMIT_MAX_ATTEMPTS", "3")?;
    if rate_limit_max_attempts == 0 {
        return Err(invalid(
            "TWEETPULSE_RATE_LIMIT_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let rate_limit_cooldown_secs = parse_u64("TWEETPULSE_RATE_LIMIT_COOLDOWN_SECS", "900")?;
    let rate_limit_max_cooldown_secs =
        parse_u64("TWEETPULSE_RATE_LIMIT_MAX_COOLDOWN_SECS", "900")?;

    let classifier_url = or_default("TWEETPULSE_CLASSIFIER_URL", "http://localhost:8080");
    let classifier_timeout_secs = parse_u64("TWEETPULSE_CLASSIFIER_TIMEOUT_SECS", "60")?;
    let classifier_batch_size = parse_usize("TWEETPULSE_CLASSIFIER_BATCH_SIZE", "32")?;
    if classifier_batch_size == 0 {
        return Err(invalid(
            "TWEETPULSE_CLASSIFIER_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }
    let classifier_labels = lookup("TWEETPULSE_CLASSIFIER_LABELS")
        .ok()
        .filter(|s| !s.trim().is_empty());

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        twitter_bearer_token,
        twitter_base_url,
        max_results,
        request_timeout_secs,
        user_agent,
        rate_limit_max_attempts,
        rate_limit_cooldown_secs,
        rate_limit_max_cooldown_secs,
        classifier_url,
        classifier_timeout_secs,
        classifier_batch_size,
        classifier_labels,
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
