use crate::app_config::{AppConfig, LlmModel};
use crate::ConfigError;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.daraz.lk/catalog/";
pub const DEFAULT_CORS_PROXY: &str = "https://corsproxy.io/?";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let log_level = or_default("DARAZSCOUT_LOG_LEVEL", "info");

    // An empty key is treated the same as an absent one.
    let openai_api_key = lookup("OPENAI_API_KEY")
        .ok()
        .map(|k| k.trim().to_owned())
        .filter(|k| !k.is_empty());

    let model = or_default("DARAZSCOUT_MODEL", LlmModel::default().as_str())
        .parse::<LlmModel>()
        .map_err(|e| invalid("DARAZSCOUT_MODEL", e.to_string()))?;

    let llm_base_url = or_default("DARAZSCOUT_LLM_BASE_URL", DEFAULT_LLM_BASE_URL);
    let llm_timeout_secs = parse_u64("DARAZSCOUT_LLM_TIMEOUT_SECS", "120")?;
    let search_endpoint = or_default("DARAZSCOUT_SEARCH_ENDPOINT", DEFAULT_SEARCH_ENDPOINT);
    let cors_proxy = or_default("DARAZSCOUT_CORS_PROXY", DEFAULT_CORS_PROXY);

    let scraper_request_timeout_secs =
        parse_u64("DARAZSCOUT_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "DARAZSCOUT_SCRAPER_USER_AGENT",
        "darazscout/0.1 (catalog-research)",
    );
    let scraper_inter_request_delay_ms =
        parse_u64("DARAZSCOUT_SCRAPER_INTER_REQUEST_DELAY_MS", "1000")?;
    let scraper_max_retries = parse_u32("DARAZSCOUT_SCRAPER_MAX_RETRIES", "0")?;
    let scraper_retry_backoff_base_ms =
        parse_u64("DARAZSCOUT_SCRAPER_RETRY_BACKOFF_BASE_MS", "1000")?;

    let max_markup_chars = parse_usize("DARAZSCOUT_MAX_MARKUP_CHARS", "50000")?;
    if max_markup_chars == 0 {
        return Err(invalid(
            "DARAZSCOUT_MAX_MARKUP_CHARS",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        log_level,
        openai_api_key,
        model,
        llm_base_url,
        llm_timeout_secs,
        search_endpoint,
        cors_proxy,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
        max_markup_chars,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
