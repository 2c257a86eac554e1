use crate::config::types::{CacheConfig, Config, DownloaderConfig, HttpConfig, MangaPlusConfig};
use crate::ConfigError;

/// Ten years
const MAX_TTL_HOURS: u64 = 24 * 365 * 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_cache_config(&config.cache)?;
    validate_downloader_config(&config.downloader)?;
    validate_mangaplus_config(&config.mangaplus)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.enabled && config.path.is_empty() {
        return Err(ConfigError::Validation(
            "cache path cannot be empty when the cache is enabled".to_string(),
        ));
    }

    if let Some(hours) = config.ttl_hours {
        if hours == 0 || hours > MAX_TTL_HOURS {
            return Err(ConfigError::Validation(format!(
                "ttl-hours must be between 1 and {}, got {}",
                MAX_TTL_HOURS, hours
            )));
        }
    }

    Ok(())
}

/// Validates downloader configuration
fn validate_downloader_config(config: &DownloaderConfig) -> Result<(), ConfigError> {
    if config.max_concurrent < 1 || config.max_concurrent > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent must be between 1 and 100, got {}",
            config.max_concurrent
        )));
    }

    Ok(())
}

/// Validates MangaPlus configuration
///
/// The app identity fields are only required when the app API is selected.
fn validate_mangaplus_config(config: &MangaPlusConfig) -> Result<(), ConfigError> {
    if !config.use_app_api {
        return Ok(());
    }

    for (name, value) in [
        ("os", &config.os),
        ("os-ver", &config.os_ver),
        ("app-ver", &config.app_ver),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "mangaplus.{} cannot be empty when use-app-api is set",
                name
            )));
        }
    }

    Ok(())
}
