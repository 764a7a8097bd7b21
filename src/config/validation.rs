use crate::config::types::{Config, CrawlRunConfig, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the limits of a single run
///
/// The seed URL is checked separately when the run resolves it.
pub fn validate_run_config(run: &CrawlRunConfig) -> Result<(), ConfigError> {
    validate_limits(run.max_pages, run.max_depth)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.fetch_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be >= 100ms, got {}ms",
            config.fetch_timeout_ms
        )));
    }

    validate_limits(config.max_pages, config.max_depth)
}

fn validate_limits(max_pages: Option<usize>, max_depth: Option<u32>) -> Result<(), ConfigError> {
    if max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if max_depth == Some(0) {
        return Err(ConfigError::Validation(
            "max_depth must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.path.as_deref(), Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "output path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
