use crate::config::types::{Config, EnrichmentConfig, OutputConfig, SearchConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for any single request timeout (seconds)
const MAX_REQUEST_TIMEOUT: u64 = 600;

/// Upper bound for the enrichment budget (seconds)
const MAX_TOTAL_BUDGET: u64 = 86_400;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_enrichment_config(&config.enrichment)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    for genre in &config.genres {
        if genre.trim().is_empty() {
            return Err(ConfigError::Validation(
                "genres cannot contain empty entries".to_string(),
            ));
        }
    }

    validate_endpoint(&config.endpoint)?;

    if config.query_timeout == 0 || config.query_timeout > MAX_REQUEST_TIMEOUT {
        return Err(ConfigError::Validation(format!(
            "query_timeout must be between 1 and {} seconds, got {}",
            MAX_REQUEST_TIMEOUT, config.query_timeout
        )));
    }

    Ok(())
}

/// Validates enrichment configuration
fn validate_enrichment_config(config: &EnrichmentConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 32 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 32, got {}",
            config.concurrency
        )));
    }

    if config.request_timeout == 0 || config.request_timeout > MAX_REQUEST_TIMEOUT {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be between 1 and {} seconds, got {}",
            MAX_REQUEST_TIMEOUT, config.request_timeout
        )));
    }

    if config.total_budget == 0 || config.total_budget > MAX_TOTAL_BUDGET {
        return Err(ConfigError::Validation(format!(
            "total_budget must be between 1 and {} seconds, got {}",
            MAX_TOTAL_BUDGET, config.total_budget
        )));
    }

    if config.max_rate_limit_hits < 1 {
        return Err(ConfigError::Validation(format!(
            "max_rate_limit_hits must be >= 1, got {}",
            config.max_rate_limit_hits
        )));
    }

    if config.jitter_min_ms > config.jitter_max_ms {
        return Err(ConfigError::Validation(format!(
            "jitter_min_ms ({}) cannot exceed jitter_max_ms ({})",
            config.jitter_min_ms, config.jitter_max_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the search endpoint URL
fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Endpoint '{}' must use HTTP or HTTPS",
            endpoint
        )));
    }

    Ok(())
}
