//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Shortest line limit that still fits a full chat message.
const MIN_LINE_LEN: usize = 512;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bot.username is required")]
    MissingUsername,
    #[error("bot.password is required (or set TMIBOT_PASSWORD)")]
    MissingPassword,
    #[error("bot.prefix must not be empty")]
    EmptyPrefix,
    #[error("bot.channels contains an invalid name: {0:?}")]
    InvalidChannel(String),
    #[error("server.port must be non-zero")]
    InvalidPort,
    #[error("server.max_line_len must be at least 512, got {0}")]
    LineLimitTooSmall(usize),
    #[error("api.retry_limit must be positive, got {0}")]
    InvalidRetryLimit(u32),
    #[error("api.backoff_base_ms must be positive and not above api.backoff_max_ms")]
    InvalidBackoff,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Identity
    if config.bot.username.trim().is_empty() {
        errors.push(ValidationError::MissingUsername);
    }
    if config.bot.password.as_deref().is_none_or(str::is_empty) {
        errors.push(ValidationError::MissingPassword);
    }
    if config.bot.prefix.is_empty() {
        errors.push(ValidationError::EmptyPrefix);
    }
    for channel in &config.bot.channels {
        let name = channel.strip_prefix('#').unwrap_or(channel);
        if name.is_empty() || name.contains(char::is_whitespace) {
            errors.push(ValidationError::InvalidChannel(channel.clone()));
        }
    }

    // Connection
    if config.server.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }
    if config.server.max_line_len < MIN_LINE_LEN {
        errors.push(ValidationError::LineLimitTooSmall(
            config.server.max_line_len,
        ));
    }

    // API retry policy
    if config.api.retry_limit == 0 {
        errors.push(ValidationError::InvalidRetryLimit(config.api.retry_limit));
    }
    if config.api.backoff_base_ms == 0 || config.api.backoff_base_ms > config.api.backoff_max_ms {
        errors.push(ValidationError::InvalidBackoff);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_config() -> String {
        r#"
[bot]
username = "therealbot"
password = "oauth:secret"
channels = ["bob"]
"#
        .to_string()
    }

    #[test]
    fn test_valid_config_passes() {
        let config: Config = toml::from_str(&minimal_valid_config()).unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_password_fails() {
        let toml = r#"
[bot]
username = "therealbot"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingPassword)));
    }

    #[test]
    fn test_zero_retry_limit_fails() {
        let toml = r#"
[bot]
username = "therealbot"
password = "oauth:secret"

[api]
retry_limit = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidRetryLimit(0))));
    }

    #[test]
    fn test_reports_every_problem() {
        let toml = r##"
[server]
port = 0
max_line_len = 64

[bot]
username = ""
password = "oauth:secret"
prefix = ""
channels = ["#", "two words"]

[api]
backoff_base_ms = 10
backoff_max_ms = 5
"##;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 7);
    }
}
