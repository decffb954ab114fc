//! Configuration validation rules.
//!
//! Catches values that parse but cannot work: an empty toolchain command,
//! zero timeouts, a malformed SDK minimum, and patterns that do not compile.

use crate::config::schema::EnvReadyConfig;
use crate::error::{EnvReadyError, Result};
use crate::probe::version::parse_segments;
use crate::relevance::glob_to_regex;
use regex::Regex;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_config(config: &EnvReadyConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.toolchain.command.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-toolchain",
            "toolchain.command must not be empty".to_string(),
        ));
    }

    if config.timeouts.probe_secs == 0 {
        errors.push(ValidationError::new(
            "zero-timeout",
            "timeouts.probe_secs must be greater than 0".to_string(),
        ));
    }
    if config.timeouts.remediation_secs == 0 {
        errors.push(ValidationError::new(
            "zero-timeout",
            "timeouts.remediation_secs must be greater than 0".to_string(),
        ));
    }

    if let Some(sdk) = &config.sdk {
        if parse_segments(&sdk.minimum).is_empty() {
            errors.push(ValidationError::new(
                "invalid-sdk-minimum",
                format!("sdk.minimum '{}' is not a version", sdk.minimum),
            ));
        }
        if let Err(e) = Regex::new(&sdk.pattern) {
            errors.push(ValidationError::new(
                "invalid-sdk-pattern",
                format!("sdk.pattern '{}' is not a valid regex: {}", sdk.pattern, e),
            ));
        }
    }

    for pattern in &config.relevance.patterns {
        if let Err(e) = Regex::new(&glob_to_regex(pattern)) {
            errors.push(ValidationError::new(
                "invalid-glob",
                format!("relevance pattern '{}' is invalid: {}", pattern, e),
            ));
        }
    }

    for tool in &config.optional_tools {
        if tool.binary.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-binary",
                format!("optional tool '{}' has no binary", tool.name),
            ));
        }
    }

    if config.workspace.primary.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-marker",
            "workspace.primary must not be empty".to_string(),
        ));
    }

    errors
}

/// Validate a configuration, failing with all messages joined.
pub fn validate(config: &EnvReadyConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(EnvReadyError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SdkConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&EnvReadyConfig::default()).is_empty());
    }

    #[test]
    fn empty_toolchain_command_is_rejected() {
        let mut config = EnvReadyConfig::default();
        config.toolchain.command = "  ".to_string();

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "empty-toolchain");
    }

    #[test]
    fn bad_sdk_values_are_rejected() {
        let mut config = EnvReadyConfig::default();
        config.sdk = Some(SdkConfig {
            roots: vec![],
            pattern: "(".to_string(),
            minimum: "latest".to_string(),
            hint: None,
        });

        let rules: Vec<_> = validate_config(&config)
            .into_iter()
            .map(|e| e.rule)
            .collect();
        assert!(rules.contains(&"invalid-sdk-minimum".to_string()));
        assert!(rules.contains(&"invalid-sdk-pattern".to_string()));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = EnvReadyConfig::default();
        config.timeouts.probe_secs = 0;
        config.timeouts.remediation_secs = 0;
        config.workspace.primary = String::new();

        assert_eq!(validate_config(&config).len(), 3);
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("probe_secs"));
        assert!(err.to_string().contains("workspace.primary"));
    }
}
