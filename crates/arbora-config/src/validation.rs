// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that configuration values are within their valid ranges. All
//! problems are collected and reported together.

use crate::{ArboraConfig, ConfigError, ConfigResult};

/// Accepted `logging.level` values
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
/// Accepted `logging.format` values
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &ArboraConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_definitions(config, &mut errors);
    validate_schematic(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_definitions(config: &ArboraConfig, errors: &mut Vec<ConfigValidationError>) {
    if let Some(tolerance) = config.definitions.constraint_tolerance {
        if !(0.0..1.0).contains(&tolerance) {
            errors.push(ConfigValidationError::InvalidValue {
                field: "definitions.constraint_tolerance".to_string(),
                reason: format!("must be in [0.0, 1.0), got {}", tolerance),
            });
        }
    }
}

fn validate_schematic(config: &ArboraConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.schematic.random_name_length == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "schematic.random_name_length".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if let Some(name) = &config.schematic.base_name {
        if name.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: "schematic.base_name".to_string(),
            });
        }
    }
}

fn validate_logging(config: &ArboraConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
        });
    }
}
