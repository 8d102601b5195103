// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `arbora.toml`. Missing sections and
//! fields fall back to their defaults.

use serde::{Deserialize, Serialize};

/// Default length of generated schematic names
pub const DEFAULT_RANDOM_NAME_LENGTH: usize = 10;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArboraConfig {
    pub definitions: DefinitionsConfig,
    pub schematic: SchematicConfig,
    pub logging: LoggingConfig,
}

/// Model definition parsing
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DefinitionsConfig {
    /// Start every resolution from the physiological ion and cable defaults
    pub use_defaults: bool,
    /// Tolerance applied to every constraint, in `[0, 1)`
    pub constraint_tolerance: Option<f64>,
}

/// Schematic naming
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchematicConfig {
    /// Base name for generated object names; random when unset
    pub base_name: Option<String>,
    pub random_name_length: usize,
}

impl Default for SchematicConfig {
    fn default() -> Self {
        Self {
            base_name: None,
            random_name_length: DEFAULT_RANDOM_NAME_LENGTH,
        }
    }
}

/// Logging output
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// text or json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: ArboraConfig = toml::from_str(
            r#"
            [definitions]
            use_defaults = true

            [schematic]
            base_name = "pyr"
            "#,
        )
        .unwrap();

        assert!(config.definitions.use_defaults);
        assert_eq!(config.definitions.constraint_tolerance, None);
        assert_eq!(config.schematic.base_name.as_deref(), Some("pyr"));
        assert_eq!(config.schematic.random_name_length, DEFAULT_RANDOM_NAME_LENGTH);
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
