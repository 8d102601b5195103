// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Values are layered in three tiers, later tiers winning:
//! 1. TOML file
//! 2. Environment variables
//! 3. CLI arguments

use crate::{ArboraConfig, ConfigError, ConfigResult};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "arbora.toml";
/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "ARBORA_CONFIG_PATH";

/// Find the arbora configuration file
///
/// Search order:
/// 1. `ARBORA_CONFIG_PATH` environment variable
/// 2. Current working directory: `./arbora.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        search_paths.extend(
            cwd.ancestors()
                .skip(1)
                .take(5)
                .map(|dir| dir.join(CONFIG_FILE_NAME)),
        );
    }

    if let Some(path) = search_paths.iter().find(|path| path.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found, cannot be read or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<ArboraConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: ArboraConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `ARBORA_USE_DEFAULTS` -> `definitions.use_defaults`
/// - `ARBORA_CONSTRAINT_TOLERANCE` -> `definitions.constraint_tolerance`
/// - `ARBORA_SCHEMATIC_NAME` -> `schematic.base_name`
/// - `ARBORA_LOG_LEVEL` -> `logging.level`
/// - `ARBORA_LOG_FORMAT` -> `logging.format`
pub fn apply_environment_overrides(config: &mut ArboraConfig) {
    if let Ok(value) = env::var("ARBORA_USE_DEFAULTS") {
        config.definitions.use_defaults = parse_flag(&value);
    }
    if let Ok(value) = env::var("ARBORA_CONSTRAINT_TOLERANCE") {
        if let Ok(tolerance) = value.parse::<f64>() {
            config.definitions.constraint_tolerance = Some(tolerance);
        }
    }
    if let Ok(value) = env::var("ARBORA_SCHEMATIC_NAME") {
        config.schematic.base_name = Some(value);
    }
    if let Ok(value) = env::var("ARBORA_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("ARBORA_LOG_FORMAT") {
        config.logging.format = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - CLI arguments, e.g. `{"tolerance": "0.1", "name": "pyr"}`
pub fn apply_cli_overrides(config: &mut ArboraConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("use_defaults") {
        config.definitions.use_defaults = parse_flag(value);
    }
    if let Some(value) = cli_args.get("tolerance") {
        if let Ok(tolerance) = value.parse::<f64>() {
            config.definitions.constraint_tolerance = Some(tolerance);
        }
    }
    if let Some(value) = cli_args.get("name") {
        config.schematic.base_name = Some(value.clone());
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
}
