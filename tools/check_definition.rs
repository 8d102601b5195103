// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Definition checker

Parses a dict-literal definition file and resolves a probe branch for every
registered label, reporting which labels resolve to a complete cable type.

Usage:
  cargo run --bin check_definition -- [--constraints] [--config <arbora.toml>] <definition.json>

Debug flags (`--debug-all`, `--debug-arbora-schematic`, ...) are accepted as well.
Exits with status 1 if parsing fails or any label does not resolve.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context, Result};
use arbora_config::{
    apply_environment_overrides, load_config, validate_config, ArboraConfig, ConfigError,
};
use arbora_definitions::{
    define_constraints_with_config, define_model_with_config, Definition, ParameterValue,
};
use arbora_observability::{debug_flags_help, init_logging, parse_debug_flags, LoggingConfig};
use arbora_schematic::{Location, Schematic, SchematicResult};
use tracing::{error, info};

struct Args {
    definition: PathBuf,
    config: Option<PathBuf>,
    constraints: bool,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: check_definition [--constraints] [--config <path>] <definition.json>\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut definition = None;
    let mut config = None;
    let mut constraints = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--constraints" => constraints = true,
            "--config" => {
                let path = args.next().unwrap_or_else(|| usage_and_exit());
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => usage_and_exit(),
            flag if flag.starts_with("--debug-") => {}
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
            path => definition = Some(PathBuf::from(path)),
        }
    }

    match definition {
        Some(definition) => Args {
            definition,
            config,
            constraints,
        },
        None => usage_and_exit(),
    }
}

/// Load the configuration file, falling back to defaults when none exists.
fn load_configuration(path: Option<&PathBuf>) -> Result<ArboraConfig> {
    let config = match load_config(path.map(PathBuf::as_path), None) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) if path.is_none() => {
            let mut config = ArboraConfig::default();
            apply_environment_overrides(&mut config);
            config
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };
    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Resolve a two-point branch carrying only `label`.
fn probe<V: ParameterValue>(definition: &Definition<V>, label: &str) -> SchematicResult<()> {
    let mut schematic = Schematic::<V>::new(Some(format!("probe_{label}")));
    schematic.set_definition(definition.clone())?;
    schematic.create_location(Location::new(0, 0), [0.0, 0.0, 0.0], 1.0, &[label], None)?;
    schematic.create_location(Location::new(0, 1), [1.0, 0.0, 0.0], 1.0, &[label], None)?;
    schematic.freeze()
}

fn check<V: ParameterValue>(definition: &Definition<V>) -> usize {
    let mut failures = 0;
    for label in definition.labels() {
        match probe(definition, label) {
            Ok(()) => println!("  ok    {label}"),
            Err(e) => {
                failures += 1;
                println!("  FAIL  {label}: {e}");
            }
        }
    }
    println!(
        "{} cable types, {} synapse types, {} unresolved",
        definition.len(),
        definition.synapse_types().len(),
        failures
    );
    failures
}

fn run(args: &Args, config: &ArboraConfig) -> Result<usize> {
    let raw = fs::read_to_string(&args.definition)
        .with_context(|| format!("Failed to read {}", args.definition.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON in {}", args.definition.display()))?;

    info!(
        target: "arbora",
        "Checking {} ({} mode)",
        args.definition.display(),
        if args.constraints { "constraints" } else { "model" }
    );
    let failures = if args.constraints {
        check(&define_constraints_with_config(&value, &config.definitions)?)
    } else {
        check(&define_model_with_config(&value, &config.definitions)?)
    };
    Ok(failures)
}

/// Turn the check outcome into the process result.
///
/// Failures become an error so `main` exits with status 1 after the log
/// guard is dropped and flushed.
fn finish(outcome: Result<usize>) -> Result<()> {
    match outcome {
        Ok(0) => Ok(()),
        Ok(failures) => {
            error!(target: "arbora", "{} label(s) did not resolve", failures);
            Err(anyhow!("{} label(s) did not resolve", failures))
        }
        Err(e) => {
            error!(target: "arbora", "{:#}", e);
            Err(e.context("definition check failed"))
        }
    }
}

fn main() -> Result<()> {
    let args = parse_args();
    let config = load_configuration(args.config.as_ref())?;
    let _guard = init_logging(&parse_debug_flags(), &LoggingConfig::from(&config.logging))?;

    finish(run(&args, &config))
}
