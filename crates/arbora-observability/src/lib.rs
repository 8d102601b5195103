// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # arbora-observability
//!
//! Logging infrastructure shared by the arbora crates, with per-crate debug
//! flag support.
//!
//! Library crates only emit `tracing` events with their crate name as target;
//! binaries call [`init_logging`] once to install a subscriber.
//!
//! ## Features
//! - `file-logging`: JSON log file per run in a timestamped folder

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known arbora crate names (tracing targets) for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "arbora",
    "arbora-definitions",
    "arbora-schematic",
    "arbora-config",
];
