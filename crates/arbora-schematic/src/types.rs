// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Error types for schematic construction and freezing.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use arbora_definitions::{DefinitionError, MissingValue};
use thiserror::Error;

/// Result type for schematic operations
pub type SchematicResult<T> = Result<T, SchematicError>;

fn missing_value_message(location: &str, labels: &[String], field: &MissingValue) -> String {
    if labels.is_empty() {
        return format!("Unlabeled {} is missing value for {}.", location, field);
    }
    let quoted = labels
        .iter()
        .map(|label| format!("'{}'", label))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} labelled {} misses value for {}", location, quoted, field)
}

/// Error types for schematic operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchematicError {
    /// Locations appended out of order, or an invalid endpoint
    #[error("Construction error: {0}")]
    Construction(String),

    /// Mutation of a frozen schematic, or a frozen-only query before freeze
    #[error("{0}")]
    Frozen(String),

    /// A unit branch resolved without a required value
    #[error("{}", missing_value_message(.location, .labels, .field))]
    MissingValue {
        location: String,
        labels: Vec<String>,
        field: MissingValue,
    },

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
