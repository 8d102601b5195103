// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core error types for model definitions.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::fmt;

use thiserror::Error;

/// Result type for definition operations
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// A required value that is still unset after all merges.
///
/// `ion` names the owning ion when the field belongs to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValue {
    pub field: String,
    pub ion: Option<String>,
}

impl MissingValue {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ion: None,
        }
    }

    /// Attribute this missing value to an ion.
    pub fn in_ion(mut self, ion: impl Into<String>) -> Self {
        self.ion = Some(ion.into());
        self
    }
}

impl fmt::Display for MissingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ion {
            Some(ion) => write!(f, "'{}' in ion '{}'", self.field, ion),
            None => write!(f, "'{}'", self.field),
        }
    }
}

/// Error types for definition operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("Invalid model definition: {0}")]
    ModelDefinition(String),

    #[error("Missing {0} value")]
    MissingValue(MissingValue),

    #[error("{kind} '{key}' already exists.")]
    Duplicate { kind: &'static str, key: String },

    #[error("'{0}' is not a valid mechanism id.")]
    InvalidMechId(String),

    #[error("Label '{0}' is not defined.")]
    LabelNotDefined(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<serde_json::Error> for DefinitionError {
    fn from(err: serde_json::Error) -> Self {
        DefinitionError::JsonError(err.to_string())
    }
}

impl From<MissingValue> for DefinitionError {
    fn from(missing: MissingValue) -> Self {
        DefinitionError::MissingValue(missing)
    }
}
