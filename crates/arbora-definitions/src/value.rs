// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Leaf values and the copy/merge/validate contract shared by parameter records.

Every record is generic over its leaf type: plain `f64` for model definitions,
[`Constraint`](crate::Constraint) for optimization ranges.
*/

use std::fmt;

use serde_json::{json, Value};

use crate::types::MissingValue;

/// A scalar leaf of a parameter record.
pub trait ParameterValue: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Lift a plain number into this leaf type.
    fn from_scalar(value: f64) -> Self;

    /// Parse a dict-literal leaf. The error is a short reason, without context.
    fn from_json(value: &Value) -> Result<Self, String>;

    /// Whether this leaf counts as present during merges and validation.
    fn is_set(&self) -> bool {
        true
    }

    /// Dict-literal form of this leaf.
    fn to_json(&self) -> Value;
}

impl ParameterValue for f64 {
    fn from_scalar(value: f64) -> Self {
        value
    }

    fn from_json(value: &Value) -> Result<Self, String> {
        value
            .as_f64()
            .ok_or_else(|| format!("expected a number, got {}", value))
    }

    fn to_json(&self) -> Value {
        json!(self)
    }
}

/// Copy, merge and validate contract of parameter records.
///
/// Copying is `Clone`. `merge_from` is a right-biased partial overwrite: a
/// present field of `other` replaces ours, an absent one never erases ours.
pub trait Record: Clone {
    fn merge_from(&mut self, other: &Self);

    /// Fails with the first required field that is still unset.
    fn validate(&self) -> Result<(), MissingValue>;
}

pub(crate) fn is_present<V: ParameterValue>(slot: &Option<V>) -> bool {
    matches!(slot, Some(value) if value.is_set())
}

pub(crate) fn merge_leaf<V: ParameterValue>(slot: &mut Option<V>, incoming: &Option<V>) {
    if is_present(incoming) {
        *slot = incoming.clone();
    }
}
