// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Parameter ranges for optimization-oriented definitions.

A [`Constraint`] replaces a scalar leaf with a `[lower, upper]` range and an
optional tolerance. The tolerance shrinks both reported bounds toward zero:
`lower() = lower * (1 - t)` and `upper() = upper * (1 - t)`. The raw bounds are
kept, so setting a tolerance again replaces it instead of compounding.
*/

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::value::ParameterValue;

/// A `[lower, upper]` range with optional tolerance.
///
/// A constraint without an upper bound is empty and counts as absent during
/// merges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraint {
    lower: Option<f64>,
    upper: Option<f64>,
    tolerance: Option<f64>,
}

/// Raw inputs accepted by [`Constraint::from_value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintValue {
    Scalar(f64),
    Range(f64, f64),
    Constraint(Constraint),
}

impl From<f64> for ConstraintValue {
    fn from(value: f64) -> Self {
        ConstraintValue::Scalar(value)
    }
}

impl From<(f64, f64)> for ConstraintValue {
    fn from((lower, upper): (f64, f64)) -> Self {
        ConstraintValue::Range(lower, upper)
    }
}

impl From<[f64; 2]> for ConstraintValue {
    fn from([lower, upper]: [f64; 2]) -> Self {
        ConstraintValue::Range(lower, upper)
    }
}

impl From<Constraint> for ConstraintValue {
    fn from(constraint: Constraint) -> Self {
        ConstraintValue::Constraint(constraint)
    }
}

impl Constraint {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
            tolerance: None,
        }
    }

    /// Zero-width range `(value, value)`.
    pub fn frozen(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_value(value: impl Into<ConstraintValue>) -> Self {
        match value.into() {
            ConstraintValue::Scalar(value) => Self::frozen(value),
            ConstraintValue::Range(lower, upper) => Self::new(lower, upper),
            ConstraintValue::Constraint(constraint) => constraint,
        }
    }

    pub fn lower(&self) -> Option<f64> {
        self.lower.map(|value| self.shrink(value))
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper.map(|value| self.shrink(value))
    }

    /// Bounds as given, before tolerance.
    pub fn raw_bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.lower, self.upper)
    }

    pub fn set_lower(&mut self, value: Option<f64>) {
        self.lower = value;
    }

    pub fn set_upper(&mut self, value: Option<f64>) {
        self.upper = value;
    }

    pub fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: Option<f64>) -> &mut Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_none()
    }

    /// Whether lower and upper coincide.
    pub fn is_fixed(&self) -> bool {
        matches!((self.lower, self.upper), (Some(lower), Some(upper)) if lower == upper)
    }

    fn shrink(&self, value: f64) -> f64 {
        match self.tolerance {
            Some(tolerance) => value * (1.0 - tolerance),
            None => value,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConstraint {
    lower: Option<f64>,
    upper: Option<f64>,
    tolerance: Option<f64>,
}

impl ParameterValue for Constraint {
    fn from_scalar(value: f64) -> Self {
        Constraint::frozen(value)
    }

    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(Constraint::frozen)
                .ok_or_else(|| format!("{} is not a finite number", number)),
            Value::Array(bounds) => match bounds.as_slice() {
                [lower, upper] => match (lower.as_f64(), upper.as_f64()) {
                    (Some(lower), Some(upper)) => Ok(Constraint::new(lower, upper)),
                    _ => Err(format!("range bounds must be numbers, got {}", value)),
                },
                _ => Err(format!(
                    "a range needs exactly 2 bounds, got {}",
                    bounds.len()
                )),
            },
            Value::Object(_) => {
                let raw: RawConstraint =
                    serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
                Ok(Constraint {
                    lower: raw.lower,
                    upper: raw.upper,
                    tolerance: raw.tolerance,
                })
            }
            other => Err(format!(
                "expected a number, a [lower, upper] range or a constraint object, got {}",
                other
            )),
        }
    }

    fn is_set(&self) -> bool {
        !self.is_empty()
    }

    fn to_json(&self) -> Value {
        if self.tolerance.is_some() || self.lower.is_none() || self.upper.is_none() {
            return json!({
                "lower": self.lower,
                "upper": self.upper,
                "tolerance": self.tolerance,
            });
        }
        if self.is_fixed() {
            json!(self.lower)
        } else {
            json!([self.lower, self.upper])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_from_value_shapes() {
        assert_eq!(Constraint::from_value(3.0), Constraint::new(3.0, 3.0));
        assert_eq!(Constraint::from_value((1.0, 2.0)), Constraint::new(1.0, 2.0));
        assert_eq!(Constraint::from_value([1.0, 2.0]), Constraint::new(1.0, 2.0));

        let existing = Constraint::new(0.5, 0.7).with_tolerance(Some(0.2));
        assert_eq!(Constraint::from_value(existing), existing);
    }

    #[test]
    fn test_tolerance_shrinks_both_bounds() {
        let constraint = Constraint::from_value(10.0).with_tolerance(Some(0.1));
        assert!(approx(constraint.lower().unwrap(), 9.0));
        assert!(approx(constraint.upper().unwrap(), 9.0));
        assert_eq!(constraint.raw_bounds(), (Some(10.0), Some(10.0)));
    }

    #[test]
    fn test_tolerance_does_not_compound() {
        let mut constraint = Constraint::new(2.0, 4.0);
        constraint.set_tolerance(Some(0.5));
        constraint.set_tolerance(Some(0.5));
        assert!(approx(constraint.lower().unwrap(), 1.0));
        assert!(approx(constraint.upper().unwrap(), 2.0));

        // Repeated reads are stable
        assert_eq!(constraint.upper(), constraint.upper());
    }

    #[test]
    fn test_empty_constraint() {
        let mut constraint = Constraint::empty();
        assert!(constraint.is_empty());
        assert!(!constraint.is_set());

        constraint.set_lower(Some(1.0));
        assert!(constraint.is_empty());

        constraint.set_upper(Some(2.0));
        assert!(!constraint.is_empty());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(
            Constraint::from_json(&json!(0.05)).unwrap(),
            Constraint::frozen(0.05)
        );
        assert_eq!(
            Constraint::from_json(&json!([0.05, 0.125])).unwrap(),
            Constraint::new(0.05, 0.125)
        );
        assert_eq!(
            Constraint::from_json(&json!({"lower": 1.0, "upper": 2.0, "tolerance": 0.1})).unwrap(),
            Constraint::new(1.0, 2.0).with_tolerance(Some(0.1))
        );
        assert!(Constraint::from_json(&json!([1.0])).is_err());
        assert!(Constraint::from_json(&json!(["a", 1.0])).is_err());
        assert!(Constraint::from_json(&json!({"low": 1.0})).is_err());
        assert!(Constraint::from_json(&json!("wide")).is_err());
    }

    #[test]
    fn test_to_json_is_parseable() {
        for constraint in [
            Constraint::frozen(1.5),
            Constraint::new(0.1, 0.2),
            Constraint::new(0.1, 0.2).with_tolerance(Some(0.05)),
        ] {
            assert_eq!(
                Constraint::from_json(&constraint.to_json()).unwrap(),
                constraint
            );
        }
    }
}
