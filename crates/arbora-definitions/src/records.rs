// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Parameter records: cable properties, ions, mechanisms and synapses.

Each record implements [`Record`]: merges overwrite only present fields and
validation names the first required field that is still unset.
*/

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::parameter::{CableProperty, IonProperty};
use crate::types::{DefinitionError, DefinitionResult, MissingValue};
use crate::value::{merge_leaf, ParameterValue, Record};

/// Separator between the parts of a mechanism id in dict-literal keys.
pub const MECH_ID_SEPARATOR: char = ':';

/// Mechanism id: a name with up to two further qualifiers (variant, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MechId(Vec<String>);

impl MechId {
    /// Build an id from 1 to 3 parts.
    pub fn new<I, S>(parts: I) -> DefinitionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.is_empty() || parts.len() > 3 || parts.iter().any(String::is_empty) {
            return Err(DefinitionError::InvalidMechId(format!("{:?}", parts)));
        }
        Ok(MechId(parts))
    }

    /// Parse `name`, `name:variant` or `name:variant:qualifier`.
    pub fn parse(id: &str) -> DefinitionResult<Self> {
        MechId::new(id.split(MECH_ID_SEPARATOR))
    }

    /// Accepts a string or an array of 1 to 3 strings.
    pub fn from_json(value: &Value) -> DefinitionResult<Self> {
        match value {
            Value::String(id) => MechId::parse(id),
            Value::Array(parts) => {
                let parts = parts
                    .iter()
                    .map(|part| {
                        part.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| DefinitionError::InvalidMechId(value.to_string()))
                    })
                    .collect::<DefinitionResult<Vec<_>>>()?;
                MechId::new(parts)
            }
            other => Err(DefinitionError::InvalidMechId(other.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.0[0]
    }

    pub fn variant(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn to_json(&self) -> Value {
        match self.0.as_slice() {
            [name] => json!(name),
            parts => json!(parts),
        }
    }
}

impl FromStr for MechId {
    type Err = DefinitionError;

    fn from_str(id: &str) -> DefinitionResult<Self> {
        MechId::parse(id)
    }
}

impl TryFrom<&str> for MechId {
    type Error = DefinitionError;

    fn try_from(id: &str) -> DefinitionResult<Self> {
        MechId::parse(id)
    }
}

impl fmt::Display for MechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(&MECH_ID_SEPARATOR.to_string()))
    }
}

/// Whether a dict-literal value is a valid mechanism id.
pub fn is_mech_id(value: &Value) -> bool {
    MechId::from_json(value).is_ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CableProperties<V = f64> {
    /// Axial resistivity in ohm*cm
    pub ra: Option<V>,
    /// Membrane capacitance in uF/cm^2
    pub cm: Option<V>,
}

impl<V> Default for CableProperties<V> {
    fn default() -> Self {
        Self { ra: None, cm: None }
    }
}

impl<V: ParameterValue> CableProperties<V> {
    pub fn new(ra: f64, cm: f64) -> Self {
        Self {
            ra: Some(V::from_scalar(ra)),
            cm: Some(V::from_scalar(cm)),
        }
    }

    pub fn get(&self, property: CableProperty) -> Option<&V> {
        match property {
            CableProperty::Ra => self.ra.as_ref(),
            CableProperty::Cm => self.cm.as_ref(),
        }
    }

    pub fn set(&mut self, property: CableProperty, value: Option<V>) {
        match property {
            CableProperty::Ra => self.ra = value,
            CableProperty::Cm => self.cm = value,
        }
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        [self.ra.as_mut(), self.cm.as_mut()].into_iter().flatten()
    }
}

impl<V: ParameterValue> Record for CableProperties<V> {
    fn merge_from(&mut self, other: &Self) {
        merge_leaf(&mut self.ra, &other.ra);
        merge_leaf(&mut self.cm, &other.cm);
    }

    fn validate(&self) -> Result<(), MissingValue> {
        for property in CableProperty::ALL {
            if !matches!(self.get(property), Some(value) if value.is_set()) {
                return Err(MissingValue::field(property.name()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ion<V = f64> {
    pub rev_pot: Option<V>,
    pub int_con: Option<V>,
    pub ext_con: Option<V>,
}

impl<V> Default for Ion<V> {
    fn default() -> Self {
        Self {
            rev_pot: None,
            int_con: None,
            ext_con: None,
        }
    }
}

impl<V: ParameterValue> Ion<V> {
    pub fn new(rev_pot: f64, int_con: f64, ext_con: f64) -> Self {
        Self {
            rev_pot: Some(V::from_scalar(rev_pot)),
            int_con: Some(V::from_scalar(int_con)),
            ext_con: Some(V::from_scalar(ext_con)),
        }
    }

    pub fn get(&self, property: IonProperty) -> Option<&V> {
        match property {
            IonProperty::RevPot => self.rev_pot.as_ref(),
            IonProperty::IntCon => self.int_con.as_ref(),
            IonProperty::ExtCon => self.ext_con.as_ref(),
        }
    }

    pub fn set(&mut self, property: IonProperty, value: Option<V>) {
        match property {
            IonProperty::RevPot => self.rev_pot = value,
            IonProperty::IntCon => self.int_con = value,
            IonProperty::ExtCon => self.ext_con = value,
        }
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        [
            self.rev_pot.as_mut(),
            self.int_con.as_mut(),
            self.ext_con.as_mut(),
        ]
        .into_iter()
        .flatten()
    }
}

impl<V: ParameterValue> Record for Ion<V> {
    fn merge_from(&mut self, other: &Self) {
        merge_leaf(&mut self.rev_pot, &other.rev_pot);
        merge_leaf(&mut self.int_con, &other.int_con);
        merge_leaf(&mut self.ext_con, &other.ext_con);
    }

    fn validate(&self) -> Result<(), MissingValue> {
        for property in IonProperty::ALL {
            if !matches!(self.get(property), Some(value) if value.is_set()) {
                return Err(MissingValue::field(property.name()));
            }
        }
        Ok(())
    }
}

/// Merge present parameters of `incoming` over `target`.
fn merge_parameters<V: ParameterValue>(
    target: &mut BTreeMap<String, V>,
    incoming: &BTreeMap<String, V>,
) {
    for (name, value) in incoming {
        if value.is_set() {
            target.insert(name.clone(), value.clone());
        }
    }
}

/// Ion channel or other density mechanism: parameter name to value.
#[derive(Debug, Clone, PartialEq)]
pub struct Mechanism<V = f64> {
    pub parameters: BTreeMap<String, V>,
}

impl<V> Default for Mechanism<V> {
    fn default() -> Self {
        Self {
            parameters: BTreeMap::new(),
        }
    }
}

impl<V: ParameterValue> Mechanism<V> {
    pub fn new(parameters: BTreeMap<String, V>) -> Self {
        Self { parameters }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: V) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }
}

impl<V: ParameterValue> Record for Mechanism<V> {
    fn merge_from(&mut self, other: &Self) {
        merge_parameters(&mut self.parameters, &other.parameters);
    }

    fn validate(&self) -> Result<(), MissingValue> {
        Ok(())
    }
}

/// Point process mechanism attached under a synapse label.
///
/// Merging only touches parameters; the mechanism id of the receiver is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Synapse<V = f64> {
    pub mech_id: MechId,
    pub parameters: BTreeMap<String, V>,
}

impl<V: ParameterValue> Synapse<V> {
    pub fn new(mech_id: MechId, parameters: BTreeMap<String, V>) -> Self {
        Self {
            mech_id,
            parameters,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: V) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }
}

impl<V: ParameterValue> Record for Synapse<V> {
    fn merge_from(&mut self, other: &Self) {
        merge_parameters(&mut self.parameters, &other.parameters);
    }

    fn validate(&self) -> Result<(), MissingValue> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Constraint;

    #[test]
    fn test_mech_id_parts() {
        let id = MechId::parse("Kv1:0").unwrap();
        assert_eq!(id.name(), "Kv1");
        assert_eq!(id.variant(), Some("0"));
        assert_eq!(id.to_string(), "Kv1:0");
        assert_eq!(MechId::from_json(&json!(["Kv1", "0"])).unwrap(), id);

        assert!(MechId::parse("a:b:c:d").is_err());
        assert!(MechId::parse("Kv1:").is_err());
        assert!(MechId::new(Vec::<String>::new()).is_err());
        assert!(!is_mech_id(&json!(["a", 1])));
        assert!(!is_mech_id(&json!(4)));
        assert!(is_mech_id(&json!("pas")));
    }

    #[test]
    fn test_cable_merge_is_partial() {
        let mut left = CableProperties::<f64>::new(10.0, 1.0);
        let right = CableProperties {
            ra: Some(100.0),
            cm: None,
        };
        let right_before = right.clone();

        left.merge_from(&right);

        assert_eq!(left.ra, Some(100.0));
        assert_eq!(left.cm, Some(1.0));
        assert_eq!(right, right_before);
    }

    #[test]
    fn test_cable_validate_names_first_missing() {
        let cable = CableProperties::<f64> {
            ra: None,
            cm: None,
        };
        assert_eq!(cable.validate(), Err(MissingValue::field("Ra")));

        let cable = CableProperties::<f64> {
            ra: Some(1.0),
            cm: None,
        };
        assert_eq!(cable.validate(), Err(MissingValue::field("cm")));
    }

    #[test]
    fn test_empty_constraint_does_not_overwrite() {
        let mut left = Ion::<Constraint>::new(1.0, 2.0, 3.0);
        let right = Ion {
            rev_pot: Some(Constraint::empty()),
            int_con: Some(Constraint::new(4.0, 5.0)),
            ext_con: None,
        };

        left.merge_from(&right);

        assert_eq!(left.rev_pot, Some(Constraint::frozen(1.0)));
        assert_eq!(left.int_con, Some(Constraint::new(4.0, 5.0)));
        assert_eq!(left.ext_con, Some(Constraint::frozen(3.0)));
    }

    #[test]
    fn test_empty_constraint_fails_validation() {
        let ion = Ion {
            rev_pot: Some(Constraint::frozen(1.0)),
            int_con: Some(Constraint::empty()),
            ext_con: Some(Constraint::frozen(1.0)),
        };
        assert_eq!(ion.validate(), Err(MissingValue::field("int_con")));
    }

    #[test]
    fn test_synapse_merge_keeps_mech_id() {
        let mut global = Synapse::<f64>::new(MechId::parse("ExpSyn").unwrap(), BTreeMap::new())
            .with_parameter("tau", 2.0)
            .with_parameter("e", 0.0);
        let local = Synapse::new(MechId::parse("Exp2Syn").unwrap(), BTreeMap::new()).with_parameter("tau", 5.0);

        global.merge_from(&local);

        assert_eq!(global.mech_id, MechId::parse("ExpSyn").unwrap());
        assert_eq!(global.parameters["tau"], 5.0);
        assert_eq!(global.parameters["e"], 0.0);
    }
}
