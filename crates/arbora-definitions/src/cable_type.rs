// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Cable types: the parameter bundle resolved for one structural label.

A cable type combines cable properties, ions, mechanisms and synapses. The
[`CableType::anchor`] operation folds every definition that applies to a branch
into one fully resolved cable type.
*/

use std::collections::BTreeMap;

use crate::constraints::Constraint;
use crate::parameter::Parameter;
use crate::records::{CableProperties, Ion, MechId, Mechanism, Synapse};
use crate::types::{DefinitionError, DefinitionResult, MissingValue};
use crate::value::{ParameterValue, Record};

/// Default axial resistivity (ohm*cm)
pub const DEFAULT_RA: f64 = 35.4;
/// Default membrane capacitance (uF/cm^2)
pub const DEFAULT_CM: f64 = 1.0;

/// Physiological ion defaults as `(name, [rev_pot, int_con, ext_con])`.
pub const DEFAULT_IONS: [(&str, [f64; 3]); 4] = [
    ("na", [50.0, 10.0, 140.0]),
    ("k", [-77.0, 54.4, 2.5]),
    ("ca", [132.4579341637009, 5e-05, 2.0]),
    ("h", [0.0, 1.0, 1.0]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CableType<V = f64> {
    pub cable: CableProperties<V>,
    pub ions: BTreeMap<String, Ion<V>>,
    pub mechs: BTreeMap<MechId, Mechanism<V>>,
    pub synapses: BTreeMap<String, Synapse<V>>,
}

impl<V> Default for CableType<V> {
    fn default() -> Self {
        Self {
            cable: CableProperties::default(),
            ions: BTreeMap::new(),
            mechs: BTreeMap::new(),
            synapses: BTreeMap::new(),
        }
    }
}

fn merge_records<K, R>(target: &mut BTreeMap<K, R>, incoming: &BTreeMap<K, R>)
where
    K: Ord + Clone,
    R: Record,
{
    for (key, record) in incoming {
        match target.get_mut(key) {
            Some(existing) => existing.merge_from(record),
            None => {
                target.insert(key.clone(), record.clone());
            }
        }
    }
}

impl<V: ParameterValue> CableType<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cable type pre-populated with the default cable properties and ions.
    pub fn defaults() -> Self {
        let mut defaults = Self::new();
        defaults.cable = CableProperties::new(DEFAULT_RA, DEFAULT_CM);
        for (name, [rev_pot, int_con, ext_con]) in DEFAULT_IONS {
            defaults
                .ions
                .insert(name.to_string(), Ion::new(rev_pot, int_con, ext_con));
        }
        defaults
    }

    /// Resolve one cable type out of the definitions that apply to a branch.
    ///
    /// `defs` must be in ascending priority: later entries override earlier
    /// ones. `None` entries (labels without a cable type) are skipped.
    /// Model-wide `synapses` seed the synapse set so that label-level synapse
    /// declarations override them key by key.
    pub fn anchor<'a, I>(
        defs: I,
        synapses: Option<&BTreeMap<String, Synapse<V>>>,
        use_defaults: bool,
    ) -> Self
    where
        I: IntoIterator<Item = Option<&'a CableType<V>>>,
    {
        let mut resolved = if use_defaults {
            Self::defaults()
        } else {
            Self::new()
        };
        if let Some(synapses) = synapses {
            resolved.synapses = synapses.clone();
        }
        for def in defs.into_iter().flatten() {
            resolved.merge(def);
        }
        resolved
    }

    /// Deep merge of `other` over `self`.
    pub fn merge(&mut self, other: &CableType<V>) {
        self.cable.merge_from(&other.cable);
        merge_records(&mut self.ions, &other.ions);
        merge_records(&mut self.mechs, &other.mechs);
        merge_records(&mut self.synapses, &other.synapses);
    }

    pub fn add_ion(&mut self, name: impl Into<String>, ion: Ion<V>) -> DefinitionResult<()> {
        let name = name.into();
        if self.ions.contains_key(&name) {
            return Err(DefinitionError::Duplicate {
                kind: "Ion",
                key: name,
            });
        }
        self.ions.insert(name, ion);
        Ok(())
    }

    pub fn add_mech(&mut self, mech_id: MechId, mech: Mechanism<V>) -> DefinitionResult<()> {
        if self.mechs.contains_key(&mech_id) {
            return Err(DefinitionError::Duplicate {
                kind: "Mechanism",
                key: mech_id.to_string(),
            });
        }
        self.mechs.insert(mech_id, mech);
        Ok(())
    }

    pub fn add_synapse(&mut self, label: impl Into<String>, synapse: Synapse<V>) -> DefinitionResult<()> {
        let label = label.into();
        if self.synapses.contains_key(&label) {
            return Err(DefinitionError::Duplicate {
                kind: "Synapse",
                key: label,
            });
        }
        self.synapses.insert(label, synapse);
        Ok(())
    }

    /// Apply a single parameter, creating the ion or mechanism if needed.
    pub fn set(&mut self, param: &Parameter<V>) {
        match param {
            Parameter::Cable { property, value } => {
                self.cable.set(*property, Some(value.clone()));
            }
            Parameter::Ion {
                ion,
                property,
                value,
            } => {
                self.ions
                    .entry(ion.clone())
                    .or_default()
                    .set(*property, Some(value.clone()));
            }
            Parameter::Mechanism {
                mech_id,
                parameter,
                value,
            } => {
                self.mechs
                    .entry(mech_id.clone())
                    .or_default()
                    .parameters
                    .insert(parameter.clone(), value.clone());
            }
        }
    }
}

impl<V: ParameterValue> Record for CableType<V> {
    fn merge_from(&mut self, other: &Self) {
        self.merge(other);
    }

    fn validate(&self) -> Result<(), MissingValue> {
        self.cable.validate()?;
        for (name, ion) in &self.ions {
            ion.validate().map_err(|missing| missing.in_ion(name.as_str()))?;
        }
        Ok(())
    }
}

impl CableType<Constraint> {
    /// Set the tolerance of every constraint in this cable type.
    pub fn set_tolerance(&mut self, tolerance: Option<f64>) {
        let cable = self.cable.values_mut();
        let ions = self.ions.values_mut().flat_map(Ion::values_mut);
        let mechs = self
            .mechs
            .values_mut()
            .flat_map(|mech| mech.parameters.values_mut());
        let synapses = self
            .synapses
            .values_mut()
            .flat_map(|synapse| synapse.parameters.values_mut());
        for constraint in cable.chain(ions).chain(mechs).chain(synapses) {
            constraint.set_tolerance(tolerance);
        }
    }
}
