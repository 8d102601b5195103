// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Model definitions: the label-to-cable-type registry of a neuron model.

Registration order is significant. It decides which label wins when a branch
carries several labels (see [`crate::priority`]).
*/

use std::collections::{BTreeMap, HashMap};

use crate::cable_type::CableType;
use crate::constraints::Constraint;
use crate::parameter::Parameter;
use crate::priority;
use crate::records::Synapse;
use crate::types::{DefinitionError, DefinitionResult};
use crate::value::{ParameterValue, Record};

/// Definition with plain scalar parameters
pub type ModelDefinition = Definition<f64>;
/// Definition with parameter ranges
pub type ConstraintsDefinition = Definition<Constraint>;

#[derive(Debug, Clone, PartialEq)]
pub struct Definition<V = f64> {
    labels: Vec<String>,
    cable_types: HashMap<String, CableType<V>>,
    synapse_types: BTreeMap<String, Synapse<V>>,
    use_defaults: bool,
}

impl<V: ParameterValue> Default for Definition<V> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<V: ParameterValue> Definition<V> {
    pub fn new(use_defaults: bool) -> Self {
        Self {
            labels: Vec::new(),
            cable_types: HashMap::new(),
            synapse_types: BTreeMap::new(),
            use_defaults,
        }
    }

    /// Whether resolution starts from the physiological defaults.
    pub fn use_defaults(&self) -> bool {
        self.use_defaults
    }

    pub fn set_use_defaults(&mut self, use_defaults: bool) {
        self.use_defaults = use_defaults;
    }

    /// Registered labels in registration order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn cable_type(&self, label: &str) -> Option<&CableType<V>> {
        self.cable_types.get(label)
    }

    /// Copies of every cable type, in registration order.
    pub fn get_cable_types(&self) -> Vec<(String, CableType<V>)> {
        self.labels
            .iter()
            .filter_map(|label| {
                self.cable_types
                    .get(label)
                    .map(|cable_type| (label.clone(), cable_type.clone()))
            })
            .collect()
    }

    pub fn synapse_types(&self) -> &BTreeMap<String, Synapse<V>> {
        &self.synapse_types
    }

    pub fn get_synapse_types(&self) -> BTreeMap<String, Synapse<V>> {
        self.synapse_types.clone()
    }

    pub fn add_cable_type(
        &mut self,
        label: impl Into<String>,
        cable_type: CableType<V>,
    ) -> DefinitionResult<()> {
        let label = label.into();
        if self.cable_types.contains_key(&label) {
            return Err(DefinitionError::Duplicate {
                kind: "Cable type",
                key: label,
            });
        }
        self.labels.push(label.clone());
        self.cable_types.insert(label, cable_type);
        Ok(())
    }

    pub fn add_synapse_type(
        &mut self,
        label: impl Into<String>,
        synapse: Synapse<V>,
    ) -> DefinitionResult<()> {
        let label = label.into();
        if self.synapse_types.contains_key(&label) {
            return Err(DefinitionError::Duplicate {
                kind: "Synapse type",
                key: label,
            });
        }
        self.synapse_types.insert(label, synapse);
        Ok(())
    }

    /// Merge `other` into this definition.
    ///
    /// Shared labels merge their cable types, new labels are appended in the
    /// registration order of `other`. `use_defaults` is kept.
    pub fn merge(&mut self, other: &Definition<V>) {
        for label in &other.labels {
            let Some(incoming) = other.cable_types.get(label) else {
                continue;
            };
            match self.cable_types.get_mut(label) {
                Some(existing) => existing.merge(incoming),
                None => {
                    self.labels.push(label.clone());
                    self.cable_types.insert(label.clone(), incoming.clone());
                }
            }
        }
        for (label, synapse) in &other.synapse_types {
            match self.synapse_types.get_mut(label) {
                Some(existing) => existing.merge_from(synapse),
                None => {
                    self.synapse_types.insert(label.clone(), synapse.clone());
                }
            }
        }
    }

    pub fn priority_index(&self, label: &str) -> usize {
        priority::priority_index(&self.labels, label)
    }

    /// Deduplicated `labels` in ascending priority.
    pub fn sort_labels<'a, L: AsRef<str>>(&self, labels: &'a [L]) -> Vec<&'a str> {
        priority::sort_by_priority(&self.labels, labels)
    }

    /// Set one parameter on a registered label.
    pub fn set_param(&mut self, label: &str, param: &Parameter<V>) -> DefinitionResult<()> {
        let cable_type = self
            .cable_types
            .get_mut(label)
            .ok_or_else(|| DefinitionError::LabelNotDefined(label.to_string()))?;
        cable_type.set(param);
        Ok(())
    }

    /// Resolve the cable type of a branch carrying `labels`.
    ///
    /// Labels are applied in priority order over the defaults (if enabled) and
    /// the model-wide synapse types. Labels without a cable type contribute
    /// nothing.
    pub fn resolve<L: AsRef<str>>(&self, labels: &[L]) -> CableType<V> {
        let ordered = self.sort_labels(labels);
        CableType::anchor(
            ordered.iter().map(|label| self.cable_types.get(*label)),
            Some(&self.synapse_types),
            self.use_defaults,
        )
    }
}

impl Definition<Constraint> {
    /// Apply `tolerance` to every constraint in this definition.
    pub fn set_tolerance(&mut self, tolerance: Option<f64>) {
        for cable_type in self.cable_types.values_mut() {
            cable_type.set_tolerance(tolerance);
        }
        for synapse in self.synapse_types.values_mut() {
            for constraint in synapse.parameters.values_mut() {
                constraint.set_tolerance(tolerance);
            }
        }
    }
}
