// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
The schematic: a labelled morphology tree bound to a model definition.

Locations are appended in ascending `(branch, point)` order. Each point extends
the current unit branch of its cable, or starts a new one when its label set
differs from the previous point's. [`Schematic::freeze`] resolves a cable type
for every unit branch and locks the schematic.

```text
cable 0: (0.0) (0.1) (0.2) (0.3)        cable 1, endpoint (0.3): (1.0) (1.1)
         └─ soma ──┘ └ soma,axon ┘                                └ dend ─┘
unit:        0            1                                           2
```
*/

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use arbora_config::{SchematicConfig, DEFAULT_RANDOM_NAME_LENGTH};
use arbora_definitions::{
    CableType, Constraint, Definition, MissingValue, Parameter, ParameterValue, Record, Synapse,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::compound::CompoundGroup;
use crate::model::{self, CableBranch, CableBranchId, Location, Point, UnitBranch, UnitBranchId};
use crate::types::{SchematicError, SchematicResult};

/// Schematic over plain scalar definitions
pub type ModelSchematic = Schematic<f64>;
/// Schematic over constraint definitions, for optimization
pub type ConstraintsSchematic = Schematic<Constraint>;

#[derive(Debug)]
pub struct Schematic<V = f64> {
    name: Option<String>,
    random_name_length: usize,
    frozen: bool,
    definition: Definition<V>,
    cables: Vec<CableBranch>,
    units: Vec<UnitBranch<V>>,
    roots: Vec<UnitBranchId>,
    named: AtomicUsize,
    pub(crate) compound: OnceLock<Vec<CompoundGroup>>,
}

impl<V: ParameterValue> Default for Schematic<V> {
    fn default() -> Self {
        Self::new(None)
    }
}

fn random_name(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.gen_range(b'A'..=b'Z')))
        .collect()
}

impl<V: ParameterValue> Schematic<V> {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            random_name_length: DEFAULT_RANDOM_NAME_LENGTH,
            frozen: false,
            definition: Definition::default(),
            cables: Vec::new(),
            units: Vec::new(),
            roots: Vec::new(),
            named: AtomicUsize::new(0),
            compound: OnceLock::new(),
        }
    }

    pub fn with_config(config: &SchematicConfig) -> Self {
        let mut schematic = Self::new(config.base_name.clone());
        schematic.random_name_length = config.random_name_length;
        schematic
    }

    fn ensure_mutable(&self, action: &str) -> SchematicResult<()> {
        if self.frozen {
            return Err(SchematicError::Frozen(format!(
                "Can't {} of finished schematic.",
                action
            )));
        }
        Ok(())
    }

    pub(crate) fn ensure_frozen(&self, action: &str) -> SchematicResult<()> {
        if !self.frozen {
            return Err(SchematicError::Frozen(format!(
                "Schematic must be finished before {}.",
                action
            )));
        }
        Ok(())
    }

    /// Base name for all instances of this model.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> SchematicResult<()> {
        self.ensure_mutable("change name")?;
        self.name = Some(name.into());
        Ok(())
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn definition(&self) -> &Definition<V> {
        &self.definition
    }

    pub fn set_definition(&mut self, definition: Definition<V>) -> SchematicResult<()> {
        self.ensure_mutable("change definitions")?;
        self.definition = definition;
        Ok(())
    }

    /// Set one parameter on the cable type of `label`.
    pub fn set_param(&mut self, label: &str, param: &Parameter<V>) -> SchematicResult<()> {
        self.ensure_mutable("set parameters")?;
        self.definition.set_param(label, param)?;
        Ok(())
    }

    fn order_error(&self, location: Location) -> SchematicError {
        let next_branch = self.cables.len();
        let expected = match self.cables.last() {
            Some(last) => format!(
                "({}.{}) or ({}.0)",
                next_branch - 1,
                last.points.len(),
                next_branch
            ),
            None => "(0.0)".to_string(),
        };
        SchematicError::Construction(format!(
            "Locations need to be constructed in order. Can't construct {}, should construct {}.",
            location, expected
        ))
    }

    /// Resolve an endpoint to the cable and unit branch it attaches to.
    fn resolve_endpoint(
        &self,
        location: Location,
        endpoint: Location,
    ) -> SchematicResult<(CableBranchId, UnitBranchId)> {
        if location.point != 0 {
            return Err(SchematicError::Construction(format!(
                "Can't attach {} to endpoint {}, only the first point of a branch has an endpoint.",
                location, endpoint
            )));
        }
        self.cables
            .get(endpoint.branch)
            .and_then(|cable| cable.points.get(endpoint.point))
            .map(|point| (CableBranchId(endpoint.branch), point.unit()))
            .ok_or_else(|| {
                SchematicError::Construction(format!(
                    "Endpoint {} of {} does not exist.",
                    endpoint, location
                ))
            })
    }

    fn push_unit(
        &mut self,
        cable: CableBranchId,
        start: usize,
        labels: Vec<String>,
        parent: Option<UnitBranchId>,
    ) -> UnitBranchId {
        let id = UnitBranchId(self.units.len());
        self.units.push(UnitBranch {
            id,
            cable,
            points: start..start,
            labels,
            parent,
            children: Vec::new(),
            definition: None,
        });
        if let Some(parent) = parent {
            self.units[parent.0].children.push(id);
        }
        self.cables[cable.0].units.push(id);
        id
    }

    /// Append a point to the schematic.
    ///
    /// `location` must continue the last branch or start the next one. An
    /// `endpoint` attaches the first point of a branch to an existing point;
    /// without one the branch starts a new root.
    ///
    /// # Errors
    ///
    /// `Construction` for out-of-order locations and invalid endpoints,
    /// `Frozen` after [`freeze`](Self::freeze). Nothing is modified on error.
    pub fn create_location<S: AsRef<str>>(
        &mut self,
        location: impl Into<Location>,
        coords: [f64; 3],
        radius: f64,
        labels: &[S],
        endpoint: Option<Location>,
    ) -> SchematicResult<()> {
        self.ensure_mutable("alter locations")?;
        let location = location.into();

        let next_branch = self.cables.len();
        let starts_branch = location.branch == next_branch;
        let expected_point = if starts_branch {
            0
        } else if Some(location.branch) == next_branch.checked_sub(1) {
            self.cables[location.branch].points.len()
        } else {
            return Err(self.order_error(location));
        };
        if location.point != expected_point {
            return Err(self.order_error(location));
        }
        let attachment = endpoint
            .map(|endpoint| self.resolve_endpoint(location, endpoint))
            .transpose()?;
        let labels = model::label_set(labels);

        if starts_branch {
            self.cables.push(CableBranch::new(CableBranchId(next_branch)));
        }
        let cable_id = CableBranchId(location.branch);
        let previous_unit = self.cables[cable_id.0].points.last().map(Point::unit);

        let unit_id = match previous_unit {
            Some(previous) if self.units[previous.0].labels == labels => previous,
            Some(previous) => self.push_unit(cable_id, location.point, labels, Some(previous)),
            None => match attachment {
                Some((parent_cable, parent_unit)) => {
                    self.cables[cable_id.0].parent = Some(parent_cable);
                    self.cables[parent_cable.0].children.push(cable_id);
                    self.push_unit(cable_id, location.point, labels, Some(parent_unit))
                }
                None => {
                    let root = self.push_unit(cable_id, location.point, labels, None);
                    self.roots.push(root);
                    root
                }
            },
        };

        self.units[unit_id.0].points.end = location.point + 1;
        self.cables[cable_id.0]
            .points
            .push(Point::new(location, coords, radius, unit_id));
        Ok(())
    }

    /// Append a branch without points.
    pub fn create_empty(&mut self) -> SchematicResult<CableBranchId> {
        self.ensure_mutable("alter locations")?;
        let id = CableBranchId(self.cables.len());
        self.cables.push(CableBranch::new(id));
        Ok(id)
    }

    fn missing_value_error(&self, unit: &UnitBranch<V>, field: MissingValue) -> SchematicError {
        SchematicError::MissingValue {
            location: model::location_name(self.points_of(unit)),
            labels: self
                .definition
                .sort_labels(&unit.labels)
                .into_iter()
                .map(str::to_string)
                .collect(),
            field,
        }
    }

    /// Resolve and validate every unit branch, then lock the schematic.
    ///
    /// Calling it again is a no-op. On error nothing is modified.
    pub fn freeze(&mut self) -> SchematicResult<()> {
        if self.frozen {
            return Ok(());
        }

        let mut unregistered = BTreeSet::new();
        let mut resolved = Vec::with_capacity(self.units.len());
        for unit in self.iter() {
            unregistered.extend(
                unit.labels
                    .iter()
                    .filter(|label| self.definition.cable_type(label).is_none()),
            );
            let definition = self.definition.resolve(&unit.labels);
            definition
                .validate()
                .map_err(|missing| self.missing_value_error(unit, missing))?;
            debug!(
                target: "arbora-schematic",
                "Resolved {} ({}) with labels {:?}",
                unit.id,
                model::location_name(self.points_of(unit)),
                unit.labels
            );
            resolved.push((unit.id, definition));
        }
        for label in &unregistered {
            warn!(target: "arbora-schematic", "Label '{}' has no cable type", label);
        }

        for (id, definition) in resolved {
            self.units[id.0].definition = Some(definition);
        }
        if self.name.is_none() {
            self.name = Some(random_name(self.random_name_length));
        }
        self.frozen = true;

        info!(
            target: "arbora-schematic",
            "Froze schematic '{}': {} cable branches, {} unit branches",
            self.name.as_deref().unwrap_or_default(),
            self.cables.len(),
            self.units.len()
        );
        Ok(())
    }

    /// Next unique instance name, `{name}_{n}` with `n` from 1.
    pub fn create_name(&self) -> SchematicResult<String> {
        self.ensure_frozen("naming instances of it")?;
        let n = self.named.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(format!("{}_{}", self.name.as_deref().unwrap_or_default(), n))
    }

    /// Unit branches in depth-first preorder.
    ///
    /// Roots are visited in creation order, children in attach order.
    pub fn iter(&self) -> UnitIter<'_, V> {
        UnitIter {
            schematic: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Number of unit branches
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get_cable_types(&self) -> Vec<(String, CableType<V>)> {
        self.definition.get_cable_types()
    }

    pub fn get_synapse_types(&self) -> BTreeMap<String, Synapse<V>> {
        self.definition.get_synapse_types()
    }

    pub fn cables(&self) -> &[CableBranch] {
        &self.cables
    }

    pub fn cable(&self, id: CableBranchId) -> Option<&CableBranch> {
        self.cables.get(id.0)
    }

    pub fn units(&self) -> &[UnitBranch<V>] {
        &self.units
    }

    pub fn unit(&self, id: UnitBranchId) -> Option<&UnitBranch<V>> {
        self.units.get(id.0)
    }

    /// Root unit branches in creation order
    pub fn roots(&self) -> &[UnitBranchId] {
        &self.roots
    }

    fn points_of(&self, unit: &UnitBranch<V>) -> &[Point] {
        self.cables
            .get(unit.cable.0)
            .and_then(|cable| cable.points.get(unit.points.clone()))
            .unwrap_or_default()
    }

    pub fn unit_points(&self, id: UnitBranchId) -> Option<&[Point]> {
        self.unit(id).map(|unit| self.points_of(unit))
    }

    /// `location (b.p)` or `interval (b.p1-p2)` of a unit branch.
    pub fn location_name(&self, id: UnitBranchId) -> Option<String> {
        self.unit_points(id).map(model::location_name)
    }

    /// Normalized cumulative arc length at each point of a unit branch.
    pub fn arc_lengths(&self, id: UnitBranchId) -> Option<Vec<f64>> {
        self.unit_points(id).map(model::arc_lengths)
    }
}

impl<'a, V: ParameterValue> IntoIterator for &'a Schematic<V> {
    type Item = &'a UnitBranch<V>;
    type IntoIter = UnitIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first preorder iterator over unit branches
pub struct UnitIter<'a, V> {
    schematic: &'a Schematic<V>,
    stack: Vec<UnitBranchId>,
}

impl<'a, V> Iterator for UnitIter<'a, V> {
    type Item = &'a UnitBranch<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let unit = self.schematic.units.get(id.0)?;
        self.stack.extend(unit.children.iter().rev().copied());
        Some(unit)
    }
}
