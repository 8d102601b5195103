// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Compound cable types: one entry per distinct label set of a frozen schematic.

use arbora_definitions::{CableType, ParameterValue};

use crate::model::UnitBranchId;
use crate::schematic::Schematic;
use crate::types::SchematicResult;

/// Unique name for a label combination.
///
/// Underscores inside labels are doubled so that `["a_b"]` and `["a", "b"]`
/// never collide.
pub fn compound_name<S: AsRef<str>>(labels: &[S]) -> String {
    labels
        .iter()
        .map(|label| label.as_ref().replace('_', "__"))
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompoundGroup {
    name: String,
    labels: Vec<String>,
    branches: Vec<UnitBranchId>,
}

/// Resolved cable type shared by every unit branch with the same label set
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundCableType<'a, V = f64> {
    pub name: &'a str,
    /// Labels in priority order
    pub labels: &'a [String],
    pub definition: &'a CableType<V>,
    pub branches: &'a [UnitBranchId],
}

impl<V: ParameterValue> Schematic<V> {
    fn compound_groups(&self) -> &[CompoundGroup] {
        self.compound.get_or_init(|| {
            let mut groups: Vec<CompoundGroup> = Vec::new();
            for unit in self.iter() {
                let labels: Vec<String> = self
                    .definition()
                    .sort_labels(unit.labels())
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                match groups.iter_mut().find(|group| group.labels == labels) {
                    Some(group) => group.branches.push(unit.id()),
                    None => groups.push(CompoundGroup {
                        name: compound_name(&labels),
                        labels,
                        branches: vec![unit.id()],
                    }),
                }
            }
            groups
        })
    }

    /// Group unit branches by label set, in first-seen depth-first order.
    ///
    /// # Errors
    ///
    /// `Frozen` before [`freeze`](Schematic::freeze).
    pub fn get_compound_cable_types(&self) -> SchematicResult<Vec<CompoundCableType<'_, V>>> {
        self.ensure_frozen("listing compound cable types")?;
        let compounds = self
            .compound_groups()
            .iter()
            .filter_map(|group| {
                let first = group.branches.first()?;
                let definition = self.unit(*first)?.definition()?;
                Some(CompoundCableType {
                    name: &group.name,
                    labels: &group.labels,
                    definition,
                    branches: &group.branches,
                })
            })
            .collect();
        Ok(compounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use crate::types::SchematicError;
    use crate::ModelSchematic;
    use arbora_definitions::define_model;
    use serde_json::json;

    #[test]
    fn test_compound_name_escapes_underscores() {
        assert_eq!(compound_name(&["soma", "tag_1"]), "soma_tag__1");
        assert_ne!(compound_name(&["a_b"]), compound_name(&["a", "b"]));
        assert_eq!(compound_name::<&str>(&[]), "");
    }

    #[test]
    fn test_groups_by_label_set() {
        let definition = define_model(
            &json!({
                "cable_types": {
                    "dend": {"cable": {"Ra": 100.0, "cm": 2.0}},
                    "soma": {"cable": {"Ra": 10.0, "cm": 1.0}}
                }
            }),
            false,
        )
        .unwrap();
        let mut schematic = ModelSchematic::new(Some("cell".to_string()));
        schematic.set_definition(definition).unwrap();
        schematic.create_location((0, 0), [0.0; 3], 5.0, &["soma"], None).unwrap();
        schematic
            .create_location((1, 0), [1.0, 0.0, 0.0], 1.0, &["soma", "dend"], Some(Location::new(0, 0)))
            .unwrap();
        schematic
            .create_location((2, 0), [0.0, 1.0, 0.0], 1.0, &["dend", "soma"], Some(Location::new(0, 0)))
            .unwrap();

        assert!(matches!(
            schematic.get_compound_cable_types(),
            Err(SchematicError::Frozen(_))
        ));
        schematic.freeze().unwrap();

        let compounds = schematic.get_compound_cable_types().unwrap();
        assert_eq!(compounds.len(), 2);
        assert_eq!(compounds[0].name, "soma");
        assert_eq!(compounds[1].name, "dend_soma");
        assert_eq!(compounds[1].labels, ["dend", "soma"]);
        assert_eq!(compounds[1].branches, [UnitBranchId(1), UnitBranchId(2)]);
        // soma registered last, so it wins
        assert_eq!(compounds[1].definition.cable.ra, Some(10.0));

        let again = schematic.get_compound_cable_types().unwrap();
        assert_eq!(again, compounds);
    }
}
