// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Arbora Schematic

Morphology trees bound to a model definition. Producers append points in
depth-first order; freezing resolves one cable type per unit branch, ready for
simulator builders to consume.

- [`Schematic`]: arena of points, cable branches and unit branches
- [`CompoundCableType`]: unit branches grouped by label set
- Geometry helpers for builders ([`location_name`], [`arc_lengths`])
*/

pub mod compound;
pub mod model;
pub mod schematic;
pub mod types;

pub use compound::{compound_name, CompoundCableType};
pub use model::{
    arc_lengths, label_set, location_name, CableBranch, CableBranchId, Location, Point, UnitBranch,
    UnitBranchId,
};
pub use schematic::{ConstraintsSchematic, ModelSchematic, Schematic, UnitIter};
pub use types::{SchematicError, SchematicResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_frozen_schematic_is_shareable() {
        assert_send_sync::<ModelSchematic>();
        assert_send_sync::<ConstraintsSchematic>();
    }
}
