// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Arbora - label-driven neuron models
//!
//! Arbora describes biophysical neuron models in two halves: a **definition**
//! mapping labels to cable types (axial resistance, capacitance, ions,
//! mechanisms, synapses), and a **schematic** of labelled morphology points.
//! Freezing the schematic resolves one cable type per unit branch, ready for a
//! simulator builder.
//!
//! ## Quick Start
//!
//! ```rust
//! use arbora::prelude::*;
//! use serde_json::json;
//!
//! let definition = define_model(
//!     &json!({
//!         "cable_types": {
//!             "soma": {"cable": {"Ra": 35.4, "cm": 1.0}, "mechanisms": {"pas": {"e": -65.0}}},
//!             "dend": {"cable": {"Ra": 100.0, "cm": 2.0}}
//!         }
//!     }),
//!     true,
//! )?;
//!
//! let mut schematic = ModelSchematic::new(Some("pyramidal".to_string()));
//! schematic.set_definition(definition)?;
//! schematic.create_location((0, 0), [0.0, 0.0, 0.0], 10.0, &["soma"], None)?;
//! schematic.create_location((1, 0), [10.0, 0.0, 0.0], 1.0, &["dend"], Some(Location::new(0, 0)))?;
//! schematic.freeze()?;
//!
//! for unit in &schematic {
//!     let resolved = unit.definition().expect("frozen");
//!     println!("{:?} Ra={:?}", unit.labels(), resolved.cable.ra);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: arbora-config, arbora-definitions          │
//! │  (Configuration, cable types, constraints, JSON)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Model: arbora-schematic                                │
//! │  (Morphology arena, freeze, compound cable types)       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use arbora_config as config;
pub use arbora_definitions as definitions;
pub use arbora_schematic as schematic;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::definitions::{
        define_constraints, define_model, define_model_from, CableProperty, CableType, Constraint,
        ConstraintsDefinition, Definition, DefinitionError, IonProperty, MechId, ModelDefinition,
        Parameter, Record,
    };
    pub use crate::schematic::{
        CompoundCableType, ConstraintsSchematic, Location, ModelSchematic, Schematic,
        SchematicError, UnitBranchId,
    };
}
