// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Arbora Definitions

Label-driven parameter definitions for biophysical neuron models:

- Parameter records (cable properties, ions, mechanisms, synapses)
- Cable types and their resolution ("anchoring") by label priority
- Model definitions with registration-ordered labels
- Constraint ranges with tolerance, for optimization
- Dict-literal (JSON) parsing and saving

## Resolution

```text
defaults (optional)      model-wide synapse types
        │                         │
        └──────────┬──────────────┘
                   ▼
      merge cable types of every label on a branch,
      lowest priority first (last registered wins)
                   │
                   ▼
          fully resolved CableType
```

Every record is generic over its leaf value: `f64` for [`ModelDefinition`],
[`Constraint`] for [`ConstraintsDefinition`].

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

pub mod cable_type;
pub mod constraints;
pub mod definition;
pub mod parameter;
pub mod parser;
pub mod priority;
pub mod records;
pub mod saver;
pub mod types;
pub mod value;

pub use cable_type::{CableType, DEFAULT_CM, DEFAULT_IONS, DEFAULT_RA};
pub use constraints::{Constraint, ConstraintValue};
pub use definition::{ConstraintsDefinition, Definition, ModelDefinition};
pub use parameter::{CableProperty, IonProperty, Parameter};
pub use parser::{
    define_constraints, define_constraints_str, define_constraints_with_config, define_model,
    define_model_from, define_model_str, define_model_with_config, parse_definition,
};
pub use priority::{priority_index, sort_by_priority};
pub use records::{is_mech_id, CableProperties, Ion, MechId, Mechanism, Synapse, MECH_ID_SEPARATOR};
pub use saver::{save_definition_to_json, save_definition_to_string};
pub use types::{DefinitionError, DefinitionResult, MissingValue};
pub use value::{ParameterValue, Record};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
