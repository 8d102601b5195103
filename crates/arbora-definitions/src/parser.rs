// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Dict-literal definition parser.

Parses JSON-shaped nested mappings into [`Definition`]s:

```text
{
  "cable_types": {
    "soma": {
      "cable": {"Ra": 35.4, "cm": 1.0},
      "ions": {"na": {"rev_pot": 50.0, "int_con": 10.0, "ext_con": 140.0}},
      "mechanisms": {"pas": {"e": -70.0, "g": 0.001}},
      "synapses": {"ExpSyn": {"tau": 2.0}}
    }
  },
  "synapse_types": {
    "ampa": {"mechanism": "Exp2Syn", "parameters": {"tau1": 0.2, "tau2": 1.7}}
  }
}
```

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{info, warn};

use arbora_config::DefinitionsConfig;

use crate::cable_type::CableType;
use crate::constraints::Constraint;
use crate::definition::{ConstraintsDefinition, Definition, ModelDefinition};
use crate::parameter::{CableProperty, IonProperty};
use crate::records::{CableProperties, Ion, MechId, Mechanism, Synapse};
use crate::types::{DefinitionError, DefinitionResult};
use crate::value::ParameterValue;

const CABLE_TYPES_KEY: &str = "cable_types";
const SYNAPSE_TYPES_KEY: &str = "synapse_types";

/// Owner of a sub-dictionary, used in error messages.
#[derive(Clone, Copy)]
struct Scope<'a> {
    kind: &'static str,
    label: &'a str,
}

impl Scope<'_> {
    fn invalid(&self, dict: &Value, what: &str) -> DefinitionError {
        DefinitionError::ModelDefinition(format!(
            "{} '{}': {} is not a valid {} definition",
            self.kind, self.label, dict, what
        ))
    }

    fn bad_leaf(&self, key: &str, what: &str, reason: &str) -> DefinitionError {
        DefinitionError::ModelDefinition(format!(
            "{} '{}': bad value for '{}' in {} definition: {}",
            self.kind, self.label, key, what, reason
        ))
    }

    fn object<'v>(&self, value: &'v Value, what: &str) -> DefinitionResult<&'v Map<String, Value>> {
        value.as_object().ok_or_else(|| self.invalid(value, what))
    }
}

fn parse_leaf<V: ParameterValue>(
    scope: Scope<'_>,
    what: &str,
    key: &str,
    value: &Value,
) -> DefinitionResult<V> {
    V::from_json(value).map_err(|reason| scope.bad_leaf(key, what, &reason))
}

fn parse_cable<V: ParameterValue>(scope: Scope<'_>, value: &Value) -> DefinitionResult<CableProperties<V>> {
    let mut cable = CableProperties::default();
    for (key, leaf) in scope.object(value, "cable")? {
        let property: CableProperty = key.parse().map_err(|_| scope.invalid(value, "cable"))?;
        cable.set(property, Some(parse_leaf(scope, "cable", key, leaf)?));
    }
    Ok(cable)
}

fn parse_ion<V: ParameterValue>(scope: Scope<'_>, value: &Value) -> DefinitionResult<Ion<V>> {
    let mut ion = Ion::default();
    for (key, leaf) in scope.object(value, "ion")? {
        let property: IonProperty = key.parse().map_err(|_| scope.invalid(value, "ion"))?;
        ion.set(property, Some(parse_leaf(scope, "ion", key, leaf)?));
    }
    Ok(ion)
}

fn parse_parameters<V: ParameterValue>(
    scope: Scope<'_>,
    what: &str,
    value: &Value,
) -> DefinitionResult<BTreeMap<String, V>> {
    scope
        .object(value, what)?
        .iter()
        .map(|(key, leaf)| parse_leaf(scope, what, key, leaf).map(|value| (key.clone(), value)))
        .collect()
}

/// Parse one synapse dictionary in short or expanded form.
///
/// Without a `mechanism` key the id is parsed from the synapse label, and the
/// parameters are the `parameters` entry if given, otherwise the whole dict.
fn parse_synapse<V: ParameterValue>(
    scope: Scope<'_>,
    label: &str,
    value: &Value,
) -> DefinitionResult<Synapse<V>> {
    let dict = scope.object(value, "synapse")?;
    let mechanism = dict.get("mechanism");
    if mechanism.is_some() && dict.keys().any(|key| key != "mechanism" && key != "parameters") {
        return Err(scope.invalid(value, "synapse"));
    }

    let mech_id = match mechanism {
        Some(id) => MechId::from_json(id),
        None => MechId::parse(label),
    }
    .map_err(|_| scope.invalid(value, "synapse"))?;
    let parameters = match dict.get("parameters") {
        Some(parameters) => parse_parameters(scope, "synapse", parameters)?,
        None if mechanism.is_some() => BTreeMap::new(),
        None => parse_parameters(scope, "synapse", value)?,
    };
    Ok(Synapse::new(mech_id, parameters))
}

fn parse_cable_type<V: ParameterValue>(label: &str, value: &Value) -> DefinitionResult<CableType<V>> {
    let scope = Scope {
        kind: "cable type",
        label,
    };
    let mut cable_type = CableType::new();
    for (key, section) in scope.object(value, "cable type")? {
        match key.as_str() {
            "cable" => cable_type.cable = parse_cable(scope, section)?,
            "ions" => {
                for (name, ion) in scope.object(section, "ions")? {
                    cable_type.add_ion(name.as_str(), parse_ion(scope, ion)?)?;
                }
            }
            "mechanisms" => {
                for (id, params) in scope.object(section, "mechanisms")? {
                    let mech_id = MechId::parse(id)
                        .map_err(|_| scope.invalid(section, "mechanisms"))?;
                    let mechanism = Mechanism::new(parse_parameters(scope, "mechanism", params)?);
                    cable_type.add_mech(mech_id, mechanism)?;
                }
            }
            "synapses" => {
                for (syn_label, synapse) in scope.object(section, "synapses")? {
                    cable_type.add_synapse(syn_label.as_str(), parse_synapse(scope, syn_label, synapse)?)?;
                }
            }
            _ => return Err(scope.invalid(value, "cable type")),
        }
    }
    Ok(cable_type)
}

/// Parse a dict-literal definition with leaves of type `V`.
///
/// Unknown top-level keys are logged and ignored. The result does not use
/// defaults; callers set that flag.
pub fn parse_definition<V: ParameterValue>(value: &Value) -> DefinitionResult<Definition<V>> {
    let root = value.as_object().ok_or_else(|| {
        DefinitionError::ModelDefinition(format!("definition must be a dictionary, got {}", value))
    })?;

    let mut definition = Definition::new(false);
    for (key, section) in root {
        match key.as_str() {
            CABLE_TYPES_KEY => {
                let cable_types = section.as_object().ok_or_else(|| {
                    DefinitionError::ModelDefinition(format!("'{}' must be a dictionary", CABLE_TYPES_KEY))
                })?;
                for (label, cable_type) in cable_types {
                    definition.add_cable_type(label.as_str(), parse_cable_type(label, cable_type)?)?;
                }
            }
            SYNAPSE_TYPES_KEY => {
                let synapse_types = section.as_object().ok_or_else(|| {
                    DefinitionError::ModelDefinition(format!("'{}' must be a dictionary", SYNAPSE_TYPES_KEY))
                })?;
                for (label, synapse) in synapse_types {
                    let scope = Scope {
                        kind: "synapse type",
                        label,
                    };
                    definition.add_synapse_type(label.as_str(), parse_synapse(scope, label, synapse)?)?;
                }
            }
            other => {
                warn!(target: "arbora-definitions", "Ignoring unknown definition key '{}'", other);
            }
        }
    }

    info!(
        target: "arbora-definitions",
        "Parsed definition with {} cable types and {} synapse types",
        definition.len(),
        definition.synapse_types().len()
    );
    Ok(definition)
}

/// Build a model definition from a dict literal.
pub fn define_model(value: &Value, use_defaults: bool) -> DefinitionResult<ModelDefinition> {
    let mut model = parse_definition(value)?;
    model.set_use_defaults(use_defaults);
    Ok(model)
}

/// [`define_model`] from JSON text.
pub fn define_model_str(json: &str, use_defaults: bool) -> DefinitionResult<ModelDefinition> {
    let value: Value = serde_json::from_str(json)?;
    define_model(&value, use_defaults)
}

/// Copy `template` and merge the parsed dict literal over it.
///
/// The template is left untouched. The result uses defaults if either the
/// template or `use_defaults` asks for them.
pub fn define_model_from(
    template: &ModelDefinition,
    value: &Value,
    use_defaults: bool,
) -> DefinitionResult<ModelDefinition> {
    let update: ModelDefinition = parse_definition(value)?;
    let mut model = template.clone();
    model.merge(&update);
    model.set_use_defaults(template.use_defaults() || use_defaults);
    Ok(model)
}

/// Build a constraints definition, applying `tolerance` to every leaf.
pub fn define_constraints(
    value: &Value,
    tolerance: Option<f64>,
    use_defaults: bool,
) -> DefinitionResult<ConstraintsDefinition> {
    let mut constraints: ConstraintsDefinition = parse_definition(value)?;
    constraints.set_use_defaults(use_defaults);
    if tolerance.is_some() {
        constraints.set_tolerance(tolerance);
    }
    Ok(constraints)
}

/// [`define_constraints`] from JSON text.
pub fn define_constraints_str(
    json: &str,
    tolerance: Option<f64>,
    use_defaults: bool,
) -> DefinitionResult<ConstraintsDefinition> {
    let value: Value = serde_json::from_str(json)?;
    define_constraints(&value, tolerance, use_defaults)
}

pub fn define_model_with_config(
    value: &Value,
    config: &DefinitionsConfig,
) -> DefinitionResult<ModelDefinition> {
    define_model(value, config.use_defaults)
}

pub fn define_constraints_with_config(
    value: &Value,
    config: &DefinitionsConfig,
) -> DefinitionResult<Definition<Constraint>> {
    define_constraints(value, config.constraint_tolerance, config.use_defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_cable_type() {
        let model = define_model(
            &json!({
                "cable_types": {
                    "soma": {
                        "cable": {"Ra": 35.4, "cm": 1.0},
                        "ions": {"k": {"rev_pot": -77.0, "int_con": 54.4, "ext_con": 2.5}},
                        "mechanisms": {"pas": {"e": -70.0, "g": 0.001}, "Kv1:0": {"gbar": 0.1}},
                        "synapses": {"ExpSyn": {"tau": 2.0}}
                    }
                }
            }),
            false,
        )
        .unwrap();

        let soma = model.cable_type("soma").unwrap();
        assert_eq!(soma.cable.ra, Some(35.4));
        assert_eq!(soma.ions["k"].int_con, Some(54.4));
        assert_eq!(soma.mechs[&MechId::parse("pas").unwrap()].parameters["g"], 0.001);
        let kv = MechId::parse("Kv1:0").unwrap();
        assert_eq!(soma.mechs[&kv].parameters["gbar"], 0.1);
        assert_eq!(soma.synapses["ExpSyn"].mech_id, MechId::parse("ExpSyn").unwrap());
        assert!(!model.use_defaults());
    }

    #[test]
    fn test_cable_types_keep_dict_order() {
        let model = define_model_str(
            r#"{"cable_types": {"soma": {}, "axon": {}, "apical": {}}}"#,
            true,
        )
        .unwrap();
        assert_eq!(model.labels(), ["soma", "axon", "apical"]);
        assert!(model.use_defaults());
    }

    #[test]
    fn test_synapse_forms() {
        let model = define_model(
            &json!({
                "synapse_types": {
                    "short": {"tau": 1.0},
                    "bare": {"parameters": {"tau": 2.0}},
                    "expanded": {"mechanism": ["Exp2Syn", "fast"], "parameters": {"tau1": 0.2}},
                    "named": {"mechanism": "Exp2Syn"}
                }
            }),
            false,
        )
        .unwrap();
        let synapses = model.synapse_types();

        assert_eq!(synapses["short"].mech_id, MechId::parse("short").unwrap());
        assert_eq!(synapses["short"].parameters["tau"], 1.0);
        assert_eq!(synapses["bare"].mech_id, MechId::parse("bare").unwrap());
        assert_eq!(synapses["bare"].parameters["tau"], 2.0);
        assert_eq!(synapses["expanded"].mech_id, MechId::parse("Exp2Syn:fast").unwrap());
        assert_eq!(synapses["expanded"].parameters["tau1"], 0.2);
        assert!(synapses["named"].parameters.is_empty());
    }

    #[test]
    fn test_unknown_ion_key_names_label() {
        let err = define_model(
            &json!({"cable_types": {"soma": {"ions": {"na": {"reversal": 50.0}}}}}),
            false,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("cable type 'soma'"), "{}", message);
        assert!(message.contains("ion definition"), "{}", message);
    }

    #[test]
    fn test_invalid_shapes_fail() {
        for bad in [
            json!([1, 2]),
            json!({"cable_types": []}),
            json!({"cable_types": {"soma": {"cable": {"Ra": "high"}}}}),
            json!({"cable_types": {"soma": {"geometry": {}}}}),
            json!({"cable_types": {"soma": {"mechanisms": {"pas": 3.0}}}}),
            json!({"synapse_types": {"ampa": {"mechanism": 7}}}),
            json!({"synapse_types": {"ampa": {"mechanism": "AMPA", "weight": 1.0}}}),
            json!({"cable_types": {"soma": {"mechanisms": {"a:b:c:d": {}}}}}),
            json!({"cable_types": {"soma": {"mechanisms": {"pas:": {}}}}}),
            json!({"synapse_types": {"": {"tau": 1.0}}}),
        ] {
            assert!(
                matches!(define_model(&bad, false), Err(DefinitionError::ModelDefinition(_))),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_bad_mechanism_key_names_cable_type() {
        let err = define_model(
            &json!({"cable_types": {"soma": {"mechanisms": {"a:b:c:d": {"g": 1.0}}}}}),
            false,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, DefinitionError::ModelDefinition(_)));
        assert!(message.contains("cable type 'soma'"), "{}", message);
        assert!(message.contains("mechanisms definition"), "{}", message);
    }

    #[test]
    fn test_synapse_label_with_separator_is_split() {
        let model = define_model(&json!({"synapse_types": {"AMPA:fast": {"tau": 1.0}}}), false)
            .unwrap();
        let synapse = &model.synapse_types()["AMPA:fast"];
        assert_eq!(synapse.mech_id.parts(), ["AMPA", "fast"]);
    }

    #[test]
    fn test_short_synapse_prefers_parameters_entry() {
        let model = define_model(
            &json!({"synapse_types": {"gaba": {"parameters": {"tau": 4.0}, "note": "inhibitory"}}}),
            false,
        )
        .unwrap();
        let synapse = &model.synapse_types()["gaba"];
        assert_eq!(synapse.mech_id, MechId::parse("gaba").unwrap());
        assert_eq!(synapse.parameters.len(), 1);
        assert_eq!(synapse.parameters["tau"], 4.0);
    }

    #[test]
    fn test_unknown_top_level_key_is_ignored() {
        let model = define_model(&json!({"comment": "v2", "cable_types": {}}), false).unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn test_bad_json_text() {
        assert!(matches!(
            define_model_str("{not json", false),
            Err(DefinitionError::JsonError(_))
        ));
    }

    #[test]
    fn test_define_model_from_template() {
        let template = define_model(
            &json!({"cable_types": {"soma": {"cable": {"Ra": 10.0, "cm": 1.0}}}}),
            true,
        )
        .unwrap();
        let model = define_model_from(
            &template,
            &json!({"cable_types": {"soma": {"cable": {"cm": 2.0}}, "axon": {}}}),
            false,
        )
        .unwrap();

        assert!(model.use_defaults());
        assert_eq!(model.labels(), ["soma", "axon"]);
        let soma = model.cable_type("soma").unwrap();
        assert_eq!(soma.cable.ra, Some(10.0));
        assert_eq!(soma.cable.cm, Some(2.0));
        assert_eq!(template.cable_type("soma").unwrap().cable.cm, Some(1.0));
    }

    #[test]
    fn test_define_constraints() {
        let constraints = define_constraints(
            &json!({
                "cable_types": {
                    "soma": {
                        "cable": {"Ra": 10.0, "cm": [0.5, 2.0]},
                        "mechanisms": {"hh": {"gnabar": {"lower": 0.05, "upper": 0.125}}}
                    }
                }
            }),
            Some(0.1),
            false,
        )
        .unwrap();

        let soma = constraints.cable_type("soma").unwrap();
        let ra = soma.cable.ra.unwrap();
        assert!((ra.lower().unwrap() - 9.0).abs() < 1e-12);
        assert!((ra.upper().unwrap() - 9.0).abs() < 1e-12);
        assert_eq!(soma.cable.cm.unwrap().raw_bounds(), (Some(0.5), Some(2.0)));
        assert_eq!(
            soma.mechs[&MechId::parse("hh").unwrap()].parameters["gnabar"].tolerance(),
            Some(0.1)
        );
    }

    #[test]
    fn test_config_entry_points() {
        let config = DefinitionsConfig {
            use_defaults: true,
            constraint_tolerance: Some(0.2),
        };
        let value = json!({"cable_types": {"soma": {"cable": {"Ra": 5.0}}}});

        assert!(define_model_with_config(&value, &config).unwrap().use_defaults());
        let constraints = define_constraints_with_config(&value, &config).unwrap();
        assert_eq!(
            constraints.cable_type("soma").unwrap().cable.ra.unwrap().tolerance(),
            Some(0.2)
        );
    }
}
