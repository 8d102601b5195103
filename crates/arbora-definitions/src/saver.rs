// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Dict-literal definition saver.

Serializes a [`Definition`] back into the shape read by [`crate::parser`].
Only present values are written; synapses use the expanded form.
*/

use serde_json::{json, Map, Value};

use crate::cable_type::CableType;
use crate::definition::Definition;
use crate::parameter::{CableProperty, IonProperty};
use crate::records::Synapse;
use crate::types::DefinitionResult;
use crate::value::ParameterValue;

fn parameters_to_json<'a, V, I>(parameters: I) -> Value
where
    V: ParameterValue,
    I: IntoIterator<Item = (&'a String, &'a V)>,
{
    let map: Map<String, Value> = parameters
        .into_iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();
    Value::Object(map)
}

fn synapse_to_json<V: ParameterValue>(synapse: &Synapse<V>) -> Value {
    json!({
        "mechanism": synapse.mech_id.to_json(),
        "parameters": parameters_to_json(&synapse.parameters),
    })
}

fn cable_type_to_json<V: ParameterValue>(cable_type: &CableType<V>) -> Value {
    let mut section = Map::new();

    let cable: Map<String, Value> = CableProperty::ALL
        .into_iter()
        .filter_map(|property| {
            cable_type
                .cable
                .get(property)
                .map(|value| (property.name().to_string(), value.to_json()))
        })
        .collect();
    if !cable.is_empty() {
        section.insert("cable".to_string(), Value::Object(cable));
    }

    if !cable_type.ions.is_empty() {
        let ions: Map<String, Value> = cable_type
            .ions
            .iter()
            .map(|(name, ion)| {
                let fields: Map<String, Value> = IonProperty::ALL
                    .into_iter()
                    .filter_map(|property| {
                        ion.get(property)
                            .map(|value| (property.name().to_string(), value.to_json()))
                    })
                    .collect();
                (name.clone(), Value::Object(fields))
            })
            .collect();
        section.insert("ions".to_string(), Value::Object(ions));
    }

    if !cable_type.mechs.is_empty() {
        let mechs: Map<String, Value> = cable_type
            .mechs
            .iter()
            .map(|(id, mech)| (id.to_string(), parameters_to_json(&mech.parameters)))
            .collect();
        section.insert("mechanisms".to_string(), Value::Object(mechs));
    }

    if !cable_type.synapses.is_empty() {
        let synapses: Map<String, Value> = cable_type
            .synapses
            .iter()
            .map(|(label, synapse)| (label.clone(), synapse_to_json(synapse)))
            .collect();
        section.insert("synapses".to_string(), Value::Object(synapses));
    }

    Value::Object(section)
}

/// Dict-literal form of `definition`, cable types in registration order.
pub fn save_definition_to_json<V: ParameterValue>(definition: &Definition<V>) -> Value {
    let cable_types: Map<String, Value> = definition
        .get_cable_types()
        .iter()
        .map(|(label, cable_type)| (label.clone(), cable_type_to_json(cable_type)))
        .collect();
    let synapse_types: Map<String, Value> = definition
        .synapse_types()
        .iter()
        .map(|(label, synapse)| (label.clone(), synapse_to_json(synapse)))
        .collect();

    json!({
        "cable_types": cable_types,
        "synapse_types": synapse_types,
    })
}

/// Pretty-printed JSON text of `definition`.
pub fn save_definition_to_string<V: ParameterValue>(definition: &Definition<V>) -> DefinitionResult<String> {
    Ok(serde_json::to_string_pretty(&save_definition_to_json(definition))?)
}
