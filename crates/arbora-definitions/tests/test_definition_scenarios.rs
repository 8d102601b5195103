// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Integration tests for dict-literal definitions and cable type resolution.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use arbora_definitions::{
    define_constraints, define_model, save_definition_to_json, CableProperties, CableType,
    IonProperty, MechId, ModelDefinition, Parameter, Record,
};
use proptest::prelude::*;
use serde_json::json;

fn pyramidal() -> serde_json::Value {
    json!({
        "cable_types": {
            "soma": {
                "cable": {"Ra": 35.4, "cm": 1.0},
                "ions": {"na": {"rev_pot": 55.0, "int_con": 12.0, "ext_con": 145.0}},
                "mechanisms": {"pas": {"e": -70.0, "g": 0.0001}, "hh": {"gnabar": 0.12}}
            },
            "apical": {
                "cable": {"Ra": 100.0, "cm": 2.0},
                "synapses": {"ExpSyn": {"tau": 2.0}}
            }
        },
        "synapse_types": {
            "ExpSyn": {"tau": 5.0, "e": 0.0},
            "ampa": {"mechanism": "Exp2Syn", "parameters": {"tau1": 0.2, "tau2": 1.7}}
        }
    })
}

#[test]
fn test_dict_literal_round_trip_keeps_explicit_scalars() {
    let model = define_model(&pyramidal(), false).expect("valid definition");
    let saved = save_definition_to_json(&model);
    let reparsed = define_model(&saved, false).expect("saved definition parses");

    assert_eq!(reparsed, model);
    assert_eq!(saved["cable_types"]["soma"]["ions"]["na"]["int_con"], json!(12.0));
    assert_eq!(saved["cable_types"]["soma"]["mechanisms"]["hh"]["gnabar"], json!(0.12));
    assert_eq!(saved["cable_types"]["apical"]["cable"]["cm"], json!(2.0));
    assert_eq!(saved["synapse_types"]["ampa"]["parameters"]["tau2"], json!(1.7));
}

#[test]
fn test_qualified_synapse_label_survives_round_trip() {
    let model = define_model(&json!({"synapse_types": {"AMPA:fast": {"tau": 1.0}}}), false).unwrap();
    let saved = save_definition_to_json(&model);
    let reparsed = define_model(&saved, false).expect("saved definition parses");

    assert_eq!(reparsed, model);
    assert_eq!(
        reparsed.synapse_types()["AMPA:fast"].mech_id,
        MechId::new(["AMPA", "fast"]).unwrap()
    );
}

#[test]
fn test_label_synapse_overrides_model_synapse() {
    let model = define_model(&pyramidal(), false).unwrap();
    let apical = model.resolve(&["apical"]);

    let exp_syn = &apical.synapses["ExpSyn"];
    assert_eq!(exp_syn.parameters["tau"], 2.0);
    assert_eq!(exp_syn.parameters["e"], 0.0);
    assert_eq!(apical.synapses["ampa"].mech_id, MechId::parse("Exp2Syn").unwrap());
}

#[test]
fn test_defaults_backfill_sodium() {
    let model = define_model(
        &json!({"cable_types": {"dend": {"cable": {"Ra": 100.0, "cm": 1.0}}}}),
        true,
    )
    .unwrap();

    let dend = model.resolve(&["dend"]);
    let na = &dend.ions["na"];
    assert_eq!((na.rev_pot, na.int_con, na.ext_con), (Some(50.0), Some(10.0), Some(140.0)));
    assert_eq!(dend.ions.len(), 4);
    assert!(dend.validate().is_ok());
}

#[test]
fn test_defaults_under_constraints() {
    let constraints = define_constraints(
        &json!({"cable_types": {"soma": {"cable": {"Ra": 10.0, "cm": 1.0}}}}),
        Some(0.1),
        true,
    )
    .unwrap();

    let soma = constraints.resolve(&["soma"]);
    let ra = soma.cable.ra.unwrap();
    assert!((ra.lower().unwrap() - 9.0).abs() < 1e-9);
    assert!((ra.upper().unwrap() - 9.0).abs() < 1e-9);
    // Defaults carry no tolerance
    let ext_con = soma.ions["na"].ext_con.unwrap();
    assert_eq!(ext_con.tolerance(), None);
    assert_eq!(ext_con.lower(), Some(140.0));
}

#[test]
fn test_set_param_then_resolve() {
    let mut model = define_model(&pyramidal(), false).unwrap();
    model
        .set_param("apical", &Parameter::ion("k", IonProperty::ExtCon, 3.0))
        .unwrap();

    let apical = model.resolve(&["soma", "apical"]);
    assert_eq!(apical.ions["k"].ext_con, Some(3.0));
    assert_eq!(apical.cable.ra, Some(100.0));
    assert!(apical.mechs.contains_key(&MechId::parse("pas").unwrap()));
}

fn cable_strategy() -> impl Strategy<Value = CableProperties> {
    (
        proptest::option::of(1.0f64..500.0),
        proptest::option::of(0.1f64..5.0),
    )
        .prop_map(|(ra, cm)| CableProperties { ra, cm })
}

fn cable_type_strategy() -> impl Strategy<Value = CableType> {
    (
        cable_strategy(),
        proptest::collection::btree_map("[a-z]{1,4}", -100.0f64..100.0, 0..4),
    )
        .prop_map(|(cable, params)| {
            let mut cable_type = CableType::new();
            cable_type.cable = cable;
            for (name, value) in params {
                cable_type.set(&Parameter::mechanism(MechId::parse("mech").unwrap(), name, value));
            }
            cable_type
        })
}

proptest! {
    #[test]
    fn prop_merge_is_non_destructive(a in cable_type_strategy(), b in cable_type_strategy()) {
        let b_before = b.clone();
        let mut merged = a.clone();
        merged.merge_from(&b);

        prop_assert_eq!(&b, &b_before);
        prop_assert_eq!(merged.cable.ra, b.cable.ra.or(a.cable.ra));
        prop_assert_eq!(merged.cable.cm, b.cable.cm.or(a.cable.cm));
    }

    #[test]
    fn prop_last_registered_wins(ras in proptest::collection::vec(1.0f64..500.0, 1..6), seed in any::<u64>()) {
        let mut model = ModelDefinition::new(false);
        let mut labels = Vec::new();
        for (index, ra) in ras.iter().enumerate() {
            let label = format!("label{}", index);
            let mut cable_type = CableType::new();
            cable_type.cable.ra = Some(*ra);
            model.add_cable_type(label.as_str(), cable_type).unwrap();
            labels.push(label);
        }
        let rotation = (seed as usize) % labels.len();
        labels.rotate_left(rotation);

        let resolved = model.resolve(&labels);
        prop_assert_eq!(resolved.cable.ra, ras.last().copied());
    }
}
