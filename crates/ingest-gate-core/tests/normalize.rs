// crates/ingest-gate-core/tests/normalize.rs
// ============================================================================
// Module: Normalization Tests
// Description: Validate lenient and strict canonicalization of raw conditions.
// Purpose: Ensure stored sloppiness degrades safely and edits are checked.
// Dependencies: ingest-gate-core, serde_json
// ============================================================================

//! Canonicalization behavior tests for stored and operator-supplied conditions.

use std::collections::BTreeMap;

use ingest_gate_core::FieldConstraint;
use ingest_gate_core::FieldSpec;
use ingest_gate_core::FieldValue;
use ingest_gate_core::KillswitchDefinition;
use ingest_gate_core::NormalizeError;
use ingest_gate_core::RawCondition;
use ingest_gate_core::RawConfig;
use ingest_gate_core::runtime::normalizer::normalize_lenient;
use ingest_gate_core::runtime::normalizer::validate_user_input;
use serde_json::json;

fn pipeline_definition() -> KillswitchDefinition {
    KillswitchDefinition::new(
        "test.load-shed-projects",
        "Drop test payloads before processing.",
        vec![
            FieldSpec::new("project_id", "Numeric project ID."),
            FieldSpec::new("event_type", "Payload type."),
            FieldSpec::new("platform", "Payload platform."),
        ],
    )
}

#[test]
fn shorthand_expands_to_project_id_block() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![RawCondition::Shorthand(42)]);

    let canonical = normalize_lenient(&definition, &raw);
    if canonical.conditions().len() != 1 {
        return Err(format!("expected 1 condition, got {}", canonical.conditions().len()).into());
    }
    let condition = canonical.conditions().first().ok_or("missing condition")?;
    let expected = vec![
        FieldConstraint::bound("project_id", "42"),
        FieldConstraint::wildcard("event_type"),
        FieldConstraint::wildcard("platform"),
    ];
    if condition.entries() != expected.as_slice() {
        return Err(format!("unexpected entries: {:?}", condition.entries()).into());
    }
    Ok(())
}

#[test]
fn zero_shorthand_and_null_elements_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![
        RawCondition::Shorthand(0),
        RawCondition::Empty,
        RawCondition::Block(BTreeMap::new()),
    ]);

    let canonical = normalize_lenient(&definition, &raw);
    if !canonical.is_disabled() {
        return Err(format!("expected disabled, got {:?}", canonical.conditions()).into());
    }
    Ok(())
}

#[test]
fn lenient_fills_missing_fields_as_wildcards() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![RawCondition::block([
        ("project_id", FieldValue::from("42")),
    ])]);

    let canonical = normalize_lenient(&definition, &raw);
    let condition = canonical.conditions().first().ok_or("missing condition")?;
    let expected = vec![
        FieldConstraint::bound("project_id", "42"),
        FieldConstraint::wildcard("event_type"),
        FieldConstraint::wildcard("platform"),
    ];
    if condition.entries() != expected.as_slice() {
        return Err(format!("unexpected entries: {:?}", condition.entries()).into());
    }
    Ok(())
}

#[test]
fn lenient_drops_unknown_fields_then_empty_block() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![
        RawCondition::block([("consumer_group", FieldValue::from("ingest"))]),
        RawCondition::block([("project_id", FieldValue::from("7"))]),
    ]);

    let canonical = normalize_lenient(&definition, &raw);
    if canonical.conditions().len() != 1 {
        return Err(format!(
            "expected only the declared-field block to survive, got {:?}",
            canonical.conditions()
        )
        .into());
    }
    let condition = canonical.conditions().first().ok_or("missing condition")?;
    if condition.constraint("project_id") != Some(&Some("7".to_string())) {
        return Err(format!("unexpected entries: {:?}", condition.entries()).into());
    }
    Ok(())
}

#[test]
fn values_coerce_to_matching_strings() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![RawCondition::block([
        ("project_id", FieldValue::Int(42)),
        ("event_type", FieldValue::Bool(true)),
        ("platform", FieldValue::from("python")),
    ])]);

    let canonical = normalize_lenient(&definition, &raw);
    let condition = canonical.conditions().first().ok_or("missing condition")?;
    let expected = vec![
        FieldConstraint::bound("project_id", "42"),
        FieldConstraint::bound("event_type", "true"),
        FieldConstraint::bound("platform", "python"),
    ];
    if condition.entries() != expected.as_slice() {
        return Err(format!("unexpected entries: {:?}", condition.entries()).into());
    }
    Ok(())
}

#[test]
fn all_wildcard_block_is_dropped() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![RawCondition::block([
        ("project_id", FieldValue::Null),
        ("event_type", FieldValue::Null),
        ("platform", FieldValue::Null),
    ])]);

    let canonical = normalize_lenient(&definition, &raw);
    if !canonical.is_disabled() {
        return Err(format!("expected disabled, got {:?}", canonical.conditions()).into());
    }
    Ok(())
}

#[test]
fn declaration_order_overrides_mapping_order() -> Result<(), Box<dyn std::error::Error>> {
    let definition = KillswitchDefinition::new(
        "test.ordered",
        "Field order check.",
        vec![
            FieldSpec::new("organization_id", "Numeric organization ID."),
            FieldSpec::new("project_id", "Numeric project ID."),
        ],
    );
    let raw = RawConfig::new(vec![RawCondition::block([
        ("project_id", FieldValue::from("2")),
        ("organization_id", FieldValue::from("1")),
    ])]);

    let canonical = normalize_lenient(&definition, &raw);
    let condition = canonical.conditions().first().ok_or("missing condition")?;
    let fields: Vec<&str> = condition.entries().iter().map(|entry| entry.field.as_str()).collect();
    if fields != ["organization_id", "project_id"] {
        return Err(format!("unexpected field order: {fields:?}").into());
    }
    Ok(())
}

#[test]
fn strict_reports_missing_field_before_unknown() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![RawCondition::block([
        ("project_id", FieldValue::from("42")),
        ("platform", FieldValue::from("python")),
        ("consumer_group", FieldValue::from("ingest")),
    ])]);

    match validate_user_input(&definition, &raw) {
        Err(NormalizeError::MissingField(field)) => {
            if field != "event_type" {
                return Err(format!("expected missing event_type, got {field}").into());
            }
        }
        other => {
            return Err(format!("expected missing-field error, got {other:?}").into());
        }
    }
    Ok(())
}

#[test]
fn strict_rejects_unknown_field() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![RawCondition::block([
        ("project_id", FieldValue::from("42")),
        ("event_type", FieldValue::Null),
        ("platform", FieldValue::Null),
        ("consumer_group", FieldValue::from("ingest")),
    ])]);

    match validate_user_input(&definition, &raw) {
        Err(NormalizeError::UnknownField(field)) => {
            if field != "consumer_group" {
                return Err(format!("expected unknown consumer_group, got {field}").into());
            }
        }
        other => {
            return Err(format!("expected unknown-field error, got {other:?}").into());
        }
    }
    Ok(())
}

#[test]
fn strict_accepts_shorthand_and_empty_elements() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![
        RawCondition::Shorthand(42),
        RawCondition::Empty,
        RawCondition::Block(BTreeMap::new()),
    ]);

    let canonical = validate_user_input(&definition, &raw)?;
    if canonical.conditions().len() != 1 {
        return Err(format!("expected 1 condition, got {}", canonical.conditions().len()).into());
    }
    Ok(())
}

#[test]
fn stored_json_parses_into_raw_shapes() -> Result<(), Box<dyn std::error::Error>> {
    let raw: RawConfig = serde_json::from_value(json!([
        42,
        {"project_id": "1", "event_type": null, "platform": true},
        null
    ]))?;

    let conditions = raw.conditions();
    if !matches!(conditions.first(), Some(RawCondition::Shorthand(42))) {
        return Err(format!("expected shorthand first, got {:?}", conditions.first()).into());
    }
    if !matches!(conditions.get(1), Some(RawCondition::Block(_))) {
        return Err(format!("expected block second, got {:?}", conditions.get(1)).into());
    }
    if !matches!(conditions.get(2), Some(RawCondition::Empty)) {
        return Err(format!("expected null third, got {:?}", conditions.get(2)).into());
    }
    Ok(())
}

#[test]
fn out_of_domain_scalars_fail_to_parse() -> Result<(), Box<dyn std::error::Error>> {
    if serde_json::from_value::<RawConfig>(json!(["bare-string"])).is_ok() {
        return Err("bare string condition should not parse".into());
    }
    if serde_json::from_value::<RawConfig>(json!([{"project_id": 1.5}])).is_ok() {
        return Err("float field value should not parse".into());
    }
    Ok(())
}

#[test]
fn round_trip_through_raw_is_stable() -> Result<(), Box<dyn std::error::Error>> {
    let definition = pipeline_definition();
    let raw = RawConfig::new(vec![
        RawCondition::Shorthand(42),
        RawCondition::block([
            ("project_id", FieldValue::Int(7)),
            ("event_type", FieldValue::from("transaction")),
        ]),
    ]);

    let canonical = normalize_lenient(&definition, &raw);
    let round_tripped = normalize_lenient(&definition, &canonical.to_raw());
    if round_tripped != canonical {
        return Err(format!("round trip changed the value: {round_tripped:?}").into());
    }
    Ok(())
}
