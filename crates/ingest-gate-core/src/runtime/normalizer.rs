// crates/ingest-gate-core/src/runtime/normalizer.rs
// ============================================================================
// Module: Condition Normalizer
// Description: Canonicalization of raw killswitch configuration.
// Purpose: Convert loosely-typed stored conditions into full-field-set blocks.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Raw configuration reaches the crate from two directions with different
//! trust levels. [`normalize_lenient`] is total and serves the hot path:
//! legacy integer shorthand expands to a `project_id` constraint, missing
//! declared fields fill in as wildcards, unknown fields are discarded, and
//! blocks left without a single concrete constraint are dropped so a sloppy
//! stored value can never become match-everything. [`validate_user_input`]
//! guards the editing path: it rejects blocks that omit a declared field or
//! set an undeclared one, then defers to the lenient pass for the canonical
//! result. Both passes emit fields in declaration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::condition::CanonicalCondition;
use crate::core::condition::CanonicalConfig;
use crate::core::condition::FieldConstraint;
use crate::core::condition::FieldValue;
use crate::core::condition::RawCondition;
use crate::core::condition::RawConfig;
use crate::core::registry::KillswitchDefinition;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field constrained by the legacy integer shorthand.
const SHORTHAND_FIELD: &str = "project_id";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by strict validation of operator-supplied conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// A condition block omits a declared field.
    #[error("condition block is missing declared field: {0}")]
    MissingField(String),
    /// A condition block sets a field the killswitch does not declare.
    #[error("condition block sets unknown field: {0}")]
    UnknownField(String),
}

// ============================================================================
// SECTION: Lenient Normalization
// ============================================================================

/// Canonicalizes stored configuration, repairing whatever it can.
///
/// This pass never fails: malformed elements degrade toward matching *less*,
/// not more. Empty blocks, explicit nulls, the zero shorthand, and blocks
/// whose every surviving field is a wildcard all disappear from the result.
#[must_use]
pub fn normalize_lenient(definition: &KillswitchDefinition, raw: &RawConfig) -> CanonicalConfig {
    let conditions = raw
        .conditions()
        .iter()
        .filter_map(|condition| canonicalize_condition(definition, condition))
        .collect();
    CanonicalConfig::from_conditions(conditions)
}

/// Canonicalizes one raw condition, or drops it.
fn canonicalize_condition(
    definition: &KillswitchDefinition,
    condition: &RawCondition,
) -> Option<CanonicalCondition> {
    let canonical = match condition {
        RawCondition::Empty | RawCondition::Shorthand(0) => return None,
        RawCondition::Shorthand(project_id) => shorthand_condition(definition, *project_id),
        RawCondition::Block(fields) if fields.is_empty() => return None,
        RawCondition::Block(fields) => block_condition(definition, fields),
    };
    canonical.is_constrained().then_some(canonical)
}

/// Expands the integer shorthand into a full-field-set condition.
fn shorthand_condition(definition: &KillswitchDefinition, project_id: i64) -> CanonicalCondition {
    let entries = definition
        .fields
        .iter()
        .map(|spec| {
            let value = (spec.name == SHORTHAND_FIELD).then(|| project_id.to_string());
            FieldConstraint {
                field: spec.name.clone(),
                value,
            }
        })
        .collect();
    CanonicalCondition::from_entries(entries)
}

/// Canonicalizes a mapping block against the declared field set.
fn block_condition(
    definition: &KillswitchDefinition,
    fields: &BTreeMap<String, FieldValue>,
) -> CanonicalCondition {
    let entries = definition
        .fields
        .iter()
        .map(|spec| {
            let value = fields.get(&spec.name).and_then(FieldValue::to_match_string);
            FieldConstraint {
                field: spec.name.clone(),
                value,
            }
        })
        .collect();
    CanonicalCondition::from_entries(entries)
}

// ============================================================================
// SECTION: Strict Validation
// ============================================================================

/// Canonicalizes operator-supplied configuration, rejecting schema drift.
///
/// Non-empty mapping blocks must cover the declared field set exactly;
/// missing fields are reported before unknown ones, block by block in input
/// order. Integer shorthand and empty elements pass through unchecked, then
/// the lenient pass produces the canonical result.
///
/// # Errors
/// Returns a [`NormalizeError`] naming the first offending field.
pub fn validate_user_input(
    definition: &KillswitchDefinition,
    raw: &RawConfig,
) -> Result<CanonicalConfig, NormalizeError> {
    for condition in raw.conditions() {
        if let RawCondition::Block(fields) = condition {
            if fields.is_empty() {
                continue;
            }
            check_block(definition, fields)?;
        }
    }
    Ok(normalize_lenient(definition, raw))
}

/// Checks one block for missing, then unknown, fields.
fn check_block(
    definition: &KillswitchDefinition,
    fields: &BTreeMap<String, FieldValue>,
) -> Result<(), NormalizeError> {
    for spec in &definition.fields {
        if !fields.contains_key(&spec.name) {
            return Err(NormalizeError::MissingField(spec.name.clone()));
        }
    }
    for field in fields.keys() {
        if !definition.declares_field(field) {
            return Err(NormalizeError::UnknownField(field.clone()));
        }
    }
    Ok(())
}
