// crates/ingest-gate-core/src/runtime/matcher.rs
// ============================================================================
// Module: Condition Matcher
// Description: Hot-path evaluation of canonical conditions against contexts.
// Purpose: Decide whether a payload should be dropped, cheaply and totally.
// Dependencies: none beyond the core model
// ============================================================================

//! ## Overview
//! Matching is an OR over condition blocks and an AND over the constraints
//! inside each block. A wildcard constraint is satisfied by anything,
//! including an absent or null context value; a concrete constraint requires
//! the context value to coerce to the identical string. The entry point
//! normalizes leniently first, so call sites can hand over the stored raw
//! value without a separate canonicalization step.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::condition::CanonicalCondition;
use crate::core::condition::FieldConstraint;
use crate::core::condition::RawConfig;
use crate::core::context::KillswitchContext;
use crate::core::registry::KillswitchDefinition;

// ============================================================================
// SECTION: Matching
// ============================================================================

/// Returns whether any configured condition matches the context.
///
/// A disabled configuration (no surviving conditions) never matches.
#[must_use]
pub fn value_matches(
    definition: &KillswitchDefinition,
    raw: &RawConfig,
    context: &KillswitchContext,
) -> bool {
    let canonical = crate::runtime::normalizer::normalize_lenient(definition, raw);
    canonical
        .conditions()
        .iter()
        .any(|condition| condition_matches(condition, context))
}

/// Returns whether every constraint in one block is satisfied.
fn condition_matches(condition: &CanonicalCondition, context: &KillswitchContext) -> bool {
    condition
        .entries()
        .iter()
        .all(|constraint| constraint_matches(constraint, context))
}

/// Returns whether one field constraint is satisfied by the context.
fn constraint_matches(constraint: &FieldConstraint, context: &KillswitchContext) -> bool {
    let Some(expected) = constraint.value.as_deref() else {
        return true;
    };
    let Some(actual) = context.get(&constraint.field) else {
        return false;
    };
    actual.to_match_string().as_deref() == Some(expected)
}
