// crates/ingest-gate-core/src/runtime/mutation.rs
// ============================================================================
// Module: Configuration Mutation
// Description: Programmatic add/remove of single condition blocks.
// Purpose: Let automation adjust conditions without hand-editing templates.
// Dependencies: none beyond the core model
// ============================================================================

//! ## Overview
//! Automation (incident tooling, scheduled load-shed jobs) edits killswitch
//! configuration one block at a time. Both helpers are pure: they take the
//! current raw value and return the canonical result of the edit, leaving
//! persistence to the caller. Removal compares canonicalized blocks, so the
//! supplied block matches regardless of shorthand form, field order, or
//! scalar spelling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::condition::CanonicalConfig;
use crate::core::condition::RawCondition;
use crate::core::condition::RawConfig;
use crate::core::registry::KillswitchDefinition;
use crate::runtime::normalizer::normalize_lenient;

// ============================================================================
// SECTION: Mutation
// ============================================================================

/// Appends one condition block to the current configuration.
///
/// The block lands at the end of the sequence and the whole result is
/// canonicalized leniently, so a block that normalizes to nothing (an empty
/// mapping, the zero shorthand) leaves the configuration unchanged.
#[must_use]
pub fn add_condition(
    definition: &KillswitchDefinition,
    current: &RawConfig,
    block: &RawCondition,
) -> CanonicalConfig {
    let mut conditions = current.conditions().to_vec();
    conditions.push(block.clone());
    normalize_lenient(definition, &RawConfig::new(conditions))
}

/// Removes every occurrence of one condition block from the configuration.
///
/// The supplied block is canonicalized first and compared field for field
/// against each canonical current block. A block that normalizes to nothing
/// removes nothing.
#[must_use]
pub fn remove_condition(
    definition: &KillswitchDefinition,
    current: &RawConfig,
    block: &RawCondition,
) -> CanonicalConfig {
    let current = normalize_lenient(definition, current);
    let targets = normalize_lenient(definition, &RawConfig::new(vec![block.clone()]));
    let Some(target) = targets.conditions().first() else {
        return current;
    };
    let conditions = current
        .conditions()
        .iter()
        .filter(|condition| *condition != target)
        .cloned()
        .collect();
    CanonicalConfig::from_conditions(conditions)
}
