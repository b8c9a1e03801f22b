// crates/ingest-gate-core/src/core/condition.rs
// ============================================================================
// Module: Killswitch Condition Model
// Description: Raw and canonical condition shapes for killswitch configuration.
// Purpose: Provide typed configuration values with a single string-coercion point.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Killswitch configuration arrives as a loosely-typed sequence: legacy
//! integer shorthand, field-to-value mapping blocks, or explicit nulls. The
//! raw shapes here decide that variant once at deserialization; normalization
//! (see [`crate::runtime::normalizer`]) converts them into canonical
//! conditions that cover the full declared field set. All string coercion for
//! matching and display funnels through [`FieldValue::to_match_string`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Field Values
// ============================================================================

/// Scalar value carried by raw condition blocks and runtime contexts.
///
/// # Invariants
/// - [`FieldValue::to_match_string`] is the single coercion point: integers
///   render as decimal digits and booleans render lowercase.
/// - There is no float variant; fractional scalars are rejected at the
///   deserialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null: a wildcard in raw blocks, an absent value in contexts.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Text scalar.
    Text(String),
}

impl FieldValue {
    /// Renders the canonical matching string for this value.
    ///
    /// Returns `None` for [`FieldValue::Null`]: on the configuration side a
    /// null is a wildcard, on the context side it is an absent value.
    #[must_use]
    pub fn to_match_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::Text(value) => Some(value.clone()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// SECTION: Raw Configuration
// ============================================================================

/// One raw configuration element before canonicalization.
///
/// # Invariants
/// - The variant is decided once at deserialization; elements outside the
///   configuration domain (e.g. bare strings) are rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCondition {
    /// Legacy integer shorthand constraining `project_id` only.
    Shorthand(i64),
    /// Field-to-value mapping block.
    Block(BTreeMap<String, FieldValue>),
    /// Explicit null element; contributes nothing during normalization.
    Empty,
}

impl RawCondition {
    /// Builds a mapping block from field/value pairs.
    #[must_use]
    pub fn block<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        Self::Block(entries.into_iter().map(|(field, value)| (field.into(), value)).collect())
    }
}

/// Raw killswitch configuration as held by the option store.
///
/// # Invariants
/// - Serializes transparently as a plain sequence of conditions.
/// - An empty sequence means the killswitch is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig(Vec<RawCondition>);

impl RawConfig {
    /// Creates a raw configuration from a sequence of conditions.
    #[must_use]
    pub fn new(conditions: Vec<RawCondition>) -> Self {
        Self(conditions)
    }

    /// Returns the conditions in input order.
    #[must_use]
    pub fn conditions(&self) -> &[RawCondition] {
        &self.0
    }

    /// Returns whether the configuration holds no conditions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RawCondition>> for RawConfig {
    fn from(conditions: Vec<RawCondition>) -> Self {
        Self::new(conditions)
    }
}

// ============================================================================
// SECTION: Canonical Configuration
// ============================================================================

/// One fully-specified field constraint within a canonical condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConstraint {
    /// Declared field name.
    pub field: String,
    /// Matching string, or `None` for a wildcard.
    pub value: Option<String>,
}

impl FieldConstraint {
    /// Creates a constraint binding a field to a matching string.
    #[must_use]
    pub fn bound(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: Some(value.into()),
        }
    }

    /// Creates a wildcard constraint for a field.
    #[must_use]
    pub fn wildcard(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: None,
        }
    }
}

/// Canonical condition block covering the full declared field set.
///
/// # Invariants
/// - Entries cover exactly the definition's field set in declaration order.
/// - At least one entry is non-wildcard; all-wildcard blocks are dropped
///   during normalization and never reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCondition {
    /// Constraints in field declaration order.
    entries: Vec<FieldConstraint>,
}

impl CanonicalCondition {
    /// Wraps constraint entries produced by normalization.
    pub(crate) fn from_entries(entries: Vec<FieldConstraint>) -> Self {
        Self {
            entries,
        }
    }

    /// Returns the constraints in field declaration order.
    #[must_use]
    pub fn entries(&self) -> &[FieldConstraint] {
        &self.entries
    }

    /// Returns the constraint value for a field, if the field is present.
    #[must_use]
    pub fn constraint(&self, field: &str) -> Option<&Option<String>> {
        self.entries.iter().find(|entry| entry.field == field).map(|entry| &entry.value)
    }

    /// Returns whether any field carries a non-wildcard constraint.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        self.entries.iter().any(|entry| entry.value.is_some())
    }
}

/// Canonical killswitch configuration.
///
/// # Invariants
/// - Conditions preserve the surviving input order; order affects display
///   only, matching is a pure OR.
/// - Empty means the killswitch is disabled and never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalConfig {
    /// Canonical conditions in surviving input order.
    conditions: Vec<CanonicalCondition>,
}

impl CanonicalConfig {
    /// Wraps canonical conditions produced by normalization.
    pub(crate) fn from_conditions(conditions: Vec<CanonicalCondition>) -> Self {
        Self {
            conditions,
        }
    }

    /// Returns the canonical conditions in order.
    #[must_use]
    pub fn conditions(&self) -> &[CanonicalCondition] {
        &self.conditions
    }

    /// Returns whether the killswitch is disabled (no conditions).
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Converts back to the raw storage shape.
    ///
    /// Constrained values become text scalars and wildcards become explicit
    /// nulls, so re-reading the stored value canonicalizes to the same
    /// configuration.
    #[must_use]
    pub fn to_raw(&self) -> RawConfig {
        let conditions = self
            .conditions
            .iter()
            .map(|condition| {
                let fields = condition
                    .entries()
                    .iter()
                    .map(|entry| {
                        let value = entry
                            .value
                            .as_ref()
                            .map_or(FieldValue::Null, |value| FieldValue::Text(value.clone()));
                        (entry.field.clone(), value)
                    })
                    .collect();
                RawCondition::Block(fields)
            })
            .collect();
        RawConfig::new(conditions)
    }
}
