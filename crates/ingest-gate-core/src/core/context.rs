// crates/ingest-gate-core/src/core/context.rs
// ============================================================================
// Module: Evaluation Context
// Description: Per-call context values handed to the matcher.
// Purpose: Carry hot-path field values under the declared killswitch schema.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Call sites evaluate a killswitch against a context: one value per declared
//! field, keyed by field name. A context value of [`FieldValue::Null`] means
//! the caller genuinely does not know the value; it satisfies wildcards but
//! never satisfies a concrete constraint.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::condition::FieldValue;

// ============================================================================
// SECTION: Context
// ============================================================================

/// Field values supplied by a call site for one evaluation.
///
/// # Invariants
/// - Serialized transparently as a plain field-to-value mapping.
/// - The gate rejects contexts whose key set differs from the declared
///   field set of the evaluated killswitch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KillswitchContext(BTreeMap<String, FieldValue>);

impl KillswitchContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, replacing any previous value for the field.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }

    /// Returns the value for a field, if the caller supplied one.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Returns the supplied field names in lexicographic order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of supplied fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the context carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, FieldValue>> for KillswitchContext {
    fn from(fields: BTreeMap<String, FieldValue>) -> Self {
        Self(fields)
    }
}

impl<K> FromIterator<(K, FieldValue)> for KillswitchContext
where
    K: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldValue)>,
    {
        Self(iter.into_iter().map(|(field, value)| (field.into(), value)).collect())
    }
}
