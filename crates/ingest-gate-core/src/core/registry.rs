// crates/ingest-gate-core/src/core/registry.rs
// ============================================================================
// Module: Killswitch Schema Registry
// Description: Killswitch definitions and the registry that owns them.
// Purpose: Make the declared field set of every killswitch explicit and queryable.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every killswitch declares its name, an operator-facing description, and an
//! ordered set of context fields that conditions may constrain. The registry
//! validates definitions once at construction so the rest of the crate can
//! trust the schema: non-empty field sets, no duplicate fields, no duplicate
//! names. Field declaration order is significant; it drives rendering in the
//! faux-SQL summary and the edit template.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Unique name of a killswitch.
///
/// # Invariants
/// - Serialized transparently as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KillswitchName(String);

impl KillswitchName {
    /// Creates a new killswitch name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KillswitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KillswitchName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for KillswitchName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// SECTION: Definitions
// ============================================================================

/// One context field a killswitch's conditions may constrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Declared field name.
    pub name: String,
    /// Operator-facing documentation shown in the edit template.
    pub description: String,
}

impl FieldSpec {
    /// Creates a new field specification.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Declared schema of a single killswitch.
///
/// # Invariants
/// - `fields` is non-empty and free of duplicate names once the definition
///   has been accepted by [`KillswitchRegistry::new`].
/// - Field order is declaration order and is preserved by rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillswitchDefinition {
    /// Unique killswitch name.
    pub name: KillswitchName,
    /// Human description shown in listings and edit templates.
    pub description: String,
    /// Context fields in declaration order.
    pub fields: Vec<FieldSpec>,
}

impl KillswitchDefinition {
    /// Creates a new killswitch definition.
    #[must_use]
    pub fn new(
        name: impl Into<KillswitchName>,
        description: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields,
        }
    }

    /// Returns the declared field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Returns whether the definition declares the given field.
    #[must_use]
    pub fn declares_field(&self, field: &str) -> bool {
        self.fields.iter().any(|spec| spec.name == field)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building or querying the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The requested killswitch is not registered.
    #[error("unknown killswitch: {0}")]
    UnknownKillswitch(KillswitchName),
    /// Two definitions share the same name.
    #[error("duplicate killswitch definition: {0}")]
    DuplicateKillswitch(KillswitchName),
    /// A definition declares the same field twice.
    #[error("killswitch {killswitch} declares duplicate field: {field}")]
    DuplicateField {
        /// Killswitch carrying the duplicate.
        killswitch: KillswitchName,
        /// Field name declared more than once.
        field: String,
    },
    /// A definition declares no fields at all.
    #[error("killswitch {0} declares no fields")]
    EmptyFieldSet(KillswitchName),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry of killswitch definitions keyed by name.
///
/// # Invariants
/// - Every held definition has passed [`validate_definition`].
#[derive(Debug, Clone)]
pub struct KillswitchRegistry {
    /// Definitions keyed by killswitch name.
    definitions: BTreeMap<KillswitchName, KillswitchDefinition>,
}

impl KillswitchRegistry {
    /// Builds a registry from the given definitions.
    ///
    /// # Errors
    /// Returns a [`RegistryError`] when a definition declares no fields,
    /// declares a field twice, or reuses a name.
    pub fn new(definitions: Vec<KillswitchDefinition>) -> Result<Self, RegistryError> {
        let mut table = BTreeMap::new();
        for definition in definitions {
            validate_definition(&definition)?;
            let name = definition.name.clone();
            if table.insert(name.clone(), definition).is_some() {
                return Err(RegistryError::DuplicateKillswitch(name));
            }
        }
        Ok(Self {
            definitions: table,
        })
    }

    /// Builds the registry of built-in ingest killswitches.
    ///
    /// # Errors
    /// Returns a [`RegistryError`] if the built-in definitions are invalid;
    /// this indicates a programming error in this crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(builtin_definitions())
    }

    /// Looks up a definition by name.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownKillswitch`] when no definition with
    /// the given name is registered.
    pub fn lookup(&self, name: &KillswitchName) -> Result<&KillswitchDefinition, RegistryError> {
        self.definitions
            .get(name)
            .ok_or_else(|| RegistryError::UnknownKillswitch(name.clone()))
    }

    /// Returns the declared field names of a killswitch in declaration order.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownKillswitch`] when no definition with
    /// the given name is registered.
    pub fn field_set(&self, name: &KillswitchName) -> Result<Vec<&str>, RegistryError> {
        Ok(self.lookup(name)?.field_names().collect())
    }

    /// Iterates over all definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &KillswitchDefinition> {
        self.definitions.values()
    }

    /// Iterates over all registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &KillswitchName> {
        self.definitions.keys()
    }

    /// Returns the number of registered killswitches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns whether the registry holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Checks a single definition for an empty or duplicated field set.
fn validate_definition(definition: &KillswitchDefinition) -> Result<(), RegistryError> {
    if definition.fields.is_empty() {
        return Err(RegistryError::EmptyFieldSet(definition.name.clone()));
    }
    let mut seen = BTreeSet::new();
    for field in &definition.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(RegistryError::DuplicateField {
                killswitch: definition.name.clone(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Built-in Killswitches
// ============================================================================

/// Shared documentation for the `project_id` field.
const PROJECT_ID_DOC: &str = "A project ID to filter events by.";

/// Shared documentation for the `event_id` field.
const EVENT_ID_DOC: &str = "An event ID as given in the event payload.";

/// Shared documentation for the `platform` field.
const PLATFORM_DOC: &str =
    "The event platform as defined in the event payload's platform field.";

/// Shared documentation for the `has_attachments` field.
const HAS_ATTACHMENTS_DOC: &str = "Filter events by whether they have been sent together with \
                                   attachments or not. Note that attachments can be sent \
                                   completely separately as well.";

/// Returns the built-in killswitch definitions for the ingest pipeline.
fn builtin_definitions() -> Vec<KillswitchDefinition> {
    vec![
        KillswitchDefinition::new(
            "store.load-shed-group-creation-projects",
            "Drop event in save_event before entering transaction to create group",
            vec![
                FieldSpec::new("project_id", PROJECT_ID_DOC),
                FieldSpec::new("platform", PLATFORM_DOC),
            ],
        ),
        KillswitchDefinition::new(
            "store.load-shed-pipeline-projects",
            "Drop event in ingest consumer. Available fields are severely restricted because \
             nothing is parsed yet.",
            vec![
                FieldSpec::new("project_id", PROJECT_ID_DOC),
                FieldSpec::new("event_id", EVENT_ID_DOC),
                FieldSpec::new("has_attachments", HAS_ATTACHMENTS_DOC),
            ],
        ),
        KillswitchDefinition::new(
            "store.load-shed-parsed-pipeline-projects",
            "Drop events in ingest consumer after parsing them. Available fields are more but \
             a bunch of stuff can go wrong before that.",
            vec![
                FieldSpec::new(
                    "organization_id",
                    "Numeric organization ID to filter events by.",
                ),
                FieldSpec::new("project_id", PROJECT_ID_DOC),
                FieldSpec::new(
                    "event_type",
                    "transaction, csp, hpkp, expectct, expectstaple, transaction, default or null",
                ),
                FieldSpec::new("has_attachments", HAS_ATTACHMENTS_DOC),
                FieldSpec::new("event_id", EVENT_ID_DOC),
            ],
        ),
        KillswitchDefinition::new(
            "store.load-shed-process-event-projects",
            "Drop events in process_event.",
            vec![
                FieldSpec::new("project_id", PROJECT_ID_DOC),
                FieldSpec::new("event_id", EVENT_ID_DOC),
                FieldSpec::new("platform", PLATFORM_DOC),
            ],
        ),
        KillswitchDefinition::new(
            "store.load-shed-symbolicate-event-projects",
            "Drop events in symbolicate_event.",
            vec![
                FieldSpec::new("project_id", PROJECT_ID_DOC),
                FieldSpec::new("event_id", EVENT_ID_DOC),
                FieldSpec::new("platform", PLATFORM_DOC),
            ],
        ),
    ]
}
