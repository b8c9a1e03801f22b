// crates/ingest-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Admission Gate
// Description: Evaluation and authoring engine over registry, store, and telemetry.
// Purpose: Give call sites and tooling one checked entry point per operation.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The gate ties the pieces together: it resolves names against the schema
//! registry, reads current configuration from the option store, and reports
//! every evaluation to the telemetry sink. Hot-path evaluation is
//! [`AdmissionGate::matches`]; the remaining operations serve operator
//! tooling (summaries, edit templates, validated pushes) and automation
//! (single-block mutations). The gate is generic over its collaborators so
//! production backends and in-memory test doubles share one code path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::condition::CanonicalConfig;
use crate::core::condition::RawCondition;
use crate::core::context::KillswitchContext;
use crate::core::registry::KillswitchDefinition;
use crate::core::registry::KillswitchName;
use crate::core::registry::KillswitchRegistry;
use crate::core::registry::RegistryError;
use crate::interfaces::EVALUATION_COUNTER;
use crate::interfaces::MatchDecision;
use crate::interfaces::OptionStore;
use crate::interfaces::OptionStoreError;
use crate::interfaces::TelemetrySink;
use crate::runtime::authoring;
use crate::runtime::authoring::AuthoringError;
use crate::runtime::matcher::value_matches;
use crate::runtime::mutation;
use crate::runtime::normalizer::NormalizeError;
use crate::runtime::normalizer::validate_user_input;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by gate operations.
#[derive(Debug, Error)]
pub enum GateError {
    /// The caller supplied a context whose field set is not the declared one.
    #[error(
        "killswitch {killswitch} evaluated with wrong context fields: expected [{}], got [{}]",
        .expected.join(", "),
        .actual.join(", ")
    )]
    ContextMismatch {
        /// Killswitch being evaluated.
        killswitch: KillswitchName,
        /// Declared field names in lexicographic order.
        expected: Vec<String>,
        /// Supplied field names in lexicographic order.
        actual: Vec<String>,
    },
    /// Registry construction or lookup failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Strict validation of operator input failed.
    #[error(transparent)]
    Validation(#[from] NormalizeError),
    /// An edited template could not be parsed.
    #[error(transparent)]
    Authoring(#[from] AuthoringError),
    /// The option store failed.
    #[error(transparent)]
    Store(#[from] OptionStoreError),
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Admission-control gate over registered killswitches.
///
/// # Invariants
/// - Every operation resolves the killswitch name before touching the store,
///   so unknown names fail identically everywhere.
/// - Exactly one telemetry sample is emitted per successful evaluation.
#[derive(Debug)]
pub struct AdmissionGate<S, T>
where
    S: OptionStore,
    T: TelemetrySink,
{
    /// Registered killswitch schemas.
    registry: KillswitchRegistry,
    /// Backend serving runtime-editable configuration.
    store: S,
    /// Sink receiving one sample per evaluation.
    telemetry: T,
}

impl<S, T> AdmissionGate<S, T>
where
    S: OptionStore,
    T: TelemetrySink,
{
    /// Creates a gate over the given registry, store, and telemetry sink.
    #[must_use]
    pub fn new(registry: KillswitchRegistry, store: S, telemetry: T) -> Self {
        Self {
            registry,
            store,
            telemetry,
        }
    }

    /// Returns the schema registry backing this gate.
    #[must_use]
    pub fn registry(&self) -> &KillswitchRegistry {
        &self.registry
    }

    /// Evaluates a killswitch against a call-site context.
    ///
    /// # Errors
    /// Returns a [`GateError`] when the name is unknown, the context field
    /// set differs from the declared one, or the store cannot be read.
    pub fn matches(
        &self,
        name: &KillswitchName,
        context: &KillswitchContext,
    ) -> Result<MatchDecision, GateError> {
        let definition = self.registry.lookup(name)?;
        check_context(definition, context)?;
        let raw = self.store.get(name)?;
        let decision = if value_matches(definition, &raw, context) {
            MatchDecision::Matched
        } else {
            MatchDecision::Passed
        };
        self.telemetry.increment(
            EVALUATION_COUNTER,
            &[
                ("killswitch_name", name.as_str()),
                ("decision", decision.as_str()),
            ],
        );
        Ok(decision)
    }

    /// Renders the faux-SQL summary of the stored configuration.
    ///
    /// # Errors
    /// Returns a [`GateError`] when the name is unknown or the store cannot
    /// be read.
    pub fn describe(&self, name: &KillswitchName) -> Result<String, GateError> {
        let definition = self.registry.lookup(name)?;
        let raw = self.store.get(name)?;
        Ok(authoring::describe(definition, &raw))
    }

    /// Renders the faux-SQL summary of a candidate configuration.
    ///
    /// Used to preview a validated edit before it is applied.
    ///
    /// # Errors
    /// Returns a [`GateError`] when the name is unknown.
    pub fn describe_candidate(
        &self,
        name: &KillswitchName,
        config: &CanonicalConfig,
    ) -> Result<String, GateError> {
        let definition = self.registry.lookup(name)?;
        Ok(authoring::describe(definition, &config.to_raw()))
    }

    /// Renders the editable template for the stored configuration.
    ///
    /// # Errors
    /// Returns a [`GateError`] when the name is unknown or the store cannot
    /// be read.
    pub fn edit_template(&self, name: &KillswitchName) -> Result<String, GateError> {
        let definition = self.registry.lookup(name)?;
        let raw = self.store.get(name)?;
        Ok(authoring::render_edit_template(definition, &raw))
    }

    /// Parses and strictly validates an edited template.
    ///
    /// # Errors
    /// Returns a [`GateError`] when the name is unknown, the document does
    /// not parse, or a block fails strict field-set validation.
    pub fn validate_edited(
        &self,
        name: &KillswitchName,
        text: &str,
    ) -> Result<CanonicalConfig, GateError> {
        let definition = self.registry.lookup(name)?;
        let raw = authoring::parse_edited_template(text)?;
        Ok(validate_user_input(definition, &raw)?)
    }

    /// Persists a validated configuration.
    ///
    /// # Errors
    /// Returns a [`GateError`] when the name is unknown or the store cannot
    /// be written.
    pub fn apply(&self, name: &KillswitchName, config: &CanonicalConfig) -> Result<(), GateError> {
        self.registry.lookup(name)?;
        Ok(self.store.set(name, &config.to_raw())?)
    }

    /// Appends one condition block and persists the result.
    ///
    /// # Errors
    /// Returns a [`GateError`] when the name is unknown or the store fails.
    pub fn add_condition(
        &self,
        name: &KillswitchName,
        block: &RawCondition,
    ) -> Result<CanonicalConfig, GateError> {
        let definition = self.registry.lookup(name)?;
        let current = self.store.get(name)?;
        let next = mutation::add_condition(definition, &current, block);
        self.store.set(name, &next.to_raw())?;
        Ok(next)
    }

    /// Removes every occurrence of one condition block and persists the result.
    ///
    /// # Errors
    /// Returns a [`GateError`] when the name is unknown or the store fails.
    pub fn remove_condition(
        &self,
        name: &KillswitchName,
        block: &RawCondition,
    ) -> Result<CanonicalConfig, GateError> {
        let definition = self.registry.lookup(name)?;
        let current = self.store.get(name)?;
        let next = mutation::remove_condition(definition, &current, block);
        self.store.set(name, &next.to_raw())?;
        Ok(next)
    }
}

/// Checks that a context supplies exactly the declared field set.
fn check_context(
    definition: &KillswitchDefinition,
    context: &KillswitchContext,
) -> Result<(), GateError> {
    let expected: BTreeSet<&str> = definition.field_names().collect();
    let actual: BTreeSet<&str> = context.field_names().collect();
    if expected == actual {
        return Ok(());
    }
    Err(GateError::ContextMismatch {
        killswitch: definition.name.clone(),
        expected: expected.into_iter().map(str::to_string).collect(),
        actual: actual.into_iter().map(str::to_string).collect(),
    })
}
