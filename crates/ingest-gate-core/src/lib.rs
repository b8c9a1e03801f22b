// crates/ingest-gate-core/src/lib.rs
// ============================================================================
// Module: Ingest Gate Core
// Description: Condition-based admission control for data-ingestion pipelines.
// Purpose: Evaluate, render, and edit named killswitches over pluggable backends.
// Dependencies: serde, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! A killswitch is a named, runtime-editable list of condition blocks that
//! decides whether a payload should be dropped at a pipeline stage. Blocks
//! combine with OR, the fields inside a block with AND, and a null field is
//! a wildcard. This crate owns the whole lifecycle: the schema registry of
//! built-in killswitches, lenient canonicalization of stored values, strict
//! validation of operator edits, hot-path matching, faux-SQL summaries, the
//! round-trippable edit template, and single-block mutation helpers, all
//! composed behind [`AdmissionGate`].
//!
//! Security posture: stored configuration is data, not code. Lenient
//! normalization degrades malformed input toward matching *less*, never
//! more, and operator edits pass strict field-set validation before they
//! are persisted.

/// Core domain model: schemas, conditions, contexts.
pub mod core;
/// Traits the gate composes over.
pub mod interfaces;
/// Normalization, matching, authoring, mutation, and the gate.
pub mod runtime;

pub use crate::core::condition::CanonicalCondition;
pub use crate::core::condition::CanonicalConfig;
pub use crate::core::condition::FieldConstraint;
pub use crate::core::condition::FieldValue;
pub use crate::core::condition::RawCondition;
pub use crate::core::condition::RawConfig;
pub use crate::core::context::KillswitchContext;
pub use crate::core::registry::FieldSpec;
pub use crate::core::registry::KillswitchDefinition;
pub use crate::core::registry::KillswitchName;
pub use crate::core::registry::KillswitchRegistry;
pub use crate::core::registry::RegistryError;
pub use crate::interfaces::EVALUATION_COUNTER;
pub use crate::interfaces::MatchDecision;
pub use crate::interfaces::NoopTelemetry;
pub use crate::interfaces::OptionStore;
pub use crate::interfaces::OptionStoreError;
pub use crate::interfaces::TelemetrySink;
pub use crate::runtime::authoring::AuthoringError;
pub use crate::runtime::gate::AdmissionGate;
pub use crate::runtime::gate::GateError;
pub use crate::runtime::normalizer::NormalizeError;
pub use crate::runtime::store::InMemoryOptionStore;
