// crates/ingest-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Runtime Layer
// Description: Normalization, matching, authoring, mutation, and the gate.
// Purpose: Group the behavior built on top of the core data model.
// Dependencies: serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! The runtime layer turns the core model into behavior: lenient and strict
//! canonicalization, hot-path matching, operator-facing rendering and
//! parsing, single-block mutation, and the [`gate::AdmissionGate`] that
//! composes all of it over pluggable storage and telemetry.

/// Faux-SQL summaries and the editable template codec.
pub mod authoring;
/// The admission gate engine.
pub mod gate;
/// Hot-path condition matching.
pub mod matcher;
/// Single-block configuration mutation.
pub mod mutation;
/// Lenient and strict canonicalization.
pub mod normalizer;
/// Process-local option store.
pub mod store;
