// crates/ingest-gate-core/src/core/mod.rs
// ============================================================================
// Module: Core Domain Model
// Description: Schema, condition, and context types for killswitch evaluation.
// Purpose: Group the deterministic data model beneath the runtime layer.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The core layer defines what a killswitch *is*: its registered schema, the
//! raw and canonical condition shapes, and the evaluation context supplied by
//! call sites. Everything here is pure data with deterministic behavior; the
//! runtime layer builds normalization, matching, and authoring on top.

/// Raw and canonical condition configuration.
pub mod condition;
/// Per-call evaluation context.
pub mod context;
/// Killswitch definitions and the schema registry.
pub mod registry;
