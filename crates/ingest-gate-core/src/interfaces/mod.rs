// crates/ingest-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Runtime Interfaces
// Description: Traits the admission gate composes over.
// Purpose: Decouple evaluation from option storage and telemetry backends.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The admission gate is generic over two collaborators: an [`OptionStore`]
//! that serves the runtime-editable killswitch configuration, and a
//! [`TelemetrySink`] that receives one counter sample per evaluation.
//! Implementations must be `Send + Sync`; the gate is shared across
//! ingest workers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::condition::RawConfig;
use crate::core::registry::KillswitchName;

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Counter emitted once per gate evaluation.
pub const EVALUATION_COUNTER: &str = "killswitches.run";

/// Outcome of one killswitch evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    /// A condition matched; the caller should drop the payload.
    Matched,
    /// No condition matched; the payload proceeds.
    Passed,
}

impl MatchDecision {
    /// Returns the tag value reported to telemetry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Passed => "passed",
        }
    }

    /// Returns whether the payload should be dropped.
    #[must_use]
    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

// ============================================================================
// SECTION: Option Store
// ============================================================================

/// Errors surfaced by option store backends.
#[derive(Debug, Error)]
pub enum OptionStoreError {
    /// Underlying storage I/O failed.
    #[error("option store i/o failure: {0}")]
    Io(String),
    /// A stored payload could not be serialized or deserialized.
    #[error("option store serialization failure: {0}")]
    Serialization(String),
    /// The store backend rejected the operation.
    #[error("option store failure: {0}")]
    Store(String),
}

/// Serves the runtime-editable killswitch configuration.
pub trait OptionStore: Send + Sync {
    /// Returns the raw configuration for a killswitch.
    ///
    /// A killswitch with no stored value yields the empty (disabled)
    /// configuration rather than an error.
    ///
    /// # Errors
    /// Returns an [`OptionStoreError`] when the backend cannot be read.
    fn get(&self, name: &KillswitchName) -> Result<RawConfig, OptionStoreError>;

    /// Replaces the raw configuration for a killswitch.
    ///
    /// # Errors
    /// Returns an [`OptionStoreError`] when the backend cannot be written.
    fn set(&self, name: &KillswitchName, config: &RawConfig) -> Result<(), OptionStoreError>;
}

// ============================================================================
// SECTION: Telemetry
// ============================================================================

/// Receives one counter sample per gate evaluation.
pub trait TelemetrySink: Send + Sync {
    /// Increments a counter with the given tag set.
    fn increment(&self, counter: &str, tags: &[(&str, &str)]);
}

/// Telemetry sink that discards every sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn increment(&self, _counter: &str, _tags: &[(&str, &str)]) {}
}
