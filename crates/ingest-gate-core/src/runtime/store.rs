// crates/ingest-gate-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Option Store
// Description: Process-local option store for tests and embedded use.
// Purpose: Provide a shareable store backend with no external dependencies.
// Dependencies: none beyond the core model
// ============================================================================

//! ## Overview
//! A mutex-guarded map keyed by killswitch name. Clones share the same
//! underlying state, so a test can hold one handle while the gate owns
//! another. Killswitches with no stored value read back as the empty
//! (disabled) configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::condition::RawConfig;
use crate::core::registry::KillswitchName;
use crate::interfaces::OptionStore;
use crate::interfaces::OptionStoreError;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Process-local option store backed by a shared map.
///
/// # Invariants
/// - All clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOptionStore {
    /// Stored configurations keyed by killswitch name.
    values: Arc<Mutex<BTreeMap<KillswitchName, RawConfig>>>,
}

impl InMemoryOptionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionStore for InMemoryOptionStore {
    fn get(&self, name: &KillswitchName) -> Result<RawConfig, OptionStoreError> {
        let values = self.values.lock().map_err(|_| poisoned())?;
        Ok(values.get(name).cloned().unwrap_or_default())
    }

    fn set(&self, name: &KillswitchName, config: &RawConfig) -> Result<(), OptionStoreError> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        values.insert(name.clone(), config.clone());
        Ok(())
    }
}

/// Error returned when the guarding mutex has been poisoned.
fn poisoned() -> OptionStoreError {
    OptionStoreError::Store("option store mutex poisoned".to_string())
}
