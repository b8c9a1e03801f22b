// crates/ingest-gate-cli/src/store.rs
// ============================================================================
// Module: File Option Store
// Description: JSON-file-backed option store for the CLI.
// Purpose: Persist killswitch configuration between CLI invocations.
// Dependencies: ingest-gate-core, serde_json
// ============================================================================

//! ## Overview
//! A single JSON document mapping killswitch names to their raw configuration.
//! A missing file reads back as the fully disabled state, so a fresh
//! deployment needs no setup step. Writes land in a sibling temp file that is
//! renamed into place, so a crashed push leaves the previous document intact.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use ingest_gate_core::KillswitchName;
use ingest_gate_core::OptionStore;
use ingest_gate_core::OptionStoreError;
use ingest_gate_core::RawConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of the store document accepted for parsing.
const MAX_STORE_BYTES: u64 = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Option store persisted as one JSON document on disk.
///
/// # Invariants
/// - A missing file reads as the empty document; it is created on first write.
/// - Writes are rename-based; readers never observe a partial document.
#[derive(Debug, Clone)]
pub struct FileOptionStore {
    /// Location of the JSON document.
    path: PathBuf,
}

impl FileOptionStore {
    /// Creates a store over the given document path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Returns the document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document, treating a missing file as empty.
    fn read_document(&self) -> Result<BTreeMap<KillswitchName, RawConfig>, OptionStoreError> {
        let size = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len(),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(io_failure(&self.path, &err)),
        };
        if size > MAX_STORE_BYTES {
            return Err(OptionStoreError::Store(format!(
                "store document {} exceeds size limit ({size} > {MAX_STORE_BYTES} bytes)",
                self.path.display()
            )));
        }
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(io_failure(&self.path, &err)),
        };
        serde_json::from_str(&text).map_err(|err| {
            OptionStoreError::Serialization(format!(
                "store document {} is not valid: {err}",
                self.path.display()
            ))
        })
    }

    /// Replaces the whole document via a temp file and rename.
    fn write_document(
        &self,
        document: &BTreeMap<KillswitchName, RawConfig>,
    ) -> Result<(), OptionStoreError> {
        let mut bytes = serde_json::to_vec_pretty(document)
            .map_err(|err| OptionStoreError::Serialization(err.to_string()))?;
        bytes.push(b'\n');
        let mut temp = self.path.as_os_str().to_owned();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);
        fs::write(&temp, &bytes).map_err(|err| io_failure(&temp, &err))?;
        fs::rename(&temp, &self.path).map_err(|err| io_failure(&self.path, &err))
    }
}

impl OptionStore for FileOptionStore {
    fn get(&self, name: &KillswitchName) -> Result<RawConfig, OptionStoreError> {
        let document = self.read_document()?;
        Ok(document.get(name).cloned().unwrap_or_default())
    }

    fn set(&self, name: &KillswitchName, config: &RawConfig) -> Result<(), OptionStoreError> {
        let mut document = self.read_document()?;
        document.insert(name.clone(), config.clone());
        self.write_document(&document)
    }
}

/// Maps an I/O failure on a path into a store error.
fn io_failure(path: &Path, err: &std::io::Error) -> OptionStoreError {
    OptionStoreError::Io(format!("{}: {err}", path.display()))
}
