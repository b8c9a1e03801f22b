// crates/ingest-gate-cli/tests/store.rs
// ============================================================================
// Module: File Option Store Tests
// Description: Validate the JSON-document store behind the CLI.
// Purpose: Ensure missing files read as disabled and writes survive re-reads.
// Dependencies: ingest-gate-cli, ingest-gate-core, tempfile
// ============================================================================

//! Persistence tests for the file-backed option store.

use std::fs;

use ingest_gate_cli::FileOptionStore;
use ingest_gate_core::FieldValue;
use ingest_gate_core::KillswitchName;
use ingest_gate_core::OptionStore;
use ingest_gate_core::OptionStoreError;
use ingest_gate_core::RawCondition;
use ingest_gate_core::RawConfig;

/// Builds a two-field raw condition block.
fn block(project_id: i64, event_type: Option<&str>) -> RawCondition {
    RawCondition::block([
        ("project_id", FieldValue::Int(project_id)),
        ("event_type", event_type.map_or(FieldValue::Null, FieldValue::from)),
    ])
}

#[test]
fn missing_document_reads_as_disabled() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = FileOptionStore::new(dir.path().join("options.json"));
    let name = KillswitchName::new("store.load-shed-pipeline-projects");
    let config = store.get(&name)?;
    if !config.is_empty() {
        return Err("expected a missing document to read as empty".into());
    }
    Ok(())
}

#[test]
fn set_then_get_round_trips_the_raw_configuration() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = FileOptionStore::new(dir.path().join("options.json"));
    let name = KillswitchName::new("store.load-shed-pipeline-projects");
    let config = RawConfig::new(vec![block(42, Some("transaction")), block(43, None)]);
    store.set(&name, &config)?;
    let reread = store.get(&name)?;
    if reread != config {
        return Err("stored configuration did not survive a re-read".into());
    }
    Ok(())
}

#[test]
fn writes_preserve_other_killswitches() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = FileOptionStore::new(dir.path().join("options.json"));
    let first = KillswitchName::new("store.load-shed-pipeline-projects");
    let second = KillswitchName::new("store.load-shed-process-event-projects");
    store.set(&first, &RawConfig::new(vec![block(42, None)]))?;
    store.set(&second, &RawConfig::new(vec![block(7, Some("csp"))]))?;
    let reread = store.get(&first)?;
    if reread != RawConfig::new(vec![block(42, None)]) {
        return Err("writing one killswitch clobbered another".into());
    }
    Ok(())
}

#[test]
fn writes_leave_no_temp_file_behind() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("options.json");
    let store = FileOptionStore::new(&path);
    let name = KillswitchName::new("store.load-shed-pipeline-projects");
    store.set(&name, &RawConfig::new(vec![block(42, None)]))?;
    let entries: Vec<_> = fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
    if entries.len() != 1 {
        return Err(format!("expected only the document, found {} entries", entries.len()).into());
    }
    Ok(())
}

#[test]
fn corrupt_document_surfaces_a_serialization_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("options.json");
    fs::write(&path, "{not json")?;
    let store = FileOptionStore::new(&path);
    let name = KillswitchName::new("store.load-shed-pipeline-projects");
    match store.get(&name) {
        Err(OptionStoreError::Serialization(_)) => Ok(()),
        Err(other) => Err(format!("expected a serialization error, got: {other}").into()),
        Ok(_) => Err("expected the corrupt document to be rejected".into()),
    }
}

#[test]
fn legacy_integer_shorthand_documents_still_load() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("options.json");
    fs::write(&path, "{\"store.load-shed-group-creation-projects\": [42, null]}")?;
    let store = FileOptionStore::new(&path);
    let name = KillswitchName::new("store.load-shed-group-creation-projects");
    let config = store.get(&name)?;
    let expected = RawConfig::new(vec![RawCondition::Shorthand(42), RawCondition::Empty]);
    if config != expected {
        return Err("legacy shorthand document did not load as expected".into());
    }
    Ok(())
}
