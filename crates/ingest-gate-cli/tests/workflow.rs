// crates/ingest-gate-cli/tests/workflow.rs
// ============================================================================
// Module: CLI Workflow Tests
// Description: Validate the pull/edit/push cycle over the file-backed store.
// Purpose: Ensure the operator workflow persists and re-reads cleanly on disk.
// Dependencies: ingest-gate-cli, ingest-gate-core, tempfile
// ============================================================================

//! End-to-end workflow tests over the built-in registry and a real file.

use ingest_gate_cli::FileOptionStore;
use ingest_gate_core::AdmissionGate;
use ingest_gate_core::FieldValue;
use ingest_gate_core::KillswitchName;
use ingest_gate_core::KillswitchRegistry;
use ingest_gate_core::NoopTelemetry;
use ingest_gate_core::RawCondition;

/// Builds a gate over the built-in registry and a store in the given directory.
fn file_gate(
    dir: &tempfile::TempDir,
) -> Result<AdmissionGate<FileOptionStore, NoopTelemetry>, Box<dyn std::error::Error>> {
    let store = FileOptionStore::new(dir.path().join("options.json"));
    Ok(AdmissionGate::new(KillswitchRegistry::builtin()?, store, NoopTelemetry))
}

#[test]
fn pull_edit_push_persists_across_gate_instances() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let name = KillswitchName::new("store.load-shed-group-creation-projects");

    let gate = file_gate(&dir)?;
    let template = gate.edit_template(&name)?;
    if !template.starts_with(
        "# store.load-shed-group-creation-projects: Drop event in save_event",
    ) {
        return Err(format!("unexpected template header: {template}").into());
    }
    let edited = format!("{template}\n- project_id: 42\n  platform: python\n");
    let validated = gate.validate_edited(&name, &edited)?;
    gate.apply(&name, &validated)?;

    // A fresh gate over the same file sees the pushed conditions.
    let reread = file_gate(&dir)?;
    let summary = reread.describe(&name)?;
    if summary != "DROP DATA WHERE\n  (project_id = 42 AND platform = python)\n" {
        return Err(format!("unexpected summary after re-read: {summary}").into());
    }
    Ok(())
}

#[test]
fn pushing_an_empty_document_disables_the_killswitch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let name = KillswitchName::new("store.load-shed-group-creation-projects");

    let gate = file_gate(&dir)?;
    let validated = gate.validate_edited(&name, "- project_id: 42\n  platform: ~\n")?;
    gate.apply(&name, &validated)?;
    let cleared = gate.validate_edited(&name, "\n")?;
    gate.apply(&name, &cleared)?;
    let summary = gate.describe(&name)?;
    if summary != "<disabled entirely>" {
        return Err(format!("expected the disabled marker, got: {summary}").into());
    }
    Ok(())
}

#[test]
fn gate_mutations_write_through_to_the_document() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let name = KillswitchName::new("store.load-shed-group-creation-projects");

    let gate = file_gate(&dir)?;
    let block = RawCondition::block([
        ("project_id", FieldValue::Int(42)),
        ("platform", FieldValue::Null),
    ]);
    gate.add_condition(&name, &block)?;
    let summary = gate.describe(&name)?;
    if summary != "DROP DATA WHERE\n  (project_id = 42)\n" {
        return Err(format!("unexpected summary after add: {summary}").into());
    }
    let removed = gate.remove_condition(&name, &block)?;
    if !removed.is_disabled() {
        return Err("expected removal to disable the killswitch".into());
    }
    let summary = file_gate(&dir)?.describe(&name)?;
    if summary != "<disabled entirely>" {
        return Err(format!("expected the disabled marker, got: {summary}").into());
    }
    Ok(())
}
