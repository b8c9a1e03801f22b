// crates/ingest-gate-cli/src/lib.rs
// ============================================================================
// Module: Ingest Gate CLI Library
// Description: Configuration loading and file-backed option storage for the CLI.
// Purpose: Keep the reusable CLI building blocks testable outside the binary.
// Dependencies: ingest-gate-core, serde, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! The `ingest-gate` binary drives the operator workflow for killswitch
//! configuration: listing current conditions, pulling the editable template,
//! and pushing a validated edit back. This library crate holds the pieces
//! the binary composes: the TOML configuration file and a file-backed
//! [`ingest_gate_core::OptionStore`] suitable for single-host deployments
//! and tests.

/// CLI configuration file loading.
pub mod config;
/// File-backed option store.
pub mod store;

pub use crate::config::CliConfig;
pub use crate::config::ConfigError;
pub use crate::store::FileOptionStore;
