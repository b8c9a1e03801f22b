// crates/ingest-gate-cli/src/main.rs
// ============================================================================
// Module: Ingest Gate CLI Entry Point
// Description: Command dispatcher for killswitch inspection and editing.
// Purpose: Provide the operator list/pull/push workflow over a file-backed store.
// Dependencies: clap, ingest-gate-cli, ingest-gate-core, thiserror
// ============================================================================

//! ## Overview
//! The `ingest-gate` binary is the operator surface for killswitch
//! configuration. `list` prints every registered killswitch with its current
//! conditions in faux-SQL, `pull` writes the editable template for one
//! killswitch, and `push` validates an edited template strictly and, once
//! confirmed with `--yes`, persists it. Edited input is untrusted and is
//! size-capped and schema-validated before anything is written.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use ingest_gate_cli::CliConfig;
use ingest_gate_cli::FileOptionStore;
use ingest_gate_core::AdmissionGate;
use ingest_gate_core::KillswitchName;
use ingest_gate_core::KillswitchRegistry;
use ingest_gate_core::NoopTelemetry;
use ingest_gate_core::OptionStore;
use ingest_gate_core::TelemetrySink;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an edited template accepted by `push`.
const MAX_EDIT_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "ingest-gate", disable_help_subcommand = true)]
struct Cli {
    /// Optional config file path (defaults to ingest-gate.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Option store document path (overrides the config file).
    #[arg(long, value_name = "PATH", global = true)]
    store: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List all killswitches and their current conditions.
    List,
    /// Write the editable condition template for one killswitch.
    Pull(PullCommand),
    /// Validate an edited template and persist it with `--yes`.
    Push(PushCommand),
}

/// Arguments for the `pull` command.
#[derive(Args, Debug)]
struct PullCommand {
    /// Killswitch to pull.
    #[arg(value_name = "KILLSWITCH")]
    killswitch: String,
    /// Output file, or `-` for stdout.
    #[arg(value_name = "OUTFILE")]
    out: String,
}

/// Arguments for the `push` command.
#[derive(Args, Debug)]
struct PushCommand {
    /// Apply the validated conditions instead of only previewing them.
    #[arg(long, action = ArgAction::SetTrue)]
    yes: bool,
    /// Killswitch to push.
    #[arg(value_name = "KILLSWITCH")]
    killswitch: String,
    /// Edited template file, or `-` for stdin.
    #[arg(value_name = "INFILE")]
    input: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a formatted message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a formatted message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<ingest_gate_core::GateError> for CliError {
    fn from(err: ingest_gate_core::GateError) -> Self {
        Self::new(err.to_string())
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    let registry =
        KillswitchRegistry::builtin().map_err(|err| CliError::new(err.to_string()))?;
    let store_path = cli.store.unwrap_or(config.store_path);
    let store = FileOptionStore::new(store_path);
    let gate = AdmissionGate::new(registry, store, NoopTelemetry);
    match cli.command {
        Commands::List => command_list(&gate),
        Commands::Pull(command) => command_pull(&gate, &command),
        Commands::Push(command) => command_push(&gate, &command),
    }
}

// ============================================================================
// SECTION: List Command
// ============================================================================

/// Executes the `list` command.
fn command_list<S, T>(gate: &AdmissionGate<S, T>) -> CliResult<ExitCode>
where
    S: OptionStore,
    T: TelemetrySink,
{
    let output = render_list(gate)?;
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders the `list` output for every registered killswitch.
fn render_list<S, T>(gate: &AdmissionGate<S, T>) -> CliResult<String>
where
    S: OptionStore,
    T: TelemetrySink,
{
    let mut output = String::new();
    for definition in gate.registry().iter() {
        output.push('\n');
        output.push_str(definition.name.as_str());
        output.push('\n');
        output.push_str(&format!("  # {}\n", definition.description));
        let summary = gate.describe(&definition.name)?;
        output.push_str(&summary);
        if !summary.ends_with('\n') {
            output.push('\n');
        }
    }
    Ok(output)
}

// ============================================================================
// SECTION: Pull Command
// ============================================================================

/// Executes the `pull` command.
fn command_pull<S, T>(gate: &AdmissionGate<S, T>, command: &PullCommand) -> CliResult<ExitCode>
where
    S: OptionStore,
    T: TelemetrySink,
{
    let name = KillswitchName::from(command.killswitch.as_str());
    let template = gate.edit_template(&name)?;
    if command.out == "-" {
        write_stdout_bytes(template.as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    } else {
        fs::write(&command.out, template.as_bytes()).map_err(|err| {
            CliError::new(format!("could not write template to {}: {err}", command.out))
        })?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Push Command
// ============================================================================

/// Executes the `push` command.
fn command_push<S, T>(gate: &AdmissionGate<S, T>, command: &PushCommand) -> CliResult<ExitCode>
where
    S: OptionStore,
    T: TelemetrySink,
{
    let name = KillswitchName::from(command.killswitch.as_str());
    let text = read_edited_input(&command.input)?;
    let validated = gate.validate_edited(&name, &text)?;
    let mut preview = gate.describe_candidate(&name, &validated)?;
    if !preview.ends_with('\n') {
        preview.push('\n');
    }
    write_stdout_bytes(preview.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if !command.yes {
        write_stderr_line("no changes applied; re-run with --yes to apply")
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    gate.apply(&name, &validated)?;
    Ok(ExitCode::SUCCESS)
}

/// Reads the edited template from a file or stdin, enforcing the size cap.
fn read_edited_input(source: &str) -> CliResult<String> {
    if source == "-" {
        let mut text = String::new();
        let mut stdin = std::io::stdin().take(MAX_EDIT_BYTES.saturating_add(1));
        stdin
            .read_to_string(&mut text)
            .map_err(|err| CliError::new(format!("could not read stdin: {err}")))?;
        check_edit_size(u64::try_from(text.len()).unwrap_or(u64::MAX), source)?;
        return Ok(text);
    }
    let size = fs::metadata(source)
        .map_err(|err| CliError::new(format!("could not read {source}: {err}")))?
        .len();
    check_edit_size(size, source)?;
    fs::read_to_string(source)
        .map_err(|err| CliError::new(format!("could not read {source}: {err}")))
}

/// Rejects edited input larger than the accepted size.
fn check_edit_size(size: u64, source: &str) -> CliResult<()> {
    if size > MAX_EDIT_BYTES {
        return Err(CliError::new(format!(
            "edited template {source} exceeds size limit ({size} > {MAX_EDIT_BYTES} bytes)"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output failure message for a stream.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("could not write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
