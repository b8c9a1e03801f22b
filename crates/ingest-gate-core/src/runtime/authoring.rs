// crates/ingest-gate-core/src/runtime/authoring.rs
// ============================================================================
// Module: Authoring Codec
// Description: Operator-facing rendering and parsing of killswitch conditions.
// Purpose: Keep the faux-SQL summary and the editable template byte-stable.
// Dependencies: serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Operators review conditions in two textual forms. The faux-SQL summary
//! ([`describe`]) is read-only: `DROP DATA WHERE` followed by the blocks,
//! `OR` between blocks and `AND` inside them, wildcards elided. The edit
//! template ([`render_edit_template`]) is round-trippable: a commented
//! header and per-field template, then the active conditions as a YAML
//! sequence that [`parse_edited_template`] reads back. Scalars are emitted
//! so that re-parsing yields the identical canonical string; anything a
//! YAML reader could reinterpret gets quoted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::condition::CanonicalCondition;
use crate::core::condition::RawConfig;
use crate::core::registry::KillswitchDefinition;
use crate::runtime::normalizer::normalize_lenient;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Summary shown for a killswitch with no active conditions.
const DISABLED_MARKER: &str = "<disabled entirely>";

/// Scalar emitted for a wildcard constraint in the edit template.
const NULL_MARKER: &str = "null";

/// Fixed explanatory banner emitted after the title line of every template.
const TEMPLATE_BANNER: &str = "#\n\
    # After saving and exiting, your killswitch conditions will be printed\n\
    # in faux-SQL for you to confirm.\n\
    #\n\
    # Below a template is given for a single block. The block's fields will\n\
    # be joined with AND, while all blocks will be joined with OR. All\n\
    # fields need to be set, but can be set to null/~, which is a wildcard.\n\
    #\n";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while reading back an edited template.
#[derive(Debug, Error)]
pub enum AuthoringError {
    /// The edited document is not a valid condition sequence.
    #[error("could not parse condition document: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Faux-SQL Summary
// ============================================================================

/// Renders the human-readable summary of a killswitch's conditions.
///
/// A disabled killswitch renders as a bare marker with no trailing newline;
/// an enabled one renders as a newline-terminated `DROP DATA WHERE` clause
/// with one parenthesized block per condition. Wildcard fields are elided,
/// concrete fields appear in declaration order.
#[must_use]
pub fn describe(definition: &KillswitchDefinition, raw: &RawConfig) -> String {
    let canonical = normalize_lenient(definition, raw);
    if canonical.is_disabled() {
        return DISABLED_MARKER.to_string();
    }
    let blocks: Vec<String> = canonical.conditions().iter().map(describe_condition).collect();
    format!("DROP DATA WHERE\n  {}\n", blocks.join(" OR\n  "))
}

/// Renders one canonical condition as a parenthesized AND clause.
fn describe_condition(condition: &CanonicalCondition) -> String {
    let clauses: Vec<String> = condition
        .entries()
        .iter()
        .filter_map(|entry| {
            entry.value.as_ref().map(|value| format!("{} = {value}", entry.field))
        })
        .collect();
    format!("({})", clauses.join(" AND "))
}

// ============================================================================
// SECTION: Edit Template
// ============================================================================

/// Renders the editable template for a killswitch's current conditions.
///
/// The output opens with a commented banner and a commented single-block
/// template documenting every declared field. When conditions are active
/// they follow after one blank line as a YAML sequence, fields in
/// declaration order and wildcards spelled `null`. The template is always
/// newline-terminated.
#[must_use]
pub fn render_edit_template(definition: &KillswitchDefinition, raw: &RawConfig) -> String {
    let canonical = normalize_lenient(definition, raw);
    let mut out = String::new();
    out.push_str(&format!("# {}: {}\n", definition.name, definition.description));
    out.push_str(TEMPLATE_BANNER);
    push_template_block(&mut out, definition);
    if !canonical.is_disabled() {
        out.push('\n');
        for condition in canonical.conditions() {
            push_condition_block(&mut out, condition);
        }
    }
    out
}

/// Appends the commented single-block template for the declared fields.
fn push_template_block(out: &mut String, definition: &KillswitchDefinition) {
    for (index, field) in definition.fields.iter().enumerate() {
        let doc_prefix = if index == 0 { "# - #" } else { "#   #" };
        out.push_str(&format!("{doc_prefix} {}\n", field.description));
        out.push_str(&format!("#   {}: ~\n", field.name));
    }
}

/// Appends one active condition as an editable sequence element.
fn push_condition_block(out: &mut String, condition: &CanonicalCondition) {
    for (index, entry) in condition.entries().iter().enumerate() {
        let prefix = if index == 0 { "- " } else { "  " };
        let value = entry
            .value
            .as_deref()
            .map_or_else(|| NULL_MARKER.to_string(), render_scalar);
        out.push_str(&format!("{prefix}{}: {value}\n", entry.field));
    }
}

/// Parses an edited template back into raw configuration.
///
/// YAML comments and blank lines vanish in parsing, so an untouched template
/// (or an emptied-out document) reads back as the disabled configuration.
///
/// # Errors
/// Returns [`AuthoringError::Parse`] when the document is not a sequence of
/// condition elements.
pub fn parse_edited_template(text: &str) -> Result<RawConfig, AuthoringError> {
    let parsed: Option<RawConfig> =
        serde_yaml::from_str(text).map_err(|err| AuthoringError::Parse(err.to_string()))?;
    Ok(parsed.unwrap_or_default())
}

// ============================================================================
// SECTION: Scalar Rendering
// ============================================================================

/// Renders a canonical matching string as a template scalar.
///
/// The scalar must read back as the identical string: values that YAML would
/// reinterpret (integers in non-canonical form, keyword lookalikes, floats,
/// punctuation) are single-quoted, and values containing control characters
/// are double-quoted with escapes.
fn render_scalar(value: &str) -> String {
    if renders_plainly(value) {
        return value.to_string();
    }
    if value.chars().any(char::is_control) {
        return double_quote(value);
    }
    format!("'{}'", value.replace('\'', "''"))
}

/// Returns whether a value survives a plain-scalar round trip unchanged.
fn renders_plainly(value: &str) -> bool {
    if value.parse::<i64>().is_ok_and(|parsed| parsed.to_string() == value) {
        return true;
    }
    if matches!(value, "true" | "false") {
        return true;
    }
    if is_yaml_keyword(value) {
        return false;
    }
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Returns whether a value collides with a YAML keyword scalar.
fn is_yaml_keyword(value: &str) -> bool {
    matches!(
        value,
        "~" | "null"
            | "Null"
            | "NULL"
            | "True"
            | "TRUE"
            | "False"
            | "FALSE"
            | "yes"
            | "Yes"
            | "YES"
            | "no"
            | "No"
            | "NO"
            | "on"
            | "On"
            | "ON"
            | "off"
            | "Off"
            | "OFF"
    )
}

/// Emits a double-quoted scalar for values containing control characters.
fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
