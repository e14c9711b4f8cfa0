//! Script execution.
//!
//! Each non-blank, non-comment line is one operation. A failing operation
//! is reported and the script carries on; only I/O problems abort the run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use roster::{Operation, Roster, RosterError};
use roster_config::RosterConfig;
use serde_json::json;

use super::{open_roster, print_outcome};
use crate::style::colors::SemanticStyle;
use crate::style::print_error;

pub fn run(config: &RosterConfig, script: &Path, no_seed: bool, json: bool) -> Result<()> {
    let source = fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;

    let roster = open_roster(config, no_seed)?;

    let mut executed = 0usize;
    let mut failed = 0usize;

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let result = match Operation::parse_line(line) {
            Ok(None) => continue,
            Ok(Some(op)) => roster.dispatch(op),
            Err(e) => Err(e),
        };
        executed += 1;

        match result {
            Ok(outcome) if json => {
                println!(
                    "{}",
                    json!({ "line": line_no, "ok": true, "result": outcome })
                );
            }
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => {
                failed += 1;
                tracing::debug!(line = line_no, error = %e, "operation failed");
                if json {
                    println!("{}", error_json(line_no, &e));
                } else {
                    print_error(&format!("line {line_no}: {}", e.user_message()));
                }
            }
        }
    }

    if !json {
        let summary = format!("{executed} operation(s), {failed} failed");
        println!("{}", summary.muted());
    }

    Ok(())
}

fn error_json(line_no: usize, error: &RosterError) -> serde_json::Value {
    json!({
        "line": line_no,
        "ok": false,
        "kind": error.kind().map(|k| k.to_string()),
        "error": error.to_string(),
    })
}
