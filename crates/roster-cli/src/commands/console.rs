//! Interactive administration console.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use roster::{Operation, Roster};
use roster_config::{Paths, RosterConfig};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::{open_roster, print_outcome};
use crate::style::colors::SemanticStyle;
use crate::style::{audit_table, print_error, print_hint};

/// Help text for the console.
const HELP_TEXT: &str = r"
Meta commands:
  .help          Show this help message
  .audit         Show the audit trail
  .exit          Exit the console
  .quit          Exit the console

Tips:
  - Quote names with spaces: add-student 'Ada Lovelace'
  - Student IDs may be written S000001 or 1
  - Press Ctrl+D to exit
";

pub fn run(config: &RosterConfig, no_seed: bool) -> Result<()> {
    let roster = open_roster(config, no_seed)?;

    let mut editor = DefaultEditor::new().context("Failed to initialize line editor")?;
    let history = if config.console.history {
        Paths::new().history_file().ok()
    } else {
        None
    };
    if let Some(path) = &history {
        if let Err(e) = load_history(&mut editor, path) {
            tracing::warn!(error = %e, path = %path.display(), "could not load history");
        }
    }

    println!("{}", "Roster administration console".header());
    println!("Project: {}", config.project.name);
    println!();
    print_hint("Type .help for help, .exit to quit.");
    println!();

    loop {
        match editor.readline(&config.console.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);

                if trimmed.starts_with('.') {
                    match handle_meta_command(trimmed, &roster) {
                        MetaResult::Continue => continue,
                        MetaResult::Exit => break,
                    }
                }

                execute_line(&roster, trimmed);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }

    if let Some(path) = &history {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        if let Err(e) = editor.save_history(path) {
            tracing::warn!(error = %e, path = %path.display(), "could not save history");
        }
    }

    Ok(())
}

/// Loads saved history. A missing file is expected on first run.
fn load_history(editor: &mut DefaultEditor, path: &Path) -> Result<(), ReadlineError> {
    match editor.load_history(path) {
        Err(ReadlineError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

enum MetaResult {
    Continue,
    Exit,
}

fn handle_meta_command(cmd: &str, roster: &Roster) -> MetaResult {
    let cmd_lower = cmd.to_lowercase();

    match cmd_lower.split_whitespace().next() {
        Some(".help" | ".h") => {
            print_help();
            MetaResult::Continue
        }
        Some(".audit") => {
            match roster.audit_log() {
                Ok(entries) if entries.is_empty() => println!("{}", "No changes recorded.".muted()),
                Ok(entries) => println!("{}", audit_table(&entries)),
                Err(e) => print_error(&e.user_message()),
            }
            MetaResult::Continue
        }
        Some(".exit" | ".quit" | ".q") => {
            println!("Goodbye!");
            MetaResult::Exit
        }
        Some(other) => {
            println!("Unknown command: {other}");
            println!("Type .help for available commands.");
            MetaResult::Continue
        }
        None => MetaResult::Continue,
    }
}

fn print_help() {
    println!();
    println!("{}", "Operations:".header());
    for (name, args) in Operation::USAGE {
        println!("  {} {}", name.code(), args);
    }
    println!("{HELP_TEXT}");
}

fn execute_line(roster: &Roster, line: &str) {
    let result = Operation::parse_line(line).and_then(|op| match op {
        Some(op) => roster.dispatch(op).map(Some),
        None => Ok(None),
    });

    match result {
        Ok(Some(outcome)) => print_outcome(&outcome),
        Ok(None) => {}
        Err(e) => print_error(&e.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_history_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let mut editor = DefaultEditor::new().unwrap();

        assert!(load_history(&mut editor, &dir.path().join("history.txt")).is_ok());
    }

    #[test]
    fn unreadable_history_is_reported() {
        let dir = tempdir().unwrap();
        let mut editor = DefaultEditor::new().unwrap();

        // A directory opens but cannot be read as a history file
        assert!(load_history(&mut editor, dir.path()).is_err());
    }
}
