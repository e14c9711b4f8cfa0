//! CLI command implementations.

pub mod config;
pub mod console;
pub mod run;
pub mod version;

use anyhow::{Context, Result};
use roster::{Outcome, Roster};
use roster_config::RosterConfig;

use crate::style::{
    course_table, print_hint, print_success, print_table_with_footer, student_table,
};

/// Builds the registry for a session, seeded unless disabled.
pub fn open_roster(config: &RosterConfig, no_seed: bool) -> Result<Roster> {
    if no_seed || !config.registry.seed_demo_data {
        tracing::debug!("starting with an empty registry");
        return Ok(Roster::new());
    }
    Roster::with_demo_data().context("Failed to load sample data")
}

/// Prints an outcome; listings render as tables.
pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Courses { courses, .. } if courses.is_empty() => {
            print_hint(&outcome.to_string());
        }
        Outcome::Courses {
            courses,
            total_enrolled,
        } => print_table_with_footer(
            &course_table(courses),
            &format!("Total enrolled students: {total_enrolled}"),
        ),
        Outcome::Students { students } => {
            let count = students.len();
            let noun = if count == 1 { "student" } else { "students" };
            print_table_with_footer(&student_table(students), &format!("({count} {noun})"));
        }
        other => print_success(&other.to_string()),
    }
}
