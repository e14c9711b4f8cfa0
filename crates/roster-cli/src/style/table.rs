//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use roster::{AuditEntry, CourseView, StudentView};

use super::colors::SemanticStyle;

fn styled_table(columns: &[&str]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|col| {
            if super::no_color() {
                Cell::new(col)
            } else {
                Cell::new(col)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan)
            }
        })
        .collect();
    table.set_header(header_cells);

    table
}

/// Course listing: code, name, seats taken out of capacity.
pub fn course_table(courses: &[CourseView]) -> Table {
    let mut table = styled_table(&["Code", "Name", "Enrolled", "Capacity"]);

    for course in courses {
        let enrolled = Cell::new(course.enrolled).set_alignment(CellAlignment::Right);
        let enrolled = if course.seats_left() == 0 && !super::no_color() {
            enrolled.fg(Color::Yellow)
        } else {
            enrolled
        };
        table.add_row(vec![
            Cell::new(&course.course_id),
            Cell::new(&course.name),
            enrolled,
            Cell::new(course.capacity).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Student listing: ID, name, enrolled courses with their grades, overall grade.
pub fn student_table(students: &[StudentView]) -> Table {
    let mut table = styled_table(&["ID", "Name", "Courses (Grade)", "Overall Grade"]);

    for student in students {
        table.add_row(vec![
            Cell::new(student.student_id),
            Cell::new(&student.name),
            Cell::new(student.enrolled_label()),
            Cell::new(student.aggregate_label()).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Audit trail listing.
pub fn audit_table(entries: &[AuditEntry]) -> Table {
    let mut table = styled_table(&["#", "Action"]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.sequence).set_alignment(CellAlignment::Right),
            Cell::new(&entry.action),
        ]);
    }

    table
}

/// Creates a key-value info table (two columns: key and value).
pub fn info_table(entries: &[(&str, String)]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (key, value) in entries {
        let key_cell = if super::no_color() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }

    table
}

/// Prints a table followed by a muted footer line.
pub fn print_table_with_footer(table: &Table, footer: &str) {
    println!("{table}");
    println!("{}", footer.muted());
}
