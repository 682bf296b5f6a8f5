//! Terminal tables for mapping, preview, and validation results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use roster_model::{
    ColumnMapping, FieldSchema, IssueReason, MappingSuggestion, ValidationReport,
    ValidationSummary, ValidationWarning,
};

use crate::preview::Preview;

/// Canonical fields with the column chosen for each and how it was found.
pub fn mapping_table(
    schema: &FieldSchema,
    mapping: &ColumnMapping,
    suggestions: &[MappingSuggestion],
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Required"),
        header_cell("Column"),
        header_cell("Match"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for field in schema.fields() {
        let column = mapping.get(&field.id);
        let suggestion = suggestions
            .iter()
            .find(|suggestion| suggestion.field == field.id);
        let match_cell = match (column, suggestion) {
            (Some(column), Some(found)) if found.column == column => {
                Cell::new(format!("{} ({:.0}%)", found.kind, found.confidence * 100.0))
            }
            (Some(_), _) => Cell::new("manual").fg(Color::Blue),
            (None, _) => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&field.id).add_attribute(Attribute::Bold),
            Cell::new(&field.label),
            required_cell(field.required),
            column_cell(column, field.required),
            match_cell,
        ]);
    }
    table
}

/// Preview rows with one column per canonical field and a status column.
pub fn preview_table(schema: &FieldSchema, preview: &Preview, report: &ValidationReport) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(schema.fields().iter().map(|field| header_cell(&field.label)));
    header.push(header_cell("Status"));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, schema.len() + 1, CellAlignment::Center);

    for record in &preview.rows {
        let mut row = vec![dim_cell(record.index + 1)];
        for field in schema.fields() {
            let flagged = report
                .issues_for(record.index)
                .any(|issue| issue.field == field.id);
            let cell = match record.get(&field.id) {
                Some(value) if flagged => Cell::new(value).fg(Color::Red),
                Some(value) => Cell::new(value),
                None if flagged => Cell::new("(missing)").fg(Color::Red),
                None => dim_cell("-"),
            };
            row.push(cell);
        }
        row.push(status_cell(report.is_valid(record.index)));
        table.add_row(row);
    }
    table
}

/// Total, valid and invalid record counts.
pub fn summary_table(summary: &ValidationSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Total"),
        header_cell("Valid"),
        header_cell("Invalid"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.total_records).add_attribute(Attribute::Bold),
        count_cell(summary.valid_count, Color::Green),
        count_cell(summary.invalid_count, Color::Red),
    ]);
    table
}

/// One row per record issue; `None` when every record is valid.
pub fn issue_table(report: &ValidationReport) -> Option<Table> {
    if report.issues.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record"),
        header_cell("Field"),
        header_cell("Problem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for issue in &report.issues {
        table.add_row(vec![
            Cell::new(issue.record_index + 1),
            Cell::new(&issue.field).fg(Color::Blue),
            reason_cell(&issue.reason),
        ]);
    }
    Some(table)
}

/// Dataset-level warnings; `None` when there are none.
pub fn warning_table(warnings: &[ValidationWarning]) -> Option<Table> {
    if warnings.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Warning")]);
    apply_table_style(&mut table);
    for warning in warnings {
        table.add_row(vec![Cell::new(warning.to_string()).fg(Color::Yellow)]);
    }
    Some(table)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() == 3 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(70)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn required_cell(required: bool) -> Cell {
    if required {
        Cell::new("yes").fg(Color::Yellow)
    } else {
        dim_cell("no")
    }
}

fn column_cell(column: Option<&str>, required: bool) -> Cell {
    match column {
        Some(column) => Cell::new(column).fg(Color::Green),
        None if required => Cell::new("(unmapped)")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => dim_cell("(unmapped)"),
    }
}

fn status_cell(valid: bool) -> Cell {
    if valid {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗").fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn reason_cell(reason: &IssueReason) -> Cell {
    match reason {
        IssueReason::Missing => Cell::new(reason.to_string()).fg(Color::Red),
        _ => Cell::new(reason.to_string()).fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
