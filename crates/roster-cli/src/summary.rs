use comfy_table::{Attribute, Cell, Color, Table};

use roster_core::{AnalysisPanel, ImportStep};
use roster_model::FieldSchema;
use roster_report::{
    PREVIEW_LIMIT, Preview, apply_table_style, issue_table, mapping_table, preview_table,
    summary_table, warning_table,
};

/// Print mapping, validation, preview and analysis for the current session.
pub fn print_import(step: &ImportStep) {
    let Some(session) = step.session() else {
        println!("No file uploaded.");
        return;
    };
    println!("File: {}", session.file_name);
    println!("Fingerprint: {}", session.fingerprint);
    println!(
        "Columns: {}",
        if session.headers.is_empty() {
            "-".to_string()
        } else {
            session.headers.join(", ")
        }
    );

    println!();
    println!("Field mapping:");
    println!(
        "{}",
        mapping_table(step.schema(), &session.mapping, &session.suggestions)
    );

    println!();
    println!("Validation summary:");
    println!("{}", summary_table(&session.report.summary));
    if let Some(table) = warning_table(&session.report.warnings) {
        println!();
        println!("Warnings:");
        println!("{table}");
    }
    if let Some(table) = issue_table(&session.report) {
        println!();
        println!("Issues:");
        println!("{table}");
    }

    match Preview::build(&session.participants, PREVIEW_LIMIT) {
        Some(preview) => {
            println!();
            println!("Data preview:");
            println!(
                "{}",
                preview_table(step.schema(), &preview, &session.report)
            );
            if let Some(indicator) = preview.indicator() {
                println!("{indicator}");
            }
        }
        None => {
            println!();
            println!("No data rows found. Upload a file with at least one row below the header.");
        }
    }

    print_analysis(step.analysis());
}

fn print_analysis(panel: &AnalysisPanel) {
    match panel {
        AnalysisPanel::Idle => {}
        AnalysisPanel::Completed { analysis } => {
            println!();
            println!("Analysis:");
            println!("{analysis}");
        }
        AnalysisPanel::Failed { message, fallback } => {
            eprintln!();
            eprintln!("Analysis failed: {message}");
            println!("{fallback}");
        }
    }
}

/// Table of the canonical fields of `schema`.
pub fn fields_table(schema: &FieldSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Kind"),
        header_cell("Required"),
        header_cell("Custom"),
        header_cell("Also matches"),
    ]);
    apply_table_style(&mut table);
    for field in schema.fields() {
        table.add_row(vec![
            Cell::new(&field.id).add_attribute(Attribute::Bold),
            Cell::new(&field.label),
            Cell::new(field.kind),
            yes_no_cell(field.required),
            yes_no_cell(field.custom),
            if field.aliases.is_empty() {
                Cell::new("-").fg(Color::DarkGrey)
            } else {
                Cell::new(field.aliases.join(", "))
            },
        ]);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn yes_no_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::DarkGrey)
    }
}
