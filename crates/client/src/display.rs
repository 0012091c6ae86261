//! Terminal rendering of document views and record lists.

use formscan_core::document::view::{Rendered, TableRow};
use formscan_core::{Record, RecordListEntry};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a projection for the terminal.
pub fn rendered(view: &Rendered) -> String {
    match view {
        Rendered::Text(text) => text.clone(),
        Rendered::Table(rows) => table(rows),
    }
}

/// Two-column field/value grid.
pub fn table(rows: &[TableRow]) -> String {
    if rows.is_empty() {
        return "No tabular data available".to_string();
    }
    let width = rows
        .iter()
        .map(|r| r.field.chars().count())
        .max()
        .unwrap_or(0)
        .max("Field".len());
    let mut out = format!("{:<width$}  Value\n", "Field");
    out.push_str(&format!("{}  {}\n", "-".repeat(width), "-".repeat(5)));
    for row in rows {
        // Multi-line values keep the grid readable by indenting continuation lines.
        let mut lines = row.value.lines();
        let first = lines.next().unwrap_or("");
        out.push_str(&format!("{:<width$}  {first}\n", row.field));
        for line in lines {
            out.push_str(&format!("{:<width$}  {line}\n", ""));
        }
    }
    out.pop();
    out
}

pub fn entries(entries: &[RecordListEntry]) -> String {
    if entries.is_empty() {
        return "No records found. Upload a form to get started!".to_string();
    }
    let mut out = format!("{:>6}  {:<19}  {:<19}  Filename\n", "ID", "Created", "Updated");
    for e in entries {
        out.push_str(&format!(
            "{:>6}  {}  {}  {}\n",
            e.id,
            e.created_at.format(TIMESTAMP_FORMAT),
            e.updated_at.format(TIMESTAMP_FORMAT),
            e.original_filename
        ));
    }
    out.push_str(&format!("\nTotal Records: {}", entries.len()));
    out
}

/// Header block shown above a record's document.
pub fn record_header(record: &Record) -> String {
    format!(
        "Record #{}\nFilename: {}\nCreated:  {}\nUpdated:  {}",
        record.id,
        record.original_filename,
        record.created_at.format(TIMESTAMP_FORMAT),
        record.updated_at.format(TIMESTAMP_FORMAT),
    )
}
