//! Output formatting for CLI commands.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use tallyring_common::types::Value;

/// Output format selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Json,
}

impl From<crate::OutputFormat> for Format {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Table => Format::Table,
            crate::OutputFormat::Json => Format::Json,
        }
    }
}

/// Print data as pretty JSON (respects quiet mode).
pub fn print_json<T: Serialize>(data: &T, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("{}", serde_json::to_string_pretty(data)?);
    }
    Ok(())
}

/// Create a styled table with consistent formatting.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

/// Add a header row to a table.
pub fn add_header(table: &mut Table, headers: &[&str]) {
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

/// Build a two-column key-value table.
pub fn key_value_table(headers: &[&str; 2], items: &[(&str, String)]) -> Table {
    let mut table = create_table();
    add_header(&mut table, headers);
    for (key, value) in items {
        table.add_row(vec![Cell::new(key).fg(Color::Green), Cell::new(value)]);
    }
    table
}

/// Print a key-value table.
pub fn print_key_value_table(headers: &[&str; 2], items: &[(&str, String)], quiet: bool) {
    if !quiet {
        println!("{}", key_value_table(headers, items));
    }
}

/// Print records oldest first, numbered from 0.
pub fn print_records_table(records: &[Value], quiet: bool) {
    if quiet {
        return;
    }
    let mut table = create_table();
    add_header(&mut table, &["#", "Record", "Type"]);
    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(record),
            Cell::new(record.type_name()).fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
}
