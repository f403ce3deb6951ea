pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// First array-of-objects field in a result (schedule entries, register
/// rows), which tabular formats render as their own table.
pub(crate) fn row_set(result: &serde_json::Map<String, Value>) -> Option<(&str, &[Value])> {
    ["entries", "assets", "schedule", "by_category"]
        .iter()
        .find_map(|key| match result.get(*key) {
            Some(Value::Array(rows)) if rows.first().is_some_and(Value::is_object) => {
                Some((*key, rows.as_slice()))
            }
            _ => None,
        })
}
