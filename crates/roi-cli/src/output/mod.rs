pub mod csv_out;
pub mod format;
pub mod labels;
pub mod minimal;
pub mod table;

pub use labels::Language;

use crate::OutputFormat;
use serde_json::Value;

/// Display preferences owned by the presentation layer.
pub struct Presentation {
    pub language: Language,
    pub currency_symbol: String,
}

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, presentation: &Presentation) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value, presentation),
        OutputFormat::Csv => csv_out::print_csv(value, presentation),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print the full envelope as JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Whether the projection carried a management fee, so the fee column is shown.
pub(crate) fn has_management_fee(envelope: &Value) -> bool {
    envelope
        .get("assumptions")
        .and_then(|a| a.get("management_fees_rate"))
        .is_some_and(|rate| !rate.is_null())
}

/// Ledger fields to render for this projection, in display order.
pub(crate) fn ledger_columns(envelope: &Value) -> Vec<(&'static str, labels::ColumnKind)> {
    let with_fee = has_management_fee(envelope);
    labels::LEDGER_COLUMNS
        .iter()
        .copied()
        .filter(|(key, _)| with_fee || *key != "management_fee")
        .collect()
}
