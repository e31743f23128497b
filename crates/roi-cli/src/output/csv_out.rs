use serde_json::Value;
use std::io;

use super::format::format_value;
use super::labels::ColumnKind;
use super::{ledger_columns, Presentation};

/// Write output as CSV to stdout.
///
/// Projections are written as the annual ledger with localised headers and a
/// totals row; amounts stay unformatted so the file can be re-read as numbers.
pub fn print_csv(value: &Value, presentation: &Presentation) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value.get("result") {
        Some(result) if result.get("years").is_some() => {
            for record in ledger_records(value, result, presentation) {
                let _ = wtr.write_record(&record);
            }
        }
        Some(result) if result.get("matrix").is_some() => {
            write_matrix(&mut wtr, result);
        }
        Some(Value::Object(result)) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in result {
                let _ = wtr.write_record([key.as_str(), &format_value(val)]);
            }
        }
        _ => {
            let _ = wtr.write_record([&format_value(value)]);
        }
    }

    let _ = wtr.flush();
}

pub(crate) fn ledger_records(
    envelope: &Value,
    result: &Value,
    presentation: &Presentation,
) -> Vec<Vec<String>> {
    let labels = presentation.language.labels();
    let columns = ledger_columns(envelope);

    let mut records = vec![columns
        .iter()
        .map(|(key, _)| labels.column(key).to_string())
        .collect::<Vec<_>>()];

    if let Some(Value::Array(years)) = result.get("years") {
        for year in years {
            records.push(
                columns
                    .iter()
                    .map(|(key, _)| year.get(*key).map(format_value).unwrap_or_default())
                    .collect(),
            );
        }
    }

    if let Some(totals) = result.get("totals") {
        records.push(
            columns
                .iter()
                .map(|(key, kind)| match kind {
                    ColumnKind::Year => labels.total.to_string(),
                    ColumnKind::Rate => String::new(),
                    ColumnKind::Money => totals.get(*key).map(format_value).unwrap_or_default(),
                })
                .collect(),
        );
    }

    records
}

fn write_matrix(wtr: &mut csv::Writer<io::StdoutLock<'_>>, result: &Value) {
    let row_name = result
        .get("variable_1_name")
        .map(format_value)
        .unwrap_or_default();
    let col_values: Vec<String> = result
        .get("variable_2_values")
        .and_then(Value::as_array)
        .map(|vals| vals.iter().map(format_value).collect())
        .unwrap_or_default();

    let mut header = vec![row_name];
    if col_values.is_empty() {
        header.push(
            result
                .get("output_metric")
                .map(format_value)
                .unwrap_or_default(),
        );
    } else {
        header.extend(col_values);
    }
    let _ = wtr.write_record(&header);

    let row_values = result.get("variable_1_values").and_then(Value::as_array);
    let matrix = result.get("matrix").and_then(Value::as_array);
    if let (Some(row_values), Some(matrix)) = (row_values, matrix) {
        for (row_value, row) in row_values.iter().zip(matrix) {
            let mut record = vec![format_value(row_value)];
            if let Some(cells) = row.as_array() {
                record.extend(cells.iter().map(format_value));
            }
            let _ = wtr.write_record(&record);
        }
    }
}
