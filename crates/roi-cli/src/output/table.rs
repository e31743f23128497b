use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format::{format_money, format_percent, format_rate, format_value, parse_decimal};
use super::labels::ColumnKind;
use super::{ledger_columns, Presentation};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value, presentation: &Presentation) {
    let Some(result) = value.get("result") else {
        print_flat_object(value);
        return;
    };

    if result.get("years").is_some() {
        print_ledger(value, result, presentation);
    } else if result.get("matrix").is_some() {
        print_sensitivity(result);
    } else {
        print_flat_object(result);
    }

    print_warnings(value, presentation);

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_ledger(envelope: &Value, result: &Value, presentation: &Presentation) {
    let labels = presentation.language.labels();
    let mut builder = Builder::default();
    for row in ledger_rows(envelope, result, presentation) {
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));

    if let Some(roi) = result.get("global_roi").and_then(parse_decimal) {
        println!("\n{}: {}", labels.global_roi, format_percent(roi));
    }
    if let Some(profit) = result.get("global_profit").and_then(parse_decimal) {
        println!(
            "{}: {}",
            labels.global_profit,
            format_money(profit, &presentation.currency_symbol)
        );
    }
}

/// Header, one row per year, then the totals row, all as display strings.
pub(crate) fn ledger_rows(
    envelope: &Value,
    result: &Value,
    presentation: &Presentation,
) -> Vec<Vec<String>> {
    let labels = presentation.language.labels();
    let columns = ledger_columns(envelope);

    let mut rows = Vec::new();
    rows.push(
        columns
            .iter()
            .map(|(key, _)| labels.column(key).to_string())
            .collect(),
    );

    if let Some(Value::Array(years)) = result.get("years") {
        for year in years {
            rows.push(
                columns
                    .iter()
                    .map(|(key, kind)| render_cell(year.get(*key), *kind, presentation))
                    .collect(),
            );
        }
    }

    if let Some(totals) = result.get("totals") {
        rows.push(
            columns
                .iter()
                .map(|(key, kind)| match kind {
                    ColumnKind::Year => labels.total.to_string(),
                    // No meaningful aggregate for a rate
                    ColumnKind::Rate => String::new(),
                    ColumnKind::Money => render_cell(totals.get(*key), *kind, presentation),
                })
                .collect(),
        );
    }

    rows
}

fn render_cell(value: Option<&Value>, kind: ColumnKind, presentation: &Presentation) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match (kind, parse_decimal(value)) {
        (ColumnKind::Money, Some(amount)) => format_money(amount, &presentation.currency_symbol),
        (ColumnKind::Rate, Some(rate)) => format_rate(rate),
        _ => format_value(value),
    }
}

fn print_sensitivity(result: &Value) {
    let row_name = result
        .get("variable_1_name")
        .and_then(Value::as_str)
        .unwrap_or("variable_1");
    let row_values = result
        .get("variable_1_values")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let col_values = result
        .get("variable_2_values")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let metric = result
        .get("output_metric")
        .map(format_value)
        .unwrap_or_default();

    let mut builder = Builder::default();
    let mut header = vec![row_name.to_string()];
    if col_values.is_empty() {
        header.push(metric);
    } else {
        header.extend(col_values.iter().map(format_value));
    }
    builder.push_record(header);

    if let Some(Value::Array(matrix)) = result.get("matrix") {
        for (row_value, row) in row_values.iter().zip(matrix) {
            let mut record = vec![format_value(row_value)];
            if let Value::Array(cells) = row {
                record.extend(cells.iter().map(format_value));
            }
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}

fn print_warnings(envelope: &Value, presentation: &Presentation) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}:", presentation.language.labels().warnings);
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Language;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn envelope(management_fee: bool) -> Value {
        let fee_rate = if management_fee {
            json!("0.1")
        } else {
            Value::Null
        };
        json!({
            "result": {
                "years": [
                    {
                        "year": 0, "property_value": "165000", "appreciation_rate": "0",
                        "appreciation_amount": "0", "rental_income": "0", "management_fee": "0",
                        "maintenance_expense": "0", "instalment_payment": "0",
                        "net_profit": "-57750", "remaining_debt": "107250"
                    },
                    {
                        "year": 1, "property_value": "186450", "appreciation_rate": "0.13",
                        "appreciation_amount": "21450", "rental_income": "0", "management_fee": "0",
                        "maintenance_expense": "0", "instalment_payment": "24750",
                        "net_profit": "-3300", "remaining_debt": "82500"
                    }
                ],
                "totals": {
                    "property_value": "186450", "appreciation_amount": "21450",
                    "rental_income": "0", "management_fee": "0", "maintenance_expense": "0",
                    "instalment_payment": "24750", "net_profit": "-61050",
                    "remaining_debt": "82500"
                },
                "global_roi": "-48.2",
                "global_profit": "-39600"
            },
            "assumptions": {
                "management_fees_rate": fee_rate
            },
            "warnings": []
        })
    }

    fn presentation(language: Language) -> Presentation {
        Presentation {
            language,
            currency_symbol: "£".into(),
        }
    }

    #[test]
    fn test_ledger_rows_english() {
        let env = envelope(false);
        let rows = ledger_rows(&env, &env["result"], &presentation(Language::En));

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], "Year");
        assert_eq!(rows[0].len(), 9);
        assert!(!rows[0].contains(&"Management Fees".to_string()));
        assert_eq!(
            rows[2],
            vec![
                "1", "£186,450", "13.0", "£21,450", "£0", "£0", "£24,750", "-£3,300", "£82,500"
            ]
        );
        assert_eq!(rows[3][0], "Total");
        assert_eq!(rows[3][2], "");
        assert_eq!(rows[3][7], "-£61,050");
    }

    #[test]
    fn test_ledger_rows_turkish_with_fee_column() {
        let env = envelope(true);
        let rows = ledger_rows(&env, &env["result"], &presentation(Language::Tr));

        assert_eq!(rows[0].len(), 10);
        assert_eq!(rows[0][0], "Yıl");
        assert_eq!(rows[0][5], "Yönetim Ücreti");
        assert_eq!(rows[3][0], "Toplam");
    }
}
