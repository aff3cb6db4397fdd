use query_expr::{FieldSpec, Record};
use serde_json::Value;
use tabular::{Row, Table};

const NO_DATA: &str = "No data";
const MISSING_CELL: &str = "-";

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_CELL.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Renders the records as an aligned table, one column per declared field.
pub fn render_table(records: &[Record], spec: &FieldSpec) -> String {
    if records.is_empty() {
        return format!("{}\n", NO_DATA);
    }

    let columns = spec.field_names();
    let layout = vec!["{:<}"; columns.len()].join("  ");

    let header = columns
        .iter()
        .fold(Row::new(), |row, column| row.with_cell(column));
    let mut table = Table::new(&layout).with_row(header);
    for record in records {
        table.add_row(
            columns
                .iter()
                .fold(Row::new(), |row, column| row.with_cell(cell(record.get(column)))),
        );
    }
    table.to_string()
}

pub fn render_json(records: &[Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
