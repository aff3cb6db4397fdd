use crate::CliError;
use log::debug;
use query_expr::Record;
use serde_json::Value;
use std::io::Read;

pub const STDIN_INPUT: &str = "-";

/// Reads the records to show from a file, or from stdin when `input` is `-`.
pub fn load_records(input: &str) -> Result<Vec<Record>, CliError> {
    let raw = if input == STDIN_INPUT {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map(|_| raw)
            .map_err(|e| CliError::InputRead {
                input: "<stdin>".to_string(),
                source: e,
            })?
    } else {
        fs_err::read_to_string(input).map_err(|e| CliError::InputRead {
            input: input.to_string(),
            source: e,
        })?
    };
    parse_records(input, &raw)
}

/// Parses a JSON array of flat objects, as produced by the API layer.
pub fn parse_records(input: &str, raw: &str) -> Result<Vec<Record>, CliError> {
    let invalid = |reason: String| CliError::InvalidRecords {
        input: input.to_string(),
        reason,
    };

    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            return Err(invalid(format!(
                "expected a JSON array of records, found {}",
                json_kind(&other)
            )))
        }
        Err(e) => return Err(invalid(e.to_string())),
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(invalid(format!(
                "record #{} is {}, expected an object",
                index,
                json_kind(&other)
            ))),
        })
        .collect::<Result<Vec<Record>, CliError>>()?;

    debug!("Loaded {} records from {}", records.len(), input);
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
