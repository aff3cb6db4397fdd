use crate::{FieldSpec, FieldType, QueryError, Scalar};
use serde_json::Value;

/// Converts a (normalized) value into the type declared for `field` by `spec`.
///
/// Both filter conditions and record values go through here, so the two sides of
/// every comparison and every sort key of a query share a single type.
pub fn coerce(value: &Value, field: &str, spec: &FieldSpec) -> Result<Scalar, QueryError> {
    let field_type = spec
        .get(field)
        .ok_or_else(|| QueryError::UnsupportedFieldType {
            field: field.to_string(),
            declared: None,
        })?;
    coerce_to(value, field, field_type)
}

fn coerce_to(value: &Value, field: &str, field_type: FieldType) -> Result<Scalar, QueryError> {
    let invalid_literal = || QueryError::InvalidLiteral {
        field: field.to_string(),
        expected: field_type.to_string(),
        value: display_value(value),
    };

    match field_type {
        FieldType::Bool => match value {
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Scalar::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Scalar::Bool(false)),
            other => Err(QueryError::UnsupportedValue {
                field: field.to_string(),
                value: display_value(other),
            }),
        },
        FieldType::Int => match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map(Scalar::Int)
                .ok_or_else(invalid_literal),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Scalar::Int)
                .map_err(|_| invalid_literal()),
            _ => Err(invalid_literal()),
        },
        FieldType::Float => match value {
            Value::Number(n) => n.as_f64().map(Scalar::Float).ok_or_else(invalid_literal),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Scalar::Float)
                .map_err(|_| invalid_literal()),
            _ => Err(invalid_literal()),
        },
        FieldType::Str => Ok(Scalar::Str(display_value(value))),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
