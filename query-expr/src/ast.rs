use crate::{coerce, normalize, FieldSpec, QueryError, Record, Scalar};
use log::debug;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

/// Binary comparison operator of a single filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    Like,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Like,
    ];

    pub fn supported() -> Vec<String> {
        Self::ALL.iter().map(|op| op.to_string()).collect()
    }

    /// Applies the operator with the record value on the left and the condition on the right.
    ///
    /// `like` holds when the condition's text is contained in the value's text.
    pub fn apply(&self, value: &Scalar, condition: &Scalar) -> bool {
        match self {
            Operator::LessThan => value < condition,
            Operator::LessThanOrEqual => value <= condition,
            Operator::GreaterThan => value > condition,
            Operator::GreaterThanOrEqual => value >= condition,
            Operator::Equal => value == condition,
            Operator::NotEqual => value != condition,
            Operator::Like => value.to_string().contains(&condition.to_string()),
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Operator::LessThan),
            "<=" => Ok(Operator::LessThanOrEqual),
            ">" => Ok(Operator::GreaterThan),
            ">=" => Ok(Operator::GreaterThanOrEqual),
            "==" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            "like" => Ok(Operator::Like),
            _ => Err(QueryError::UnsupportedOperator(s.to_string())),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::LessThan => write!(f, "<"),
            Operator::LessThanOrEqual => write!(f, "<="),
            Operator::GreaterThan => write!(f, ">"),
            Operator::GreaterThanOrEqual => write!(f, ">="),
            Operator::Equal => write!(f, "=="),
            Operator::NotEqual => write!(f, "!="),
            Operator::Like => write!(f, "like"),
        }
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperator {
    And,
    Or,
}

impl GroupOperator {
    const AND_SPELLINGS: [&'static str; 3] = ["AND", "and", "&&"];
    const OR_SPELLINGS: [&'static str; 3] = ["OR", "or", "||"];

    pub fn supported() -> Vec<&'static str> {
        Self::AND_SPELLINGS
            .iter()
            .chain(Self::OR_SPELLINGS.iter())
            .copied()
            .collect()
    }

    pub fn combine(&self, left: bool, right: bool) -> bool {
        match self {
            GroupOperator::And => left && right,
            GroupOperator::Or => left || right,
        }
    }
}

impl FromStr for GroupOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::AND_SPELLINGS.contains(&s) {
            Ok(GroupOperator::And)
        } else if Self::OR_SPELLINGS.contains(&s) {
            Ok(GroupOperator::Or)
        } else {
            Err(QueryError::UnsupportedGroupOperator(s.to_string()))
        }
    }
}

impl std::fmt::Display for GroupOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupOperator::And => write!(f, "AND"),
            GroupOperator::Or => write!(f, "OR"),
        }
    }
}

impl Serialize for GroupOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parsed filter expression: a single comparison or a binary group of filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Comparison {
        field: String,
        operator: Operator,
        condition: String,
    },
    Group {
        left: Box<Filter>,
        operator: GroupOperator,
        right: Box<Filter>,
    },
}

impl Filter {
    pub fn comparison(field: impl Into<String>, operator: Operator, condition: impl Into<String>) -> Self {
        Filter::Comparison {
            field: field.into(),
            operator,
            condition: condition.into(),
        }
    }

    pub fn group(left: Filter, operator: GroupOperator, right: Filter) -> Self {
        Filter::Group {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// Evaluates the filter against one record.
    ///
    /// Both sides of a group are always evaluated so that an error anywhere in the
    /// expression surfaces regardless of the other side's result.
    pub fn evaluate(&self, record: &Record, spec: &FieldSpec) -> Result<bool, QueryError> {
        match self {
            Filter::Comparison {
                field,
                operator,
                condition,
            } => {
                let value = lookup(record, field, spec)?;
                let value = coerce(&normalize(value), field, spec)?;
                let condition = coerce(&normalize(&Value::String(condition.clone())), field, spec)?;
                Ok(operator.apply(&value, &condition))
            }
            Filter::Group {
                left,
                operator,
                right,
            } => {
                let left = left.evaluate(record, spec)?;
                let right = right.evaluate(record, spec)?;
                Ok(operator.combine(left, right))
            }
        }
    }
}

/// Fetches a field from a record; absent and null values are reported as missing.
pub(crate) fn lookup<'a>(
    record: &'a Record,
    field: &str,
    spec: &FieldSpec,
) -> Result<&'a Value, QueryError> {
    match record.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => {
            let available = if spec.is_empty() {
                record.keys().cloned().collect()
            } else {
                spec.field_names()
            };
            Err(QueryError::MissingField {
                field: field.to_string(),
                available,
            })
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Comparison {
                field,
                operator,
                condition,
            } => write!(f, "{} {} {}", field, operator, condition),
            Filter::Group {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
        }
    }
}

/// Applies a parsed filter to a sequence of records.
#[derive(Debug, Clone)]
pub struct Filtering {
    pub filter: Filter,
}

impl Filtering {
    pub fn new(filter: Filter) -> Self {
        Self { filter }
    }

    /// Keeps, in their original order, the records matching the filter.
    /// The first evaluation error aborts the whole operation.
    pub fn apply(&self, records: Vec<Record>, spec: &FieldSpec) -> Result<Vec<Record>, QueryError> {
        let total = records.len();
        let mut kept = Vec::with_capacity(total);
        for record in records {
            if self.filter.evaluate(&record, spec)? {
                kept.push(record);
            }
        }
        debug!("Filter [{}] kept {} of {} records", self.filter, kept.len(), total);
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldType;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    fn spec() -> FieldSpec {
        FieldSpec::new()
            .with("test_field", FieldType::Int)
            .with("other_field", FieldType::Str)
            .with("third_field", FieldType::Bool)
    }

    #[test]
    fn test_binary_operators() {
        let (five, six) = (Scalar::Int(5), Scalar::Int(6));
        let abc = Scalar::Str("a-b-c".to_string());

        assert!(Operator::LessThan.apply(&five, &six));
        assert!(Operator::LessThanOrEqual.apply(&five, &five));
        assert!(Operator::GreaterThan.apply(&six, &five));
        assert!(Operator::GreaterThanOrEqual.apply(&five, &five));
        assert!(Operator::Equal.apply(&abc, &Scalar::Str("a-b-c".into())));
        assert!(Operator::NotEqual.apply(&abc, &Scalar::Str("-c-".into())));
        assert!(Operator::Like.apply(&abc, &Scalar::Str("-b-".into())));

        assert!(!Operator::LessThan.apply(&six, &six));
        assert!(!Operator::LessThanOrEqual.apply(&six, &five));
        assert!(!Operator::GreaterThan.apply(&five, &six));
        assert!(!Operator::GreaterThanOrEqual.apply(&five, &six));
        assert!(!Operator::Equal.apply(&abc, &Scalar::Str("-c-".into())));
        assert!(!Operator::NotEqual.apply(&abc, &Scalar::Str("a-b-c".into())));
        assert!(!Operator::Like.apply(&abc, &Scalar::Str("-c-".into())));
    }

    #[test]
    fn test_like_searches_condition_inside_value() {
        let value = Scalar::Str("some-test-value".into());
        let condition = Scalar::Str("test".into());
        assert!(Operator::Like.apply(&value, &condition));
        assert!(!Operator::Like.apply(&condition, &value));
    }

    #[test]
    fn test_operator_spellings() {
        assert_eq!(
            Operator::supported(),
            vec!["<", "<=", ">", ">=", "==", "!=", "like"]
        );
        for op in Operator::ALL {
            assert_eq!(op.to_string().parse::<Operator>(), Ok(op));
        }
        assert_eq!(
            "?".parse::<Operator>(),
            Err(QueryError::UnsupportedOperator("?".to_string()))
        );
        assert!("LIKE".parse::<Operator>().is_err());
    }

    #[test]
    fn test_group_operator_spellings() {
        assert_eq!(
            GroupOperator::supported(),
            vec!["AND", "and", "&&", "OR", "or", "||"]
        );
        for spelling in ["AND", "and", "&&"] {
            assert_eq!(spelling.parse::<GroupOperator>(), Ok(GroupOperator::And));
        }
        for spelling in ["OR", "or", "||"] {
            assert_eq!(spelling.parse::<GroupOperator>(), Ok(GroupOperator::Or));
        }
        assert_eq!(
            "?".parse::<GroupOperator>(),
            Err(QueryError::UnsupportedGroupOperator("?".to_string()))
        );
    }

    #[test]
    fn test_comparison_evaluation() {
        let spec = spec();
        let filter = Filter::comparison("test_field", Operator::GreaterThan, "42");
        assert_eq!(filter.evaluate(&record(json!({"test_field": 50})), &spec), Ok(true));
        assert_eq!(filter.evaluate(&record(json!({"test_field": 40})), &spec), Ok(false));

        let filter = Filter::comparison("other_field", Operator::Like, "-b-");
        assert_eq!(filter.evaluate(&record(json!({"other_field": "a-b-c"})), &spec), Ok(true));
        assert_eq!(filter.evaluate(&record(json!({"other_field": "other"})), &spec), Ok(false));
    }

    #[test]
    fn test_comparison_normalizes_both_sides() {
        let spec = FieldSpec::new()
            .with("size", FieldType::Int)
            .with("interval", FieldType::Int);

        let filter = Filter::comparison("size", Operator::GreaterThanOrEqual, "2kb");
        assert_eq!(filter.evaluate(&record(json!({"size": "3 KB"})), &spec), Ok(true));
        assert_eq!(filter.evaluate(&record(json!({"size": 1024})), &spec), Ok(false));

        let filter = Filter::comparison("interval", Operator::LessThan, "0:10:00");
        assert_eq!(filter.evaluate(&record(json!({"interval": "0:05:00"})), &spec), Ok(true));
        assert_eq!(
            filter.evaluate(&record(json!({"interval": "1 day, 0:00:00"})), &spec),
            Ok(false)
        );
    }

    #[test]
    fn test_comparison_fails_on_missing_field() {
        let spec = spec();
        let filter = Filter::comparison("missing_field", Operator::GreaterThan, "42");
        let result = filter.evaluate(&record(json!({"test_field": 50, "other_field": 40})), &spec);
        assert_eq!(
            result,
            Err(QueryError::MissingField {
                field: "missing_field".to_string(),
                available: vec![
                    "test_field".to_string(),
                    "other_field".to_string(),
                    "third_field".to_string()
                ],
            })
        );

        let filter = Filter::comparison("test_field", Operator::GreaterThan, "42");
        assert!(matches!(
            filter.evaluate(&record(json!({"test_field": null})), &spec),
            Err(QueryError::MissingField { .. })
        ));
    }

    #[test]
    fn test_missing_field_without_spec_lists_record_keys() {
        let filter = Filter::comparison("missing_field", Operator::Equal, "1");
        let result = filter.evaluate(&record(json!({"a": 1, "b": 2})), &FieldSpec::new());
        assert_eq!(
            result,
            Err(QueryError::MissingField {
                field: "missing_field".to_string(),
                available: vec!["a".to_string(), "b".to_string()],
            })
        );
    }

    #[test]
    fn test_comparison_fails_on_bad_literal() {
        let spec = spec();
        let filter = Filter::comparison("third_field", Operator::Equal, "maybe");
        assert!(matches!(
            filter.evaluate(&record(json!({"third_field": true})), &spec),
            Err(QueryError::UnsupportedValue { .. })
        ));

        let filter = Filter::comparison("test_field", Operator::Equal, "many");
        assert!(matches!(
            filter.evaluate(&record(json!({"test_field": 1})), &spec),
            Err(QueryError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_group_evaluation() {
        let spec = spec();
        let or_group = Filter::group(
            Filter::comparison("test_field", Operator::GreaterThan, "42"),
            GroupOperator::Or,
            Filter::comparison("other_field", Operator::Like, "test"),
        );
        let and_group = Filter::group(
            Filter::comparison("test_field", Operator::GreaterThan, "42"),
            GroupOperator::And,
            Filter::comparison("other_field", Operator::Like, "test"),
        );

        let cases = [
            (json!({"test_field": 50, "other_field": "some-test-value"}), true, true),
            (json!({"test_field": 50, "other_field": "some-value"}), true, false),
            (json!({"test_field": 40, "other_field": "some-test-value"}), true, false),
            (json!({"test_field": 40, "other_field": "some-value"}), false, false),
        ];
        for (entry, expected_or, expected_and) in cases {
            let entry = record(entry);
            assert_eq!(or_group.evaluate(&entry, &spec), Ok(expected_or));
            assert_eq!(and_group.evaluate(&entry, &spec), Ok(expected_and));
        }
    }

    #[test]
    fn test_group_evaluates_both_sides() {
        let spec = spec();
        let group = Filter::group(
            Filter::comparison("test_field", Operator::GreaterThan, "42"),
            GroupOperator::Or,
            Filter::comparison("missing_field", Operator::Equal, "1"),
        );
        assert!(matches!(
            group.evaluate(&record(json!({"test_field": 50})), &spec),
            Err(QueryError::MissingField { field, .. }) if field == "missing_field"
        ));
    }

    #[test]
    fn test_filter_display_and_serialization() {
        let group = Filter::group(
            Filter::comparison("test_field", Operator::GreaterThan, "42"),
            GroupOperator::Or,
            Filter::comparison("other_field", Operator::Like, "test"),
        );
        assert_eq!(group.to_string(), "(test_field > 42 OR other_field like test)");
        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            json!({
                "left": {"field": "test_field", "operator": ">", "condition": "42"},
                "operator": "OR",
                "right": {"field": "other_field", "operator": "like", "condition": "test"}
            })
        );
    }

    #[test]
    fn test_filtering_keeps_order_and_propagates_errors() {
        let spec = spec();
        let records = vec![
            record(json!({"test_field": 50, "other_field": "a"})),
            record(json!({"test_field": 40, "other_field": "b"})),
            record(json!({"test_field": 60, "other_field": "c"})),
        ];

        let filtering = Filtering::new(Filter::comparison("test_field", Operator::GreaterThan, "42"));
        let kept = filtering.apply(records.clone(), &spec).unwrap();
        assert_eq!(kept, vec![records[0].clone(), records[2].clone()]);

        let filtering = Filtering::new(Filter::comparison("nope", Operator::GreaterThan, "42"));
        assert!(filtering.apply(records, &spec).is_err());
    }
}
