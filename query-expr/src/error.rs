/// Failures produced while parsing, evaluating or sorting with query expressions.
///
/// Every variant is fatal for the command that triggered it; there is no
/// skip-and-continue mode.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The filter string does not conform to the expression grammar.
    Parse { message: String },
    UnsupportedOperator(String),
    UnsupportedGroupOperator(String),
    /// The referenced field is absent (or null) in a record.
    MissingField {
        field: String,
        available: Vec<String>,
    },
    /// A literal could not be converted to a boolean.
    UnsupportedValue { field: String, value: String },
    /// A literal could not be converted to a number.
    InvalidLiteral {
        field: String,
        expected: String,
        value: String,
    },
    /// The field has no declared type, or the declared type is not one of
    /// `bool`, `int`, `float` or `str`.
    UnsupportedFieldType {
        field: String,
        declared: Option<String>,
    },
    Usage(String),
}

impl QueryError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        QueryError::Parse {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Parse { message } => write!(f, "Invalid filter expression: {}", message),
            QueryError::UnsupportedOperator(op) => {
                write!(f, "Unsupported filter binary operator encountered: [{}]", op)
            }
            QueryError::UnsupportedGroupOperator(op) => {
                write!(f, "Unsupported filter group operator encountered: [{}]", op)
            }
            QueryError::MissingField { field, available } => write!(
                f,
                "No value found for field [{}]; available fields are: [{}]",
                field,
                available.join(", ")
            ),
            QueryError::UnsupportedValue { field, value } => write!(
                f,
                "Cannot convert [{}] to boolean for field [{}]",
                value, field
            ),
            QueryError::InvalidLiteral {
                field,
                expected,
                value,
            } => write!(
                f,
                "Cannot convert [{}] to {} for field [{}]",
                value, expected, field
            ),
            QueryError::UnsupportedFieldType { field, declared } => match declared {
                Some(declared) => write!(
                    f,
                    "Unsupported type [{}] declared for field [{}]; expected one of: bool, int, float, str",
                    declared, field
                ),
                None => write!(f, "No type is declared for field [{}]", field),
            },
            QueryError::Usage(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for QueryError {}
