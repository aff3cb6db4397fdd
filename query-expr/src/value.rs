use crate::QueryError;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::str::FromStr;

/// One row of result data, as handed over by the API layer.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A record value or condition after coercion to the declared field type.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn rank(&self) -> u8 {
        match self {
            Scalar::Bool(_) => 0,
            Scalar::Int(_) => 1,
            Scalar::Float(_) => 2,
            Scalar::Str(_) => 3,
        }
    }

    /// Total order used for sorting. Scalars of different kinds are ordered by kind.
    pub fn total_cmp(&self, other: &Scalar) -> Ordering {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => a.total_cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.partial_cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.partial_cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Str(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Str,
}

impl FromStr for FieldType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bool" | "boolean" => Ok(FieldType::Bool),
            "int" | "integer" => Ok(FieldType::Int),
            "float" | "double" => Ok(FieldType::Float),
            "str" | "string" => Ok(FieldType::Str),
            _ => Err(QueryError::UnsupportedFieldType {
                field: String::new(),
                declared: Some(s.to_string()),
            }),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::Int => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Str => write!(f, "str"),
        }
    }
}

/// Declared type of every field a query may reference, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSpec {
    fields: IndexMap<String, FieldType>,
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(field.into(), field_type);
        self
    }

    /// Builds a spec from `field -> type name` pairs, e.g. as loaded from a JSON file.
    pub fn from_declarations<I, K, V>(declarations: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut spec = FieldSpec::new();
        for (field, declared) in declarations {
            let field = field.into();
            let field_type = declared.as_ref().parse::<FieldType>().map_err(|_| {
                QueryError::UnsupportedFieldType {
                    field: field.clone(),
                    declared: Some(declared.as_ref().to_string()),
                }
            })?;
            spec.fields.insert(field, field_type);
        }
        Ok(spec)
    }

    /// Builds a spec from a JSON object such as `{"size": "int", "file": "str"}`.
    pub fn from_json(
        declarations: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, QueryError> {
        let declarations = declarations
            .iter()
            .map(|(field, declared)| match declared.as_str() {
                Some(declared) => Ok((field.as_str(), declared)),
                None => Err(QueryError::UnsupportedFieldType {
                    field: field.clone(),
                    declared: Some(declared.to_string()),
                }),
            })
            .collect::<Result<Vec<_>, QueryError>>()?;
        Self::from_declarations(declarations)
    }

    pub fn get(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).copied()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
