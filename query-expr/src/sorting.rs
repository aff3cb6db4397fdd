use crate::ast::lookup;
use crate::{coerce, normalize, FieldSpec, QueryError, Record, Scalar};
use log::debug;
use std::str::FromStr;

pub const ORDER_BY_PARAMETER: &str = "order-by";
pub const ORDERING_PARAMETER: &str = "ordering";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError::Usage(format!(
                "Invalid ordering [{}]; expected one of: asc, desc",
                s
            ))),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Sort descriptor: one field and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorting {
    pub field: String,
    pub ordering: SortOrder,
}

impl Sorting {
    pub fn new(field: impl Into<String>, ordering: SortOrder) -> Self {
        Self {
            field: field.into(),
            ordering,
        }
    }

    pub fn with_ordering(mut self, ordering: SortOrder) -> Self {
        self.ordering = ordering;
        self
    }

    /// Resolves the user's `--order-by` / `--ordering` options.
    ///
    /// An ordering without a field is a usage error. A field without an ordering
    /// sorts descending. Without either, the caller's default descriptor is used.
    pub fn from_options(
        order_by: Option<&str>,
        ordering: Option<SortOrder>,
        default: Option<Sorting>,
    ) -> Result<Option<Sorting>, QueryError> {
        match (order_by, ordering) {
            (None, Some(_)) => Err(QueryError::Usage(format!(
                "Specifying \"--{}\" without \"--{}\" is not supported",
                ORDERING_PARAMETER, ORDER_BY_PARAMETER
            ))),
            (Some(field), ordering) => Ok(Some(Sorting::new(field, ordering.unwrap_or_default()))),
            (None, None) => Ok(default),
        }
    }

    /// Sorts the records by this descriptor's field.
    ///
    /// Every key is extracted (normalized, then coerced to the declared type) before
    /// any reordering, so a missing field or bad value fails the whole operation.
    /// Records with equal keys keep their original relative order in both directions.
    pub fn apply(&self, records: Vec<Record>, spec: &FieldSpec) -> Result<Vec<Record>, QueryError> {
        let mut keyed = records
            .into_iter()
            .map(|record| self.key(&record, spec).map(|key| (key, record)))
            .collect::<Result<Vec<(Scalar, Record)>, QueryError>>()?;

        match self.ordering {
            SortOrder::Asc => keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b)),
            SortOrder::Desc => keyed.sort_by(|(a, _), (b, _)| b.total_cmp(a)),
        }
        debug!("Sorted {} records by [{}]", keyed.len(), self);

        Ok(keyed.into_iter().map(|(_, record)| record).collect())
    }

    fn key(&self, record: &Record, spec: &FieldSpec) -> Result<Scalar, QueryError> {
        let value = lookup(record, &self.field, spec)?;
        coerce(&normalize(value), &self.field, spec)
    }
}

impl std::fmt::Display for Sorting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.ordering)
    }
}
