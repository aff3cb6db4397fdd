use log::debug;
use query_expr::{FieldSpec, Filtering, QueryError, Record, SortOrder, Sorting};

/// Filtering and sorting requested for one command, resolved before any record is read.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub filtering: Option<Filtering>,
    pub sorting: Option<Sorting>,
}

impl QueryPlan {
    /// Builds the plan from the raw `--filter`, `--order-by` and `--ordering` options.
    ///
    /// An empty filter means no filtering. Without `--order-by`, `default_sorting`
    /// (supplied per resource) applies.
    pub fn new(
        filter: Option<&str>,
        order_by: Option<&str>,
        ordering: Option<SortOrder>,
        default_sorting: Option<Sorting>,
    ) -> Result<Self, QueryError> {
        let filtering = match filter.map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(Filtering::new(query_expr::parse(raw)?)),
            _ => None,
        };
        let sorting = Sorting::from_options(order_by, ordering, default_sorting)?;

        debug!(
            "Query plan: filter [{}], sorting [{}]",
            filtering
                .as_ref()
                .map_or_else(|| "none".to_string(), |f| f.filter.to_string()),
            sorting
                .as_ref()
                .map_or_else(|| "none".to_string(), |s| s.to_string())
        );

        Ok(QueryPlan { filtering, sorting })
    }

    pub fn apply(&self, records: Vec<Record>, spec: &FieldSpec) -> Result<Vec<Record>, QueryError> {
        let records = match &self.filtering {
            Some(filtering) => filtering.apply(records, spec)?,
            None => records,
        };
        match &self.sorting {
            Some(sorting) => sorting.apply(records, spec),
            None => Ok(records),
        }
    }
}
