//! Filter and sort expressions over tabular result records.
//!
//! A filter string such as `size >= 1gb && (hidden == true or path like /tmp)` is
//! parsed once into a [`Filter`] and then evaluated per record against a
//! [`FieldSpec`] that declares the type of every field. Sorting uses the same
//! normalization and coercion rules to build its keys.

mod ast;
mod coerce;
mod error;
mod normalize;
mod parser;
mod sorting;
mod value;

pub use ast::{Filter, Filtering, GroupOperator, Operator};
pub use coerce::coerce;
pub use error::QueryError;
pub use normalize::{normalize, parse_duration, parse_memory_size};
pub use parser::parse;
pub use sorting::{SortOrder, Sorting, ORDERING_PARAMETER, ORDER_BY_PARAMETER};
pub use value::{FieldSpec, FieldType, Record, Scalar};
