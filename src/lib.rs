#![deny(missing_docs)]
//! Composable row predicates and a single-pass row filter over Arrow tables.
//!
//! User conditions (a column, an operator and string parameters) compile into
//! leaf [`RowPredicate`]s, which combine with `AND`/`OR`/`NOT` into one
//! immutable predicate. Every predicate declares the columns it reads and the
//! window of row indices where it can hold; [`RowFilter`] uses the window to
//! skip rows without evaluating them.
//!
//! ```
//! use std::sync::Arc;
//!
//! use arrow::{
//!     array::{Int64Array, StringArray},
//!     datatypes::{DataType, Field, Schema},
//!     record_batch::RecordBatch,
//! };
//! use rowfilter::{
//!     predicate::{ColumnSelector, FilterOperator, MatchOptions},
//!     settings::{FilterCriterion, FilterSettings, MatchCriteria},
//!     RowFilter, Table,
//! };
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("name", DataType::Utf8, true),
//!     Field::new("age", DataType::Int64, true),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema,
//!     vec![
//!         Arc::new(StringArray::from(vec!["Perla", "Nils", "Paula"])),
//!         Arc::new(Int64Array::from(vec![31, 45, 19])),
//!     ],
//! )
//! .unwrap();
//! let table = Table::new(batch);
//!
//! let settings = FilterSettings::new(
//!     vec![
//!         FilterCriterion::new(ColumnSelector::column("name"), FilterOperator::Wildcard, ["p*a"])
//!             .with_options(MatchOptions::case_insensitive()),
//!         FilterCriterion::new(ColumnSelector::column("age"), FilterOperator::GreaterThan, ["20"]),
//!     ],
//!     MatchCriteria::All,
//! );
//! let filter = RowFilter::new(&settings, &table).unwrap();
//! let kept = filter.filter(&table).unwrap();
//! assert_eq!(kept.row_keys()[0].as_ref(), "Row0");
//! assert_eq!(kept.num_rows(), 1);
//! ```

mod error;
mod observability;

/// Row filter driver.
pub mod filter;
/// Predicate tree, leaves and combinators.
pub mod predicate;
/// Single-interval row-index ranges.
pub mod range;
/// Persisted filter configuration.
pub mod settings;
/// Arrow-backed tables and row access.
pub mod table;
/// Cell and literal values.
pub mod value;

pub use crate::{
    error::{FilterError, PredicateError},
    filter::{FilterStats, RowFilter},
    predicate::RowPredicate,
    range::{Interval, RowIndexRange},
    table::{DataRow, Table},
};
