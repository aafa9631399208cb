use arrow::{datatypes::DataType, error::ArrowError};

use crate::predicate::{ColumnSelector, FilterOperator};

/// Error returned while assembling a predicate from user conditions.
///
/// Every variant is a configuration problem; evaluation itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum PredicateError {
    /// Referenced column was not found in the schema.
    #[error("no such column in table: {name}")]
    ColumnNotFound {
        /// The missing column name.
        name: String,
    },
    /// Operator cannot be applied to the target column.
    #[error("operator {operator} is not applicable to {target} of type {data_type}")]
    IncompatibleType {
        /// Target the operator was applied to.
        target: ColumnSelector,
        /// Data type of the target.
        data_type: DataType,
        /// The rejected operator.
        operator: FilterOperator,
    },
    /// Operator needs more parameter values than were supplied.
    #[error("operator {operator} requires {expected} parameter(s), got {actual}")]
    MissingParameter {
        /// Operator being built.
        operator: FilterOperator,
        /// Number of required parameters.
        expected: usize,
        /// Number of supplied parameters.
        actual: usize,
    },
    /// Parameter value could not be parsed for the target type.
    #[error("cannot parse {value:?} as {data_type}")]
    MalformedNumber {
        /// Offending parameter value.
        value: String,
        /// Type the value was parsed as.
        data_type: DataType,
    },
    /// `between` bounds are reversed.
    #[error("lower bound {lower} is greater than upper bound {upper}")]
    InvalidBounds {
        /// Lower bound as supplied.
        lower: String,
        /// Upper bound as supplied.
        upper: String,
    },
    /// Regular expression (or translated wildcard) failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    /// Match options select more than one matching mode.
    #[error("contradictory match options: {0}")]
    ContradictoryOptions(&'static str),
    /// A required match option was left unset.
    #[error("match option not set: {0}")]
    UnsetOption(&'static str),
    /// `last n rows` needs the table size.
    #[error("operator {0} requires a known row count")]
    UnknownRowCount(FilterOperator),
    /// AND/OR over zero predicates.
    #[error("cannot combine an empty list of predicates")]
    EmptyGroup,
}

/// Error returned by the row filter driver.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Predicate assembly failed.
    #[error("invalid filter configuration: {0}")]
    Predicate(#[from] PredicateError),
    /// Settings document could not be decoded.
    #[error("invalid filter settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// Arrow failure while materializing the output.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Predicate reads a column the table does not have.
    #[error("column index {0} out of bounds (num_columns={1})")]
    ColumnOutOfBounds(usize, usize),
    /// Row key count does not match the batch row count.
    #[error("row key count mismatch: expected {expected}, got {actual}")]
    RowKeyCountMismatch {
        /// Number of rows in the batch.
        expected: usize,
        /// Number of supplied row keys.
        actual: usize,
    },
    /// The caller requested cancellation between rows.
    #[error("row filter cancelled after {rows_scanned} row(s)")]
    Cancelled {
        /// Rows evaluated before cancellation was observed.
        rows_scanned: u64,
    },
}
