//! Leaf construction: one user condition becomes one [`RowPredicate`].
//!
//! Resolution happens once, against the schema, so every type or parameter
//! problem surfaces before the first row is read.

use std::fmt;

use arrow::datatypes::{DataType, SchemaRef};
use serde::{Deserialize, Serialize};

use super::{CellTest, ComparisonOp, MatchMode, RowPredicate, StringMatcher};
use crate::{
    error::PredicateError,
    range::RowIndexRange,
    table::{is_numeric_type, is_supported_type, Table},
    value::ScalarValue,
};

/// Target of a condition: an ordinary column or one of the row pseudo-columns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnSelector {
    /// The row key.
    RowKey,
    /// The 0-based row position.
    RowIndex,
    /// A column looked up by name.
    Column(String),
}

impl ColumnSelector {
    /// Shorthand for [`ColumnSelector::Column`].
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::RowKey => f.write_str("row key"),
            ColumnSelector::RowIndex => f.write_str("row index"),
            ColumnSelector::Column(name) => write!(f, "column {name:?}"),
        }
    }
}

/// User-facing filter operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Value equals the parameter.
    Equal,
    /// Value differs from the parameter; missing values pass.
    NotEqual,
    /// Value differs from the parameter and is present.
    NotEqualNorMissing,
    /// Value is below the parameter.
    LessThan,
    /// Value is at most the parameter.
    LessThanOrEqual,
    /// Value is above the parameter.
    GreaterThan,
    /// Value is at least the parameter.
    GreaterThanOrEqual,
    /// Value lies within two inclusive parameters.
    Between,
    /// Row index is below the parameter.
    FirstNRows,
    /// Row index is among the last `n` rows.
    LastNRows,
    /// Value matches a regular expression.
    Regex,
    /// Value matches a wildcard pattern.
    Wildcard,
    /// Boolean value is `true`.
    IsTrue,
    /// Boolean value is `false`.
    IsFalse,
    /// Value is missing.
    IsMissing,
    /// Value is present.
    IsNotMissing,
}

impl FilterOperator {
    /// Returns the settings name of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Equal => "equal",
            FilterOperator::NotEqual => "notEqual",
            FilterOperator::NotEqualNorMissing => "notEqualNorMissing",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::LessThanOrEqual => "lessThanOrEqual",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            FilterOperator::Between => "between",
            FilterOperator::FirstNRows => "firstNRows",
            FilterOperator::LastNRows => "lastNRows",
            FilterOperator::Regex => "regex",
            FilterOperator::Wildcard => "wildcard",
            FilterOperator::IsTrue => "isTrue",
            FilterOperator::IsFalse => "isFalse",
            FilterOperator::IsMissing => "isMissing",
            FilterOperator::IsNotMissing => "isNotMissing",
        }
    }

    /// Number of parameter values the operator consumes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            FilterOperator::Between => 2,
            FilterOperator::IsTrue
            | FilterOperator::IsFalse
            | FilterOperator::IsMissing
            | FilterOperator::IsNotMissing => 0,
            _ => 1,
        }
    }

    fn comparison(self) -> Option<ComparisonOp> {
        match self {
            FilterOperator::Equal => Some(ComparisonOp::Equal),
            FilterOperator::LessThan => Some(ComparisonOp::LessThan),
            FilterOperator::LessThanOrEqual => Some(ComparisonOp::LessThanOrEqual),
            FilterOperator::GreaterThan => Some(ComparisonOp::GreaterThan),
            FilterOperator::GreaterThanOrEqual => Some(ComparisonOp::GreaterThanOrEqual),
            _ => None,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-matching switches of a condition.
///
/// `wildcard` and `regex` select the pattern syntax for `equal`/`notEqual` on
/// strings and row keys; the `regex` and `wildcard` operators imply their own
/// syntax and reject the other switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptions {
    /// Whether matching distinguishes case. Must be set for string conditions.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: Option<bool>,
    /// Interpret the parameter as a wildcard pattern.
    #[serde(default)]
    pub wildcard: Option<bool>,
    /// Interpret the parameter as a regular expression.
    #[serde(default)]
    pub regex: Option<bool>,
}

fn default_case_sensitive() -> Option<bool> {
    Some(true)
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: default_case_sensitive(),
            wildcard: None,
            regex: None,
        }
    }
}

impl MatchOptions {
    /// Case-insensitive variant of the defaults.
    #[must_use]
    pub fn case_insensitive() -> Self {
        Self {
            case_sensitive: Some(false),
            ..Self::default()
        }
    }

    fn mode_for(&self, operator: FilterOperator) -> Result<MatchMode, PredicateError> {
        let wildcard = self.wildcard.unwrap_or(false);
        let regex = self.regex.unwrap_or(false);
        match operator {
            FilterOperator::Regex if wildcard => Err(PredicateError::ContradictoryOptions(
                "wildcard matching requested for the regex operator",
            )),
            FilterOperator::Regex => Ok(MatchMode::Regex),
            FilterOperator::Wildcard if regex => Err(PredicateError::ContradictoryOptions(
                "regex matching requested for the wildcard operator",
            )),
            FilterOperator::Wildcard => Ok(MatchMode::Wildcard),
            _ => match (wildcard, regex) {
                (true, true) => Err(PredicateError::ContradictoryOptions(
                    "both wildcard and regex matching selected",
                )),
                (true, false) => Ok(MatchMode::Wildcard),
                (false, true) => Ok(MatchMode::Regex),
                (false, false) => Ok(MatchMode::Literal),
            },
        }
    }

    fn matcher(
        &self,
        operator: FilterOperator,
        pattern: &str,
    ) -> Result<StringMatcher, PredicateError> {
        let mode = self.mode_for(operator)?;
        let case_sensitive = self
            .case_sensitive
            .ok_or(PredicateError::UnsetOption("case sensitivity"))?;
        StringMatcher::new(pattern, mode, case_sensitive)
    }
}

/// Schema-level facts leaves are resolved against.
#[derive(Clone, Debug)]
pub struct LeafContext {
    schema: SchemaRef,
    num_rows: Option<u64>,
}

impl LeafContext {
    /// Context for a schema whose row count is not known up front.
    pub fn new(schema: SchemaRef) -> Self {
        Self {
            schema,
            num_rows: None,
        }
    }

    /// Attaches the row count needed by `lastNRows`.
    #[must_use]
    pub fn with_num_rows(mut self, num_rows: u64) -> Self {
        self.num_rows = Some(num_rows);
        self
    }

    /// Context describing `table`.
    pub fn for_table(table: &Table) -> Self {
        Self::new(table.schema()).with_num_rows(table.num_rows())
    }

    /// Schema conditions are resolved against.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }
}

/// Builds the predicate for one condition.
///
/// `parameters` holds the operator's string arguments in order; extra values
/// are ignored.
pub fn build_leaf(
    target: &ColumnSelector,
    operator: FilterOperator,
    parameters: &[String],
    options: &MatchOptions,
    ctx: &LeafContext,
) -> Result<RowPredicate, PredicateError> {
    match target {
        ColumnSelector::RowKey => row_key_leaf(operator, parameters, options),
        ColumnSelector::RowIndex => row_index_leaf(operator, parameters, ctx),
        ColumnSelector::Column(name) => {
            let (column, field) = ctx.schema.column_with_name(name).ok_or_else(|| {
                PredicateError::ColumnNotFound {
                    name: name.clone(),
                }
            })?;
            column_leaf(target, column, field.data_type(), operator, parameters, options)
        }
    }
}

fn incompatible(
    target: &ColumnSelector,
    data_type: &DataType,
    operator: FilterOperator,
) -> PredicateError {
    PredicateError::IncompatibleType {
        target: target.clone(),
        data_type: data_type.clone(),
        operator,
    }
}

fn params(operator: FilterOperator, parameters: &[String]) -> Result<&[String], PredicateError> {
    let expected = operator.arity();
    if parameters.len() < expected {
        return Err(PredicateError::MissingParameter {
            operator,
            expected,
            actual: parameters.len(),
        });
    }
    Ok(&parameters[..expected])
}

fn row_key_leaf(
    operator: FilterOperator,
    parameters: &[String],
    options: &MatchOptions,
) -> Result<RowPredicate, PredicateError> {
    match operator {
        FilterOperator::Equal | FilterOperator::Regex | FilterOperator::Wildcard => {
            let pattern = &params(operator, parameters)?[0];
            Ok(RowPredicate::row_key(options.matcher(operator, pattern)?))
        }
        FilterOperator::NotEqual => {
            row_key_leaf(FilterOperator::Equal, parameters, options).map(RowPredicate::negate)
        }
        _ => Err(incompatible(
            &ColumnSelector::RowKey,
            &DataType::Utf8,
            operator,
        )),
    }
}

fn parse_row_index(value: &str) -> Result<u64, PredicateError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| PredicateError::MalformedNumber {
            value: value.to_string(),
            data_type: DataType::UInt64,
        })
}

fn row_index_leaf(
    operator: FilterOperator,
    parameters: &[String],
    ctx: &LeafContext,
) -> Result<RowPredicate, PredicateError> {
    let range = match operator {
        FilterOperator::Equal
        | FilterOperator::LessThan
        | FilterOperator::LessThanOrEqual
        | FilterOperator::GreaterThan
        | FilterOperator::GreaterThanOrEqual
        | FilterOperator::FirstNRows => {
            let n = parse_row_index(&params(operator, parameters)?[0])?;
            match operator {
                FilterOperator::Equal => RowIndexRange::singleton(n),
                FilterOperator::LessThan | FilterOperator::FirstNRows => {
                    RowIndexRange::less_than(n)
                }
                FilterOperator::LessThanOrEqual => RowIndexRange::at_most(n),
                FilterOperator::GreaterThan => RowIndexRange::greater_than(n),
                _ => RowIndexRange::at_least(n),
            }
        }
        FilterOperator::NotEqual => {
            return row_index_leaf(FilterOperator::Equal, parameters, ctx).map(RowPredicate::negate)
        }
        FilterOperator::Between => {
            let bounds = params(operator, parameters)?;
            let lower = parse_row_index(&bounds[0])?;
            let upper = parse_row_index(&bounds[1])?;
            if lower > upper {
                return Err(PredicateError::InvalidBounds {
                    lower: bounds[0].clone(),
                    upper: bounds[1].clone(),
                });
            }
            RowIndexRange::closed(lower, upper)
        }
        FilterOperator::LastNRows => {
            let n = parse_row_index(&params(operator, parameters)?[0])?;
            let num_rows = ctx
                .num_rows
                .ok_or(PredicateError::UnknownRowCount(operator))?;
            RowIndexRange::at_least(num_rows.saturating_sub(n))
        }
        _ => {
            return Err(incompatible(
                &ColumnSelector::RowIndex,
                &DataType::UInt64,
                operator,
            ))
        }
    };
    Ok(RowPredicate::row_index(range))
}

fn column_leaf(
    target: &ColumnSelector,
    column: usize,
    data_type: &DataType,
    operator: FilterOperator,
    parameters: &[String],
    options: &MatchOptions,
) -> Result<RowPredicate, PredicateError> {
    if !is_supported_type(data_type) {
        return Err(incompatible(target, data_type, operator));
    }
    let is_string = matches!(data_type, DataType::Utf8 | DataType::LargeUtf8);
    let is_numeric = is_numeric_type(data_type);

    let test = match operator {
        FilterOperator::IsMissing => CellTest::IsMissing,
        FilterOperator::IsNotMissing => {
            return Ok(RowPredicate::cell(column, CellTest::IsMissing).negate())
        }
        FilterOperator::IsTrue if *data_type == DataType::Boolean => CellTest::IsTrue,
        FilterOperator::IsFalse if *data_type == DataType::Boolean => CellTest::IsFalse,
        FilterOperator::NotEqual if is_string || is_numeric => {
            return column_leaf(
                target,
                column,
                data_type,
                FilterOperator::Equal,
                parameters,
                options,
            )
            .map(RowPredicate::negate)
        }
        FilterOperator::NotEqualNorMissing if is_string || is_numeric => {
            let not_equal = column_leaf(
                target,
                column,
                data_type,
                FilterOperator::NotEqual,
                parameters,
                options,
            )?;
            let present = RowPredicate::cell(column, CellTest::IsMissing).negate();
            return RowPredicate::and([not_equal, present]);
        }
        FilterOperator::Equal | FilterOperator::Regex | FilterOperator::Wildcard
            if is_string =>
        {
            let pattern = &params(operator, parameters)?[0];
            CellTest::Matches(options.matcher(operator, pattern)?)
        }
        FilterOperator::Between if is_numeric => {
            let bounds = params(operator, parameters)?;
            let lower = ScalarValue::parse(&bounds[0], data_type)?;
            let upper = ScalarValue::parse(&bounds[1], data_type)?;
            if lower.as_cell().compare(upper.as_cell()) == Some(std::cmp::Ordering::Greater) {
                return Err(PredicateError::InvalidBounds {
                    lower: bounds[0].clone(),
                    upper: bounds[1].clone(),
                });
            }
            CellTest::Between { lower, upper }
        }
        _ if is_numeric => match operator.comparison() {
            Some(op) => {
                let value = ScalarValue::parse(&params(operator, parameters)?[0], data_type)?;
                CellTest::Compare { op, value }
            }
            None => return Err(incompatible(target, data_type, operator)),
        },
        _ => return Err(incompatible(target, data_type, operator)),
    };
    Ok(RowPredicate::cell(column, test))
}
