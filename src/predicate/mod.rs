//! Composable row predicates with conservative metadata.
//!
//! A [`RowPredicate`] is an immutable tree of leaves (cell tests, row-key and
//! row-index tests, the always-true leaf) joined by `AND`, `OR` and `NOT`.
//! Every node carries two precomputed facts a scan driver can rely on:
//!
//! - [`RowPredicate::required_columns`]: a superset of the columns the node
//!   reads;
//! - [`RowPredicate::row_index_range`]: a superset of the row indices for
//!   which the node can evaluate to `true`.
//!
//! Rows outside the declared range may be skipped without evaluating the
//! predicate. Both facts may be wider than necessary but never narrower.

mod leaf;
mod matcher;

use std::{cmp::Ordering, collections::BTreeSet, fmt};

pub use leaf::{build_leaf, ColumnSelector, FilterOperator, LeafContext, MatchOptions};
pub use matcher::{MatchMode, StringMatcher};

use crate::{
    error::PredicateError,
    range::RowIndexRange,
    table::DataRow,
    value::{CellValue, ScalarValue},
};

/// Comparison operator used by cell comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equals (`=`).
    Equal,
    /// Less than (`<`).
    LessThan,
    /// Less than or equal to (`<=`).
    LessThanOrEqual,
    /// Greater than (`>`).
    GreaterThan,
    /// Greater than or equal to (`>=`).
    GreaterThanOrEqual,
}

impl ComparisonOp {
    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        }
    }

    /// Evaluates the operator against a comparison ordering (`cell` vs literal).
    #[must_use]
    pub fn test_ordering(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Equal => ordering == Ordering::Equal,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value-level test applied to a single cell.
///
/// Missing cells satisfy only [`CellTest::IsMissing`].
#[derive(Clone, Debug)]
pub enum CellTest {
    /// `cell <op> value`.
    Compare {
        /// Operator.
        op: ComparisonOp,
        /// Literal right-hand side.
        value: ScalarValue,
    },
    /// `lower <= cell <= upper`.
    Between {
        /// Inclusive lower bound.
        lower: ScalarValue,
        /// Inclusive upper bound.
        upper: ScalarValue,
    },
    /// String cell matches the pattern.
    Matches(StringMatcher),
    /// Cell is missing.
    IsMissing,
    /// Boolean cell is `true`.
    IsTrue,
    /// Boolean cell is `false`.
    IsFalse,
}

impl CellTest {
    fn test(&self, cell: CellValue<'_>) -> bool {
        match self {
            CellTest::Compare { op, value } => cell
                .compare(value.as_cell())
                .is_some_and(|ordering| op.test_ordering(ordering)),
            CellTest::Between { lower, upper } => {
                matches!(
                    cell.compare(lower.as_cell()),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    cell.compare(upper.as_cell()),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }
            CellTest::Matches(matcher) => cell.as_str().is_some_and(|s| matcher.is_match(s)),
            CellTest::IsMissing => cell.is_missing(),
            CellTest::IsTrue => matches!(cell, CellValue::Boolean(true)),
            CellTest::IsFalse => matches!(cell, CellValue::Boolean(false)),
        }
    }
}

/// Recursive predicate node; leaf and branch variants coexist.
#[derive(Clone, Debug)]
pub enum PredicateNode {
    /// Always-true leaf; matches every row.
    True,
    /// Tests the row key.
    RowKey(StringMatcher),
    /// True exactly when the row index lies in the range.
    RowIndex(RowIndexRange),
    /// Tests one cell.
    Cell {
        /// Column ordinal.
        column: usize,
        /// Test applied to the cell.
        test: CellTest,
    },
    /// Logical negation.
    Not(Box<RowPredicate>),
    /// Conjunction over two or more predicates.
    And(Vec<RowPredicate>),
    /// Disjunction over two or more predicates.
    Or(Vec<RowPredicate>),
}

/// Predicate over `(row, row index)` plus its declared metadata.
#[derive(Clone, Debug)]
pub struct RowPredicate {
    node: PredicateNode,
    required_columns: BTreeSet<usize>,
    row_index_range: RowIndexRange,
}

impl RowPredicate {
    /// Predicate that accepts every row.
    #[must_use]
    pub fn always_true() -> Self {
        Self::from_parts(PredicateNode::True, BTreeSet::new(), RowIndexRange::all())
    }

    /// Predicate testing the row key; reads no column.
    #[must_use]
    pub fn row_key(matcher: StringMatcher) -> Self {
        Self::from_parts(
            PredicateNode::RowKey(matcher),
            BTreeSet::new(),
            RowIndexRange::all(),
        )
    }

    /// Predicate accepting exactly the rows whose index lies in `range`.
    #[must_use]
    pub fn row_index(range: RowIndexRange) -> Self {
        Self::from_parts(
            PredicateNode::RowIndex(range.clone()),
            BTreeSet::new(),
            range,
        )
    }

    /// Predicate testing the cell at `column`.
    #[must_use]
    pub fn cell(column: usize, test: CellTest) -> Self {
        Self::from_parts(
            PredicateNode::Cell { column, test },
            BTreeSet::from([column]),
            RowIndexRange::all(),
        )
    }

    /// Conjunction of `children`.
    ///
    /// Nested conjunctions are flattened and a single child is returned as is.
    /// The declared row range is the intersection of the children's ranges.
    pub fn and<I>(children: I) -> Result<Self, PredicateError>
    where
        I: IntoIterator<Item = RowPredicate>,
    {
        Self::group(children, GroupKind::And)
    }

    /// Disjunction of `children`.
    ///
    /// Nested disjunctions are flattened and a single child is returned as is.
    /// The declared row range is the span of the children's ranges.
    pub fn or<I>(children: I) -> Result<Self, PredicateError>
    where
        I: IntoIterator<Item = RowPredicate>,
    {
        Self::group(children, GroupKind::Or)
    }

    /// Returns the logical negation of this predicate.
    ///
    /// Required columns are kept. A row-index leaf holds exactly on its range,
    /// so its negation declares the hull of the complement (see
    /// [`crate::range::Interval::negation_hull`]); any other predicate may be
    /// false inside its range and its negation declares the unbounded range.
    /// Negating a negation yields the original predicate.
    #[must_use]
    pub fn negate(self) -> Self {
        match self.node {
            PredicateNode::Not(inner) => *inner,
            node => {
                let required_columns = self.required_columns.clone();
                let row_index_range = match node {
                    PredicateNode::RowIndex(_) => self.row_index_range.negation_hull(),
                    _ => RowIndexRange::all(),
                };
                let child = RowPredicate {
                    node,
                    required_columns: self.required_columns,
                    row_index_range: self.row_index_range,
                };
                Self::from_parts(
                    PredicateNode::Not(Box::new(child)),
                    required_columns,
                    row_index_range,
                )
            }
        }
    }

    /// Evaluates the predicate for `row` at position `index`.
    pub fn test<R>(&self, row: &R, index: u64) -> bool
    where
        R: DataRow + ?Sized,
    {
        match &self.node {
            PredicateNode::True => true,
            PredicateNode::RowKey(matcher) => matcher.is_match(row.key()),
            PredicateNode::RowIndex(range) => range.contains(&index),
            PredicateNode::Cell { column, test } => test.test(row.cell(*column)),
            PredicateNode::Not(inner) => !inner.test(row, index),
            PredicateNode::And(children) => children.iter().all(|child| child.test(row, index)),
            PredicateNode::Or(children) => children.iter().any(|child| child.test(row, index)),
        }
    }

    /// Returns a reference to the underlying node.
    #[must_use]
    pub fn node(&self) -> &PredicateNode {
        &self.node
    }

    /// Columns the predicate may read.
    #[must_use]
    pub fn required_columns(&self) -> &BTreeSet<usize> {
        &self.required_columns
    }

    /// Row indices for which the predicate may be `true`.
    #[must_use]
    pub fn row_index_range(&self) -> &RowIndexRange {
        &self.row_index_range
    }

    fn from_parts(
        node: PredicateNode,
        required_columns: BTreeSet<usize>,
        row_index_range: RowIndexRange,
    ) -> Self {
        Self {
            node,
            required_columns,
            row_index_range,
        }
    }

    fn group<I>(children: I, kind: GroupKind) -> Result<Self, PredicateError>
    where
        I: IntoIterator<Item = RowPredicate>,
    {
        let mut acc = Vec::new();
        for child in children {
            match (kind, child.node) {
                (GroupKind::And, PredicateNode::And(mut nested))
                | (GroupKind::Or, PredicateNode::Or(mut nested)) => acc.append(&mut nested),
                (_, node) => acc.push(RowPredicate { node, ..child }),
            }
        }

        if acc.len() <= 1 {
            return acc.pop().ok_or(PredicateError::EmptyGroup);
        }

        let required_columns = acc
            .iter()
            .flat_map(|child| child.required_columns.iter().copied())
            .collect();
        let row_index_range = acc[1..].iter().fold(
            acc[0].row_index_range.clone(),
            |range, child| match kind {
                GroupKind::And => range.intersection(&child.row_index_range),
                GroupKind::Or => range.span(&child.row_index_range),
            },
        );
        let node = match kind {
            GroupKind::And => PredicateNode::And(acc),
            GroupKind::Or => PredicateNode::Or(acc),
        };
        Ok(Self::from_parts(node, required_columns, row_index_range))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GroupKind {
    And,
    Or,
}
