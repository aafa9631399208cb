//! Single-pass row filter and row splitter over a [`Table`].

use std::sync::atomic::{AtomicBool, Ordering};

use arrow::{array::BooleanArray, compute};

use crate::{
    error::FilterError,
    observability::{log_debug, log_info, log_warn},
    predicate::{LeafContext, RowPredicate},
    settings::{FilterSettings, OutputMode},
    table::Table,
};

/// Counters collected during one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Rows whose predicate was evaluated.
    pub rows_scanned: u64,
    /// Rows outside the declared row range, never evaluated.
    pub rows_skipped: u64,
    /// Rows for which the predicate held.
    pub rows_matched: u64,
}

/// A compiled row filter.
#[derive(Clone, Debug)]
pub struct RowFilter {
    predicate: RowPredicate,
    output_mode: OutputMode,
}

impl RowFilter {
    /// Compiles `settings` against `table`.
    ///
    /// All configuration errors are reported here, before any row is read.
    pub fn new(settings: &FilterSettings, table: &Table) -> Result<Self, FilterError> {
        let predicate = settings.compile(&LeafContext::for_table(table))?;
        log_debug!(
            component = "filter",
            event = "predicate_compiled",
            criteria = settings.criteria.len(),
            required_columns = ?predicate.required_columns(),
            row_index_range = %predicate.row_index_range(),
        );
        Ok(Self::from_predicate(predicate, settings.output_mode))
    }

    /// Wraps an already assembled predicate.
    pub fn from_predicate(predicate: RowPredicate, output_mode: OutputMode) -> Self {
        Self {
            predicate,
            output_mode,
        }
    }

    /// The compiled predicate.
    pub fn predicate(&self) -> &RowPredicate {
        &self.predicate
    }

    /// Which side of the predicate is selected.
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Selection mask over the rows of `table`.
    pub fn matches(&self, table: &Table) -> Result<BooleanArray, FilterError> {
        self.matches_with_stats(table, None).map(|(mask, _)| mask)
    }

    /// Selection mask plus pass counters.
    ///
    /// Only rows inside the predicate's declared row range are evaluated.
    /// When `cancel` is set, it is checked before every evaluated row.
    pub fn matches_with_stats(
        &self,
        table: &Table,
        cancel: Option<&AtomicBool>,
    ) -> Result<(BooleanArray, FilterStats), FilterError> {
        let num_columns = table.num_columns();
        if let Some(&column) = self
            .predicate
            .required_columns()
            .iter()
            .find(|&&column| column >= num_columns)
        {
            return Err(FilterError::ColumnOutOfBounds(column, num_columns));
        }

        let num_rows = table.num_rows();
        let (lo, hi) = self.predicate.row_index_range().index_bounds(num_rows);
        let mut matched = vec![false; table.batch().num_rows()];
        let mut stats = FilterStats {
            rows_skipped: num_rows - (hi - lo),
            ..FilterStats::default()
        };

        for index in lo..hi {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                log_warn!(
                    component = "filter",
                    event = "filter_cancelled",
                    rows_scanned = stats.rows_scanned,
                );
                return Err(FilterError::Cancelled {
                    rows_scanned: stats.rows_scanned,
                });
            }
            stats.rows_scanned += 1;
            if self.predicate.test(&table.row(index), index) {
                matched[index as usize] = true;
                stats.rows_matched += 1;
            }
        }

        let selected = match self.output_mode {
            OutputMode::Matching => matched,
            OutputMode::NonMatching => matched.into_iter().map(|hit| !hit).collect(),
        };
        log_info!(
            component = "filter",
            event = "filter_finished",
            rows = num_rows,
            rows_scanned = stats.rows_scanned,
            rows_skipped = stats.rows_skipped,
            rows_matched = stats.rows_matched,
        );
        Ok((BooleanArray::from(selected), stats))
    }

    /// Rows of `table` selected by the filter.
    pub fn filter(&self, table: &Table) -> Result<Table, FilterError> {
        let mask = self.matches(table)?;
        Ok(table.filter(&mask)?)
    }

    /// Splits `table` into the selected rows and the remaining rows.
    pub fn split(&self, table: &Table) -> Result<(Table, Table), FilterError> {
        let mask = self.matches(table)?;
        let rest = compute::not(&mask)?;
        Ok((table.filter(&mask)?, table.filter(&rest)?))
    }
}
