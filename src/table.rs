//! Arrow-backed tables and the row view predicates are evaluated against.

use std::sync::Arc;

use arrow::{
    array::{Array, AsArray, BooleanArray},
    compute::filter_record_batch,
    datatypes::{
        DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, SchemaRef,
        UInt16Type, UInt32Type, UInt64Type, UInt8Type,
    },
    error::ArrowError,
    record_batch::RecordBatch,
};

use crate::{error::FilterError, value::CellValue};

/// Read access to one row.
///
/// Predicates only see rows through this trait, so any row source can be
/// filtered as long as it exposes a key and positional cells.
pub trait DataRow {
    /// Row identifier.
    fn key(&self) -> &str;

    /// Cell at `column`; out-of-range columns read as missing.
    fn cell(&self, column: usize) -> CellValue<'_>;
}

/// A record batch paired with one row key per row.
#[derive(Clone, Debug)]
pub struct Table {
    batch: RecordBatch,
    row_keys: Vec<Arc<str>>,
}

impl Table {
    /// Wraps a batch, naming rows `Row0`, `Row1`, ...
    pub fn new(batch: RecordBatch) -> Self {
        let row_keys = (0..batch.num_rows())
            .map(|i| Arc::<str>::from(format!("Row{i}")))
            .collect();
        Self { batch, row_keys }
    }

    /// Wraps a batch with explicit row keys.
    pub fn with_row_keys<I, S>(batch: RecordBatch, keys: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let row_keys: Vec<Arc<str>> = keys.into_iter().map(Into::into).collect();
        if row_keys.len() != batch.num_rows() {
            return Err(FilterError::RowKeyCountMismatch {
                expected: batch.num_rows(),
                actual: row_keys.len(),
            });
        }
        Ok(Self { batch, row_keys })
    }

    /// Schema of the underlying batch.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Underlying batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Row keys in row order.
    pub fn row_keys(&self) -> &[Arc<str>] {
        &self.row_keys
    }

    /// Number of rows.
    pub fn num_rows(&self) -> u64 {
        self.batch.num_rows() as u64
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Borrowed view of the row at `index`, or `None` past the last row.
    pub fn get_row(&self, index: u64) -> Option<TableRow<'_>> {
        usize::try_from(index)
            .ok()
            .filter(|&index| index < self.batch.num_rows())
            .map(|index| TableRow { table: self, index })
    }

    // Callers keep `index` below `num_rows`.
    pub(crate) fn row(&self, index: u64) -> TableRow<'_> {
        debug_assert!(index < self.num_rows());
        TableRow {
            table: self,
            index: index as usize,
        }
    }

    /// Keeps the rows whose mask entry is `true`.
    pub(crate) fn filter(&self, mask: &BooleanArray) -> Result<Table, ArrowError> {
        let batch = filter_record_batch(&self.batch, mask)?;
        let row_keys = self
            .row_keys
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| keep.unwrap_or(false))
            .map(|(key, _)| Arc::clone(key))
            .collect();
        Ok(Table { batch, row_keys })
    }
}

/// Borrowed row of a [`Table`].
#[derive(Clone, Copy, Debug)]
pub struct TableRow<'a> {
    table: &'a Table,
    index: usize,
}

impl TableRow<'_> {
    /// Position of this row in its table.
    pub fn index(&self) -> u64 {
        self.index as u64
    }
}

impl DataRow for TableRow<'_> {
    fn key(&self) -> &str {
        &self.table.row_keys[self.index]
    }

    fn cell(&self, column: usize) -> CellValue<'_> {
        if column >= self.table.batch.num_columns() {
            return CellValue::Missing;
        }
        read_cell(self.table.batch.column(column).as_ref(), self.index)
    }
}

/// Whether cells of `data_type` are readable as anything but missing.
pub(crate) fn is_supported_type(data_type: &DataType) -> bool {
    is_numeric_type(data_type)
        || matches!(
            data_type,
            DataType::Boolean | DataType::Utf8 | DataType::LargeUtf8
        )
}

pub(crate) fn is_numeric_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn read_cell(array: &dyn Array, row: usize) -> CellValue<'_> {
    if array.is_null(row) {
        return CellValue::Missing;
    }
    let value = match array.data_type() {
        DataType::Boolean => array
            .as_boolean_opt()
            .map(|a| CellValue::Boolean(a.value(row))),
        DataType::Int8 => array
            .as_primitive_opt::<Int8Type>()
            .map(|a| CellValue::Int64(i64::from(a.value(row)))),
        DataType::Int16 => array
            .as_primitive_opt::<Int16Type>()
            .map(|a| CellValue::Int64(i64::from(a.value(row)))),
        DataType::Int32 => array
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Int64(i64::from(a.value(row)))),
        DataType::Int64 => array
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Int64(a.value(row))),
        DataType::UInt8 => array
            .as_primitive_opt::<UInt8Type>()
            .map(|a| CellValue::UInt64(u64::from(a.value(row)))),
        DataType::UInt16 => array
            .as_primitive_opt::<UInt16Type>()
            .map(|a| CellValue::UInt64(u64::from(a.value(row)))),
        DataType::UInt32 => array
            .as_primitive_opt::<UInt32Type>()
            .map(|a| CellValue::UInt64(u64::from(a.value(row)))),
        DataType::UInt64 => array
            .as_primitive_opt::<UInt64Type>()
            .map(|a| CellValue::UInt64(a.value(row))),
        DataType::Float32 => array
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float64(f64::from(a.value(row)))),
        DataType::Float64 => array
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float64(a.value(row))),
        DataType::Utf8 => array
            .as_string_opt::<i32>()
            .map(|a| CellValue::Utf8(a.value(row))),
        DataType::LargeUtf8 => array
            .as_string_opt::<i64>()
            .map(|a| CellValue::Utf8(a.value(row))),
        _ => None,
    };
    value.unwrap_or(CellValue::Missing)
}
