//! Cell values read from rows and literal values parsed from parameters.

use std::{cmp::Ordering, fmt};

use arrow::datatypes::DataType;

use crate::error::PredicateError;

/// Literal values a cell can be compared against.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// Boolean literal.
    Boolean(bool),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl ScalarValue {
    /// Parses a parameter string into a literal matching the column type.
    ///
    /// Signed columns parse as `i64`, unsigned as `u64`, floats as `f64` and
    /// strings verbatim. Other types are rejected.
    pub fn parse(value: &str, data_type: &DataType) -> Result<Self, PredicateError> {
        let malformed = || PredicateError::MalformedNumber {
            value: value.to_string(),
            data_type: data_type.clone(),
        };
        let trimmed = value.trim();
        match data_type {
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => trimmed
                .parse::<i64>()
                .map(ScalarValue::Int64)
                .map_err(|_| malformed()),
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => trimmed
                .parse::<u64>()
                .map(ScalarValue::UInt64)
                .map_err(|_| malformed()),
            // Float32 cells are widened from f32, so the literal takes the same rounding.
            DataType::Float32 => trimmed
                .parse::<f32>()
                .ok()
                .filter(|v| !v.is_nan())
                .map(|v| ScalarValue::Float64(f64::from(v)))
                .ok_or_else(malformed),
            DataType::Float64 => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .map(ScalarValue::Float64)
                .ok_or_else(malformed),
            DataType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" => Ok(ScalarValue::Boolean(true)),
                "false" => Ok(ScalarValue::Boolean(false)),
                _ => Err(malformed()),
            },
            DataType::Utf8 | DataType::LargeUtf8 => Ok(ScalarValue::Utf8(value.to_string())),
            _ => Err(malformed()),
        }
    }

    /// Returns a borrowed view over this literal.
    #[must_use]
    pub fn as_cell(&self) -> CellValue<'_> {
        match self {
            ScalarValue::Boolean(v) => CellValue::Boolean(*v),
            ScalarValue::Int64(v) => CellValue::Int64(*v),
            ScalarValue::UInt64(v) => CellValue::UInt64(*v),
            ScalarValue::Float64(v) => CellValue::Float64(*v),
            ScalarValue::Utf8(v) => CellValue::Utf8(v.as_str()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Boolean(v) => write!(f, "{v}"),
            ScalarValue::Int64(v) => write!(f, "{v}"),
            ScalarValue::UInt64(v) => write!(f, "{v}"),
            ScalarValue::Float64(v) => write!(f, "{v}"),
            ScalarValue::Utf8(v) => write!(f, "{v:?}"),
        }
    }
}

/// Borrowed view over a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellValue<'a> {
    /// Missing value (Arrow null).
    Missing,
    /// Boolean cell.
    Boolean(bool),
    /// Signed integer cell, widened to 64 bits.
    Int64(i64),
    /// Unsigned integer cell, widened to 64 bits.
    UInt64(u64),
    /// Floating point cell, widened to 64 bits.
    Float64(f64),
    /// String cell.
    Utf8(&'a str),
}

impl<'a> CellValue<'a> {
    /// Returns true for a missing cell.
    #[must_use]
    pub fn is_missing(self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Returns the string payload, if this is a string cell.
    #[must_use]
    pub fn as_str(self) -> Option<&'a str> {
        match self {
            CellValue::Utf8(v) => Some(v),
            _ => None,
        }
    }

    /// Compares two cells, returning the ordering when both sides are comparable.
    ///
    /// Missing cells are never comparable. Integers of either signedness compare
    /// exactly; any comparison involving a float goes through `f64`.
    pub fn compare(self, other: CellValue<'_>) -> Option<Ordering> {
        use CellValue::*;
        match (self, other) {
            (Missing, _) | (_, Missing) => None,
            (Boolean(lhs), Boolean(rhs)) => Some(lhs.cmp(&rhs)),
            (Int64(lhs), Int64(rhs)) => Some(lhs.cmp(&rhs)),
            (UInt64(lhs), UInt64(rhs)) => Some(lhs.cmp(&rhs)),
            (Int64(lhs), UInt64(rhs)) => Some(i128::from(lhs).cmp(&i128::from(rhs))),
            (UInt64(lhs), Int64(rhs)) => Some(i128::from(lhs).cmp(&i128::from(rhs))),
            (Float64(lhs), Float64(rhs)) => lhs.partial_cmp(&rhs),
            (Float64(lhs), Int64(rhs)) => lhs.partial_cmp(&(rhs as f64)),
            (Float64(lhs), UInt64(rhs)) => lhs.partial_cmp(&(rhs as f64)),
            (Int64(lhs), Float64(rhs)) => (lhs as f64).partial_cmp(&rhs),
            (UInt64(lhs), Float64(rhs)) => (lhs as f64).partial_cmp(&rhs),
            (Utf8(lhs), Utf8(rhs)) => Some(lhs.cmp(rhs)),
            _ => None,
        }
    }
}
