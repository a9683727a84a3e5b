use crate::error::ExportError;
use crate::excel::coords;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Cell Values
//==============================================================================

/// A single cell value as read from a worksheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    #[default]
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Human-readable type name (for display)
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "Text",
            CellValue::Number(_) => "Number",
            CellValue::Bool(_) => "Boolean",
            CellValue::Empty => "Empty",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Integral numbers print without a fractional part (10, not 10.0)
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

//==============================================================================
// Exported Records
//==============================================================================

/// A sanitized cell value annotated with its 1-based source position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub value: String,
    pub row: usize,
    pub column: usize,
}

impl ValueRecord {
    pub fn new(value: impl Into<String>, row: usize, column: usize) -> Self {
        Self {
            value: value.into(),
            row,
            column,
        }
    }
}

/// Sanitized header -> records for that column's data rows.
///
/// Re-inserting a key replaces its records but keeps the key's first position.
pub type ColumnRecords = IndexMap<String, Vec<ValueRecord>>;

/// Sheet name -> collected columns
pub type SheetGrades = IndexMap<String, ColumnRecords>;

/// Key cell coordinate -> [label, value1, value2, ...]
pub type CoordinateDict = IndexMap<String, Vec<String>>;

//==============================================================================
// Column References
//==============================================================================

/// A 1-based column reference, written either as an index (`5`) or as
/// column letters (`E`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawColumn")]
pub struct ColumnRef(usize);

impl ColumnRef {
    pub fn new(index: usize) -> Self {
        ColumnRef(index)
    }

    /// 1-based column index
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef(index)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColumnRef {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Ok(ColumnRef(index));
        }
        coords::column_index(trimmed)
            .map(ColumnRef)
            .ok_or_else(|| ExportError::InvalidColumn(s.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawColumn {
    Index(usize),
    Label(String),
}

impl TryFrom<RawColumn> for ColumnRef {
    type Error = ExportError;

    fn try_from(raw: RawColumn) -> Result<Self, Self::Error> {
        match raw {
            RawColumn::Index(index) => Ok(ColumnRef(index)),
            RawColumn::Label(label) => label.parse(),
        }
    }
}
