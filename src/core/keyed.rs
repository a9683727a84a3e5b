//! Coordinate-keyed dictionaries: key cell coordinate -> [label, values...]

use crate::error::ExportResult;
use crate::excel::{coords, Sheet, SheetReader};
use crate::types::CoordinateDict;
use tracing::debug;

/// Builds a `CoordinateDict` from one key column and any number of value columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedDictBuilder {
    key_column: usize,
    value_columns: Vec<usize>,
}

impl KeyedDictBuilder {
    /// Create a builder for 1-based column indices
    pub fn new(key_column: usize, value_columns: impl IntoIterator<Item = usize>) -> Self {
        Self {
            key_column,
            value_columns: value_columns.into_iter().collect(),
        }
    }

    pub fn key_column(&self) -> usize {
        self.key_column
    }

    pub fn value_columns(&self) -> &[usize] {
        &self.value_columns
    }

    /// Build the dictionary for a sheet of `reader`
    pub fn build(&self, reader: &SheetReader, sheet: &str) -> ExportResult<CoordinateDict> {
        self.build_sheet(reader.sheet(sheet)?)
    }

    /// Build the dictionary for a sheet. Every row contributes one entry,
    /// including the first; blank cells become empty strings.
    pub fn build_sheet(&self, sheet: &Sheet) -> ExportResult<CoordinateDict> {
        if sheet.is_empty() {
            return Ok(CoordinateDict::new());
        }

        sheet.check_column(self.key_column)?;
        for &column in &self.value_columns {
            sheet.check_column(column)?;
        }

        let dict: CoordinateDict = sheet
            .rows()
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let key = coords::coordinate(row_idx + 1, self.key_column);
                let entry = std::iter::once(self.key_column)
                    .chain(self.value_columns.iter().copied())
                    .map(|column| row[column - 1].to_string())
                    .collect::<Vec<_>>();
                (key, entry)
            })
            .collect();

        debug!(
            sheet = sheet.name(),
            entries = dict.len(),
            "built coordinate dictionary"
        );
        Ok(dict)
    }
}
