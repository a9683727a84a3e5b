//! Per-sheet column collection: sanitized header -> ordered value records

use crate::excel::{Sheet, SheetReader};
use crate::sanitize::{clean_key, clean_value};
use crate::types::{ColumnRecords, SheetGrades, ValueRecord};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 1-based row holding the column headers
pub const HEADER_ROW: usize = 1;

/// Collects every sheet of a workbook into `{column_key: [ValueRecord]}` mappings
pub struct GradeCollector<'a> {
    reader: &'a SheetReader,
}

impl<'a> GradeCollector<'a> {
    pub fn new(reader: &'a SheetReader) -> Self {
        Self { reader }
    }

    /// Collect all sheets, keyed by sheet name in workbook order
    pub fn collect(&self) -> SheetGrades {
        self.reader
            .sheets()
            .iter()
            .map(|sheet| (sheet.name().to_string(), collect_sheet(sheet)))
            .collect()
    }

    /// Collect a single sheet by name
    pub fn collect_sheet(&self, name: &str) -> crate::ExportResult<ColumnRecords> {
        Ok(collect_sheet(self.reader.sheet(name)?))
    }
}

/// Build the column records for one sheet.
///
/// Row 1 is the header row. When two headers sanitize to the same key, the
/// later column's records replace the earlier ones (the key keeps its first
/// position).
pub fn collect_sheet(sheet: &Sheet) -> ColumnRecords {
    let Some((headers, data_rows)) = sheet.rows().split_first() else {
        return ColumnRecords::new();
    };

    let keys: Vec<String> = headers.iter().map(|header| clean_key(header)).collect();
    for key in duplicate_keys(&keys) {
        warn!(
            sheet = sheet.name(),
            key = %key,
            "duplicate column key after sanitizing headers, later column wins"
        );
    }

    debug!(
        sheet = sheet.name(),
        columns = keys.len(),
        rows = data_rows.len(),
        "collecting sheet"
    );

    keys.into_iter()
        .enumerate()
        .map(|(col_idx, key)| {
            let records = data_rows
                .iter()
                .enumerate()
                .map(|(row_idx, row)| {
                    ValueRecord::new(
                        clean_value(&row[col_idx]),
                        row_idx + HEADER_ROW + 1,
                        col_idx + 1,
                    )
                })
                .collect();
            (key, records)
        })
        .collect()
}

/// Keys that occur more than once, in order of first appearance
pub fn duplicate_keys(keys: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key.as_str()).or_default() += 1;
    }

    let mut duplicates: Vec<String> = Vec::new();
    for key in keys {
        if counts[key.as_str()] > 1 && !duplicates.contains(key) {
            duplicates.push(key.clone());
        }
    }
    duplicates
}
