//! Workbook reader - loads worksheets into memory and serves 1-based cell access

use crate::error::{ExportError, ExportResult};
use crate::types::{CellValue, ColumnRef};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A named, rectangular grid of cells anchored at A1
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Sheet {
    /// Create a sheet from rows; short rows are padded with empty cells
    pub fn new(name: impl Into<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self {
            name: name.into(),
            rows,
            width,
        }
    }

    /// Build a sheet from a calamine range.
    ///
    /// Ranges start at the first used cell; positions above/left of it are
    /// filled with empty cells so that coordinates stay absolute.
    pub fn from_range(name: impl Into<String>, range: &Range<Data>) -> Self {
        let Some((end_row, end_col)) = range.end() else {
            return Self::new(name, Vec::new());
        };

        let rows = (0..=end_row)
            .map(|row| {
                (0..=end_col)
                    .map(|col| {
                        range
                            .get_value((row, col))
                            .map(convert_data)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self::new(name, rows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (shared by every row)
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Cell at a 1-based position, `None` outside the sheet
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        if row == 0 || column == 0 {
            return None;
        }
        self.rows.get(row - 1)?.get(column - 1)
    }

    pub(crate) fn check_row(&self, row: usize) -> ExportResult<()> {
        if row == 0 || row > self.height() {
            return Err(ExportError::row_out_of_range(&self.name, row, self.height()));
        }
        Ok(())
    }

    pub(crate) fn check_column(&self, column: usize) -> ExportResult<()> {
        if column == 0 || column > self.width {
            return Err(ExportError::column_out_of_range(
                &self.name, column, self.width,
            ));
        }
        Ok(())
    }
}

/// Map a calamine cell to the exported value model
fn convert_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// In-memory workbook with sheet lookup by name
#[derive(Debug, Clone, Default)]
pub struct SheetReader {
    path: Option<PathBuf>,
    sheets: Vec<Sheet>,
}

impl SheetReader {
    /// Open a workbook file (.xlsx, .xlsm, .xlsb, .xls, .ods) and load every worksheet
    pub fn open<P: AsRef<Path>>(path: P) -> ExportResult<Self> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            ExportError::Workbook(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            match workbook.worksheet_range(&name) {
                Ok(range) => {
                    let sheet = Sheet::from_range(name.as_str(), &range);
                    debug!(
                        sheet = %name,
                        rows = sheet.height(),
                        columns = sheet.width(),
                        "loaded sheet"
                    );
                    sheets.push(sheet);
                }
                // Chart sheets and similar have no cell range
                Err(e) => warn!(sheet = %name, error = %e, "skipping unreadable sheet"),
            }
        }

        Ok(Self {
            path: Some(path.to_path_buf()),
            sheets,
        })
    }

    /// Build a reader over sheets that are already in memory
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { path: None, sheets }
    }

    /// Source file, when the reader was opened from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> ExportResult<&Sheet> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| ExportError::SheetNotFound(name.to_string()))
    }

    /// Values of a 1-based row, left to right
    pub fn row_values(&self, sheet: &str, row: usize) -> ExportResult<Vec<CellValue>> {
        let sheet = self.sheet(sheet)?;
        sheet.check_row(row)?;
        Ok(sheet.rows[row - 1].clone())
    }

    /// Values of a column (index or letters), top to bottom
    pub fn column_values(&self, sheet: &str, column: ColumnRef) -> ExportResult<Vec<CellValue>> {
        let sheet = self.sheet(sheet)?;
        let column = column.index();
        sheet.check_column(column)?;
        Ok(sheet
            .rows
            .iter()
            .map(|row| row[column - 1].clone())
            .collect())
    }

    /// Single cell value; blank cells and cells past the used area are `Empty`
    pub fn cell_value(&self, sheet: &str, row: usize, column: usize) -> ExportResult<CellValue> {
        let sheet = self.sheet(sheet)?;
        if row == 0 {
            return Err(ExportError::row_out_of_range(sheet.name(), row, sheet.height()));
        }
        if column == 0 {
            return Err(ExportError::column_out_of_range(
                sheet.name(),
                column,
                sheet.width(),
            ));
        }
        Ok(sheet.cell(row, column).cloned().unwrap_or_default())
    }

    /// Every row of the sheet, top to bottom
    pub fn all_rows(&self, sheet: &str) -> ExportResult<&[Vec<CellValue>]> {
        Ok(self.sheet(sheet)?.rows())
    }

    /// Rectangular block of values for inclusive 1-based row/column bounds
    pub fn range_values(
        &self,
        sheet: &str,
        rows: RangeInclusive<usize>,
        columns: RangeInclusive<usize>,
    ) -> ExportResult<Vec<Vec<CellValue>>> {
        let sheet = self.sheet(sheet)?;
        if *rows.start() == 0 {
            return Err(ExportError::row_out_of_range(sheet.name(), 0, sheet.height()));
        }
        if *columns.start() == 0 {
            return Err(ExportError::column_out_of_range(sheet.name(), 0, sheet.width()));
        }

        Ok(rows
            .map(|row| {
                columns
                    .clone()
                    .map(|column| sheet.cell(row, column).cloned().unwrap_or_default())
                    .collect()
            })
            .collect())
    }
}
