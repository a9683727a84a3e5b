use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("{what} {index} is out of range for sheet '{sheet}' (1..={limit})")]
    OutOfRange {
        sheet: String,
        what: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("Invalid variable name: {0:?}")]
    InvalidName(String),

    #[error("Invalid column reference: {0:?}")]
    InvalidColumn(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl ExportError {
    pub(crate) fn row_out_of_range(sheet: &str, index: usize, limit: usize) -> Self {
        ExportError::OutOfRange {
            sheet: sheet.to_string(),
            what: "Row",
            index,
            limit,
        }
    }

    pub(crate) fn column_out_of_range(sheet: &str, index: usize, limit: usize) -> Self {
        ExportError::OutOfRange {
            sheet: sheet.to_string(),
            what: "Column",
            index,
            limit,
        }
    }
}
