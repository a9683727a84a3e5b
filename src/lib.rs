//! xlsx2js - spreadsheet sheets as embeddable JavaScript variables
//!
//! Reads worksheets with calamine, turns them into JSON-ready mappings and
//! writes `var <name> = <json>;` files plus an `#include` manifest for page
//! templates.
//!
//! # Features
//!
//! - Coordinate-keyed dictionaries (`E5 → [label, values...]`) for one sheet
//! - Per-sheet column records (`column_key → [{value, row, column}]`)
//! - Header sanitizing into lower-case identifier keys
//! - YAML export plans for repeatable runs
//!
//! # Example
//!
//! ```no_run
//! use xlsx2js::core::KeyedDictBuilder;
//! use xlsx2js::excel::SheetReader;
//! use xlsx2js::writer::JsExporter;
//!
//! let reader = SheetReader::open("CA_BA_Grade_1.xlsx")?;
//! let dict = KeyedDictBuilder::new(5, [7, 8, 9]).build(&reader, "G1 CA")?;
//! JsExporter::new("output777").export(&dict, "G1_CA")?;
//! # Ok::<(), xlsx2js::error::ExportError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod sanitize;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{ExportError, ExportResult};
pub use types::{CellValue, ColumnRecords, ColumnRef, CoordinateDict, SheetGrades, ValueRecord};
