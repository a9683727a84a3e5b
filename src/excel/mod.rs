//! Workbook access
//!
//! Worksheets are loaded through calamine into in-memory grids and addressed
//! with 1-based (row, column) coordinates.

pub mod coords;
mod reader;

pub use reader::{Sheet, SheetReader};
