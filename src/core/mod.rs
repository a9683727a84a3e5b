//! Sheet data collection: column records and coordinate-keyed dictionaries

pub mod grades;
pub mod keyed;

pub use grades::{collect_sheet, duplicate_keys, GradeCollector, HEADER_ROW};
pub use keyed::KeyedDictBuilder;
