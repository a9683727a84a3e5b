//! CLI command handlers

pub mod commands;

pub use commands::{dict, grades, inspect, parse_span, run, sheets, show};
