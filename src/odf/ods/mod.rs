//! OpenDocument Spreadsheet (.ods) generation.
//!
//! Rows and cells are sparse: a row or cell carrying `librevenge:row` or
//! `librevenge:column` past the next free position is preceded by one
//! repeated filler element, so the written grid stays dense.

mod generator;

pub use generator::SpreadsheetGenerator;
