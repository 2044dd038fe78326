//! OpenDocument Chart (.odc) generation.
//!
//! A chart is written standalone or, more often, finished and nested in
//! another document with `insert_embedded_document`.

mod generator;

pub use generator::ChartGenerator;
