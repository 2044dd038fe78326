//! OpenDocument Text (.odt) generation.
//!
//! [`TextGenerator`] accepts the full set of text events: paragraphs and
//! headings, spans, lists, notes, comments, sections, tables, page spans
//! with headers and footers, frames and shapes anchored to paragraphs.

mod generator;

pub use generator::TextGenerator;
