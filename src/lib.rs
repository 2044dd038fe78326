//! odfgen - An event-driven OpenDocument generator
//!
//! A document is described by an ordered stream of structural calls (open
//! a paragraph, open a list level, open a sheet cell, draw a rectangle, ...)
//! each carrying a [`PropertyRecord`](odf::PropertyRecord). The library
//! assembles them into an OpenDocument text, spreadsheet, drawing,
//! presentation or chart document, defining every referenced style exactly
//! once and in the section where it is used.
//!
//! # Features
//!
//! - **Five front ends**: [`odf::odt::TextGenerator`],
//!   [`odf::ods::SpreadsheetGenerator`], [`odf::odg::DrawingGenerator`],
//!   [`odf::odp::PresentationGenerator`] and [`odf::odc::ChartGenerator`],
//!   all backed by one [`DocumentAssembler`](odf::DocumentAssembler)
//! - **Style interning**: identical property sets share one automatic style
//! - **Two layouts**: a single flat XML document, or a zip package with
//!   `content.xml`, `styles.xml`, `meta.xml`, `settings.xml` and a manifest
//! - **Embedding**: finished documents (charts, text boxes) nest inside
//!   frames of another document
//!
//! # Example - Writing a text package
//!
//! ```
//! use odfgen::odf::PropertyRecord;
//! use odfgen::odf::odt::TextGenerator;
//!
//! # fn main() -> odfgen::Result<()> {
//! let mut document = TextGenerator::default();
//! document.start_document(&PropertyRecord::new().with("dc:title", "Minutes"));
//! document.open_paragraph(&PropertyRecord::new().with("fo:font-weight", "bold"));
//! document.insert_text("Attendees");
//! document.close_paragraph();
//! document.end_document();
//!
//! let bytes = document.to_package_bytes()?;
//! assert!(bytes.starts_with(b"PK"));
//! # Ok(())
//! # }
//! ```
//!
//! # Example - A sparse spreadsheet
//!
//! ```
//! use odfgen::odf::PropertyRecord;
//! use odfgen::odf::ods::SpreadsheetGenerator;
//!
//! let mut sheet = SpreadsheetGenerator::default();
//! sheet.start_document(&PropertyRecord::new());
//! sheet.open_sheet(&PropertyRecord::new().with("librevenge:sheet-name", "Data"));
//! sheet.open_sheet_row(&PropertyRecord::new().with("librevenge:row", 4));
//! sheet.open_sheet_cell(&PropertyRecord::new().with("librevenge:column", 2));
//! sheet.close_sheet_cell();
//! sheet.close_sheet_row();
//! sheet.close_sheet();
//! sheet.end_document();
//!
//! let content = sheet.stream_xml(odfgen::odf::StreamKind::Content);
//! assert!(content.contains(r#"table:number-rows-repeated="4""#));
//! ```

/// Cross-format helpers: errors, units and XML escaping
pub mod common;

/// OpenDocument generation
///
/// This module holds the assembly engine, the style families, the output
/// streams and the per-format front ends.
pub mod odf;

pub use common::{Error, Result};
