//! OpenDocument Presentation (.odp) generation.
//!
//! Slides are drawing pages: shapes, text boxes and table objects go on the
//! open slide, master slides collect shapes shown behind every slide bound
//! to them, and speaker notes hang below their slide.

mod generator;

pub use generator::PresentationGenerator;
