//! OpenDocument Drawing (.odg) generation.

mod generator;

pub use generator::DrawingGenerator;
