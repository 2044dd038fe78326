//! XML text helpers shared by every writer.

mod escape;

pub use escape::{escape_text, escape_xml, push_escaped};
