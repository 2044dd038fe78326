//! Output element model.
//!
//! The generator emits a closed vocabulary of ODF elements, so there is no
//! DOM here: content is an ordered stream of open/close/text nodes.

/// Nodes, attribute lists and element trees
pub mod element;
/// Namespace declarations
pub mod namespace;
/// Whitespace-aware text emission
pub mod text;

pub use element::{Attributes, ElementTree, Node};
pub use text::push_text_content;
