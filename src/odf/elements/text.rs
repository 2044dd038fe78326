//! Text run emission.
//!
//! Runs of spaces, tabs and line breaks have no reliable XML text form in
//! ODF, so they are written as `text:s`, `text:tab` and `text:line-break`
//! elements. The first space of a run stays literal; every further space in
//! the same run becomes one `text:s`.

use super::element::{Attributes, ElementTree};
use memchr::memchr3;

/// Append `text` to `tree`, applying the whitespace rule.
///
/// # Examples
///
/// ```
/// use odfgen::odf::{ElementTree, Node};
/// use odfgen::odf::elements::push_text_content;
///
/// let mut tree = ElementTree::new();
/// push_text_content(&mut tree, "a  b");
/// assert_eq!(tree.nodes()[0], Node::Text("a ".to_string()));
/// assert!(tree.nodes()[1].is_open("text:s"));
/// assert_eq!(tree.nodes()[3], Node::Text("b".to_string()));
/// ```
pub fn push_text_content(tree: &mut ElementTree, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut pos = 0;

    while let Some(offset) = memchr3(b' ', b'\t', b'\n', &bytes[pos..]) {
        let i = pos + offset;
        match bytes[i] {
            b' ' => {
                let mut end = i + 1;
                while end < bytes.len() && bytes[end] == b' ' {
                    end += 1;
                }
                if end - i > 1 {
                    tree.push_text(&text[start..=i]);
                    for _ in 0..(end - i - 1) {
                        tree.push_empty("text:s", Attributes::new());
                    }
                    start = end;
                }
                pos = end;
            },
            b'\t' => {
                tree.push_text(&text[start..i]);
                tree.push_empty("text:tab", Attributes::new());
                start = i + 1;
                pos = start;
            },
            _ => {
                tree.push_text(&text[start..i]);
                tree.push_empty("text:line-break", Attributes::new());
                start = i + 1;
                pos = start;
            },
        }
    }
    tree.push_text(&text[start..]);
}
