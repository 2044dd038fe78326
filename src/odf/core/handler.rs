//! Output handlers.
//!
//! Serialization drives a [`DocumentHandler`], a SAX-like sink. The crate
//! ships two: [`XmlWriter`], which renders to a string, and
//! [`ElementCollector`], which records the calls into an [`ElementTree`] so a
//! finished document can be nested inside another one.

use crate::common::xml::push_escaped;
use crate::odf::elements::{Attributes, ElementTree};

/// Sink receiving serialized document events
pub trait DocumentHandler {
    fn start_document(&mut self) {}

    fn end_document(&mut self) {}

    fn start_element(&mut self, name: &str, attributes: &Attributes);

    fn end_element(&mut self, name: &str);

    /// Unescaped text; the handler escapes it
    fn characters(&mut self, text: &str);

    /// Pre-escaped character data written as is
    fn raw(&mut self, data: &str);
}

/// Renders handler events as XML text.
///
/// An element closed right after being opened is written in empty-element
/// form (`<text:s/>`).
///
/// # Examples
///
/// ```
/// use odfgen::odf::core::{DocumentHandler, XmlWriter};
/// use odfgen::odf::Attributes;
///
/// let mut writer = XmlWriter::new();
/// writer.start_element("text:p", &Attributes::new().with("text:style-name", "P1"));
/// writer.characters("a < b");
/// writer.end_element("text:p");
/// writer.start_element("text:s", &Attributes::new());
/// writer.end_element("text:s");
/// assert_eq!(writer.as_str(), r#"<text:p text:style-name="P1">a &lt; b</text:p><text:s/>"#);
/// ```
#[derive(Debug, Default)]
pub struct XmlWriter {
    output: String,
    pending_open: bool,
}

impl XmlWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.output
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.output
    }

    fn close_pending(&mut self) {
        if self.pending_open {
            self.output.push('>');
            self.pending_open = false;
        }
    }
}

impl DocumentHandler for XmlWriter {
    fn start_document(&mut self) {
        self.output
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }

    fn start_element(&mut self, name: &str, attributes: &Attributes) {
        self.close_pending();
        self.output.push('<');
        self.output.push_str(name);
        for (key, value) in attributes.iter() {
            self.output.push(' ');
            self.output.push_str(key);
            self.output.push_str("=\"");
            push_escaped(&mut self.output, value, true);
            self.output.push('"');
        }
        self.pending_open = true;
    }

    fn end_element(&mut self, name: &str) {
        if self.pending_open {
            self.output.push_str("/>");
            self.pending_open = false;
        } else {
            self.output.push_str("</");
            self.output.push_str(name);
            self.output.push('>');
        }
    }

    fn characters(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.close_pending();
        push_escaped(&mut self.output, text, false);
    }

    fn raw(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        self.close_pending();
        self.output.push_str(data);
    }
}

/// Records handler events into an [`ElementTree`]
#[derive(Debug, Default)]
pub struct ElementCollector {
    tree: ElementTree,
}

impl ElementCollector {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn into_tree(self) -> ElementTree {
        self.tree
    }
}

impl DocumentHandler for ElementCollector {
    fn start_element(&mut self, name: &str, attributes: &Attributes) {
        self.tree.push_open(name, attributes.clone());
    }

    fn end_element(&mut self, name: &str) {
        self.tree.push_close(name);
    }

    fn characters(&mut self, text: &str) {
        self.tree.push_text(text);
    }

    fn raw(&mut self, data: &str) {
        self.tree.push_char_data(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_declaration_and_escaping() {
        let mut writer = XmlWriter::new();
        writer.start_document();
        writer.start_element("a", &Attributes::new().with("x", "\"q\" & <t>"));
        writer.raw("&amp;");
        writer.end_element("a");
        writer.end_document();
        assert_eq!(
            writer.into_string(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a x=\"&quot;q&quot; &amp; &lt;t&gt;\">&amp;</a>"
        );
    }

    #[test]
    fn test_empty_text_keeps_empty_element() {
        let mut writer = XmlWriter::new();
        writer.start_element("text:p", &Attributes::new());
        writer.characters("");
        writer.end_element("text:p");
        assert_eq!(writer.as_str(), "<text:p/>");
    }

    #[test]
    fn test_collector_replays_tree() {
        let mut tree = ElementTree::new();
        tree.push_open("text:p", Attributes::new());
        tree.push_text("hi");
        tree.push_close("text:p");

        let mut collector = ElementCollector::new();
        tree.write(&mut collector);
        assert_eq!(collector.into_tree(), tree);
    }
}
