//! Output node model.
//!
//! An [`ElementTree`] is an append-only sequence of [`Node`]s that forms one
//! zone of output (the body, a header, a master slide, ...). Trees are never
//! shared: content moves between them with [`ElementTree::append`], which
//! drains the source.

use crate::common::{Error, Result};
use crate::odf::core::DocumentHandler;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;

/// Ordered attribute list of one open tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    items: SmallVec<[(String, String); 4]>,
}

impl Attributes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[inline]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an attribute, keeping its first position
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.items.iter_mut().find(|(n, _)| n == name) {
            Some(item) => item.1 = value,
            None => self.items.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.items.iter().position(|(n, _)| n == name)?;
        Some(self.items.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One output node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Open { name: String, attributes: Attributes },
    Close { name: String },
    /// Text, escaped when written
    Text(String),
    /// Pre-escaped character data (base64 payloads, imported fragments)
    CharData(String),
}

impl Node {
    /// Tag name of open and close nodes
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Open { name, .. } | Self::Close { name } => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub fn is_open(&self, tag: &str) -> bool {
        matches!(self, Self::Open { name, .. } if name == tag)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            Self::Open { attributes, .. } => attributes.get(key),
            _ => None,
        }
    }

    pub fn write(&self, handler: &mut dyn DocumentHandler) {
        match self {
            Self::Open { name, attributes } => handler.start_element(name, attributes),
            Self::Close { name } => handler.end_element(name),
            Self::Text(text) => handler.characters(text),
            Self::CharData(data) => handler.raw(data),
        }
    }
}

/// Append-only sequence of output nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementTree {
    nodes: Vec<Node>,
}

impl ElementTree {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_open(&mut self, name: &str, attributes: Attributes) {
        self.nodes.push(Node::Open {
            name: name.to_string(),
            attributes,
        });
    }

    /// Open immediately followed by close
    pub fn push_empty(&mut self, name: &str, attributes: Attributes) {
        self.push_open(name, attributes);
        self.push_close(name);
    }

    pub fn push_close(&mut self, name: &str) {
        self.nodes.push(Node::Close {
            name: name.to_string(),
        });
    }

    pub fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.nodes.push(Node::Text(text.to_string()));
        }
    }

    pub fn push_char_data(&mut self, data: &str) {
        if !data.is_empty() {
            self.nodes.push(Node::CharData(data.to_string()));
        }
    }

    /// Element containing a single text node
    pub fn push_text_element(&mut self, name: &str, attributes: Attributes, text: &str) {
        self.push_open(name, attributes);
        self.push_text(text);
        self.push_close(name);
    }

    /// Move every node of `other` to the end of `self`, leaving `other` empty
    pub fn append(&mut self, other: &mut ElementTree) {
        self.nodes.append(&mut other.nodes);
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Number of open tags named `tag`
    pub fn count_open(&self, tag: &str) -> usize {
        self.nodes.iter().filter(|n| n.is_open(tag)).count()
    }

    /// `true` if open and close nodes nest properly
    pub fn is_balanced(&self) -> bool {
        let mut stack: Vec<&str> = Vec::new();
        for node in &self.nodes {
            match node {
                Node::Open { name, .. } => stack.push(name),
                Node::Close { name } => {
                    if stack.pop() != Some(name.as_str()) {
                        return false;
                    }
                },
                _ => {},
            }
        }
        stack.is_empty()
    }

    /// Replay every node into `handler`
    pub fn write(&self, handler: &mut dyn DocumentHandler) {
        for node in &self.nodes {
            node.write(handler);
        }
    }

    /// Import an externally produced XML fragment.
    ///
    /// Processing instructions, comments and the XML declaration are dropped.
    /// Text keeps its original escaping and is stored as character data.
    ///
    /// # Examples
    ///
    /// ```
    /// use odfgen::odf::ElementTree;
    ///
    /// let tree = ElementTree::from_xml(r#"<text:p text:style-name="P1">a &amp; b</text:p>"#).unwrap();
    /// assert_eq!(tree.len(), 3);
    /// assert!(tree.is_balanced());
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut tree = ElementTree::new();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let (name, attributes) = Self::read_start(e)?;
                    tree.push_open(&name, attributes);
                },
                Event::Empty(ref e) => {
                    let (name, attributes) = Self::read_start(e)?;
                    tree.push_empty(&name, attributes);
                },
                Event::End(ref e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    tree.push_close(&name);
                },
                Event::Text(ref t) => {
                    tree.push_char_data(&String::from_utf8_lossy(t.as_ref()));
                },
                Event::GeneralRef(ref r) => {
                    let entity = String::from_utf8_lossy(r.as_ref());
                    tree.push_char_data(&format!("&{};", entity));
                },
                Event::CData(ref c) => {
                    tree.push_text(&String::from_utf8_lossy(c.as_ref()));
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if !tree.is_balanced() {
            return Err(Error::XmlError("unbalanced XML fragment".to_string()));
        }
        Ok(tree)
    }

    fn read_start(e: &BytesStart) -> Result<(String, Attributes)> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let mut attributes = Attributes::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let raw = String::from_utf8_lossy(&attr.value).to_string();
            let value = quick_xml::escape::unescape(&raw)
                .map_err(|e| Error::XmlError(e.to_string()))?
                .into_owned();
            attributes.insert(&key, value);
        }
        Ok((name, attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_drains_source() {
        let mut body = ElementTree::new();
        let mut other = ElementTree::new();
        other.push_text_element("text:p", Attributes::new(), "x");
        body.append(&mut other);
        assert!(other.is_empty());
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn test_is_balanced() {
        let mut tree = ElementTree::new();
        tree.push_open("text:p", Attributes::new());
        tree.push_open("text:span", Attributes::new());
        tree.push_close("text:p");
        assert!(!tree.is_balanced());

        let mut tree = ElementTree::new();
        tree.push_open("text:p", Attributes::new());
        assert!(!tree.is_balanced());
        tree.push_close("text:p");
        assert!(tree.is_balanced());
    }

    #[test]
    fn test_attributes_keep_order_on_replace() {
        let mut attrs = Attributes::new().with("a", "1").with("b", "2");
        attrs.insert("a", "3");
        let collected: Vec<_> = attrs.iter().collect();
        assert_eq!(collected, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_from_xml_unescapes_attributes() {
        let tree = ElementTree::from_xml(r#"<draw:a xlink:href="a?b=1&amp;c=2"/>"#).unwrap();
        assert_eq!(tree.nodes()[0].attribute("xlink:href"), Some("a?b=1&c=2"));
        assert_eq!(tree.nodes()[1], Node::Close { name: "draw:a".to_string() });
    }

    #[test]
    fn test_from_xml_rejects_unbalanced() {
        assert!(ElementTree::from_xml("<text:p><text:span></text:p>").is_err());
    }
}
