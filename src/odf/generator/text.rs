//! Paragraphs, spans, links, fields, notes, comments and sections.

use super::context::{FrameKind, Scope, ScopeFlags};
use super::{DocumentAssembler, StyleDefinition};
use crate::odf::core::normalize_date;
use crate::odf::elements::{Attributes, push_text_content};
use crate::odf::property::{PropertyRecord, is_internal_key};
use crate::odf::style::properties::attributes_where;
use crate::odf::style::{Zone, encode_style_name};

const PARAGRAPH_ID: &str = "librevenge:paragraph-id";
const SPAN_ID: &str = "librevenge:span-id";

/// Comment attributes placing the annotation on a page
const ANNOTATION_KEYS: [&str; 5] = ["svg:x", "svg:y", "svg:width", "svg:height", "office:name"];

impl DocumentAssembler {
    /// Register a paragraph style under its `librevenge:paragraph-id`.
    ///
    /// A style with a `style:display-name` becomes a named style, used as
    /// parent by the paragraphs referencing it. Otherwise its attributes are
    /// the base the paragraph's own attributes are applied on.
    pub fn define_paragraph_style(&mut self, record: &PropertyRecord) {
        let Some(id) = record.get_int(PARAGRAPH_ID) else {
            log::warn!("paragraph style without {}, ignored", PARAGRAPH_ID);
            return;
        };
        let definition = match record.get_str("style:display-name") {
            Some(display) => {
                let mut style = record.style_attributes();
                style.remove("text:outline-level");
                self.styles.register_fonts(&style);
                let name = self
                    .styles
                    .paragraphs
                    .intern_named(&style, Zone::Style, &encode_style_name(display));
                StyleDefinition::Named(name)
            },
            None => StyleDefinition::Inline(record.clone()),
        };
        self.paragraph_definitions.insert(id, definition);
    }

    /// Register a character style under its `librevenge:span-id`
    pub fn define_character_style(&mut self, record: &PropertyRecord) {
        let Some(id) = record.get_int(SPAN_ID) else {
            log::warn!("character style without {}, ignored", SPAN_ID);
            return;
        };
        let definition = match record.get_str("style:display-name") {
            Some(display) => {
                let style = record.style_attributes();
                self.styles.register_fonts(&style);
                let name = self
                    .styles
                    .spans
                    .intern_named(&style, Zone::Style, &encode_style_name(display));
                StyleDefinition::Named(name)
            },
            None => StyleDefinition::Inline(record.clone()),
        };
        self.span_definitions.insert(id, definition);
    }

    fn resolve_definition(&self, record: &PropertyRecord, paragraph: bool) -> (PropertyRecord, Option<String>) {
        let (key, definitions) = if paragraph {
            (PARAGRAPH_ID, &self.paragraph_definitions)
        } else {
            (SPAN_ID, &self.span_definitions)
        };
        let Some(id) = record.get_int(key) else {
            return (PropertyRecord::new(), None);
        };
        match definitions.get(&id) {
            Some(StyleDefinition::Named(name)) => (PropertyRecord::new(), Some(name.clone())),
            Some(StyleDefinition::Inline(base)) => (base.clone(), None),
            None => {
                log::debug!("{} {} is not defined, using the inline attributes", key, id);
                (PropertyRecord::new(), None)
            },
        }
    }

    /// Style name of a paragraph opened now with `record`
    pub(crate) fn paragraph_style_name(&mut self, record: &PropertyRecord) -> String {
        let (base, parent) = self.resolve_definition(record, true);
        let mut style = base.merged(record).style_attributes();
        style.remove("text:outline-level");
        if let Some(parent) = parent {
            style.insert("style:parent-style-name", parent);
        } else if !style.contains("style:parent-style-name")
            && let Some(hint) = self.paragraph_parent_hint()
        {
            style.insert("style:parent-style-name", hint);
        }
        if self.at_body_level()
            && let Some(master) = self.pages.take_pending_master()
        {
            style.insert("style:master-page-name", master);
        }
        self.styles.register_fonts(&style);
        let zone = self.zone();
        self.styles.paragraphs.intern(&style, zone)
    }

    fn outline_level(&self, record: &PropertyRecord) -> Option<i64> {
        record.get_int("text:outline-level").or_else(|| {
            match record.get_int(PARAGRAPH_ID).and_then(|id| self.paragraph_definitions.get(&id)) {
                Some(StyleDefinition::Inline(base)) => base.get_int("text:outline-level"),
                _ => None,
            }
        })
    }

    /// Open a paragraph, or a heading when `text:outline-level` is set
    pub fn open_paragraph(&mut self, record: &PropertyRecord) {
        if self.context.is_open(Scope::Paragraph) {
            log::warn!("paragraph opened inside a paragraph, closing the outer one");
            self.context.close(Scope::Paragraph);
        }
        let name = self.paragraph_style_name(record);
        let mut attributes = Attributes::new().with("text:style-name", name);
        let tag = match self.outline_level(record) {
            Some(level) => {
                attributes.insert("text:outline-level", level.to_string());
                "text:h"
            },
            None => "text:p",
        };
        self.context.open(Scope::Paragraph, tag, attributes);
    }

    pub fn close_paragraph(&mut self) {
        self.context.close(Scope::Paragraph);
    }

    /// Open a span; its fonts are declared as font faces
    pub fn open_span(&mut self, record: &PropertyRecord) {
        if !self.context.contains(ScopeFlags::PARAGRAPH) {
            log::warn!("span outside of a paragraph, ignored");
            return;
        }
        let (base, parent) = self.resolve_definition(record, false);
        let mut style = base.merged(record).style_attributes();
        if let Some(parent) = parent {
            style.insert("style:parent-style-name", parent);
        }
        self.styles.register_fonts(&style);
        let zone = self.zone();
        let name = self.styles.spans.intern(&style, zone);
        self.context
            .open(Scope::Span, "text:span", Attributes::new().with("text:style-name", name));
    }

    pub fn close_span(&mut self) {
        self.context.close(Scope::Span);
    }

    /// Open a hyperlink: `text:a` in text, `draw:a` around shapes
    pub fn open_link(&mut self, record: &PropertyRecord) {
        let mut attributes = Attributes::new().with("xlink:type", "simple");
        for (key, value) in record.iter() {
            if !is_internal_key(key) {
                attributes.insert(key, value.to_odf_string());
            }
        }
        let tag = if self.context.contains(ScopeFlags::PARAGRAPH) {
            "text:a"
        } else {
            "draw:a"
        };
        self.context.open(Scope::Link, tag, attributes);
    }

    pub fn close_link(&mut self) {
        self.context.close(Scope::Link);
    }

    fn in_paragraph(&self, what: &str) -> bool {
        let inside = self.context.contains(ScopeFlags::PARAGRAPH);
        if !inside {
            log::warn!("{} outside of a paragraph, ignored", what);
        }
        inside
    }

    /// Append text; runs of spaces, tabs and newlines become elements
    pub fn insert_text(&mut self, text: &str) {
        if self.in_paragraph("text") {
            push_text_content(self.context.tree(), text);
        }
    }

    pub fn insert_tab(&mut self) {
        if self.in_paragraph("tab") {
            self.context.tree().push_empty("text:tab", Attributes::new());
        }
    }

    pub fn insert_space(&mut self) {
        if self.in_paragraph("space") {
            self.context.tree().push_empty("text:s", Attributes::new());
        }
    }

    pub fn insert_line_break(&mut self) {
        if self.in_paragraph("line break") {
            self.context.tree().push_empty("text:line-break", Attributes::new());
        }
    }

    /// Insert a field named by `librevenge:field-type`
    pub fn insert_field(&mut self, record: &PropertyRecord) {
        if !self.in_paragraph("field") {
            return;
        }
        let Some(field) = record.get_str("librevenge:field-type") else {
            log::warn!("field without librevenge:field-type, ignored");
            return;
        };
        let mut attributes = attributes_where(record, |k| !is_internal_key(k));
        let mut default = |key: &str, value: &str| {
            if attributes.get(key).is_none() {
                attributes.insert(key, value);
            }
        };
        match field {
            "text:page-number" => default("text:select-page", "current"),
            "text:chapter" => {
                default("text:display", "name");
                default("text:outline-level", "1");
            },
            "text:file-name" => default("text:display", "full"),
            "text:page-count" | "text:title" | "text:subject" | "text:sheet-name" => {},
            "text:date" | "text:time" => {
                if let Some(format) = record.children("librevenge:format") {
                    let value_type = if field == "text:date" { "date" } else { "time" };
                    let numbering = PropertyRecord::new()
                        .with("librevenge:value-type", value_type)
                        .with_children("librevenge:format", format.to_vec());
                    let zone = self.zone();
                    let name = self.styles.numberings.intern(&numbering, zone);
                    attributes.insert("style:data-style-name", name);
                }
            },
            other => {
                log::debug!("unsupported field {}, ignored", other);
                return;
            },
        }
        let tree = self.context.tree();
        tree.push_open(field, attributes);
        if let Some(content) = record.get_str("librevenge:field-content") {
            tree.push_text(content);
        }
        tree.push_close(field);
    }

    /// Open a section, with its column layout as a section style
    pub fn open_section(&mut self, record: &PropertyRecord) {
        if self.context.is_open(Scope::Paragraph) {
            log::warn!("section opened inside a paragraph, closing the paragraph");
            self.context.close(Scope::Paragraph);
        }
        let zone = self.zone();
        let style = self.styles.sections.intern(&record.style_attributes(), zone);
        self.counters.sections += 1;
        let name = record
            .get_string("text:name")
            .unwrap_or_else(|| format!("Section{}", self.counters.sections));
        self.context.open(
            Scope::Section,
            "text:section",
            Attributes::new().with("text:style-name", style).with("text:name", name),
        );
    }

    pub fn close_section(&mut self) {
        self.context.close(Scope::Section);
    }

    pub fn open_footnote(&mut self, record: &PropertyRecord) {
        self.open_note(record, true);
    }

    pub fn close_footnote(&mut self) {
        self.close_note();
    }

    pub fn open_endnote(&mut self, record: &PropertyRecord) {
        self.open_note(record, false);
    }

    pub fn close_endnote(&mut self) {
        self.close_note();
    }

    fn open_note(&mut self, record: &PropertyRecord, footnote: bool) {
        if !self.in_paragraph("note") {
            return;
        }
        let (class, id, parent) = if footnote {
            self.counters.footnotes += 1;
            ("footnote", format!("ftn{}", self.counters.footnotes - 1), "Footnote")
        } else {
            self.counters.endnotes += 1;
            ("endnote", format!("edn{}", self.counters.endnotes - 1), "Endnote")
        };
        let number = if footnote { self.counters.footnotes } else { self.counters.endnotes };

        let tree = self.context.tree();
        tree.push_open(
            "text:note",
            Attributes::new().with("text:id", id).with("text:note-class", class),
        );
        match record.get_str("text:label") {
            Some(label) => tree.push_text_element(
                "text:note-citation",
                Attributes::new().with("text:label", label),
                label,
            ),
            None => {
                let citation = record
                    .get_string("librevenge:number")
                    .unwrap_or_else(|| number.to_string());
                tree.push_text_element("text:note-citation", Attributes::new(), &citation);
            },
        }
        tree.push_open("text:note-body", Attributes::new());

        self.context.push_frame(FrameKind::Note, &["text:note-body", "text:note"]);
        self.styles.lists.push_scope();
        self.note_parents.push(parent);
    }

    pub(crate) fn close_note(&mut self) {
        if self.context.pop_inline_frame(FrameKind::Note) {
            self.styles.lists.pop_scope();
            self.note_parents.pop();
        }
    }

    /// Open an annotation; its content has its own list numbering
    pub fn open_comment(&mut self, record: &PropertyRecord) {
        let attributes = attributes_where(record, |k| ANNOTATION_KEYS.contains(&k));
        let tree = self.context.tree();
        tree.push_open("office:annotation", attributes);
        if let Some(creator) = record
            .get_str("dc:creator")
            .or_else(|| record.get_str("meta:initial-creator"))
        {
            tree.push_text_element("dc:creator", Attributes::new(), creator);
        }
        if let Some(date) = record.get_str("dc:date") {
            let date = normalize_date(date).unwrap_or_else(|| date.to_string());
            tree.push_text_element("dc:date", Attributes::new(), &date);
        }
        self.context.push_frame(FrameKind::Comment, &["office:annotation"]);
        self.styles.lists.push_scope();
    }

    pub fn close_comment(&mut self) {
        if self.context.pop_inline_frame(FrameKind::Comment) {
            self.styles.lists.pop_scope();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::odf::DocumentKind;
    use crate::odf::elements::Node;
    use crate::odf::generator::{DocumentAssembler, GeneratorOptions};
    use crate::odf::property::PropertyRecord;
    use crate::odf::style::Zone;

    fn document() -> DocumentAssembler {
        let mut document = DocumentAssembler::new(DocumentKind::Text, GeneratorOptions::new());
        document.start_document(&PropertyRecord::new());
        document
    }

    fn paragraph_style(document: &DocumentAssembler, index: usize) -> String {
        document
            .body()
            .nodes()
            .iter()
            .filter(|node| node.is_open("text:p") || node.is_open("text:h"))
            .nth(index)
            .and_then(|node| node.attribute("text:style-name"))
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_double_space_becomes_element() {
        let mut document = document();
        document.open_paragraph(&PropertyRecord::new());
        document.insert_text("a  b");
        document.close_paragraph();
        document.end_document();

        let nodes = document.body().nodes();
        assert_eq!(nodes[1], Node::Text("a ".to_string()));
        assert!(nodes[2].is_open("text:s"));
        assert_eq!(nodes[4], Node::Text("b".to_string()));
        assert!(!nodes.iter().any(|n| matches!(n, Node::Text(t) if t.contains("  "))));
    }

    #[test]
    fn test_named_paragraph_style_is_parent() {
        let mut document = document();
        document.define_paragraph_style(
            &PropertyRecord::new()
                .with("librevenge:paragraph-id", 4)
                .with("style:display-name", "Quote")
                .with("fo:margin-left", "0.5in"),
        );
        document.open_paragraph(&PropertyRecord::new().with("librevenge:paragraph-id", 4));
        document.close_paragraph();
        document.end_document();

        let name = paragraph_style(&document, 0);
        let style = document.styles().paragraphs.get(&name).unwrap();
        assert_eq!(style.record.get_str("style:parent-style-name"), Some("Quote"));
        assert_eq!(document.styles().paragraphs.get("Quote").map(|s| s.zone), Some(Zone::Style));
    }

    #[test]
    fn test_inline_definition_and_undefined_id() {
        let mut document = document();
        document.define_paragraph_style(
            &PropertyRecord::new()
                .with("librevenge:paragraph-id", 1)
                .with("fo:text-align", "center"),
        );
        document.open_paragraph(&PropertyRecord::new().with("librevenge:paragraph-id", 1));
        document.close_paragraph();
        document.open_paragraph(
            &PropertyRecord::new()
                .with("librevenge:paragraph-id", 99)
                .with("fo:text-align", "end"),
        );
        document.close_paragraph();
        document.end_document();

        let first = document.styles().paragraphs.get(&paragraph_style(&document, 0)).unwrap();
        assert_eq!(first.record.get_str("fo:text-align"), Some("center"));
        assert!(!first.record.contains("librevenge:paragraph-id"));
        let second = document.styles().paragraphs.get(&paragraph_style(&document, 1)).unwrap();
        assert_eq!(second.record.get_str("fo:text-align"), Some("end"));
    }

    #[test]
    fn test_heading() {
        let mut document = document();
        document.open_paragraph(&PropertyRecord::new().with("text:outline-level", 2));
        document.insert_text("Title");
        document.close_paragraph();
        document.end_document();
        let first = &document.body().nodes()[0];
        assert!(first.is_open("text:h"));
        assert_eq!(first.attribute("text:outline-level"), Some("2"));
    }

    #[test]
    fn test_footnote_structure() {
        let mut document = document();
        document.open_paragraph(&PropertyRecord::new());
        document.insert_text("See");
        document.open_footnote(&PropertyRecord::new().with("librevenge:number", 7));
        document.open_paragraph(&PropertyRecord::new());
        document.insert_text("Note");
        document.close_paragraph();
        document.close_footnote();
        document.close_paragraph();
        document.end_document();

        let body = document.body();
        assert!(body.is_balanced());
        let note = body.nodes().iter().find(|n| n.is_open("text:note")).unwrap();
        assert_eq!(note.attribute("text:id"), Some("ftn0"));
        assert_eq!(note.attribute("text:note-class"), Some("footnote"));
        assert!(body.nodes().contains(&Node::Text("7".to_string())));

        let inner = paragraph_style(&document, 1);
        let style = document.styles().paragraphs.get(&inner).unwrap();
        assert_eq!(style.record.get_str("style:parent-style-name"), Some("Footnote"));
    }

    #[test]
    fn test_text_outside_paragraph_is_ignored() {
        let mut document = document();
        document.insert_text("lost");
        document.open_span(&PropertyRecord::new());
        document.close_span();
        document.end_document();
        assert!(document.body().is_empty());
    }

    #[test]
    fn test_fields_and_links() {
        let mut document = document();
        document.open_paragraph(&PropertyRecord::new());
        document.open_link(&PropertyRecord::new().with("xlink:href", "https://example.org"));
        document.insert_text("site");
        document.close_link();
        document.insert_field(&PropertyRecord::new().with("librevenge:field-type", "text:page-number"));
        document.insert_field(
            &PropertyRecord::new()
                .with("librevenge:field-type", "text:date")
                .with_children(
                    "librevenge:format",
                    vec![PropertyRecord::new().with("librevenge:value-type", "year")],
                ),
        );
        document.insert_field(&PropertyRecord::new().with("librevenge:field-type", "text:unknown"));
        document.close_paragraph();
        document.end_document();

        let nodes = document.body().nodes();
        let link = nodes.iter().find(|n| n.is_open("text:a")).unwrap();
        assert_eq!(link.attribute("xlink:href"), Some("https://example.org"));
        let page = nodes.iter().find(|n| n.is_open("text:page-number")).unwrap();
        assert_eq!(page.attribute("text:select-page"), Some("current"));
        let date = nodes.iter().find(|n| n.is_open("text:date")).unwrap();
        assert_eq!(date.attribute("style:data-style-name"), Some("N1"));
        assert!(!nodes.iter().any(|n| n.is_open("text:unknown")));
    }

    #[test]
    fn test_comment() {
        let mut document = document();
        document.open_paragraph(&PropertyRecord::new());
        document.open_comment(
            &PropertyRecord::new()
                .with("dc:creator", "Ana")
                .with("dc:date", "2024-05-01"),
        );
        document.open_paragraph(&PropertyRecord::new());
        document.insert_text("check");
        document.close_paragraph();
        document.close_comment();
        document.close_paragraph();
        document.end_document();

        let nodes = document.body().nodes();
        assert!(nodes[1].is_open("office:annotation"));
        assert!(nodes.contains(&Node::Text("2024-05-01T00:00:00".to_string())));
        assert!(document.body().is_balanced());
    }

    #[test]
    fn test_section() {
        let mut document = document();
        document.open_section(&PropertyRecord::new().with("fo:column-count", 2));
        document.open_paragraph(&PropertyRecord::new());
        document.close_paragraph();
        document.close_section();
        document.end_document();
        let section = &document.body().nodes()[0];
        assert_eq!(section.attribute("text:name"), Some("Section1"));
        assert_eq!(section.attribute("text:style-name"), Some("Sect1"));
    }
}
