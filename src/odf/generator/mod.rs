//! The document assembly engine.
//!
//! [`DocumentAssembler`] receives the structural calls of every document
//! kind. It keeps the [`StructuralContext`] (what is open, where content
//! goes), asks the style interners of its [`StyleSet`] for style names, and
//! appends nodes to the tree selected by the context. Once
//! [`end_document`](DocumentAssembler::end_document) has run, a
//! [`StreamSerializer`] writes the result.
//!
//! The events are grouped by concern:
//!
//! | Module | Events |
//! |--------|--------|
//! | `text` | paragraphs, spans, links, fields, notes, comments, sections |
//! | `list` | list levels and list elements |
//! | `table` | tables, sheets, rows, cells, formulas, data styles |
//! | `frame` | frames, text boxes, binary objects, embedded documents |
//! | `draw` | shapes, groups, graphic styles |
//! | `page` | page spans, headers, footers, pages, master pages, notes |
//! | `chart` | chart bodies, axes, series, text objects |
//!
//! Structural misuse never fails: the call is logged and ignored.

pub mod chart;
pub mod context;
pub mod draw;
pub mod frame;
pub mod geometry;
pub mod list;
pub mod options;
pub mod page;
pub mod serialize;
pub mod table;
pub mod text;

pub use context::{FrameKind, Scope, ScopeFlags, StructuralContext, TableState};
pub use frame::{EmbeddedHandlers, EmbeddedObject, ImageHandler, ObjectHandler};
pub use geometry::{PathBounds, PathSegment, Rect, SampledBounds};
pub use options::{GeneratorOptions, OutputLayout};
pub use serialize::StreamSerializer;

use crate::odf::DocumentKind;
use crate::odf::core::DocumentHandler;
use crate::odf::elements::ElementTree;
use crate::odf::property::PropertyRecord;
use crate::odf::style::graphic::GraphicDefinitions;
use crate::odf::style::{
    ChartFamily, DrawingPageFamily, FontFamily, GraphicFamily, ListRegistry, NumberingFamily,
    PageSpanRegistry, ParagraphFamily, SectionFamily, SheetCellFamily, SheetColumnFamily,
    SheetFamily, SheetRowFamily, SpanFamily, StyleInterner, TableCellFamily, TableColumnFamily,
    TableFamily, TableRowFamily, Zone, encode_style_name,
};
use std::collections::HashMap;

/// Keys naming a font in a text style
const FONT_KEYS: [&str; 3] = ["style:font-name", "style:font-name-asian", "style:font-name-complex"];

/// Every style store of one document
#[derive(Debug, Default)]
pub struct StyleSet {
    pub fonts: StyleInterner<FontFamily>,
    pub paragraphs: StyleInterner<ParagraphFamily>,
    pub spans: StyleInterner<SpanFamily>,
    pub sections: StyleInterner<SectionFamily>,
    pub tables: StyleInterner<TableFamily>,
    pub table_columns: StyleInterner<TableColumnFamily>,
    pub table_rows: StyleInterner<TableRowFamily>,
    pub table_cells: StyleInterner<TableCellFamily>,
    pub sheets: StyleInterner<SheetFamily>,
    pub sheet_columns: StyleInterner<SheetColumnFamily>,
    pub sheet_rows: StyleInterner<SheetRowFamily>,
    pub sheet_cells: StyleInterner<SheetCellFamily>,
    pub numberings: StyleInterner<NumberingFamily>,
    pub graphics: StyleInterner<GraphicFamily>,
    pub graphic_definitions: GraphicDefinitions,
    pub drawing_pages: StyleInterner<DrawingPageFamily>,
    pub charts: StyleInterner<ChartFamily>,
    pub lists: ListRegistry,
}

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare every font named by `record`
    pub fn register_fonts(&mut self, record: &PropertyRecord) {
        for key in FONT_KEYS {
            if let Some(name) = record.get_str(key)
                && !name.is_empty()
            {
                self.fonts.intern(&FontFamily::record(name), Zone::Font);
            }
        }
    }

    pub fn write_fonts(&self, handler: &mut dyn DocumentHandler) {
        self.fonts.write(handler, Zone::Font);
    }

    /// Write every style of `zone` except fonts and page layouts
    pub fn write_zone(&self, handler: &mut dyn DocumentHandler, zone: Zone) {
        if zone == Zone::Style {
            self.graphic_definitions.write(handler);
        }
        self.numberings.write(handler, zone);
        self.paragraphs.write(handler, zone);
        self.spans.write(handler, zone);
        self.sections.write(handler, zone);
        self.tables.write(handler, zone);
        self.table_columns.write(handler, zone);
        self.table_rows.write(handler, zone);
        self.table_cells.write(handler, zone);
        self.sheets.write(handler, zone);
        self.sheet_columns.write(handler, zone);
        self.sheet_rows.write(handler, zone);
        self.sheet_cells.write(handler, zone);
        self.graphics.write(handler, zone);
        self.drawing_pages.write(handler, zone);
        self.charts.write(handler, zone);
        self.lists.write(handler, zone);
    }
}

/// A style registered by id with `define*Style`
#[derive(Debug, Clone)]
pub(crate) enum StyleDefinition {
    /// Interned as a named style; used as parent
    Named(String),
    /// Anonymous; used as the base of the inline attributes
    Inline(PropertyRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentState {
    New,
    Started,
    Finished,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub footnotes: usize,
    pub endnotes: usize,
    pub frames: usize,
    pub tables: usize,
    pub sheets: usize,
    pub sections: usize,
    pub objects: usize,
    pub pages: usize,
}

/// Built-in named paragraph styles of text documents
const DEFAULT_PARAGRAPH_STYLES: [(&str, Option<&str>, &str); 9] = [
    ("Standard", None, "text"),
    ("Text body", Some("Standard"), "text"),
    ("Table Contents", Some("Standard"), "extra"),
    ("Table Heading", Some("Table Contents"), "extra"),
    ("Header", Some("Standard"), "extra"),
    ("Footer", Some("Standard"), "extra"),
    ("Footnote", Some("Standard"), "extra"),
    ("Endnote", Some("Standard"), "extra"),
    ("Frame contents", Some("Text body"), "extra"),
];

/// Shared engine behind every front end
#[derive(Debug)]
pub struct DocumentAssembler {
    kind: DocumentKind,
    options: GeneratorOptions,
    state: DocumentState,
    metadata: PropertyRecord,
    body: ElementTree,
    pub(crate) styles: StyleSet,
    pub(crate) context: StructuralContext,
    pub(crate) pages: PageSpanRegistry,
    pub(crate) handlers: EmbeddedHandlers,
    pub(crate) objects: Vec<EmbeddedObject>,
    pub(crate) counters: Counters,
    pub(crate) paragraph_definitions: HashMap<i64, StyleDefinition>,
    pub(crate) span_definitions: HashMap<i64, StyleDefinition>,
    pub(crate) sheet_numberings: HashMap<String, String>,
    pub(crate) graphic_style: PropertyRecord,
    pub(crate) note_parents: Vec<&'static str>,
    pub(crate) header_footer: Option<PropertyRecord>,
}

impl DocumentAssembler {
    pub fn new(kind: DocumentKind, options: GeneratorOptions) -> Self {
        Self {
            kind,
            options,
            state: DocumentState::New,
            metadata: PropertyRecord::new(),
            body: ElementTree::new(),
            styles: StyleSet::new(),
            context: StructuralContext::new(),
            pages: PageSpanRegistry::new(),
            handlers: EmbeddedHandlers::default(),
            objects: Vec::new(),
            counters: Counters::default(),
            paragraph_definitions: HashMap::new(),
            span_definitions: HashMap::new(),
            sheet_numberings: HashMap::new(),
            graphic_style: PropertyRecord::new(),
            note_parents: Vec::new(),
            header_footer: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    #[inline]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Begin the document; `record` may carry metadata
    pub fn start_document(&mut self, record: &PropertyRecord) {
        if self.state != DocumentState::New {
            log::warn!("document already started, ignored");
            return;
        }
        self.state = DocumentState::Started;
        if !record.is_empty() {
            self.set_document_metadata(record);
        }
        if self.kind == DocumentKind::Text && self.options.write_default_styles {
            self.intern_default_styles();
        }
    }

    fn intern_default_styles(&mut self) {
        for (display, parent, class) in DEFAULT_PARAGRAPH_STYLES {
            let mut record = PropertyRecord::new().with("style:display-name", display);
            if let Some(parent) = parent {
                record.insert("style:parent-style-name", encode_style_name(parent));
            }
            record.insert("style:class", class);
            match display {
                "Text body" => record.insert("fo:margin-bottom", "0.0835in"),
                "Table Heading" => {
                    record.insert("fo:text-align", "center");
                    record.insert("fo:font-weight", "bold");
                },
                "Footnote" | "Endnote" => record.insert("fo:font-size", "10pt"),
                _ => {},
            }
            self.styles
                .paragraphs
                .intern_named(&record, Zone::Style, &encode_style_name(display));
        }
    }

    /// Merge `record` into the document metadata
    pub fn set_document_metadata(&mut self, record: &PropertyRecord) {
        self.metadata = self.metadata.merged(record);
    }

    /// Close everything still open and freeze the document
    pub fn end_document(&mut self) {
        if self.state == DocumentState::Finished {
            log::warn!("document already finished, ignored");
            return;
        }
        loop {
            match self.context.frame_kind() {
                FrameKind::Root => break,
                FrameKind::Note => self.close_note(),
                FrameKind::Comment => self.close_comment(),
                FrameKind::TextBox => self.close_text_box(),
                FrameKind::HeaderFooter(_) => self.close_header_footer(),
                FrameKind::MasterPage(_) => self.end_master_page(),
            }
        }
        self.pages.finish();
        self.body = self.context.finish();
        self.state = DocumentState::Finished;
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == DocumentState::Finished
    }

    /// Content of `office:body`'s kind element, complete after `end_document`
    #[inline]
    pub fn body(&self) -> &ElementTree {
        &self.body
    }

    #[inline]
    pub fn metadata(&self) -> &PropertyRecord {
        &self.metadata
    }

    #[inline]
    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    #[inline]
    pub fn pages(&self) -> &PageSpanRegistry {
        &self.pages
    }

    /// Sub-documents stored as package streams
    #[inline]
    pub fn objects(&self) -> &[EmbeddedObject] {
        &self.objects
    }

    /// Zone of automatic styles created now
    #[inline]
    pub(crate) fn zone(&self) -> Zone {
        self.context.style_zone()
    }

    /// Built-in parent of paragraphs opened at this point
    pub(crate) fn paragraph_parent_hint(&self) -> Option<&'static str> {
        if self.kind != DocumentKind::Text || !self.options.write_default_styles {
            return None;
        }
        if let Some(table) = self.context.table()
            && self.context.contains(ScopeFlags::CELL)
        {
            return Some(if table.in_header_rows {
                "Table_20_Heading"
            } else {
                "Table_20_Contents"
            });
        }
        match self.context.frame_kind() {
            FrameKind::HeaderFooter(slot) if slot.is_header() => Some("Header"),
            FrameKind::HeaderFooter(_) => Some("Footer"),
            FrameKind::Note => self.note_parents.last().copied(),
            FrameKind::TextBox => Some("Frame_20_contents"),
            _ => Some("Standard"),
        }
    }

    /// `true` when content goes to the top level of the document body
    pub(crate) fn at_body_level(&self) -> bool {
        self.context.frame_kind() == FrameKind::Root
            && !self
                .context
                .contains(ScopeFlags::TABLE | ScopeFlags::FRAME | ScopeFlags::LIST | ScopeFlags::SECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::Node;

    fn text_document() -> DocumentAssembler {
        let mut document = DocumentAssembler::new(DocumentKind::Text, GeneratorOptions::new());
        document.start_document(&PropertyRecord::new());
        document
    }

    #[test]
    fn test_span_scenario() {
        let mut document = text_document();
        document.open_paragraph(&PropertyRecord::new());
        document.open_span(&PropertyRecord::new().with("style:font-name", "Arial"));
        document.insert_text("Hi");
        document.close_span();
        document.close_paragraph();
        document.end_document();

        assert_eq!(document.styles().fonts.len(), 1);
        assert!(document.styles().fonts.get("Arial").is_some());
        assert_eq!(document.styles().spans.len(), 1);

        let nodes = document.body().nodes();
        assert_eq!(nodes.len(), 5);
        assert!(nodes[0].is_open("text:p"));
        assert!(nodes[1].is_open("text:span"));
        assert_eq!(nodes[2], Node::Text("Hi".to_string()));
        assert_eq!(nodes[3], Node::Close { name: "text:span".to_string() });
        assert_eq!(nodes[4], Node::Close { name: "text:p".to_string() });
    }

    #[test]
    fn test_paragraph_dedup_depends_on_order() {
        let mut document = text_document();
        let first = PropertyRecord::new().with("fo:font-weight", "bold").with("fo:color", "#ff0000");
        let reordered = PropertyRecord::new().with("fo:color", "#ff0000").with("fo:font-weight", "bold");
        for record in [&first, &first, &reordered] {
            document.open_paragraph(record);
            document.close_paragraph();
        }
        document.end_document();

        let names: Vec<&str> = document
            .body()
            .nodes()
            .iter()
            .filter_map(|node| node.attribute("text:style-name"))
            .collect();
        assert_eq!(names.len(), 3);
        assert_eq!(names[0], names[1]);
        assert_ne!(names[0], names[2]);
    }

    #[test]
    fn test_default_styles_are_named() {
        let document = text_document();
        let paragraphs = &document.styles().paragraphs;
        assert!(paragraphs.get("Standard").is_some());
        assert!(paragraphs.get("Text_20_body").is_some());
        assert!(paragraphs.get("Table_20_Heading").is_some());
        assert!(paragraphs.styles().iter().all(|style| style.zone == Zone::Style));

        let mut plain = DocumentAssembler::new(
            DocumentKind::Text,
            GeneratorOptions::new().with_default_styles(false),
        );
        plain.start_document(&PropertyRecord::new());
        assert!(plain.styles().paragraphs.is_empty());
    }

    #[test]
    fn test_end_document_closes_dangling_scopes() {
        let mut document = text_document();
        document.open_paragraph(&PropertyRecord::new());
        document.open_footnote(&PropertyRecord::new());
        document.open_paragraph(&PropertyRecord::new());
        document.insert_text("note");
        document.end_document();
        assert!(document.body().is_balanced());
        assert!(document.is_finished());
    }
}
