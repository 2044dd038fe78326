//! Page layouts, master pages and their header/footer content.
//!
//! A text document opens one [`PageSpan`] per run of pages sharing geometry.
//! Each span gets a master page (`Page_Style_{n}`) and a page layout
//! (`PM{n}`, interned in [`Zone::StyleAutomatic`]). Header and footer
//! content is collected into trees owned by the span.
//!
//! Drawings and presentations bind each `draw:page` to a master chosen by
//! layout, so pages of the same size share one master.

use super::properties::{attributes_where, is_structural, start_style, write_property_element};
use super::{Style, StyleFamily, StyleInterner, Zone, encode_style_name};
use crate::odf::core::DocumentHandler;
use crate::odf::elements::{Attributes, ElementTree};
use crate::odf::property::{PropertyRecord, is_internal_key};
use std::collections::{BTreeMap, HashMap};

const HEADER_STYLE: &str = "style:header-style";
const FOOTER_STYLE: &str = "style:footer-style";

/// `style:page-layout` (`PM{n}`)
pub struct PageLayoutFamily;

impl StyleFamily for PageLayoutFamily {
    const NAME_PREFIX: &'static str = "PM";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        let record = &style.record;
        handler.start_element(
            "style:page-layout",
            &Attributes::new().with("style:name", style.name.as_str()),
        );
        handler.start_element(
            "style:page-layout-properties",
            &attributes_where(record, |k| !is_structural(k)),
        );
        handler.end_element("style:page-layout-properties");

        for element in [HEADER_STYLE, FOOTER_STYLE] {
            let Some(properties) = record.children(element).and_then(|c| c.first()) else {
                continue;
            };
            handler.start_element(element, &Attributes::new());
            handler.start_element(
                "style:header-footer-properties",
                &attributes_where(properties, |k| !is_internal_key(k)),
            );
            handler.end_element("style:header-footer-properties");
            handler.end_element(element);
        }
        handler.end_element("style:page-layout");
    }
}

/// `drawing-page` styles (`dp{n}`): page fill and slide transitions
pub struct DrawingPageFamily;

impl StyleFamily for DrawingPageFamily {
    const NAME_PREFIX: &'static str = "dp";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        start_style(handler, &style.name, "drawing-page", &style.record);
        write_property_element(
            handler,
            "style:drawing-page-properties",
            &style.record,
            |k| !is_structural(k),
            None,
        );
        handler.end_element("style:style");
    }
}

/// One of the six header/footer slots of a master page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderFooterSlot {
    Header,
    HeaderLeft,
    HeaderFirst,
    Footer,
    FooterLeft,
    FooterFirst,
}

impl HeaderFooterSlot {
    /// Slot for a header (or footer) with the given `librevenge:occurrence`
    pub fn from_occurrence(header: bool, occurrence: Option<&str>) -> Self {
        match (header, occurrence.unwrap_or("all")) {
            (true, "even" | "left") => Self::HeaderLeft,
            (true, "first") => Self::HeaderFirst,
            (true, _) => Self::Header,
            (false, "even" | "left") => Self::FooterLeft,
            (false, "first") => Self::FooterFirst,
            (false, _) => Self::Footer,
        }
    }

    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Header => "style:header",
            Self::HeaderLeft => "style:header-left",
            Self::HeaderFirst => "style:header-first",
            Self::Footer => "style:footer",
            Self::FooterLeft => "style:footer-left",
            Self::FooterFirst => "style:footer-first",
        }
    }

    #[inline]
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header | Self::HeaderLeft | Self::HeaderFirst)
    }
}

/// A master page with its layout and header/footer content
#[derive(Debug, Clone)]
pub struct PageSpan {
    pub master_name: String,
    pub display_name: Option<String>,
    pub record: PropertyRecord,
    pub layout_name: Option<String>,
    /// `draw:style-name` of a drawing master
    pub drawing_page_style: Option<String>,
    /// Shapes of a drawing or presentation master
    pub content: ElementTree,
    slots: BTreeMap<HeaderFooterSlot, ElementTree>,
    header_style: Option<PropertyRecord>,
    footer_style: Option<PropertyRecord>,
}

impl PageSpan {
    fn new(master_name: String, record: &PropertyRecord) -> Self {
        Self {
            master_name,
            display_name: None,
            record: record.clone(),
            layout_name: None,
            drawing_page_style: None,
            content: ElementTree::new(),
            slots: BTreeMap::new(),
            header_style: None,
            footer_style: None,
        }
    }

    pub fn slot(&self, slot: HeaderFooterSlot) -> Option<&ElementTree> {
        self.slots.get(&slot)
    }

    /// Store the content of a header or footer.
    ///
    /// A slot filled twice keeps the last content. The first record of each
    /// kind sizes the header (or footer) area of the layout.
    pub fn set_slot(&mut self, slot: HeaderFooterSlot, tree: ElementTree, record: &PropertyRecord) {
        let properties = record.filtered(|k| !is_internal_key(k));
        let style = if slot.is_header() {
            &mut self.header_style
        } else {
            &mut self.footer_style
        };
        style.get_or_insert(properties);
        if self.slots.insert(slot, tree).is_some() {
            log::debug!("{} of {} replaced", slot.element_name(), self.master_name);
        }
    }

    /// Record of the page layout: page geometry plus header/footer areas
    pub fn layout_record(&self) -> PropertyRecord {
        let mut layout = PropertyRecord::new();
        for (key, value) in self.record.iter() {
            match key {
                "svg:width" => layout.insert("fo:page-width", value.clone()),
                "svg:height" => layout.insert("fo:page-height", value.clone()),
                _ if is_structural(key) => {},
                _ if key.starts_with("fo:") || key.starts_with("style:") => layout.insert(key, value.clone()),
                _ => {},
            }
        }
        let mut area = |key: &str, style: &Option<PropertyRecord>| {
            if let Some(style) = style {
                let mut style = style.clone();
                if !style.contains("fo:min-height") {
                    style.insert("fo:min-height", "0in");
                }
                layout.set_children(key, vec![style]);
            }
        };
        area(HEADER_STYLE, &self.header_style);
        area(FOOTER_STYLE, &self.footer_style);
        layout
    }

    fn write(&self, handler: &mut dyn DocumentHandler) {
        let mut attributes = Attributes::new().with("style:name", self.master_name.as_str());
        if let Some(display) = &self.display_name {
            attributes.insert("style:display-name", display.as_str());
        }
        if let Some(layout) = &self.layout_name {
            attributes.insert("style:page-layout-name", layout.as_str());
        }
        if let Some(style) = &self.drawing_page_style {
            attributes.insert("draw:style-name", style.as_str());
        }
        handler.start_element("style:master-page", &attributes);
        for (slot, tree) in &self.slots {
            handler.start_element(slot.element_name(), &Attributes::new());
            tree.write(handler);
            handler.end_element(slot.element_name());
        }
        self.content.write(handler);
        handler.end_element("style:master-page");
    }
}

/// Owner of every page span of a document
#[derive(Debug, Default)]
pub struct PageSpanRegistry {
    layouts: StyleInterner<PageLayoutFamily>,
    spans: Vec<PageSpan>,
    current: Option<usize>,
    pending_master: Option<String>,
    by_layout: HashMap<(String, Option<String>), usize>,
    by_display_name: HashMap<String, usize>,
}

impl PageSpanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_span(&mut self, record: &PropertyRecord) -> usize {
        let name = format!("Page_Style_{}", self.spans.len() + 1);
        self.spans.push(PageSpan::new(name, record));
        self.spans.len() - 1
    }

    /// Open a text page span; its master becomes pending until bound
    pub fn open_span(&mut self, record: &PropertyRecord) -> &str {
        if self.current.is_some() {
            log::warn!("page span opened inside another one, closing it");
            self.close_span();
        }
        let index = self.push_span(record);
        self.current = Some(index);
        self.pending_master = Some(self.spans[index].master_name.clone());
        &self.spans[index].master_name
    }

    /// Close the open span and intern its layout
    pub fn close_span(&mut self) -> bool {
        let Some(index) = self.current.take() else {
            log::warn!("closing a page span that is not open");
            return false;
        };
        self.intern_layout(index);
        true
    }

    fn intern_layout(&mut self, index: usize) {
        let layout = self.spans[index].layout_record();
        let name = self.layouts.intern(&layout, Zone::StyleAutomatic);
        self.spans[index].layout_name = Some(name);
    }

    pub fn current(&self) -> Option<&PageSpan> {
        self.current.map(|index| &self.spans[index])
    }

    pub fn current_mut(&mut self) -> Option<&mut PageSpan> {
        self.current.map(|index| &mut self.spans[index])
    }

    /// Master page waiting for the first paragraph or table of the span
    pub fn take_pending_master(&mut self) -> Option<String> {
        self.pending_master.take()
    }

    pub fn has_pending_master(&self) -> bool {
        self.pending_master.is_some()
    }

    /// Master of a drawing page, shared by pages with the same layout
    pub fn master_for_layout(&mut self, record: &PropertyRecord, drawing_page_style: Option<String>) -> String {
        let probe = PageSpan::new(String::new(), record);
        let key = (probe.layout_record().canonical_key(), drawing_page_style.clone());
        if let Some(&index) = self.by_layout.get(&key) {
            return self.spans[index].master_name.clone();
        }
        let index = self.push_span(record);
        self.spans[index].drawing_page_style = drawing_page_style;
        self.intern_layout(index);
        self.by_layout.insert(key, index);
        self.spans[index].master_name.clone()
    }

    /// Create a named master (a presentation master slide)
    pub fn open_master(&mut self, record: &PropertyRecord, drawing_page_style: Option<String>) -> usize {
        let index = self.push_span(record);
        if let Some(display) = record.get_string("librevenge:master-page-name") {
            self.spans[index].master_name = encode_style_name(&display);
            self.spans[index].display_name = Some(display.clone());
            self.by_display_name.insert(display, index);
        }
        self.spans[index].drawing_page_style = drawing_page_style;
        self.intern_layout(index);
        index
    }

    /// Generated name of the master opened with `display_name`
    pub fn master_named(&self, display_name: &str) -> Option<&str> {
        self.by_display_name
            .get(display_name)
            .map(|&index| self.spans[index].master_name.as_str())
    }

    pub fn span_mut(&mut self, index: usize) -> Option<&mut PageSpan> {
        self.spans.get_mut(index)
    }

    pub fn spans(&self) -> &[PageSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Close a span left open at end of document
    pub fn finish(&mut self) {
        if self.current.is_some() {
            log::warn!("page span still open at end of document");
            self.close_span();
        }
        self.pending_master = None;
    }

    pub fn write_layouts(&self, handler: &mut dyn DocumentHandler) {
        self.layouts.write(handler, Zone::StyleAutomatic);
    }

    pub fn write_masters(&self, handler: &mut dyn DocumentHandler) {
        for span in &self.spans {
            span.write(handler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::XmlWriter;

    fn letter() -> PropertyRecord {
        PropertyRecord::new()
            .with("fo:page-width", "8.5in")
            .with("fo:page-height", "11in")
            .with("librevenge:num-pages", 1)
    }

    #[test]
    fn test_span_layout_and_headers() {
        let mut pages = PageSpanRegistry::new();
        assert_eq!(pages.open_span(&letter()), "Page_Style_1");
        assert_eq!(pages.take_pending_master().as_deref(), Some("Page_Style_1"));
        assert!(!pages.has_pending_master());

        let mut header = ElementTree::new();
        header.push_text_element("text:p", Attributes::new(), "Title");
        let slot = HeaderFooterSlot::from_occurrence(true, Some("odd"));
        pages
            .current_mut()
            .unwrap()
            .set_slot(slot, header, &PropertyRecord::new().with("librevenge:occurrence", "odd"));
        assert!(pages.close_span());
        assert!(!pages.close_span());

        let mut writer = XmlWriter::new();
        pages.write_layouts(&mut writer);
        pages.write_masters(&mut writer);
        let xml = writer.into_string();
        assert!(xml.contains(r#"<style:page-layout style:name="PM1"><style:page-layout-properties fo:page-width="8.5in" fo:page-height="11in"/>"#));
        assert!(xml.contains(r#"<style:header-style><style:header-footer-properties fo:min-height="0in"/></style:header-style>"#));
        assert!(xml.contains(r#"<style:master-page style:name="Page_Style_1" style:page-layout-name="PM1"><style:header><text:p>Title</text:p></style:header></style:master-page>"#));
    }

    #[test]
    fn test_occurrence_slots() {
        assert_eq!(HeaderFooterSlot::from_occurrence(true, None), HeaderFooterSlot::Header);
        assert_eq!(HeaderFooterSlot::from_occurrence(true, Some("both")), HeaderFooterSlot::Header);
        assert_eq!(HeaderFooterSlot::from_occurrence(false, Some("even")), HeaderFooterSlot::FooterLeft);
        assert_eq!(HeaderFooterSlot::from_occurrence(false, Some("first")), HeaderFooterSlot::FooterFirst);
    }

    #[test]
    fn test_drawing_masters_shared_by_layout() {
        let mut pages = PageSpanRegistry::new();
        let page = PropertyRecord::new().with("svg:width", "10in").with("svg:height", "7.5in");
        let first = pages.master_for_layout(&page, None);
        let second = pages.master_for_layout(&page, None);
        let other = pages.master_for_layout(&page.clone().with("svg:height", "5in"), None);
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(pages.spans().len(), 2);
    }

    #[test]
    fn test_named_master() {
        let mut pages = PageSpanRegistry::new();
        let record = PropertyRecord::new().with("librevenge:master-page-name", "Title Slide");
        let index = pages.open_master(&record, None);
        assert_eq!(pages.master_named("Title Slide"), Some("Title_20_Slide"));
        pages.span_mut(index).unwrap().content.push_empty("draw:rect", Attributes::new());

        let mut writer = XmlWriter::new();
        pages.write_masters(&mut writer);
        assert!(writer.as_str().contains(r#"style:display-name="Title Slide""#));
        assert!(writer.as_str().contains("<draw:rect/></style:master-page>"));
    }
}
