//! Page spans, headers and footers, drawing pages and master pages.

use super::DocumentAssembler;
use super::context::{FrameKind, Scope};
use crate::odf::elements::Attributes;
use crate::odf::property::PropertyRecord;
use crate::odf::style::{HeaderFooterSlot, Zone};

/// Whether `key` belongs to a drawing-page style (fill and transition)
fn is_drawing_page_key(key: &str) -> bool {
    key.starts_with("draw:fill")
        || key.starts_with("smil:")
        || matches!(
            key,
            "draw:background-size"
                | "presentation:transition-type"
                | "presentation:transition-style"
                | "presentation:transition-speed"
                | "presentation:duration"
                | "presentation:visibility"
                | "presentation:background-visible"
                | "presentation:background-objects-visible"
                | "presentation:display-footer"
                | "presentation:display-page-number"
        )
}

impl DocumentAssembler {
    /// Open a page span; the next paragraph or table at body level binds
    /// its master page
    pub fn open_page_span(&mut self, record: &PropertyRecord) {
        self.pages.open_span(record);
    }

    pub fn close_page_span(&mut self) {
        self.pages.close_span();
    }

    pub fn open_header(&mut self, record: &PropertyRecord) {
        self.open_header_footer(record, true);
    }

    pub fn close_header(&mut self) {
        self.close_header_footer();
    }

    pub fn open_footer(&mut self, record: &PropertyRecord) {
        self.open_header_footer(record, false);
    }

    pub fn close_footer(&mut self) {
        self.close_header_footer();
    }

    fn open_header_footer(&mut self, record: &PropertyRecord, header: bool) {
        if self.pages.current().is_none() {
            log::warn!("header or footer outside of a page span, ignored");
            return;
        }
        if self.context.frame_kind() != FrameKind::Root {
            log::warn!("header or footer inside {:?}, ignored", self.context.frame_kind());
            return;
        }
        let slot = HeaderFooterSlot::from_occurrence(header, record.get_str("librevenge:occurrence"));
        self.header_footer = Some(record.clone());
        self.context.push_frame(FrameKind::HeaderFooter(slot), &[]);
        self.styles.lists.push_scope();
    }

    /// Move the content of the open header or footer into its page span
    pub(crate) fn close_header_footer(&mut self) {
        let FrameKind::HeaderFooter(slot) = self.context.frame_kind() else {
            log::warn!("closing a header or footer that is not open, ignored");
            return;
        };
        let Some(tree) = self.context.pop_detached_frame(FrameKind::HeaderFooter(slot)) else {
            return;
        };
        self.styles.lists.pop_scope();
        let record = self.header_footer.take().unwrap_or_default();
        match self.pages.current_mut() {
            Some(span) => span.set_slot(slot, tree, &record),
            None => log::warn!("page span closed before its {}, content dropped", slot.element_name()),
        }
    }

    fn drawing_page_style(&mut self, record: &PropertyRecord, zone: Zone) -> Option<String> {
        let style = record.filtered(is_drawing_page_key);
        if style.is_empty() {
            return None;
        }
        Some(self.styles.drawing_pages.intern(&style, zone))
    }

    /// Start a drawing page or slide.
    ///
    /// The page is bound to the master named by
    /// `librevenge:master-page-name`, or else to a master shared by every
    /// page of the same size.
    pub fn start_page(&mut self, record: &PropertyRecord) {
        if self.context.is_open(Scope::Page) {
            log::warn!("page started inside a page, ending the previous one");
            self.context.close(Scope::Page);
        }
        let zone = self.zone();
        let style = self.drawing_page_style(record, zone);
        let master = match record
            .get_str("librevenge:master-page-name")
            .and_then(|name| self.pages.master_named(name))
        {
            Some(master) => master.to_string(),
            None => self.pages.master_for_layout(record, None),
        };
        self.counters.pages += 1;
        let name = record
            .get_string("draw:name")
            .unwrap_or_else(|| format!("page{}", self.counters.pages));

        let mut attributes = Attributes::new().with("draw:name", name);
        if let Some(style) = style {
            attributes.insert("draw:style-name", style);
        }
        attributes.insert("draw:master-page-name", master);
        if let Some(layout) = record.get_str("presentation:presentation-page-layout-name") {
            attributes.insert("presentation:presentation-page-layout-name", layout);
        }
        self.context.open(Scope::Page, "draw:page", attributes);
    }

    pub fn end_page(&mut self) {
        self.context.close(Scope::Page);
    }

    /// Start a master page (a master slide); its shapes go to
    /// `office:master-styles`
    pub fn start_master_page(&mut self, record: &PropertyRecord) {
        if self.context.frame_kind() != FrameKind::Root {
            log::warn!("master page inside {:?}, ignored", self.context.frame_kind());
            return;
        }
        let style = self.drawing_page_style(record, Zone::StyleAutomatic);
        let index = self.pages.open_master(record, style);
        self.context.push_frame(FrameKind::MasterPage(index), &[]);
        self.styles.lists.push_scope();
    }

    pub fn end_master_page(&mut self) {
        let FrameKind::MasterPage(index) = self.context.frame_kind() else {
            log::warn!("ending a master page that is not open, ignored");
            return;
        };
        let Some(tree) = self.context.pop_detached_frame(FrameKind::MasterPage(index)) else {
            return;
        };
        self.styles.lists.pop_scope();
        if let Some(span) = self.pages.span_mut(index) {
            span.content = tree;
        }
    }

    /// Open the speaker notes of the current slide
    pub fn start_notes(&mut self, record: &PropertyRecord) {
        if !self.context.is_open(Scope::Page) {
            log::warn!("notes outside of a slide, ignored");
            return;
        }
        let zone = self.zone();
        let mut attributes = Attributes::new();
        if let Some(style) = self.drawing_page_style(record, zone) {
            attributes.insert("draw:style-name", style);
        }
        self.context
            .open(Scope::Notes, "presentation:notes", attributes);
    }

    pub fn end_notes(&mut self) {
        self.context.close(Scope::Notes);
    }
}

#[cfg(test)]
mod tests {
    use crate::odf::DocumentKind;
    use crate::odf::generator::{DocumentAssembler, GeneratorOptions};
    use crate::odf::property::PropertyRecord;
    use crate::odf::style::{HeaderFooterSlot, Zone};

    fn text_document() -> DocumentAssembler {
        let mut document = DocumentAssembler::new(DocumentKind::Text, GeneratorOptions::new());
        document.start_document(&PropertyRecord::new());
        document
    }

    fn page() -> PropertyRecord {
        PropertyRecord::new()
            .with("fo:page-width", "8.5in")
            .with("fo:page-height", "11in")
    }

    #[test]
    fn test_header_goes_to_span() {
        let mut document = text_document();
        document.open_page_span(&page());
        document.open_header(&PropertyRecord::new().with("librevenge:occurrence", "odd"));
        document.open_paragraph(&PropertyRecord::new().with("fo:text-align", "center"));
        document.insert_text("Header");
        document.close_paragraph();
        document.close_header();
        document.open_paragraph(&PropertyRecord::new());
        document.insert_text("Body");
        document.close_paragraph();
        document.close_page_span();
        document.end_document();

        let span = &document.pages().spans()[0];
        let header = span.slot(HeaderFooterSlot::Header).unwrap();
        let header_style = header.nodes()[0].attribute("text:style-name").unwrap();
        let style = document.styles().paragraphs.get(header_style).unwrap();
        assert_eq!(style.zone, Zone::StyleAutomatic);
        assert_eq!(style.record.get_str("style:parent-style-name"), Some("Header"));

        let body_style = document.body().nodes()[0].attribute("text:style-name").unwrap();
        let style = document.styles().paragraphs.get(body_style).unwrap();
        assert_eq!(style.zone, Zone::ContentAutomatic);
        assert_eq!(style.record.get_str("style:master-page-name"), Some("Page_Style_1"));
        assert!(!document.body().nodes().iter().any(|n| n == &header.nodes()[0]));
    }

    #[test]
    fn test_master_binds_first_element_only() {
        let mut document = text_document();
        document.open_page_span(&page());
        for _ in 0..2 {
            document.open_paragraph(&PropertyRecord::new());
            document.close_paragraph();
        }
        document.close_page_span();
        document.end_document();

        let masters: Vec<_> = document
            .body()
            .nodes()
            .iter()
            .filter_map(|n| n.attribute("text:style-name"))
            .map(|name| document.styles().paragraphs.get(name).unwrap())
            .map(|style| style.record.contains("style:master-page-name"))
            .collect();
        assert_eq!(masters, vec![true, false]);
    }

    #[test]
    fn test_header_outside_span_is_ignored() {
        let mut document = text_document();
        document.open_header(&PropertyRecord::new());
        document.open_paragraph(&PropertyRecord::new());
        document.close_paragraph();
        document.close_header();
        document.end_document();
        assert_eq!(document.body().count_open("text:p"), 1);
        assert!(document.pages().is_empty());
    }

    #[test]
    fn test_pages_share_masters() {
        let mut document = DocumentAssembler::new(DocumentKind::Presentation, GeneratorOptions::new());
        document.start_document(&PropertyRecord::new());
        document.start_master_page(&PropertyRecord::new().with("librevenge:master-page-name", "Default"));
        document.draw_rectangle(
            &PropertyRecord::new()
                .with("svg:x", "0in")
                .with("svg:y", "0in")
                .with("svg:width", "1in")
                .with("svg:height", "1in"),
        );
        document.end_master_page();

        let slide = PropertyRecord::new().with("svg:width", "10in").with("svg:height", "7.5in");
        document.start_page(&slide.clone().with("librevenge:master-page-name", "Default"));
        document.start_notes(&PropertyRecord::new());
        document.end_notes();
        document.end_page();
        document.start_page(&slide.clone().with("draw:fill", "solid"));
        document.end_page();
        document.start_page(&slide);
        document.end_page();
        document.end_document();

        let pages: Vec<_> = document
            .body()
            .nodes()
            .iter()
            .filter(|n| n.is_open("draw:page"))
            .collect();
        assert_eq!(pages[0].attribute("draw:master-page-name"), Some("Default"));
        assert_eq!(pages[1].attribute("draw:master-page-name"), pages[2].attribute("draw:master-page-name"));
        assert_eq!(pages[1].attribute("draw:style-name"), Some("dp1"));
        assert_eq!(pages[2].attribute("draw:style-name"), None);
        assert_eq!(pages[2].attribute("draw:name"), Some("page3"));
        assert_eq!(document.body().count_open("presentation:notes"), 1);

        let master = &document.pages().spans()[0];
        assert_eq!(master.content.count_open("draw:rect"), 1);
        assert_eq!(document.body().count_open("draw:rect"), 0);
        let rect_style = master.content.nodes()[0].attribute("draw:style-name").unwrap();
        assert_eq!(document.styles().graphics.get(rect_style).unwrap().zone, Zone::StyleAutomatic);
    }
}
