//! List levels and list elements.
//!
//! Lists interleave with paragraphs: a list element opens a
//! `text:list-item` and its paragraph, and closing the element only closes
//! the paragraph. The item stays open until the next element or the end of
//! the level, so a nested level opened in between lands inside it.

use super::DocumentAssembler;
use super::context::{Scope, ScopeFlags};
use crate::odf::elements::Attributes;
use crate::odf::property::PropertyRecord;

impl DocumentAssembler {
    pub fn define_ordered_list_level(&mut self, record: &PropertyRecord) {
        self.styles.lists.define_level(record, true);
    }

    pub fn define_unordered_list_level(&mut self, record: &PropertyRecord) {
        self.styles.lists.define_level(record, false);
    }

    pub fn open_ordered_list_level(&mut self, record: &PropertyRecord) {
        self.open_list_level(record, true);
    }

    pub fn open_unordered_list_level(&mut self, record: &PropertyRecord) {
        self.open_list_level(record, false);
    }

    pub fn close_ordered_list_level(&mut self) {
        self.context.close(Scope::List { ordered: true });
    }

    pub fn close_unordered_list_level(&mut self) {
        self.context.close(Scope::List { ordered: false });
    }

    fn open_list_level(&mut self, record: &PropertyRecord, ordered: bool) {
        if self.context.is_open(Scope::Paragraph) {
            self.context.close(Scope::Paragraph);
        }
        let depth = self.context.list_depth();
        if depth > 0 && !self.context.list_item_open() {
            self.context
                .open(Scope::ListItem, "text:list-item", Attributes::new());
        }

        let zone = self.zone();
        let opening = self.styles.lists.open_level(record, ordered, depth, zone);
        let mut attributes = Attributes::new();
        if let Some(name) = opening.style_name {
            attributes.insert("text:style-name", name);
        }
        if opening.continue_numbering {
            attributes.insert("text:continue-numbering", "true");
        }
        self.context
            .open(Scope::List { ordered }, "text:list", attributes);
    }

    /// Open the next item of the innermost list and its paragraph
    pub fn open_list_element(&mut self, record: &PropertyRecord) {
        if !self.context.contains(ScopeFlags::LIST) {
            log::warn!("list element outside of a list, opening a plain paragraph");
            self.open_paragraph(record);
            return;
        }
        if self.context.is_open(Scope::Paragraph) {
            self.context.close(Scope::Paragraph);
        }
        if self.context.list_item_open() {
            self.context.close(Scope::ListItem);
        }
        let depth = self.context.list_depth();
        let mut attributes = Attributes::new();
        if let Some(start) = self.styles.lists.start_item(depth) {
            attributes.insert("text:start-value", start.to_string());
        }
        self.context.open(Scope::ListItem, "text:list-item", attributes);
        self.open_paragraph(record);
    }

    /// Close the paragraph of the current item; the item itself stays open
    pub fn close_list_element(&mut self) {
        self.context.close(Scope::Paragraph);
    }
}
