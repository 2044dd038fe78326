use crate::odf::generator::{DocumentAssembler, GeneratorOptions, PathBounds};
use crate::odf::property::PropertyRecord;
use crate::odf::DocumentKind;

/// Front end producing OpenDocument Text.
///
/// Accepts the text, list, table, frame and drawing events; the body is
/// written inside `office:text`.
#[derive(Debug)]
pub struct TextGenerator {
    document: DocumentAssembler,
}

impl TextGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            document: DocumentAssembler::new(DocumentKind::Text, options),
        }
    }

    assembler_access!(document);

    forward_events! { document;
        fn start_document(&mut self, record: &PropertyRecord);
        /// Close everything still open; output is available afterwards
        fn end_document(&mut self);
        fn set_document_metadata(&mut self, record: &PropertyRecord);

        fn define_paragraph_style(&mut self, record: &PropertyRecord);
        fn define_character_style(&mut self, record: &PropertyRecord);
        fn define_ordered_list_level(&mut self, record: &PropertyRecord);
        fn define_unordered_list_level(&mut self, record: &PropertyRecord);

        fn open_page_span(&mut self, record: &PropertyRecord);
        fn close_page_span(&mut self);
        fn open_header(&mut self, record: &PropertyRecord);
        fn close_header(&mut self);
        fn open_footer(&mut self, record: &PropertyRecord);
        fn close_footer(&mut self);

        fn open_section(&mut self, record: &PropertyRecord);
        fn close_section(&mut self);
        fn open_paragraph(&mut self, record: &PropertyRecord);
        fn close_paragraph(&mut self);
        fn open_span(&mut self, record: &PropertyRecord);
        fn close_span(&mut self);
        fn open_link(&mut self, record: &PropertyRecord);
        fn close_link(&mut self);
        fn insert_text(&mut self, text: &str);
        fn insert_tab(&mut self);
        fn insert_space(&mut self);
        fn insert_line_break(&mut self);
        fn insert_field(&mut self, record: &PropertyRecord);

        fn open_ordered_list_level(&mut self, record: &PropertyRecord);
        fn close_ordered_list_level(&mut self);
        fn open_unordered_list_level(&mut self, record: &PropertyRecord);
        fn close_unordered_list_level(&mut self);
        fn open_list_element(&mut self, record: &PropertyRecord);
        fn close_list_element(&mut self);

        fn open_footnote(&mut self, record: &PropertyRecord);
        fn close_footnote(&mut self);
        fn open_endnote(&mut self, record: &PropertyRecord);
        fn close_endnote(&mut self);
        fn open_comment(&mut self, record: &PropertyRecord);
        fn close_comment(&mut self);

        fn open_table(&mut self, record: &PropertyRecord);
        fn close_table(&mut self);
        fn open_table_row(&mut self, record: &PropertyRecord);
        fn close_table_row(&mut self);
        fn open_table_cell(&mut self, record: &PropertyRecord);
        fn close_table_cell(&mut self);
        fn insert_covered_table_cell(&mut self, record: &PropertyRecord);

        fn open_frame(&mut self, record: &PropertyRecord);
        fn close_frame(&mut self);
        fn open_text_box(&mut self, record: &PropertyRecord);
        fn close_text_box(&mut self);
        fn insert_binary_object(&mut self, record: &PropertyRecord);
        /// Embed a finished document (a chart, a drawing) in the open frame
        fn insert_embedded_document(&mut self, document: DocumentAssembler);

        fn set_style(&mut self, record: &PropertyRecord);
        fn open_group(&mut self, record: &PropertyRecord);
        fn close_group(&mut self);
        fn draw_rectangle(&mut self, record: &PropertyRecord);
        fn draw_ellipse(&mut self, record: &PropertyRecord);
        fn draw_polyline(&mut self, record: &PropertyRecord);
        fn draw_polygon(&mut self, record: &PropertyRecord);
        fn draw_path(&mut self, record: &PropertyRecord);
        fn draw_path_with_bounds(&mut self, record: &PropertyRecord, bounds: &dyn PathBounds);
        fn draw_connector(&mut self, record: &PropertyRecord);
    }
}

impl Default for TextGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}
