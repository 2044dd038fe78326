use crate::odf::DocumentKind;
use crate::odf::generator::{DocumentAssembler, GeneratorOptions, PathBounds, Scope};
use crate::odf::odt::TextGenerator;
use crate::odf::property::PropertyRecord;

/// Declares text events that go to the open sheet text box, if any, and to
/// the sheet otherwise.
macro_rules! route_text_events {
    ($($(#[$meta:meta])* fn $name:ident(&mut self $(, $arg:ident: $ty:ty)*);)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&mut self $(, $arg: $ty)*) {
                match self.text_box.as_mut() {
                    Some(text) => text.$name($($arg),*),
                    None => self.document.$name($($arg),*),
                }
            }
        )*
    };
}

/// Front end producing OpenDocument Spreadsheets.
///
/// Text boxes placed on a sheet are written by an auxiliary
/// [`TextGenerator`]; when the box closes, its finished document is nested
/// in the frame.
#[derive(Debug)]
pub struct SpreadsheetGenerator {
    document: DocumentAssembler,
    text_box: Option<TextGenerator>,
}

impl SpreadsheetGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            document: DocumentAssembler::new(DocumentKind::Spreadsheet, options),
            text_box: None,
        }
    }

    assembler_access!(document);

    /// Close a text box left open, then everything else
    pub fn end_document(&mut self) {
        if self.text_box.is_some() {
            log::warn!("text box still open at end of document");
            self.close_text_box();
        }
        self.document.end_document();
    }

    /// Open a text box in the current frame; following text events are
    /// written to it
    pub fn open_text_box(&mut self, _record: &PropertyRecord) {
        if self.text_box.is_some() {
            log::warn!("text box inside a text box, ignored");
            return;
        }
        if !self.document.context.is_open(Scope::Frame) {
            log::warn!("text box outside of a frame, ignored");
            return;
        }
        let mut text = TextGenerator::new(self.document.options().clone());
        text.start_document(&PropertyRecord::new());
        self.text_box = Some(text);
    }

    pub fn close_text_box(&mut self) {
        let Some(mut text) = self.text_box.take() else {
            log::warn!("closing a text box that is not open, ignored");
            return;
        };
        text.end_document();
        self.document.insert_embedded_document(text.into_assembler());
    }

    forward_events! { document;
        fn start_document(&mut self, record: &PropertyRecord);
        fn set_document_metadata(&mut self, record: &PropertyRecord);
        /// Register a data style referenced by `librevenge:numbering-name`
        fn define_sheet_numbering_style(&mut self, record: &PropertyRecord);

        fn open_page_span(&mut self, record: &PropertyRecord);
        fn close_page_span(&mut self);
        fn open_header(&mut self, record: &PropertyRecord);
        fn close_header(&mut self);
        fn open_footer(&mut self, record: &PropertyRecord);
        fn close_footer(&mut self);

        fn open_sheet(&mut self, record: &PropertyRecord);
        fn close_sheet(&mut self);
        fn open_sheet_row(&mut self, record: &PropertyRecord);
        fn close_sheet_row(&mut self);
        fn open_sheet_cell(&mut self, record: &PropertyRecord);
        fn close_sheet_cell(&mut self);
        fn open_comment(&mut self, record: &PropertyRecord);
        fn close_comment(&mut self);

        fn open_frame(&mut self, record: &PropertyRecord);
        fn close_frame(&mut self);
        fn insert_binary_object(&mut self, record: &PropertyRecord);
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

    route_text_events! {
        fn define_paragraph_style(&mut self, record: &PropertyRecord);
        fn define_character_style(&mut self, record: &PropertyRecord);
        fn define_ordered_list_level(&mut self, record: &PropertyRecord);
        fn define_unordered_list_level(&mut self, record: &PropertyRecord);

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
    }
}

impl Default for SpreadsheetGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}
