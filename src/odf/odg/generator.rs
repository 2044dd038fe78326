use crate::odf::DocumentKind;
use crate::odf::generator::{DocumentAssembler, GeneratorOptions, PathBounds};
use crate::odf::property::PropertyRecord;

/// Front end producing OpenDocument Drawings.
///
/// Shapes go on `draw:page` elements; each page is bound to a master page
/// shared by every page of the same size and fill.
#[derive(Debug)]
pub struct DrawingGenerator {
    document: DocumentAssembler,
}

impl DrawingGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            document: DocumentAssembler::new(DocumentKind::Drawing, options),
        }
    }

    assembler_access!(document);

    forward_events! { document;
        fn start_document(&mut self, record: &PropertyRecord);
        fn end_document(&mut self);
        fn set_document_metadata(&mut self, record: &PropertyRecord);

        /// Start a page sized by `svg:width` and `svg:height`
        fn start_page(&mut self, record: &PropertyRecord);
        fn end_page(&mut self);
        fn start_master_page(&mut self, record: &PropertyRecord);
        fn end_master_page(&mut self);

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

        fn open_frame(&mut self, record: &PropertyRecord);
        fn close_frame(&mut self);
        fn open_text_box(&mut self, record: &PropertyRecord);
        fn close_text_box(&mut self);
        fn insert_binary_object(&mut self, record: &PropertyRecord);
        fn insert_embedded_document(&mut self, document: DocumentAssembler);
        fn open_link(&mut self, record: &PropertyRecord);
        fn close_link(&mut self);

        fn open_table_object(&mut self, record: &PropertyRecord);
        fn close_table_object(&mut self);
        fn open_table_row(&mut self, record: &PropertyRecord);
        fn close_table_row(&mut self);
        fn open_table_cell(&mut self, record: &PropertyRecord);
        fn close_table_cell(&mut self);
        fn insert_covered_table_cell(&mut self, record: &PropertyRecord);

        fn define_paragraph_style(&mut self, record: &PropertyRecord);
        fn define_character_style(&mut self, record: &PropertyRecord);
        fn open_paragraph(&mut self, record: &PropertyRecord);
        fn close_paragraph(&mut self);
        fn open_span(&mut self, record: &PropertyRecord);
        fn close_span(&mut self);
        fn insert_text(&mut self, text: &str);
        fn insert_tab(&mut self);
        fn insert_space(&mut self);
        fn insert_line_break(&mut self);
        fn insert_field(&mut self, record: &PropertyRecord);

        fn define_ordered_list_level(&mut self, record: &PropertyRecord);
        fn define_unordered_list_level(&mut self, record: &PropertyRecord);
        fn open_ordered_list_level(&mut self, record: &PropertyRecord);
        fn close_ordered_list_level(&mut self);
        fn open_unordered_list_level(&mut self, record: &PropertyRecord);
        fn close_unordered_list_level(&mut self);
        fn open_list_element(&mut self, record: &PropertyRecord);
        fn close_list_element(&mut self);
    }
}

impl Default for DrawingGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::StreamKind;

    fn page() -> PropertyRecord {
        PropertyRecord::new().with("svg:width", "11in").with("svg:height", "8.5in")
    }

    fn point(x: f64, y: f64) -> PropertyRecord {
        PropertyRecord::new()
            .with("svg:x", format!("{}in", x))
            .with("svg:y", format!("{}in", y))
    }

    #[test]
    fn test_drawing_pages_and_shapes() {
        let mut generator = DrawingGenerator::default();
        generator.start_document(&PropertyRecord::new());
        for _ in 0..2 {
            generator.start_page(&page());
            generator.set_style(&PropertyRecord::new().with("draw:fill", "solid").with("draw:fill-color", "#729fcf"));
            generator.draw_rectangle(
                &PropertyRecord::new()
                    .with("svg:x", "1in")
                    .with("svg:y", "1in")
                    .with("svg:width", "2in")
                    .with("svg:height", "1in"),
            );
            generator.draw_polygon(
                &PropertyRecord::new().with_children(
                    "svg:points",
                    vec![point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)],
                ),
            );
            generator.end_page();
        }
        generator.end_document();

        let body = generator.assembler().body();
        assert!(body.is_balanced());
        assert_eq!(body.count_open("draw:page"), 2);
        assert_eq!(body.count_open("draw:rect"), 2);
        assert_eq!(body.count_open("draw:polygon"), 2);
        assert_eq!(generator.assembler().pages().spans().len(), 1);

        let styles = generator.stream_xml(StreamKind::Styles);
        assert!(styles.contains(r#"<style:page-layout style:name="PM1">"#));
        assert!(styles.contains(r#"fo:page-width="11in""#));
        assert!(styles.contains(r#"<style:master-page style:name="Page_Style_1" style:page-layout-name="PM1"/>"#));
        let content = generator.stream_xml(StreamKind::Content);
        assert!(content.contains("<office:drawing>"));
        assert!(content.contains(r##"draw:fill-color="#729fcf""##));
    }

    #[test]
    fn test_text_box_on_page() {
        let mut generator = DrawingGenerator::default();
        generator.start_document(&PropertyRecord::new());
        generator.start_page(&page());
        generator.open_frame(&PropertyRecord::new().with("svg:x", "1in").with("svg:y", "1in"));
        generator.open_text_box(&PropertyRecord::new());
        generator.open_paragraph(&PropertyRecord::new());
        generator.insert_text("label");
        generator.close_paragraph();
        generator.close_text_box();
        generator.close_frame();
        generator.end_page();
        generator.end_document();

        let xml = generator.to_flat_xml();
        assert!(xml.contains("<draw:text-box><text:p"));
        assert!(xml.contains(">label</text:p></draw:text-box></draw:frame>"));
    }
}
