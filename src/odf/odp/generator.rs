use crate::odf::DocumentKind;
use crate::odf::generator::{DocumentAssembler, GeneratorOptions, PathBounds};
use crate::odf::property::PropertyRecord;

/// Front end producing OpenDocument Presentations
#[derive(Debug)]
pub struct PresentationGenerator {
    document: DocumentAssembler,
}

impl PresentationGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            document: DocumentAssembler::new(DocumentKind::Presentation, options),
        }
    }

    assembler_access!(document);

    /// Start a slide; `librevenge:master-page-name` picks its master slide
    pub fn start_slide(&mut self, record: &PropertyRecord) {
        self.document.start_page(record);
    }

    pub fn end_slide(&mut self) {
        self.document.end_page();
    }

    /// Start a master slide named by `librevenge:master-page-name`
    pub fn start_master_slide(&mut self, record: &PropertyRecord) {
        self.document.start_master_page(record);
    }

    pub fn end_master_slide(&mut self) {
        self.document.end_master_page();
    }

    /// Open a table placed on the slide in its own frame
    pub fn open_table(&mut self, record: &PropertyRecord) {
        self.document.open_table_object(record);
    }

    pub fn close_table(&mut self) {
        self.document.close_table_object();
    }

    forward_events! { document;
        fn start_document(&mut self, record: &PropertyRecord);
        fn end_document(&mut self);
        fn set_document_metadata(&mut self, record: &PropertyRecord);

        /// Open the speaker notes of the current slide
        fn start_notes(&mut self, record: &PropertyRecord);
        fn end_notes(&mut self);
        fn open_comment(&mut self, record: &PropertyRecord);
        fn close_comment(&mut self);

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

impl Default for PresentationGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::StreamKind;
    use crate::odf::generator::OutputLayout;

    fn slide() -> PropertyRecord {
        PropertyRecord::new().with("svg:width", "10in").with("svg:height", "7.5in")
    }

    fn text_frame(generator: &mut PresentationGenerator, text: &str) {
        generator.open_frame(
            &PropertyRecord::new()
                .with("svg:x", "0.5in")
                .with("svg:y", "0.5in")
                .with("svg:width", "9in")
                .with("svg:height", "1in"),
        );
        generator.open_text_box(&PropertyRecord::new());
        generator.open_paragraph(&PropertyRecord::new());
        generator.insert_text(text);
        generator.close_paragraph();
        generator.close_text_box();
        generator.close_frame();
    }

    #[test]
    fn test_slides_with_master_and_notes() {
        let mut generator = PresentationGenerator::default();
        generator.start_document(&PropertyRecord::new());
        generator.start_master_slide(&slide().with("librevenge:master-page-name", "Title Master"));
        text_frame(&mut generator, "Company");
        generator.end_master_slide();

        generator.start_slide(
            &slide()
                .with("librevenge:master-page-name", "Title Master")
                .with("presentation:transition-type", "automatic"),
        );
        text_frame(&mut generator, "Welcome");
        generator.start_notes(&PropertyRecord::new());
        text_frame(&mut generator, "Say hello");
        generator.end_notes();
        generator.end_slide();
        generator.end_document();

        let content = generator.stream_xml(StreamKind::Content);
        assert!(content.contains(r#"draw:master-page-name="Title_20_Master""#));
        assert!(content.contains("<presentation:notes>"));
        assert!(content.contains(">Welcome</text:p>"));
        assert!(!content.contains("Company"));
        assert!(content.contains(r#"<style:style style:name="dp1" style:family="drawing-page">"#));

        let styles = generator.stream_xml(StreamKind::Styles);
        assert!(styles.contains(r#"<style:master-page style:name="Title_20_Master" style:display-name="Title Master""#));
        assert!(styles.contains(">Company</text:p>"));
    }

    #[test]
    fn test_table_on_slide() {
        let mut generator = PresentationGenerator::new(GeneratorOptions::new().with_layout(OutputLayout::Flat));
        generator.start_document(&PropertyRecord::new());
        generator.start_slide(&slide());
        generator.open_table(
            &PropertyRecord::new()
                .with("svg:x", "1in")
                .with("svg:y", "2in")
                .with("svg:width", "4in")
                .with_children(
                    "librevenge:table-columns",
                    vec![PropertyRecord::new().with("style:column-width", "2in"); 2],
                ),
        );
        generator.open_table_row(&PropertyRecord::new());
        for text in ["a", "b"] {
            generator.open_table_cell(&PropertyRecord::new());
            generator.open_paragraph(&PropertyRecord::new());
            generator.insert_text(text);
            generator.close_paragraph();
            generator.close_table_cell();
        }
        generator.close_table_row();
        generator.close_table();
        generator.end_slide();
        generator.end_document();

        let body = generator.assembler().body();
        assert!(body.is_balanced());
        let names: Vec<_> = body.nodes().iter().filter_map(|n| n.name()).collect();
        let frame = names.iter().position(|n| *n == "draw:frame").unwrap();
        assert_eq!(names[frame + 1], "table:table");
        assert_eq!(body.count_open("table:table-cell"), 2);
        assert!(generator.to_flat_xml().contains(r#"table:number-columns-repeated="2""#));
    }
}
