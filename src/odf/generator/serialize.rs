//! Stream serialization.
//!
//! A finished [`DocumentAssembler`] is written either as one flat document
//! or as the streams of a package. The flat document holds every section;
//! the package splits them:
//!
//! | Stream | Sections |
//! |--------|----------|
//! | `content.xml` | font faces, content automatic styles, body |
//! | `styles.xml` | font faces, named styles, style automatic styles and page layouts, master pages |
//! | `meta.xml` | metadata |
//! | `settings.xml` | view settings |
//! | `META-INF/manifest.xml` | every stream and embedded object |

use super::DocumentAssembler;
use crate::odf::StreamKind;
use crate::odf::core::{DocumentHandler, Manifest, XmlWriter, write_metadata, write_settings};
use crate::odf::elements::Attributes;
use crate::odf::elements::namespace::DOCUMENT_NAMESPACES;
use crate::odf::style::Zone;

use crate::common::Result;
#[cfg(feature = "package")]
use crate::odf::core::PackageWriter;
#[cfg(feature = "package")]
use std::io::{Seek, Write};

/// Streams of a package besides the manifest, in writing order
const PACKAGE_STREAMS: [StreamKind; 4] = [
    StreamKind::Content,
    StreamKind::Styles,
    StreamKind::Meta,
    StreamKind::Settings,
];

/// Writes the streams of one document
#[derive(Debug, Clone, Copy)]
pub struct StreamSerializer<'a> {
    document: &'a DocumentAssembler,
}

impl<'a> StreamSerializer<'a> {
    pub fn new(document: &'a DocumentAssembler) -> Self {
        if !document.is_finished() {
            log::warn!("serializing a document before end_document");
        }
        Self { document }
    }

    /// Write the stream `kind` to `handler`
    pub fn write(&self, kind: StreamKind, handler: &mut dyn DocumentHandler) {
        if kind == StreamKind::Manifest {
            self.manifest().write(handler);
            return;
        }

        handler.start_document();
        handler.start_element(kind.root_element(), &self.root_attributes(kind));
        match kind {
            StreamKind::Flat => {
                self.write_meta(handler);
                self.write_settings(handler);
                self.write_fonts(handler);
                self.write_named_styles(handler);
                self.write_automatic_styles(handler, &[Zone::StyleAutomatic, Zone::ContentAutomatic], true);
                self.write_master_styles(handler);
                self.write_body(handler);
            },
            StreamKind::Content => {
                self.write_fonts(handler);
                self.write_automatic_styles(handler, &[Zone::ContentAutomatic], false);
                self.write_body(handler);
            },
            StreamKind::Styles => {
                self.write_fonts(handler);
                self.write_named_styles(handler);
                self.write_automatic_styles(handler, &[Zone::StyleAutomatic], true);
                self.write_master_styles(handler);
            },
            StreamKind::Meta => self.write_meta(handler),
            StreamKind::Settings => self.write_settings(handler),
            StreamKind::Manifest => {},
        }
        handler.end_element(kind.root_element());
        handler.end_document();
    }

    /// Manifest listing every stream and embedded object
    pub fn manifest(&self) -> Manifest {
        let options = self.document.options();
        let mut manifest = Manifest::new(self.document.kind().mime_type(), &options.office_version);
        for kind in PACKAGE_STREAMS {
            manifest.add(kind.file_name());
        }
        for object in self.document.objects() {
            manifest.add_with_media_type(&format!("{}/", object.name), &object.media_type);
            for (path, _) in &object.streams {
                manifest.add(path);
            }
        }
        manifest
    }

    fn root_attributes(&self, kind: StreamKind) -> Attributes {
        let mut attributes = Attributes::new();
        for (prefix, uri) in DOCUMENT_NAMESPACES {
            attributes.insert(&format!("xmlns:{}", prefix), *uri);
        }
        attributes.insert("office:version", self.document.options().office_version.as_str());
        if kind == StreamKind::Flat {
            attributes.insert("office:mimetype", self.document.kind().mime_type());
        }
        attributes
    }

    fn write_meta(&self, handler: &mut dyn DocumentHandler) {
        handler.start_element("office:meta", &Attributes::new());
        write_metadata(handler, self.document.metadata(), &self.document.options().generator);
        handler.end_element("office:meta");
    }

    fn write_settings(&self, handler: &mut dyn DocumentHandler) {
        handler.start_element("office:settings", &Attributes::new());
        write_settings(handler);
        handler.end_element("office:settings");
    }

    fn write_fonts(&self, handler: &mut dyn DocumentHandler) {
        handler.start_element("office:font-face-decls", &Attributes::new());
        self.document.styles().write_fonts(handler);
        handler.end_element("office:font-face-decls");
    }

    fn write_named_styles(&self, handler: &mut dyn DocumentHandler) {
        handler.start_element("office:styles", &Attributes::new());
        self.document.styles().write_zone(handler, Zone::Style);
        handler.end_element("office:styles");
    }

    fn write_automatic_styles(&self, handler: &mut dyn DocumentHandler, zones: &[Zone], layouts: bool) {
        handler.start_element("office:automatic-styles", &Attributes::new());
        for zone in zones {
            self.document.styles().write_zone(handler, *zone);
        }
        if layouts {
            self.document.pages().write_layouts(handler);
        }
        handler.end_element("office:automatic-styles");
    }

    fn write_master_styles(&self, handler: &mut dyn DocumentHandler) {
        handler.start_element("office:master-styles", &Attributes::new());
        self.document.pages().write_masters(handler);
        handler.end_element("office:master-styles");
    }

    fn write_body(&self, handler: &mut dyn DocumentHandler) {
        let element = self.document.kind().body_element();
        handler.start_element("office:body", &Attributes::new());
        handler.start_element(element, &Attributes::new());
        self.document.body().write(handler);
        handler.end_element(element);
        handler.end_element("office:body");
    }
}

impl DocumentAssembler {
    /// Render one stream as XML text
    pub fn stream_xml(&self, kind: StreamKind) -> String {
        let mut writer = XmlWriter::new();
        StreamSerializer::new(self).write(kind, &mut writer);
        writer.into_string()
    }

    /// Render the whole document as one flat XML document
    pub fn to_flat_xml(&self) -> String {
        self.stream_xml(StreamKind::Flat)
    }

    /// Write the document as a zip package to `writer`
    #[cfg(feature = "package")]
    pub fn write_package<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut package = PackageWriter::with_writer(writer);
        package.set_mimetype(self.kind().mime_type())?;
        for kind in PACKAGE_STREAMS {
            package.add_file(kind.file_name(), self.stream_xml(kind).as_bytes())?;
        }
        for object in self.objects() {
            for (path, xml) in &object.streams {
                package.add_file(path, xml.as_bytes())?;
            }
        }
        package.add_file(
            StreamKind::Manifest.file_name(),
            self.stream_xml(StreamKind::Manifest).as_bytes(),
        )?;
        package.finish()
    }

    /// Write the document as a zip package in memory
    #[cfg(feature = "package")]
    pub fn to_package_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_package(std::io::Cursor::new(Vec::new()))?.into_inner())
    }

    #[cfg(not(feature = "package"))]
    pub fn to_package_bytes(&self) -> Result<Vec<u8>> {
        Err(crate::common::Error::FeatureDisabled("package".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::generator::{GeneratorOptions, OutputLayout};
    use crate::odf::property::PropertyRecord;
    use crate::odf::DocumentKind;
    use quick_xml::Reader;
    use quick_xml::events::Event;
    use std::collections::HashSet;

    fn assert_well_formed(xml: &str) {
        let mut reader = Reader::from_str(xml);
        let mut depth = 0usize;
        loop {
            match reader.read_event() {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => depth -= 1,
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(err) => panic!("malformed XML: {}\n{}", err, xml),
            }
        }
        assert_eq!(depth, 0);
    }

    fn sample(layout: OutputLayout) -> DocumentAssembler {
        let mut document = DocumentAssembler::new(DocumentKind::Text, GeneratorOptions::new().with_layout(layout));
        document.start_document(&PropertyRecord::new().with("dc:title", "Report & Notes"));
        document.open_page_span(&PropertyRecord::new().with("fo:page-width", "8.5in"));
        document.open_footer(&PropertyRecord::new());
        document.open_paragraph(&PropertyRecord::new().with("fo:font-size", "9pt"));
        document.insert_text("page footer");
        document.close_paragraph();
        document.close_footer();
        document.open_paragraph(&PropertyRecord::new().with("fo:font-weight", "bold"));
        document.open_span(&PropertyRecord::new().with("style:font-name", "Liberation Serif"));
        document.insert_text("a < b  and c");
        document.close_span();
        document.open_frame(&PropertyRecord::new().with("svg:width", "3in").with("svg:height", "2in"));
        let mut chart = DocumentAssembler::new(DocumentKind::Chart, GeneratorOptions::new());
        chart.start_document(&PropertyRecord::new());
        chart.open_chart(&PropertyRecord::new());
        chart.close_chart();
        document.insert_embedded_document(chart);
        document.close_frame();
        document.close_paragraph();
        document.close_page_span();
        document.end_document();
        document
    }

    #[test]
    fn test_flat_document_sections() {
        let document = sample(OutputLayout::Flat);
        let xml = document.to_flat_xml();
        assert_well_formed(&xml);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<office:document "));
        assert!(xml.contains(r#"office:mimetype="application/vnd.oasis.opendocument.text""#));
        assert!(xml.contains("<dc:title>Report &amp; Notes</dc:title>"));
        assert!(xml.contains("a &lt; b <text:s/>and c"));

        let order: Vec<usize> = [
            "<office:meta>",
            "<office:settings>",
            "<office:font-face-decls>",
            "<office:styles>",
            "<office:automatic-styles>",
            "<office:master-styles>",
            "<office:body>",
        ]
        .iter()
        .map(|section| xml.find(section).unwrap())
        .collect();
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(xml.contains("<draw:object><office:document "));
    }

    #[test]
    fn test_split_streams_partition_styles() {
        let document = sample(OutputLayout::Package);
        for kind in PACKAGE_STREAMS {
            assert_well_formed(&document.stream_xml(kind));
        }
        assert_well_formed(&document.stream_xml(StreamKind::Manifest));

        let footer_style = document.pages().spans()[0]
            .slot(crate::odf::style::HeaderFooterSlot::Footer)
            .and_then(|tree| tree.nodes()[0].attribute("text:style-name"))
            .unwrap()
            .to_string();
        let content = document.stream_xml(StreamKind::Content);
        let styles = document.stream_xml(StreamKind::Styles);
        let definition = format!(r#"<style:style style:name="{}""#, footer_style);
        assert!(styles.contains(&definition));
        assert!(!content.contains(&definition));
        assert!(styles.contains("<style:master-page style:name=\"Page_Style_1\""));
        assert!(!content.contains("office:master-styles"));
        assert!(content.contains(r#"<style:font-face style:name="Liberation Serif""#));
        assert!(document.stream_xml(StreamKind::Meta).contains("<meta:generator>odfgen/"));

        let manifest = document.stream_xml(StreamKind::Manifest);
        assert!(manifest.contains(r#"manifest:full-path="Object 1/" manifest:media-type="application/vnd.oasis.opendocument.chart""#));
        assert!(manifest.contains(r#"manifest:full-path="Object 1/content.xml""#));
    }

    #[cfg(feature = "package")]
    #[test]
    fn test_package_round_trip() {
        use std::io::Read;

        let document = sample(OutputLayout::Package);
        let bytes = document.to_package_bytes().unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "mimetype",
                "content.xml",
                "styles.xml",
                "meta.xml",
                "settings.xml",
                "Object 1/content.xml",
                "Object 1/styles.xml",
                "META-INF/manifest.xml",
            ]
        );

        let mut mimetype = String::new();
        archive.by_name("mimetype").unwrap().read_to_string(&mut mimetype).unwrap();
        assert_eq!(mimetype, "application/vnd.oasis.opendocument.text");
        let mut object = String::new();
        archive
            .by_name("Object 1/content.xml")
            .unwrap()
            .read_to_string(&mut object)
            .unwrap();
        assert_well_formed(&object);
        assert!(object.contains("<office:chart><chart:chart"));
    }

    /// Style names defined in the style sections of `xml`, and every
    /// `*style-name` reference outside the font declarations
    fn style_names(xml: &str) -> (HashSet<String>, Vec<String>) {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<String> = Vec::new();
        let mut defined = HashSet::new();
        let mut referenced = Vec::new();
        loop {
            let (element, empty) = match reader.read_event() {
                Ok(Event::Start(element)) => (element, false),
                Ok(Event::Empty(element)) => (element, true),
                Ok(Event::End(_)) => {
                    stack.pop();
                    continue;
                },
                Ok(Event::Eof) => break,
                Ok(_) => continue,
                Err(err) => panic!("malformed XML: {}", err),
            };
            let in_styles = stack
                .iter()
                .any(|name| name == "office:automatic-styles" || name == "office:styles");
            let in_fonts = stack.iter().any(|name| name == "office:font-face-decls");
            for attribute in element.attributes() {
                let attribute = attribute.unwrap();
                let key = String::from_utf8_lossy(attribute.key.as_ref()).to_string();
                let value = String::from_utf8_lossy(&attribute.value).to_string();
                if key == "style:name" && in_styles {
                    defined.insert(value);
                } else if key.ends_with("style-name") && !in_fonts {
                    referenced.push(value);
                }
            }
            if !empty {
                stack.push(String::from_utf8_lossy(element.name().as_ref()).to_string());
            }
        }
        (defined, referenced)
    }

    fn list_level(id: i64) -> PropertyRecord {
        PropertyRecord::new()
            .with("librevenge:list-id", id)
            .with("librevenge:level", 1)
            .with("style:num-format", "1")
    }

    fn list_with_items(document: &mut DocumentAssembler, id: i64, items: usize) {
        document.open_ordered_list_level(&list_level(id));
        for _ in 0..items {
            document.open_list_element(&PropertyRecord::new());
            document.insert_text("item");
            document.close_list_element();
        }
        document.close_ordered_list_level();
    }

    fn small_table(document: &mut DocumentAssembler, background: &str) {
        document.open_table(&PropertyRecord::new().with_children(
            "librevenge:table-columns",
            vec![PropertyRecord::new().with("style:column-width", "1.5in")],
        ));
        document.open_table_row(&PropertyRecord::new());
        document.open_table_cell(&PropertyRecord::new().with("fo:background-color", background));
        document.open_paragraph(&PropertyRecord::new());
        document.insert_text("cell");
        document.close_paragraph();
        document.close_table_cell();
        document.close_table_row();
        document.close_table();
    }

    #[test]
    fn test_content_references_resolve() {
        let mut document = DocumentAssembler::new(DocumentKind::Text, GeneratorOptions::new());
        document.start_document(&PropertyRecord::new());
        document.open_page_span(&PropertyRecord::new().with("fo:page-width", "8.5in"));
        list_with_items(&mut document, 1, 2);

        document.open_header(&PropertyRecord::new());
        list_with_items(&mut document, 1, 1);
        small_table(&mut document, "#dddddd");
        document.close_header();
        document.open_footer(&PropertyRecord::new());
        document.open_paragraph(&PropertyRecord::new().with("fo:font-size", "8pt"));
        document.insert_text("footer");
        document.close_paragraph();
        document.close_footer();

        list_with_items(&mut document, 1, 1);
        small_table(&mut document, "#eeeeee");
        document.open_paragraph(&PropertyRecord::new());
        document.insert_text("note follows");
        document.open_footnote(&PropertyRecord::new());
        list_with_items(&mut document, 1, 1);
        document.close_footnote();
        document.close_paragraph();
        document.close_page_span();
        document.end_document();

        let (content_defined, content_references) = style_names(&document.stream_xml(StreamKind::Content));
        let (styles_defined, styles_references) = style_names(&document.stream_xml(StreamKind::Styles));
        assert!(content_references.iter().any(|name| name.starts_with('L')));
        assert!(styles_references.iter().any(|name| name.starts_with('L')));

        for name in &content_references {
            assert!(
                content_defined.contains(name) || styles_defined.contains(name),
                "{} referenced from content.xml but not defined",
                name
            );
        }
        for name in &styles_references {
            assert!(styles_defined.contains(name), "{} referenced from styles.xml but not defined there", name);
        }
    }
}
