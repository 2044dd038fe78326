//! OpenDocument generation.
//!
//! A front end ([`odt::TextGenerator`], [`ods::SpreadsheetGenerator`],
//! [`odg::DrawingGenerator`], [`odp::PresentationGenerator`] or
//! [`odc::ChartGenerator`]) receives an ordered stream of structural calls,
//! each carrying a [`PropertyRecord`], and assembles them into an ODF
//! document. The finished document is written either as one flat XML
//! document or as a zip package.
//!
//! # Example
//!
//! ```
//! use odfgen::odf::PropertyRecord;
//! use odfgen::odf::generator::{GeneratorOptions, OutputLayout};
//! use odfgen::odf::odt::TextGenerator;
//!
//! let mut document = TextGenerator::new(GeneratorOptions::new().with_layout(OutputLayout::Flat));
//! document.start_document(&PropertyRecord::new());
//! document.open_paragraph(&PropertyRecord::new());
//! document.insert_text("Hello  world");
//! document.close_paragraph();
//! document.end_document();
//!
//! let xml = document.to_flat_xml();
//! assert!(xml.contains("Hello <text:s/>world"));
//! ```

/// Declares delegating methods on a front end.
///
/// Each listed event is forwarded unchanged to the named field.
macro_rules! forward_events {
    ($target:ident; $($(#[$meta:meta])* fn $name:ident(&mut self $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)?;)*) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $name(&mut self $(, $arg: $ty)*) $(-> $ret)? {
                self.$target.$name($($arg),*)
            }
        )*
    };
}

/// Declares the engine access and output methods every front end shares.
///
/// The front end must keep its [`DocumentAssembler`] in the named field.
macro_rules! assembler_access {
    ($target:ident) => {
        /// Engine behind this generator
        #[inline]
        pub fn assembler(&self) -> &$crate::odf::DocumentAssembler {
            &self.$target
        }

        /// Give up the front end, keeping the assembled document
        #[inline]
        pub fn into_assembler(self) -> $crate::odf::DocumentAssembler {
            self.$target
        }

        /// Register the handler building sub-documents for `mime_type`
        pub fn register_object_handler(
            &mut self,
            mime_type: &str,
            handler: impl Fn(&[u8]) -> Option<$crate::odf::DocumentAssembler> + 'static,
        ) {
            self.$target.register_object_handler(mime_type, handler);
        }

        /// Register the handler transcoding images of `mime_type`
        pub fn register_image_handler(
            &mut self,
            mime_type: &str,
            handler: impl Fn(&[u8]) -> Option<(Vec<u8>, String)> + 'static,
        ) {
            self.$target.register_image_handler(mime_type, handler);
        }

        #[inline]
        pub fn to_flat_xml(&self) -> String {
            self.$target.to_flat_xml()
        }

        #[inline]
        pub fn stream_xml(&self, kind: $crate::odf::StreamKind) -> String {
            self.$target.stream_xml(kind)
        }

        #[cfg(feature = "package")]
        pub fn write_package<W: std::io::Write + std::io::Seek>(&self, writer: W) -> $crate::common::Result<W> {
            self.$target.write_package(writer)
        }

        pub fn to_package_bytes(&self) -> $crate::common::Result<Vec<u8>> {
            self.$target.to_package_bytes()
        }
    };
}

pub mod coordinates;
pub mod core;
pub mod elements;
pub mod generator;
pub mod odc;
pub mod odg;
pub mod odp;
pub mod ods;
pub mod odt;
pub mod property;
pub mod style;

pub use elements::{Attributes, ElementTree, Node};
pub use generator::{DocumentAssembler, GeneratorOptions, OutputLayout};
pub use property::{PropertyRecord, PropertyValue};

/// Kind of document being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// OpenDocument Text (.odt)
    Text,
    /// OpenDocument Spreadsheet (.ods)
    Spreadsheet,
    /// OpenDocument Drawing (.odg)
    Drawing,
    /// OpenDocument Presentation (.odp)
    Presentation,
    /// OpenDocument Chart (.odc)
    Chart,
}

/// MIME types of the generated formats
pub const ODF_MIME_TYPES: &[(&str, DocumentKind)] = &[
    ("application/vnd.oasis.opendocument.text", DocumentKind::Text),
    ("application/vnd.oasis.opendocument.spreadsheet", DocumentKind::Spreadsheet),
    ("application/vnd.oasis.opendocument.graphics", DocumentKind::Drawing),
    ("application/vnd.oasis.opendocument.presentation", DocumentKind::Presentation),
    ("application/vnd.oasis.opendocument.chart", DocumentKind::Chart),
];

impl DocumentKind {
    pub fn mime_type(&self) -> &'static str {
        ODF_MIME_TYPES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(mime, _)| *mime)
            .unwrap_or("application/vnd.oasis.opendocument.text")
    }

    /// Element inside `office:body` holding the content
    pub fn body_element(&self) -> &'static str {
        match self {
            Self::Text => "office:text",
            Self::Spreadsheet => "office:spreadsheet",
            Self::Drawing => "office:drawing",
            Self::Presentation => "office:presentation",
            Self::Chart => "office:chart",
        }
    }

    /// Kind generated for `mime_type`
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        ODF_MIME_TYPES
            .iter()
            .find(|(mime, _)| *mime == mime_type)
            .map(|(_, kind)| *kind)
    }
}

/// One output stream of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Single self-contained document
    Flat,
    Content,
    Styles,
    Settings,
    Meta,
    Manifest,
}

impl StreamKind {
    /// Path of the stream inside a package
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Flat => "document.xml",
            Self::Content => "content.xml",
            Self::Styles => "styles.xml",
            Self::Settings => "settings.xml",
            Self::Meta => "meta.xml",
            Self::Manifest => "META-INF/manifest.xml",
        }
    }

    /// Root element of the stream
    pub fn root_element(&self) -> &'static str {
        match self {
            Self::Flat => "office:document",
            Self::Content => "office:document-content",
            Self::Styles => "office:document-styles",
            Self::Settings => "office:document-settings",
            Self::Meta => "office:document-meta",
            Self::Manifest => "manifest:manifest",
        }
    }
}
