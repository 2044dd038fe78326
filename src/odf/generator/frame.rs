//! Frames, text boxes, binary objects and embedded sub-documents.
//!
//! A binary object is resolved by MIME type: a registered object handler
//! turns the bytes into a finished sub-document, a registered image handler
//! transcodes them, and anything else is embedded as it is.

use super::context::{FrameKind, Scope};
use super::options::OutputLayout;
use super::serialize::StreamSerializer;
use super::DocumentAssembler;
use crate::common::{Error, Result};
use crate::odf::core::{ElementCollector, XmlWriter};
use crate::odf::elements::Attributes;
use crate::odf::property::{PropertyRecord, is_internal_key};
use crate::odf::{DocumentKind, StreamKind};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashMap;
use std::rc::Rc;

/// Builds a finished sub-document from raw bytes
pub type ObjectHandler = Rc<dyn Fn(&[u8]) -> Option<DocumentAssembler>>;

/// Transcodes raw image bytes, returning the new bytes and their MIME type
pub type ImageHandler = Rc<dyn Fn(&[u8]) -> Option<(Vec<u8>, String)>>;

/// Attributes of the frame element itself, never part of its graphic style
const FRAME_KEYS: [&str; 9] = [
    "svg:x",
    "svg:y",
    "svg:width",
    "svg:height",
    "fo:min-width",
    "fo:min-height",
    "draw:z-index",
    "text:anchor-type",
    "text:anchor-page-number",
];

/// Callback table consulted by [`DocumentAssembler::insert_binary_object`]
#[derive(Default, Clone)]
pub struct EmbeddedHandlers {
    objects: HashMap<String, ObjectHandler>,
    images: HashMap<String, ImageHandler>,
}

impl std::fmt::Debug for EmbeddedHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedHandlers")
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .field("images", &self.images.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EmbeddedHandlers {
    pub fn object(&self, mime_type: &str) -> Option<ObjectHandler> {
        self.objects.get(mime_type).cloned()
    }

    pub fn image(&self, mime_type: &str) -> Option<ImageHandler> {
        self.images.get(mime_type).cloned()
    }
}

/// A sub-document stored as package streams under `name/`
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedObject {
    /// Directory inside the package (`Object 1`, `Object 1/Object 1`)
    pub name: String,
    pub media_type: String,
    /// Package path and XML text of each stream
    pub streams: Vec<(String, String)>,
}

/// Decode a base64 payload, ignoring embedded whitespace
pub fn decode_binary(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.split_whitespace().collect();
    if compact.is_empty() {
        return Err(Error::InvalidFormat("empty binary payload".to_string()));
    }
    Ok(STANDARD.decode(compact)?)
}

fn copy_keys(record: &PropertyRecord, keys: &[&str], attributes: &mut Attributes) {
    for key in keys {
        if let Some(value) = record.get(key) {
            attributes.insert(key, value.to_odf_string());
        }
    }
}

impl DocumentAssembler {
    /// Register the handler building sub-documents for `mime_type`
    pub fn register_object_handler(
        &mut self,
        mime_type: &str,
        handler: impl Fn(&[u8]) -> Option<DocumentAssembler> + 'static,
    ) {
        self.handlers
            .objects
            .insert(mime_type.to_string(), Rc::new(handler));
    }

    /// Register the handler transcoding images of `mime_type`
    pub fn register_image_handler(
        &mut self,
        mime_type: &str,
        handler: impl Fn(&[u8]) -> Option<(Vec<u8>, String)> + 'static,
    ) {
        self.handlers
            .images
            .insert(mime_type.to_string(), Rc::new(handler));
    }

    /// Open a `draw:frame`; geometry stays on the element, the rest
    /// becomes its graphic style
    pub fn open_frame(&mut self, record: &PropertyRecord) {
        let style = record.filtered(|k| !is_internal_key(k) && !FRAME_KEYS.contains(&k));
        let style = self.styles.graphic_definitions.split(&style);
        let zone = self.zone();
        let style_name = self.styles.graphics.intern(&style, zone);
        self.counters.frames += 1;

        let mut attributes = Attributes::new().with("draw:style-name", style_name);
        if self.kind() == DocumentKind::Text {
            let name = record
                .get_string("draw:name")
                .unwrap_or_else(|| format!("Frame{}", self.counters.frames));
            attributes.insert("draw:name", name);
            let anchor = record
                .get_string("text:anchor-type")
                .unwrap_or_else(|| "paragraph".to_string());
            attributes.insert("text:anchor-type", anchor);
            copy_keys(record, &["text:anchor-page-number"], &mut attributes);
        }
        copy_keys(
            record,
            &["svg:x", "svg:y", "svg:width", "svg:height", "fo:min-width", "fo:min-height", "draw:z-index"],
            &mut attributes,
        );
        self.context.open(Scope::Frame, "draw:frame", attributes);
    }

    pub fn close_frame(&mut self) {
        self.context.close(Scope::Frame);
    }

    /// Open a text box inside the current frame
    pub fn open_text_box(&mut self, record: &PropertyRecord) {
        if !self.context.is_open(Scope::Frame) {
            log::warn!("text box outside of a frame, ignored");
            return;
        }
        let mut attributes = Attributes::new();
        copy_keys(record, &["fo:min-height", "fo:min-width", "draw:chain-next-name"], &mut attributes);
        self.context.tree().push_open("draw:text-box", attributes);
        self.context.push_frame(FrameKind::TextBox, &["draw:text-box"]);
        self.styles.lists.push_scope();
    }

    pub fn close_text_box(&mut self) {
        if self.context.pop_inline_frame(FrameKind::TextBox) {
            self.styles.lists.pop_scope();
        }
    }

    /// Embed binary data (`office:binary-data`, base64) or a link
    /// (`xlink:href`) typed by `librevenge:mime-type` in the current frame
    pub fn insert_binary_object(&mut self, record: &PropertyRecord) {
        if !self.context.is_open(Scope::Frame) {
            log::warn!("binary object outside of a frame, ignored");
            return;
        }
        let mime_type = record.get_str("librevenge:mime-type").unwrap_or_default();
        let Some(data) = record.get_str("office:binary-data") else {
            match record.get_str("xlink:href") {
                Some(href) => self.push_image_link(href, mime_type),
                None => log::warn!("binary object without data or link, ignored"),
            }
            return;
        };
        let bytes = match decode_binary(data) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("binary object dropped: {}", err);
                return;
            },
        };

        if let Some(handler) = self.handlers.object(mime_type) {
            match handler(&bytes) {
                Some(document) => {
                    self.insert_embedded_document(document);
                    return;
                },
                None => log::debug!("object handler for {} declined, embedding raw data", mime_type),
            }
        }
        if let Some(handler) = self.handlers.image(mime_type) {
            match handler(&bytes) {
                Some((converted, converted_type)) => {
                    self.push_binary("draw:image", &converted, &converted_type);
                    return;
                },
                None => log::debug!("image handler for {} declined, embedding raw data", mime_type),
            }
        }

        let element = if mime_type.is_empty() || mime_type.starts_with("image/") {
            "draw:image"
        } else {
            "draw:object-ole"
        };
        self.push_binary(element, &bytes, mime_type);
    }

    fn push_binary(&mut self, element: &str, bytes: &[u8], mime_type: &str) {
        let mut attributes = Attributes::new();
        if !mime_type.is_empty() {
            attributes.insert("draw:mime-type", mime_type);
        }
        let tree = self.context.tree();
        tree.push_open(element, attributes);
        tree.push_open("office:binary-data", Attributes::new());
        tree.push_char_data(&STANDARD.encode(bytes));
        tree.push_close("office:binary-data");
        tree.push_close(element);
    }

    fn push_image_link(&mut self, href: &str, mime_type: &str) {
        let mut attributes = Attributes::new()
            .with("xlink:href", href)
            .with("xlink:type", "simple")
            .with("xlink:show", "embed")
            .with("xlink:actuate", "onLoad");
        if !mime_type.is_empty() {
            attributes.insert("draw:mime-type", mime_type);
        }
        self.context.tree().push_empty("draw:image", attributes);
    }

    /// Nest a finished sub-document in the current frame.
    ///
    /// The flat layout inlines it as `draw:object > office:document`; the
    /// package layout stores it as `Object N/` streams referenced by
    /// `xlink:href`.
    pub fn insert_embedded_document(&mut self, mut document: DocumentAssembler) {
        if !self.context.is_open(Scope::Frame) {
            log::warn!("embedded document outside of a frame, ignored");
            return;
        }
        if !document.is_finished() {
            document.end_document();
        }
        match self.options().layout {
            OutputLayout::Flat => {
                let mut collector = ElementCollector::new();
                StreamSerializer::new(&document).write(StreamKind::Flat, &mut collector);
                let mut content = collector.into_tree();
                let tree = self.context.tree();
                tree.push_open("draw:object", Attributes::new());
                tree.append(&mut content);
                tree.push_close("draw:object");
            },
            OutputLayout::Package => {
                self.counters.objects += 1;
                let name = format!("Object {}", self.counters.objects);
                let serializer = StreamSerializer::new(&document);
                let streams = [StreamKind::Content, StreamKind::Styles]
                    .into_iter()
                    .map(|kind| {
                        let mut writer = XmlWriter::new();
                        serializer.write(kind, &mut writer);
                        (format!("{}/{}", name, kind.file_name()), writer.into_string())
                    })
                    .collect();
                self.objects.push(EmbeddedObject {
                    name: name.clone(),
                    media_type: document.kind().mime_type().to_string(),
                    streams,
                });
                for nested in document.objects {
                    self.objects.push(EmbeddedObject {
                        name: format!("{}/{}", name, nested.name),
                        media_type: nested.media_type,
                        streams: nested
                            .streams
                            .into_iter()
                            .map(|(path, xml)| (format!("{}/{}", name, path), xml))
                            .collect(),
                    });
                }
                self.context.tree().push_empty(
                    "draw:object",
                    Attributes::new()
                        .with("xlink:href", format!("./{}", name))
                        .with("xlink:type", "simple")
                        .with("xlink:show", "embed")
                        .with("xlink:actuate", "onLoad"),
                );
            },
        }
    }
}
