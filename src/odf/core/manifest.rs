//! Package manifest (`META-INF/manifest.xml`).
//!
//! The manifest lists the package root, every stream, and every embedded
//! object directory together with its media type.

use super::handler::DocumentHandler;
use crate::odf::elements::Attributes;
use crate::odf::elements::namespace::MANIFESTNS;

/// Entry in the ODF manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub full_path: String,
    pub media_type: String,
}

/// Collects manifest entries and writes them out
#[derive(Debug, Clone)]
pub struct Manifest {
    mimetype: String,
    version: String,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Create a manifest whose root entry carries `mimetype`
    pub fn new(mimetype: &str, version: &str) -> Self {
        Self {
            mimetype: mimetype.to_string(),
            version: version.to_string(),
            entries: Vec::new(),
        }
    }

    /// Add an entry, guessing the media type from the path
    pub fn add(&mut self, full_path: &str) {
        self.add_with_media_type(full_path, Self::guess_media_type(full_path));
    }

    pub fn add_with_media_type(&mut self, full_path: &str, media_type: &str) {
        if self.has_path(full_path) {
            return;
        }
        self.entries.push(ManifestEntry {
            full_path: full_path.to_string(),
            media_type: media_type.to_string(),
        });
    }

    pub fn has_path(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| entry.full_path == path)
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Guess media type from file path
    fn guess_media_type(path: &str) -> &'static str {
        if path.ends_with(".xml") {
            "text/xml"
        } else if path.ends_with(".png") {
            "image/png"
        } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
            "image/jpeg"
        } else if path.ends_with(".svg") {
            "image/svg+xml"
        } else if path.ends_with('/') {
            ""
        } else {
            "application/octet-stream"
        }
    }

    pub fn write(&self, handler: &mut dyn DocumentHandler) {
        handler.start_document();
        handler.start_element(
            "manifest:manifest",
            &Attributes::new()
                .with("xmlns:manifest", MANIFESTNS)
                .with("manifest:version", self.version.as_str()),
        );

        handler.start_element(
            "manifest:file-entry",
            &Attributes::new()
                .with("manifest:full-path", "/")
                .with("manifest:version", self.version.as_str())
                .with("manifest:media-type", self.mimetype.as_str()),
        );
        handler.end_element("manifest:file-entry");

        for entry in &self.entries {
            handler.start_element(
                "manifest:file-entry",
                &Attributes::new()
                    .with("manifest:full-path", entry.full_path.as_str())
                    .with("manifest:media-type", entry.media_type.as_str()),
            );
            handler.end_element("manifest:file-entry");
        }

        handler.end_element("manifest:manifest");
        handler.end_document();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::XmlWriter;

    #[test]
    fn test_manifest_entries() {
        let mut manifest = Manifest::new("application/vnd.oasis.opendocument.text", "1.3");
        manifest.add("content.xml");
        manifest.add("content.xml");
        manifest.add_with_media_type("Object 1/", "application/vnd.oasis.opendocument.chart");
        assert_eq!(manifest.entries().len(), 2);

        let mut writer = XmlWriter::new();
        manifest.write(&mut writer);
        let xml = writer.into_string();
        assert!(xml.contains(r#"manifest:full-path="/" manifest:version="1.3" manifest:media-type="application/vnd.oasis.opendocument.text"/>"#));
        assert!(xml.contains(r#"manifest:full-path="content.xml" manifest:media-type="text/xml""#));
        assert!(xml.contains(r#"manifest:full-path="Object 1/""#));
    }
}
