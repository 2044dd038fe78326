//! Font face declarations.

use super::{Style, StyleFamily};
use crate::odf::core::DocumentHandler;
use crate::odf::elements::Attributes;
use crate::odf::property::{PropertyRecord, is_internal_key};

/// Fonts are keyed and named by their family name
pub struct FontFamily;

impl FontFamily {
    /// Record registering the font `name`
    pub fn record(name: &str) -> PropertyRecord {
        PropertyRecord::new().with("style:name", name)
    }
}

impl StyleFamily for FontFamily {
    const NAME_PREFIX: &'static str = "Font";

    fn canonical_key(record: &PropertyRecord) -> String {
        record.get_string("style:name").unwrap_or_default()
    }

    fn generate_name(record: &PropertyRecord, index: usize) -> String {
        match record.get_string("style:name") {
            Some(name) if !name.is_empty() => name,
            _ => format!("{}{}", Self::NAME_PREFIX, index),
        }
    }

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        let family = if style.name.contains(' ') {
            format!("'{}'", style.name)
        } else {
            style.name.clone()
        };
        let mut attributes = Attributes::new()
            .with("style:name", style.name.as_str())
            .with("svg:font-family", family);
        for (key, value) in style.record.iter() {
            if key != "style:name" && !is_internal_key(key) {
                attributes.insert(key, value.to_odf_string());
            }
        }
        handler.start_element("style:font-face", &attributes);
        handler.end_element("style:font-face");
    }
}
