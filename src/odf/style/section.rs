//! Section styles (`Sect{n}`), carrying column layouts.

use super::properties::{attributes_where, is_structural, start_style};
use super::{Style, StyleFamily};
use crate::odf::core::DocumentHandler;
use crate::odf::elements::Attributes;
use crate::odf::property::is_internal_key;

pub struct SectionFamily;

const COLUMN_KEYS: [&str; 2] = ["fo:column-count", "fo:column-gap"];

impl StyleFamily for SectionFamily {
    const NAME_PREFIX: &'static str = "Sect";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        let record = &style.record;
        start_style(handler, &style.name, "section", record);

        let properties = attributes_where(record, |k| !is_structural(k) && !COLUMN_KEYS.contains(&k));
        handler.start_element("style:section-properties", &properties);

        let columns = record.children("style:columns").unwrap_or_default();
        let count = record
            .get_int("fo:column-count")
            .unwrap_or(columns.len().max(1) as i64);
        if count > 1 || !columns.is_empty() {
            let mut attributes = Attributes::new().with("fo:column-count", count.to_string());
            if let Some(gap) = record.get_string("fo:column-gap") {
                attributes.insert("fo:column-gap", gap);
            }
            handler.start_element("style:columns", &attributes);
            for column in columns {
                handler.start_element("style:column", &attributes_where(column, |k| !is_internal_key(k)));
                handler.end_element("style:column");
            }
            handler.end_element("style:columns");
        }

        handler.end_element("style:section-properties");
        handler.end_element("style:style");
    }
}
