//! Document metadata (`office:meta`).
//!
//! Every `dc:` and `meta:` key of the metadata record becomes one element.
//! Dates are normalised to the `YYYY-MM-DDTHH:MM:SS` form ODF expects and
//! comma-separated keyword lists are split into one `meta:keyword` each.

use super::handler::DocumentHandler;
use crate::odf::elements::Attributes;
use crate::odf::property::PropertyRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use phf::{Set, phf_set};

/// Metadata keys holding dates
static DATE_KEYS: Set<&'static str> = phf_set! {
    "dc:date",
    "meta:creation-date",
    "meta:print-date",
};

/// Normalise a date string, or `None` if it cannot be parsed
///
/// # Examples
///
/// ```
/// use odfgen::odf::core::normalize_date;
///
/// assert_eq!(normalize_date("2024-03-01").as_deref(), Some("2024-03-01T00:00:00"));
/// assert_eq!(normalize_date("2024-03-01T10:20:30Z").as_deref(), Some("2024-03-01T10:20:30"));
/// assert_eq!(normalize_date("yesterday"), None);
/// ```
pub fn normalize_date(value: &str) -> Option<String> {
    const OUTPUT: &str = "%Y-%m-%dT%H:%M:%S";
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.naive_utc().format(OUTPUT).to_string());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(date.format(OUTPUT).to_string());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.format(OUTPUT).to_string())
}

/// Write the children of `office:meta`
pub fn write_metadata(handler: &mut dyn DocumentHandler, record: &PropertyRecord, generator: &str) {
    let empty = Attributes::new();
    if !generator.is_empty() {
        handler.start_element("meta:generator", &empty);
        handler.characters(generator);
        handler.end_element("meta:generator");
    }

    for (key, value) in record.iter() {
        if !(key.starts_with("dc:") || key.starts_with("meta:")) || key == "meta:generator" {
            continue;
        }
        let text = value.to_odf_string();

        if key == "meta:keyword" || key == "meta:keywords" {
            for keyword in text.split(',').map(str::trim).filter(|k| !k.is_empty()) {
                handler.start_element("meta:keyword", &empty);
                handler.characters(keyword);
                handler.end_element("meta:keyword");
            }
            continue;
        }

        let text = if DATE_KEYS.contains(key) {
            normalize_date(&text).unwrap_or_else(|| {
                log::debug!("keeping unparsed metadata date {}={}", key, text);
                text
            })
        } else {
            text
        };
        handler.start_element(key, &empty);
        handler.characters(&text);
        handler.end_element(key);
    }
}
