//! Property classification.
//!
//! An ODF style splits its attributes across several property elements
//! (`style:paragraph-properties`, `style:text-properties`, ...). These tables
//! decide where each attribute of a flat record goes.

use crate::odf::core::DocumentHandler;
use crate::odf::elements::Attributes;
use crate::odf::property::{PropertyRecord, is_internal_key};
use phf::{Set, phf_set};

/// Attributes of the `style:style` element itself
pub static STYLE_ELEMENT_KEYS: Set<&'static str> = phf_set! {
    "style:display-name",
    "style:parent-style-name",
    "style:next-style-name",
    "style:master-page-name",
    "style:list-style-name",
    "style:class",
    "style:default-outline-level",
    "style:data-style-name",
    "style:percentage-data-style-name",
    "style:auto-update",
};

/// Character-level attributes (`style:text-properties`)
pub static TEXT_PROPERTY_KEYS: Set<&'static str> = phf_set! {
    "fo:font-family",
    "fo:font-size",
    "fo:font-style",
    "fo:font-variant",
    "fo:font-weight",
    "fo:color",
    "fo:letter-spacing",
    "fo:text-transform",
    "fo:text-shadow",
    "fo:language",
    "fo:country",
    "fo:script",
    "fo:hyphenate",
    "style:font-name",
    "style:font-name-asian",
    "style:font-name-complex",
    "style:font-size-asian",
    "style:font-size-complex",
    "style:font-style-asian",
    "style:font-style-complex",
    "style:font-weight-asian",
    "style:font-weight-complex",
    "style:font-pitch",
    "style:font-relief",
    "style:language-asian",
    "style:country-asian",
    "style:language-complex",
    "style:country-complex",
    "style:letter-kerning",
    "style:text-blinking",
    "style:text-emphasize",
    "style:text-line-through-color",
    "style:text-line-through-mode",
    "style:text-line-through-style",
    "style:text-line-through-text",
    "style:text-line-through-type",
    "style:text-line-through-width",
    "style:text-outline",
    "style:text-overline-color",
    "style:text-overline-style",
    "style:text-overline-type",
    "style:text-overline-width",
    "style:text-position",
    "style:text-rotation-angle",
    "style:text-scale",
    "style:text-underline-color",
    "style:text-underline-mode",
    "style:text-underline-style",
    "style:text-underline-type",
    "style:text-underline-width",
    "style:use-window-font-color",
    "text:display",
};

/// Attributes of `style:table-cell-properties`
pub static CELL_PROPERTY_KEYS: Set<&'static str> = phf_set! {
    "fo:background-color",
    "fo:border",
    "fo:border-top",
    "fo:border-bottom",
    "fo:border-left",
    "fo:border-right",
    "fo:padding",
    "fo:padding-top",
    "fo:padding-bottom",
    "fo:padding-left",
    "fo:padding-right",
    "fo:wrap-option",
    "style:border-line-width",
    "style:border-line-width-top",
    "style:border-line-width-bottom",
    "style:border-line-width-left",
    "style:border-line-width-right",
    "style:cell-protect",
    "style:diagonal-bl-tr",
    "style:diagonal-tl-br",
    "style:direction",
    "style:rotation-angle",
    "style:shadow",
    "style:shrink-to-fit",
    "style:text-align-source",
    "style:vertical-align",
    "style:writing-mode",
};

#[inline]
pub fn is_style_element_key(key: &str) -> bool {
    STYLE_ELEMENT_KEYS.contains(key)
}

#[inline]
pub fn is_text_property(key: &str) -> bool {
    TEXT_PROPERTY_KEYS.contains(key)
}

#[inline]
pub fn is_cell_property(key: &str) -> bool {
    CELL_PROPERTY_KEYS.contains(key)
}

/// `true` for keys that never land in a property element
#[inline]
pub fn is_structural(key: &str) -> bool {
    is_internal_key(key) || is_style_element_key(key)
}

/// Attributes of `record` selected by `filter`, stringified
pub fn attributes_where(record: &PropertyRecord, filter: impl Fn(&str) -> bool) -> Attributes {
    let mut attributes = Attributes::new();
    for (key, value) in record.iter() {
        if filter(key) {
            attributes.insert(key, value.to_odf_string());
        }
    }
    attributes
}

/// Write `<element .../>` holding the keys selected by `filter`.
///
/// Nothing is written when no key matches and `body` is `None`; `body`
/// receives the handler between the open and close tags.
pub fn write_property_element(
    handler: &mut dyn DocumentHandler,
    element: &str,
    record: &PropertyRecord,
    filter: impl Fn(&str) -> bool,
    body: Option<&dyn Fn(&mut dyn DocumentHandler)>,
) {
    let attributes = attributes_where(record, filter);
    if attributes.is_empty() && body.is_none() {
        return;
    }
    handler.start_element(element, &attributes);
    if let Some(body) = body {
        body(handler);
    }
    handler.end_element(element);
}

/// Open `style:style` with name, family and the style-element keys of `record`
pub fn start_style(handler: &mut dyn DocumentHandler, name: &str, family: &str, record: &PropertyRecord) {
    let mut attributes = Attributes::new()
        .with("style:name", name)
        .with("style:family", family);
    for (key, value) in record.iter() {
        if is_style_element_key(key) {
            attributes.insert(key, value.to_odf_string());
        }
    }
    handler.start_element("style:style", &attributes);
}

/// Write `style:tab-stops` from the record's tab stop children
pub fn write_tab_stops(handler: &mut dyn DocumentHandler, record: &PropertyRecord) {
    let Some(stops) = record.children("style:tab-stops") else {
        return;
    };
    if stops.is_empty() {
        return;
    }
    handler.start_element("style:tab-stops", &Attributes::new());
    for stop in stops {
        let attributes = attributes_where(stop, |k| !is_internal_key(k));
        handler.start_element("style:tab-stop", &attributes);
        handler.end_element("style:tab-stop");
    }
    handler.end_element("style:tab-stops");
}
