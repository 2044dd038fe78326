//! Graphic styles and their named sub-definitions.
//!
//! A graphic style (`gr_{n}`) may reference gradients, opacity gradients,
//! hatches, arrow-head markers, stroke dashes and fill images. Those live in
//! `office:styles` as separately named elements; [`GraphicDefinitions`]
//! splits them out of a flat record, interns each one and leaves the name
//! reference behind.
//!
//! Recognised inputs:
//! - `draw:fill="gradient"` with `draw:style`, `draw:angle`, `draw:start-color`, ...
//!   or a `svg:linearGradient` / `svg:radialGradient` stop sequence
//! - `librevenge:start-opacity` / `librevenge:end-opacity` next to a gradient
//! - `draw:fill="hatch"` with `draw:hatch-style`, `draw:hatch-color`, ...
//! - `draw:marker-start-path` / `draw:marker-start-viewbox` (and `end`)
//! - `draw:stroke="dash"` with `draw:dots1`, `draw:dots1-length`, ...
//! - `draw:fill="bitmap"` with base64 `librevenge:data`

use super::properties::{attributes_where, is_structural, is_text_property, write_property_element};
use super::{Style, StyleFamily, StyleInterner, Zone};
use crate::odf::core::DocumentHandler;
use crate::odf::elements::Attributes;
use crate::odf::property::{PropertyRecord, is_internal_key};

const PARAGRAPH_KEYS: [&str; 2] = ["fo:text-align", "fo:line-height"];

/// `style:family="graphic"`, named `gr_{n}`
pub struct GraphicFamily;

impl StyleFamily for GraphicFamily {
    const NAME_PREFIX: &'static str = "gr_";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        let record = &style.record;
        super::properties::start_style(handler, &style.name, "graphic", record);
        write_property_element(
            handler,
            "style:graphic-properties",
            record,
            |k| !is_structural(k) && !is_text_property(k) && !PARAGRAPH_KEYS.contains(&k),
            None,
        );
        write_property_element(handler, "style:paragraph-properties", record, |k| PARAGRAPH_KEYS.contains(&k), None);
        write_property_element(handler, "style:text-properties", record, is_text_property, None);
        handler.end_element("style:style");
    }
}

fn write_definition(style: &Style, handler: &mut dyn DocumentHandler, element: &str) {
    let mut attributes = Attributes::new()
        .with("draw:name", style.name.as_str())
        .with("draw:display-name", style.name.as_str());
    for (key, value) in attributes_where(&style.record, |k| !is_internal_key(k)).iter() {
        attributes.insert(key, value);
    }
    handler.start_element(element, &attributes);
    handler.end_element(element);
}

macro_rules! definition_family {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $element:literal) => {
        $(#[$meta])*
        pub struct $name;

        impl StyleFamily for $name {
            const NAME_PREFIX: &'static str = $prefix;

            fn write(style: &Style, handler: &mut dyn DocumentHandler) {
                write_definition(style, handler, $element);
            }
        }
    };
}

definition_family!(
    /// `draw:gradient`
    GradientFamily, "Gradient_", "draw:gradient"
);
definition_family!(
    /// `draw:opacity`
    OpacityFamily, "Transparency_", "draw:opacity"
);
definition_family!(
    /// `draw:hatch`
    HatchFamily, "Hatch_", "draw:hatch"
);
definition_family!(
    /// `draw:marker` (arrow heads)
    MarkerFamily, "Marker_", "draw:marker"
);
definition_family!(
    /// `draw:stroke-dash`
    DashFamily, "Dash_", "draw:stroke-dash"
);

/// `draw:fill-image` carrying inline base64 data
pub struct FillImageFamily;

impl StyleFamily for FillImageFamily {
    const NAME_PREFIX: &'static str = "FillImage_";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        let attributes = Attributes::new()
            .with("draw:name", style.name.as_str())
            .with("xlink:type", "simple")
            .with("xlink:show", "embed")
            .with("xlink:actuate", "onLoad");
        handler.start_element("draw:fill-image", &attributes);
        handler.start_element("office:binary-data", &Attributes::new());
        if let Some(data) = style.record.get_str("librevenge:data") {
            handler.raw(data);
        }
        handler.end_element("office:binary-data");
        handler.end_element("draw:fill-image");
    }
}

/// Interners for the named sub-definitions of graphic styles
#[derive(Debug, Default)]
pub struct GraphicDefinitions {
    pub gradients: StyleInterner<GradientFamily>,
    pub opacities: StyleInterner<OpacityFamily>,
    pub hatches: StyleInterner<HatchFamily>,
    pub markers: StyleInterner<MarkerFamily>,
    pub dashes: StyleInterner<DashFamily>,
    pub fill_images: StyleInterner<FillImageFamily>,
}

/// Moves `keys` from `source` to `target`, renaming each to its second element
fn move_keys(source: &mut PropertyRecord, target: &mut PropertyRecord, keys: &[(&str, &str)]) {
    for (from, to) in keys {
        if let Some(value) = source.remove(from) {
            target.insert(to, value);
        }
    }
}

impl GraphicDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract every sub-definition from `record`, returning the graphic
    /// style record with name references in their place
    pub fn split(&mut self, record: &PropertyRecord) -> PropertyRecord {
        let mut graphic = record.clone();
        let fill = graphic.get_string("draw:fill").unwrap_or_default();

        if fill == "gradient" {
            self.split_gradient(&mut graphic);
        }
        if fill == "hatch" {
            let mut hatch = PropertyRecord::new();
            move_keys(
                &mut graphic,
                &mut hatch,
                &[
                    ("draw:hatch-style", "draw:style"),
                    ("draw:hatch-color", "draw:color"),
                    ("draw:hatch-distance", "draw:distance"),
                    ("draw:hatch-rotation", "draw:rotation"),
                ],
            );
            if !hatch.contains("draw:style") {
                hatch.insert("draw:style", "single");
            }
            let name = self.hatches.intern(&hatch, Zone::Style);
            graphic.insert("draw:fill-hatch-name", name);
        }
        if fill == "bitmap" {
            if let Some(data) = graphic.remove("librevenge:data") {
                let mut image = PropertyRecord::new();
                image.insert("librevenge:data", data);
                if let Some(mime) = graphic.get("librevenge:mime-type") {
                    image.insert("librevenge:mime-type", mime.clone());
                }
                let name = self.fill_images.intern(&image, Zone::Style);
                graphic.insert("draw:fill-image-name", name);
            } else {
                log::warn!("bitmap fill without image data");
            }
        }

        for side in ["start", "end"] {
            let path_key = format!("draw:marker-{}-path", side);
            let viewbox_key = format!("draw:marker-{}-viewbox", side);
            if let Some(path) = graphic.remove(&path_key) {
                let mut marker = PropertyRecord::new();
                if let Some(viewbox) = graphic.remove(&viewbox_key) {
                    marker.insert("svg:viewBox", viewbox);
                }
                marker.insert("svg:d", path);
                let name = self.markers.intern(&marker, Zone::Style);
                graphic.insert(&format!("draw:marker-{}", side), name);
            }
        }

        if graphic.get_str("draw:stroke") == Some("dash") {
            let mut dash = PropertyRecord::new().with("draw:style", "rect");
            move_keys(
                &mut graphic,
                &mut dash,
                &[
                    ("draw:dots1", "draw:dots1"),
                    ("draw:dots1-length", "draw:dots1-length"),
                    ("draw:dots2", "draw:dots2"),
                    ("draw:dots2-length", "draw:dots2-length"),
                    ("draw:distance", "draw:distance"),
                ],
            );
            let name = self.dashes.intern(&dash, Zone::Style);
            graphic.insert("draw:stroke-dash", name);
        }

        graphic.style_attributes()
    }

    fn split_gradient(&mut self, graphic: &mut PropertyRecord) {
        const GEOMETRY: [(&str, &str); 4] = [
            ("draw:angle", "draw:angle"),
            ("draw:border", "draw:border"),
            ("draw:cx", "draw:cx"),
            ("draw:cy", "draw:cy"),
        ];

        let mut gradient = PropertyRecord::new();
        move_keys(graphic, &mut gradient, &[("draw:style", "draw:style")]);
        if !gradient.contains("draw:style") {
            gradient.insert("draw:style", "linear");
        }
        for (key, _) in GEOMETRY {
            if let Some(value) = graphic.get(key) {
                gradient.insert(key, value.clone());
            }
        }
        move_keys(
            graphic,
            &mut gradient,
            &[
                ("draw:start-color", "draw:start-color"),
                ("draw:end-color", "draw:end-color"),
                ("draw:start-intensity", "draw:start-intensity"),
                ("draw:end-intensity", "draw:end-intensity"),
            ],
        );

        let stops = graphic
            .remove_children("svg:linearGradient")
            .or_else(|| graphic.remove_children("svg:radialGradient"))
            .unwrap_or_default();
        if let (Some(first), Some(last)) = (stops.first(), stops.last()) {
            if !gradient.contains("draw:start-color")
                && let Some(color) = first.get("svg:stop-color")
            {
                gradient.insert("draw:start-color", color.clone());
            }
            if !gradient.contains("draw:end-color")
                && let Some(color) = last.get("svg:stop-color")
            {
                gradient.insert("draw:end-color", color.clone());
            }
        }

        let start_opacity = graphic.remove("librevenge:start-opacity");
        let end_opacity = graphic.remove("librevenge:end-opacity");
        if start_opacity.is_some() || end_opacity.is_some() {
            let mut opacity = PropertyRecord::new();
            if let Some(style) = gradient.get("draw:style") {
                opacity.insert("draw:style", style.clone());
            }
            for (key, _) in GEOMETRY {
                if let Some(value) = gradient.get(key) {
                    opacity.insert(key, value.clone());
                }
            }
            if let Some(start) = start_opacity {
                opacity.insert("draw:start", start);
            }
            if let Some(end) = end_opacity {
                opacity.insert("draw:end", end);
            }
            let name = self.opacities.intern(&opacity, Zone::Style);
            graphic.insert("draw:opacity-name", name);
        }

        for (key, _) in GEOMETRY {
            graphic.remove(key);
        }
        let name = self.gradients.intern(&gradient, Zone::Style);
        graphic.insert("draw:fill-gradient-name", name);
    }

    /// Write every definition (they all live in `office:styles`)
    pub fn write(&self, handler: &mut dyn DocumentHandler) {
        self.gradients.write(handler, Zone::Style);
        self.opacities.write(handler, Zone::Style);
        self.hatches.write(handler, Zone::Style);
        self.markers.write(handler, Zone::Style);
        self.dashes.write(handler, Zone::Style);
        self.fill_images.write(handler, Zone::Style);
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
            && self.opacities.is_empty()
            && self.hatches.is_empty()
            && self.markers.is_empty()
            && self.dashes.is_empty()
            && self.fill_images.is_empty()
    }
}
