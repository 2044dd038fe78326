//! Drawing shapes and groups.
//!
//! Every shape takes the record of the last [`set_style`] call merged with
//! its own attributes. Geometry keys stay on the shape element; the rest is
//! interned as its graphic style.
//!
//! [`set_style`]: DocumentAssembler::set_style

use super::DocumentAssembler;
use super::context::Scope;
use super::geometry::{
    PathBounds, PathSegment, Rect, SampledBounds, parse_path, point_bounds, to_svg_path, to_svg_points, view_box,
};
use crate::odf::DocumentKind;
use crate::odf::elements::Attributes;
use crate::odf::property::{PropertyRecord, inches};

/// Keys describing where a shape is, not how it looks
const GEOMETRY_KEYS: [&str; 16] = [
    "svg:x",
    "svg:y",
    "svg:width",
    "svg:height",
    "svg:cx",
    "svg:cy",
    "svg:rx",
    "svg:ry",
    "svg:x1",
    "svg:y1",
    "svg:x2",
    "svg:y2",
    "draw:z-index",
    "draw:transform",
    "draw:start-shape",
    "draw:end-shape",
];

/// Child sequences carrying geometry
const GEOMETRY_CHILDREN: [&str; 2] = ["svg:points", "svg:d"];

fn push_rect(attributes: &mut Attributes, rect: &Rect) {
    attributes.insert("svg:x", inches(rect.x));
    attributes.insert("svg:y", inches(rect.y));
    attributes.insert("svg:width", inches(rect.width));
    attributes.insert("svg:height", inches(rect.height));
}

fn points(record: &PropertyRecord) -> Vec<(f64, f64)> {
    record
        .children("svg:points")
        .unwrap_or_default()
        .iter()
        .filter_map(|point| Some((point.get_inches("svg:x")?, point.get_inches("svg:y")?)))
        .collect()
}

impl DocumentAssembler {
    /// Graphic attributes applied to the following shapes
    pub fn set_style(&mut self, record: &PropertyRecord) {
        self.graphic_style = record.clone();
    }

    /// Style name and placement attributes shared by every shape
    fn shape_attributes(&mut self, record: &PropertyRecord) -> Attributes {
        let mut style = self.graphic_style.merged(record).style_attributes();
        for key in GEOMETRY_KEYS {
            style.remove(key);
        }
        for key in GEOMETRY_CHILDREN {
            style.remove_children(key);
        }
        style.remove("text:anchor-type");
        let style = self.styles.graphic_definitions.split(&style);
        let zone = self.zone();
        let name = self.styles.graphics.intern(&style, zone);

        let mut attributes = Attributes::new().with("draw:style-name", name);
        if self.kind() == DocumentKind::Text && !self.context.contains(super::ScopeFlags::GROUP) {
            let anchor = record
                .get_string("text:anchor-type")
                .unwrap_or_else(|| "paragraph".to_string());
            attributes.insert("text:anchor-type", anchor);
        }
        for key in ["draw:z-index", "draw:transform"] {
            if let Some(value) = record.get(key) {
                attributes.insert(key, value.to_odf_string());
            }
        }
        attributes
    }

    pub fn draw_rectangle(&mut self, record: &PropertyRecord) {
        let (Some(x), Some(y), Some(width), Some(height)) = (
            record.get_inches("svg:x"),
            record.get_inches("svg:y"),
            record.get_inches("svg:width"),
            record.get_inches("svg:height"),
        ) else {
            log::warn!("rectangle without position and size, skipped");
            return;
        };
        let mut attributes = self.shape_attributes(record);
        push_rect(&mut attributes, &Rect { x, y, width, height });
        if let Some(radius) = record.get_inches("svg:rx") {
            attributes.insert("draw:corner-radius", inches(radius));
        }
        self.context.tree().push_empty("draw:rect", attributes);
    }

    /// Ellipse given by its centre (`svg:cx`, `svg:cy`) and radii
    pub fn draw_ellipse(&mut self, record: &PropertyRecord) {
        let (Some(cx), Some(cy), Some(rx), Some(ry)) = (
            record.get_inches("svg:cx"),
            record.get_inches("svg:cy"),
            record.get_inches("svg:rx"),
            record.get_inches("svg:ry"),
        ) else {
            log::warn!("ellipse without centre and radii, skipped");
            return;
        };
        let mut attributes = self.shape_attributes(record);
        let rect = Rect {
            x: cx - rx,
            y: cy - ry,
            width: 2.0 * rx,
            height: 2.0 * ry,
        };
        match record.get_f64("librevenge:rotate").filter(|angle| *angle != 0.0) {
            Some(angle) => {
                attributes.insert("svg:width", inches(rect.width));
                attributes.insert("svg:height", inches(rect.height));
                attributes.insert(
                    "draw:transform",
                    format!(
                        "rotate({}) translate({}, {})",
                        crate::common::unit::format_real(angle.to_radians()),
                        inches(rect.x),
                        inches(rect.y)
                    ),
                );
            },
            None => push_rect(&mut attributes, &rect),
        }
        self.context.tree().push_empty("draw:ellipse", attributes);
    }

    fn draw_poly(&mut self, record: &PropertyRecord, element: &str, minimum: usize) {
        let points = points(record);
        if points.len() < minimum {
            log::warn!("{} with {} points, skipped", element, points.len());
            return;
        }
        let Some(frame) = point_bounds(&points) else {
            return;
        };
        let units = self.options().viewbox_units_per_inch;
        let mut attributes = self.shape_attributes(record);
        push_rect(&mut attributes, &frame);
        attributes.insert("svg:viewBox", view_box(&frame, units));
        attributes.insert("svg:points", to_svg_points(&points, &frame, units));
        self.context.tree().push_empty(element, attributes);
    }

    /// Open polyline through the `svg:points` children
    pub fn draw_polyline(&mut self, record: &PropertyRecord) {
        self.draw_poly(record, "draw:polyline", 2);
    }

    /// Closed polygon through the `svg:points` children
    pub fn draw_polygon(&mut self, record: &PropertyRecord) {
        self.draw_poly(record, "draw:polygon", 3);
    }

    /// Path given by the `svg:d` children, bounded with [`SampledBounds`]
    pub fn draw_path(&mut self, record: &PropertyRecord) {
        self.draw_path_with_bounds(record, &SampledBounds::default());
    }

    /// Like [`draw_path`](Self::draw_path) with a caller supplied bounding-box helper
    pub fn draw_path_with_bounds(&mut self, record: &PropertyRecord, bounds: &dyn PathBounds) {
        let Some(path) = self.path_of(record) else {
            return;
        };
        let Some(frame) = bounds.bounds(&path) else {
            log::warn!("path without points, skipped");
            return;
        };
        let units = self.options().viewbox_units_per_inch;
        let mut attributes = self.shape_attributes(record);
        push_rect(&mut attributes, &frame);
        attributes.insert("svg:viewBox", view_box(&frame, units));
        attributes.insert("svg:d", to_svg_path(&path, &frame, units));
        self.context.tree().push_empty("draw:path", attributes);
    }

    fn path_of(&self, record: &PropertyRecord) -> Option<Vec<PathSegment>> {
        let Some(records) = record.children("svg:d").filter(|d| !d.is_empty()) else {
            log::warn!("path without segments, skipped");
            return None;
        };
        let path = parse_path(records);
        if path.is_none() {
            log::warn!("malformed path segment, path skipped");
        }
        path
    }

    /// Connector between two points, or along the `svg:d` path
    pub fn draw_connector(&mut self, record: &PropertyRecord) {
        let endpoints = match (
            record.get_inches("svg:x1"),
            record.get_inches("svg:y1"),
            record.get_inches("svg:x2"),
            record.get_inches("svg:y2"),
        ) {
            (Some(x1), Some(y1), Some(x2), Some(y2)) => Some(((x1, y1), (x2, y2))),
            _ => {
                let path = record.children("svg:d").and_then(parse_path).unwrap_or_default();
                let ends: Vec<(f64, f64)> = path
                    .iter()
                    .filter_map(|segment| match *segment {
                        PathSegment::MoveTo { x, y }
                        | PathSegment::LineTo { x, y }
                        | PathSegment::CurveTo { x, y, .. }
                        | PathSegment::QuadTo { x, y, .. }
                        | PathSegment::ArcTo { x, y, .. } => Some((x, y)),
                        PathSegment::Close => None,
                    })
                    .collect();
                ends.first().copied().zip(ends.last().copied())
            },
        };
        let Some(((x1, y1), (x2, y2))) = endpoints else {
            log::warn!("connector without end points, skipped");
            return;
        };

        let mut attributes = self.shape_attributes(record);
        for (key, value) in [("svg:x1", x1), ("svg:y1", y1), ("svg:x2", x2), ("svg:y2", y2)] {
            attributes.insert(key, inches(value));
        }
        for key in ["draw:start-shape", "draw:end-shape", "draw:start-glue-point", "draw:end-glue-point", "draw:type"] {
            if let Some(value) = record.get(key) {
                attributes.insert(key, value.to_odf_string());
            }
        }
        self.context.tree().push_empty("draw:connector", attributes);
    }

    pub fn open_group(&mut self, record: &PropertyRecord) {
        let mut attributes = Attributes::new();
        if self.kind() == DocumentKind::Text && !self.context.contains(super::ScopeFlags::GROUP) {
            let anchor = record
                .get_string("text:anchor-type")
                .unwrap_or_else(|| "paragraph".to_string());
            attributes.insert("text:anchor-type", anchor);
        }
        self.context.open(Scope::Group, "draw:g", attributes);
    }

    pub fn close_group(&mut self) {
        self.context.close(Scope::Group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Unit;
    use crate::odf::PropertyValue;
    use crate::odf::elements::Node;
    use crate::odf::generator::GeneratorOptions;

    fn drawing() -> DocumentAssembler {
        let mut document = DocumentAssembler::new(DocumentKind::Drawing, GeneratorOptions::new());
        document.start_document(&PropertyRecord::new());
        document.start_page(&PropertyRecord::new());
        document
    }

    fn shapes(document: &DocumentAssembler) -> Vec<&Node> {
        document
            .body()
            .nodes()
            .iter()
            .filter(|node| node.name().is_some_and(|name| name.starts_with("draw:") && name != "draw:page"))
            .filter(|node| !matches!(node, Node::Close { .. }))
            .collect()
    }

    fn segment(action: &str, x: f64, y: f64) -> PropertyRecord {
        PropertyRecord::new()
            .with("librevenge:path-action", action)
            .with("svg:x", PropertyValue::Measure(x, Unit::Inch))
            .with("svg:y", PropertyValue::Measure(y, Unit::Inch))
    }

    #[test]
    fn test_shapes_share_style() {
        let mut document = drawing();
        document.set_style(&PropertyRecord::new().with("draw:fill", "solid").with("draw:fill-color", "#ff0000"));
        let rect = PropertyRecord::new()
            .with("svg:x", "1in")
            .with("svg:y", "1in")
            .with("svg:width", "2in")
            .with("svg:height", "1in");
        document.draw_rectangle(&rect);
        document.draw_ellipse(
            &PropertyRecord::new()
                .with("svg:cx", "2in")
                .with("svg:cy", "2in")
                .with("svg:rx", "1in")
                .with("svg:ry", "0.5in"),
        );
        document.end_page();
        document.end_document();

        let shapes = shapes(&document);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].attribute("draw:style-name"), shapes[1].attribute("draw:style-name"));
        assert_eq!(shapes[1].attribute("svg:x"), Some("1in"));
        assert_eq!(shapes[1].attribute("svg:height"), Some("1in"));
        assert_eq!(document.styles().graphics.len(), 1);
    }

    #[test]
    fn test_path_view_box() {
        let mut document = drawing();
        document.draw_path(&PropertyRecord::new().with_children(
            "svg:d",
            vec![segment("M", 1.0, 1.0), segment("L", 2.0, 1.5), PropertyRecord::new().with("librevenge:path-action", "Z")],
        ));
        document.end_page();
        document.end_document();

        let path = shapes(&document)[0];
        assert_eq!(path.attribute("svg:x"), Some("1in"));
        assert_eq!(path.attribute("svg:width"), Some("1in"));
        assert_eq!(path.attribute("svg:viewBox"), Some("0 0 2540 1270"));
        assert_eq!(path.attribute("svg:d"), Some("M0 0 L2540 1270 Z"));
    }

    #[test]
    fn test_malformed_shapes_are_skipped() {
        let mut document = drawing();
        document.draw_path(&PropertyRecord::new());
        document.draw_path(&PropertyRecord::new().with_children(
            "svg:d",
            vec![PropertyRecord::new().with("librevenge:path-action", "M")],
        ));
        document.draw_polygon(&PropertyRecord::new().with_children(
            "svg:points",
            vec![PropertyRecord::new().with("svg:x", 0.0).with("svg:y", 0.0)],
        ));
        document.draw_rectangle(&PropertyRecord::new().with("svg:x", "1in"));
        document.end_page();
        document.end_document();
        assert!(shapes(&document).is_empty());
        assert!(document.body().is_balanced());
    }

    #[test]
    fn test_polyline_and_group() {
        let mut document = drawing();
        document.open_group(&PropertyRecord::new());
        document.draw_polyline(&PropertyRecord::new().with_children(
            "svg:points",
            vec![
                PropertyRecord::new().with("svg:x", "0in").with("svg:y", "0in"),
                PropertyRecord::new().with("svg:x", "1in").with("svg:y", "0.5in"),
            ],
        ));
        document.close_group();
        document.end_page();
        document.end_document();

        let shapes = shapes(&document);
        assert!(shapes[0].is_open("draw:g"));
        assert_eq!(shapes[1].attribute("svg:points"), Some("0,0 2540,1270"));
        assert!(document.body().is_balanced());
    }

    #[test]
    fn test_gradient_fill_is_split() {
        let mut document = drawing();
        document.set_style(
            &PropertyRecord::new()
                .with("draw:fill", "gradient")
                .with("draw:start-color", "#000000")
                .with("draw:end-color", "#ffffff"),
        );
        document.draw_connector(
            &PropertyRecord::new()
                .with("svg:x1", "0in")
                .with("svg:y1", "0in")
                .with("svg:x2", "1in")
                .with("svg:y2", "1in"),
        );
        document.end_page();
        document.end_document();

        let connector = shapes(&document)[0];
        assert_eq!(connector.attribute("svg:x2"), Some("1in"));
        let style = document
            .styles()
            .graphics
            .get(connector.attribute("draw:style-name").unwrap())
            .unwrap();
        assert!(style.record.contains("draw:fill-gradient-name"));
        assert!(!style.record.contains("draw:start-color"));
    }

    #[test]
    fn test_shape_in_text_document_is_anchored() {
        let mut document = DocumentAssembler::new(DocumentKind::Text, GeneratorOptions::new());
        document.start_document(&PropertyRecord::new());
        document.open_paragraph(&PropertyRecord::new());
        document.draw_rectangle(
            &PropertyRecord::new()
                .with("svg:x", "0in")
                .with("svg:y", "0in")
                .with("svg:width", "1in")
                .with("svg:height", "1in"),
        );
        document.close_paragraph();
        document.end_document();
        let rect = document.body().nodes().iter().find(|n| n.is_open("draw:rect")).unwrap();
        assert_eq!(rect.attribute("text:anchor-type"), Some("paragraph"));
    }
}
