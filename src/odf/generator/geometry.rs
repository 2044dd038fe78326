//! Path geometry for drawing shapes.
//!
//! Polylines, polygons and paths are positioned by their bounding box and
//! drawn in a local `svg:viewBox`. The box is computed by a [`PathBounds`]
//! implementation; [`SampledBounds`] samples curves and arcs, which is exact
//! for straight segments and close enough for layout everywhere else.

use crate::odf::property::PropertyRecord;
use std::f64::consts::PI;

/// Axis-aligned rectangle, in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
        for (x, y) in iter {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

/// One absolute path command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    CurveTo { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    ArcTo { rx: f64, ry: f64, rotation: f64, large_arc: bool, sweep: bool, x: f64, y: f64 },
    Close,
}

impl PathSegment {
    /// Read a segment from a `svg:d` child record.
    ///
    /// Returns `None` for an unknown `librevenge:path-action` or a missing
    /// coordinate.
    pub fn from_record(record: &PropertyRecord) -> Option<Self> {
        let action = record.get_str("librevenge:path-action")?;
        let at = |key: &str| record.get_inches(key);
        let segment = match action {
            "M" => Self::MoveTo { x: at("svg:x")?, y: at("svg:y")? },
            "L" => Self::LineTo { x: at("svg:x")?, y: at("svg:y")? },
            "C" => Self::CurveTo {
                x1: at("svg:x1")?,
                y1: at("svg:y1")?,
                x2: at("svg:x2")?,
                y2: at("svg:y2")?,
                x: at("svg:x")?,
                y: at("svg:y")?,
            },
            "Q" => Self::QuadTo {
                x1: at("svg:x1")?,
                y1: at("svg:y1")?,
                x: at("svg:x")?,
                y: at("svg:y")?,
            },
            "A" => Self::ArcTo {
                rx: at("svg:rx")?,
                ry: at("svg:ry")?,
                rotation: record.get_f64("librevenge:rotate").unwrap_or(0.0),
                large_arc: record.get_bool("librevenge:large-arc").unwrap_or(false),
                sweep: record.get_bool("librevenge:sweep").unwrap_or(false),
                x: at("svg:x")?,
                y: at("svg:y")?,
            },
            "Z" => Self::Close,
            _ => return None,
        };
        Some(segment)
    }

    fn end_point(&self) -> Option<(f64, f64)> {
        match *self {
            Self::MoveTo { x, y }
            | Self::LineTo { x, y }
            | Self::CurveTo { x, y, .. }
            | Self::QuadTo { x, y, .. }
            | Self::ArcTo { x, y, .. } => Some((x, y)),
            Self::Close => None,
        }
    }
}

/// Parse every segment of `records`; `None` if any is malformed
pub fn parse_path(records: &[PropertyRecord]) -> Option<Vec<PathSegment>> {
    records.iter().map(PathSegment::from_record).collect()
}

/// Bounding-box computation for paths
pub trait PathBounds {
    /// Bounding box of `path`, or `None` for a path without points
    fn bounds(&self, path: &[PathSegment]) -> Option<Rect>;
}

/// Bounds by sampling each curved segment
#[derive(Debug, Clone, Copy)]
pub struct SampledBounds {
    pub samples: usize,
}

impl Default for SampledBounds {
    fn default() -> Self {
        Self { samples: 32 }
    }
}

impl PathBounds for SampledBounds {
    fn bounds(&self, path: &[PathSegment]) -> Option<Rect> {
        let samples = self.samples.max(1);
        let mut points = Vec::with_capacity(path.len() * 2);
        let mut current = (0.0, 0.0);
        let mut start = (0.0, 0.0);

        for segment in path {
            match *segment {
                PathSegment::MoveTo { x, y } => start = (x, y),
                PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                    for i in 1..samples {
                        let t = i as f64 / samples as f64;
                        let u = 1.0 - t;
                        points.push((
                            u * u * u * current.0 + 3.0 * u * u * t * x1 + 3.0 * u * t * t * x2 + t * t * t * x,
                            u * u * u * current.1 + 3.0 * u * u * t * y1 + 3.0 * u * t * t * y2 + t * t * t * y,
                        ));
                    }
                },
                PathSegment::QuadTo { x1, y1, x, y } => {
                    for i in 1..samples {
                        let t = i as f64 / samples as f64;
                        let u = 1.0 - t;
                        points.push((
                            u * u * current.0 + 2.0 * u * t * x1 + t * t * x,
                            u * u * current.1 + 2.0 * u * t * y1 + t * t * y,
                        ));
                    }
                },
                PathSegment::ArcTo { rx, ry, rotation, large_arc, sweep, x, y } => {
                    arc_points(current, (x, y), rx, ry, rotation, large_arc, sweep, samples, &mut points);
                },
                PathSegment::LineTo { .. } => {},
                PathSegment::Close => {
                    current = start;
                    continue;
                },
            }
            if let Some(end) = segment.end_point() {
                if points.is_empty() && !matches!(segment, PathSegment::MoveTo { .. }) {
                    points.push(current);
                }
                points.push(end);
                current = end;
            }
        }
        Rect::from_points(points)
    }
}

/// Sample an elliptical arc given in endpoint form
#[allow(clippy::too_many_arguments)]
fn arc_points(
    from: (f64, f64),
    to: (f64, f64),
    rx: f64,
    ry: f64,
    rotation: f64,
    large_arc: bool,
    sweep: bool,
    samples: usize,
    points: &mut Vec<(f64, f64)>,
) {
    let (mut rx, mut ry) = (rx.abs(), ry.abs());
    if rx == 0.0 || ry == 0.0 || from == to {
        return;
    }
    let phi = rotation.to_radians();
    let (sin, cos) = phi.sin_cos();
    let dx = (from.0 - to.0) / 2.0;
    let dy = (from.1 - to.1) / 2.0;
    let x1 = cos * dx + sin * dy;
    let y1 = -sin * dx + cos * dy;

    let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
    if lambda > 1.0 {
        rx *= lambda.sqrt();
        ry *= lambda.sqrt();
    }
    let numerator = rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1;
    let denominator = rx * rx * y1 * y1 + ry * ry * x1 * x1;
    let mut coefficient = (numerator / denominator).max(0.0).sqrt();
    if large_arc == sweep {
        coefficient = -coefficient;
    }
    let cx1 = coefficient * rx * y1 / ry;
    let cy1 = -coefficient * ry * x1 / rx;
    let cx = cos * cx1 - sin * cy1 + (from.0 + to.0) / 2.0;
    let cy = sin * cx1 + cos * cy1 + (from.1 + to.1) / 2.0;

    let angle = |ux: f64, uy: f64, vx: f64, vy: f64| (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
    let (ux, uy) = ((x1 - cx1) / rx, (y1 - cy1) / ry);
    let (vx, vy) = ((-x1 - cx1) / rx, (-y1 - cy1) / ry);
    let theta = angle(1.0, 0.0, ux, uy);
    let mut delta = angle(ux, uy, vx, vy);
    if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    } else if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    }

    for i in 1..samples {
        let t = theta + delta * i as f64 / samples as f64;
        let (st, ct) = t.sin_cos();
        points.push((cx + rx * cos * ct - ry * sin * st, cy + rx * sin * ct + ry * cos * st));
    }
}

/// Render `path` as `svg:d`, relative to `frame` and scaled to viewBox units
pub fn to_svg_path(path: &[PathSegment], frame: &Rect, units_per_inch: f64) -> String {
    let mut d = String::new();
    let mut buffer = itoa::Buffer::new();
    let mut coordinate = |d: &mut String, value: f64, origin: f64| {
        let scaled = ((value - origin) * units_per_inch).round() as i64;
        d.push_str(buffer.format(scaled));
    };
    let mut point = |d: &mut String, x: f64, y: f64| {
        coordinate(d, x, frame.x);
        d.push(' ');
        coordinate(d, y, frame.y);
    };

    for segment in path {
        if !d.is_empty() {
            d.push(' ');
        }
        match *segment {
            PathSegment::MoveTo { x, y } => {
                d.push('M');
                point(&mut d, x, y);
            },
            PathSegment::LineTo { x, y } => {
                d.push('L');
                point(&mut d, x, y);
            },
            PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                d.push('C');
                point(&mut d, x1, y1);
                d.push(' ');
                point(&mut d, x2, y2);
                d.push(' ');
                point(&mut d, x, y);
            },
            PathSegment::QuadTo { x1, y1, x, y } => {
                d.push('Q');
                point(&mut d, x1, y1);
                d.push(' ');
                point(&mut d, x, y);
            },
            PathSegment::ArcTo { rx, ry, rotation, large_arc, sweep, x, y } => {
                d.push('A');
                point(&mut d, rx + frame.x, ry + frame.y);
                d.push(' ');
                d.push_str(&crate::common::unit::format_real(rotation));
                d.push_str(if large_arc { " 1" } else { " 0" });
                d.push_str(if sweep { " 1 " } else { " 0 " });
                point(&mut d, x, y);
            },
            PathSegment::Close => d.push('Z'),
        }
    }
    d
}

/// `svg:points` of a polyline, relative to `frame`
pub fn to_svg_points(points: &[(f64, f64)], frame: &Rect, units_per_inch: f64) -> String {
    points
        .iter()
        .map(|(x, y)| {
            format!(
                "{},{}",
                ((x - frame.x) * units_per_inch).round() as i64,
                ((y - frame.y) * units_per_inch).round() as i64
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `svg:viewBox` of `frame`
pub fn view_box(frame: &Rect, units_per_inch: f64) -> String {
    format!(
        "0 0 {} {}",
        (frame.width * units_per_inch).round().max(1.0) as i64,
        (frame.height * units_per_inch).round().max(1.0) as i64
    )
}

/// Bounds of a point list
pub fn point_bounds(points: &[(f64, f64)]) -> Option<Rect> {
    Rect::from_points(points.iter().copied())
}
