//! Unit conversion and number formatting utilities.
//!
//! Measurements reach the generator in the units the producer chose (inches,
//! points, twips, fractions for percentages) and leave it as ODF length strings.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const POINTS_PER_INCH: f64 = 72.0;
pub const TWIPS_PER_INCH: f64 = 1440.0;
pub const CM_PER_INCH: f64 = 2.54;

#[inline]
pub fn twip_to_inch(twips: f64) -> f64 {
    twips / TWIPS_PER_INCH
}

#[inline]
pub fn point_to_inch(points: f64) -> f64 {
    points / POINTS_PER_INCH
}

#[inline]
pub fn inch_to_point(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

/// Unit attached to a measurement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Inch
    Inch,
    /// Point (1/72 inch)
    Point,
    /// Twip (1/1440 inch), written out as inches
    Twip,
    /// Fraction in `[0, 1]`, written out as a percentage
    Percent,
    /// Unitless number
    Generic,
}

impl Unit {
    /// Suffix used when writing a value of this unit
    #[inline]
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Inch | Self::Twip => "in",
            Self::Point => "pt",
            Self::Percent => "%",
            Self::Generic => "",
        }
    }

    /// Convert a value of this unit to inches, if it is a length
    pub fn to_inches(&self, value: f64) -> Option<f64> {
        match self {
            Self::Inch => Some(value),
            Self::Point => Some(point_to_inch(value)),
            Self::Twip => Some(twip_to_inch(value)),
            Self::Percent | Self::Generic => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Format `value` with at most `precision` decimals, trimming trailing zeros.
///
/// # Examples
///
/// ```
/// use odfgen::common::unit::format_decimal;
/// assert_eq!(format_decimal(1.5, 4), "1.5");
/// assert_eq!(format_decimal(2.0, 4), "2");
/// assert_eq!(format_decimal(0.123456, 4), "0.1235");
/// assert_eq!(format_decimal(-0.00001, 4), "0");
/// ```
pub fn format_decimal(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.*}", precision, value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Format a real number with the shortest representation that round-trips.
///
/// Integral values drop the fractional part, so `3.0` becomes `"3"`.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value as i64).to_string();
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format_finite(value).to_string()
}

/// Format a measurement as an ODF length/percentage string.
///
/// # Examples
///
/// ```
/// use odfgen::common::unit::{format_measure, Unit};
/// assert_eq!(format_measure(1.0, Unit::Inch), "1in");
/// assert_eq!(format_measure(12.0, Unit::Point), "12pt");
/// assert_eq!(format_measure(720.0, Unit::Twip), "0.5in");
/// assert_eq!(format_measure(0.25, Unit::Percent), "25%");
/// ```
pub fn format_measure(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Inch | Unit::Point => {
            let mut s = format_decimal(value, 4);
            s.push_str(unit.suffix());
            s
        },
        Unit::Twip => {
            let mut s = format_decimal(twip_to_inch(value), 4);
            s.push_str("in");
            s
        },
        Unit::Percent => {
            let mut s = format_decimal(value * 100.0, 2);
            s.push('%');
            s
        },
        Unit::Generic => format_decimal(value, 4),
    }
}

/// Parse an ODF length string (`"1.5in"`, `"12pt"`, `"2.54cm"`, `"10mm"`) into inches.
pub fn parse_length_inches(s: &str) -> Option<f64> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(split);
    let value: f64 = number.trim().parse().ok()?;
    match suffix {
        "in" | "inch" => Some(value),
        "pt" => Some(point_to_inch(value)),
        "cm" => Some(value / CM_PER_INCH),
        "mm" => Some(value / (CM_PER_INCH * 10.0)),
        "pc" => Some(value / 6.0),
        "twip" => Some(twip_to_inch(value)),
        "" => Some(value),
        _ => None,
    }
}
