//! Chart bodies: plot area, axes, series and text objects.
//!
//! Cell ranges may be given as strings (`Sheet1.A1:Sheet1.A5`) or as one
//! child record holding `librevenge:sheet-name`, `librevenge:start-row`,
//! `librevenge:start-column`, `librevenge:end-row` and
//! `librevenge:end-column` (zero based).

use super::DocumentAssembler;
use super::context::{Scope, ScopeFlags};
use crate::odf::coordinates::{CellRangeRef, CellRef};
use crate::odf::elements::Attributes;
use crate::odf::property::PropertyRecord;

/// Keys holding a cell range
const RANGE_KEYS: [&str; 4] = [
    "table:cell-range-address",
    "chart:values-cell-range-address",
    "chart:label-cell-address",
    "table:cell-address",
];

/// Keys written on the element rather than in its style
const ELEMENT_KEYS: [&str; 17] = [
    "svg:x",
    "svg:y",
    "svg:width",
    "svg:height",
    "chart:class",
    "chart:dimension",
    "chart:name",
    "chart:attached-axis",
    "chart:legend-position",
    "chart:legend-align",
    "chart:repeated",
    "chart:data-source-has-labels",
    "chart:style-name",
    "table:cell-range-address",
    "chart:values-cell-range-address",
    "chart:label-cell-address",
    "table:cell-address",
];

/// Child sequence describing sub-elements (grids, data points, walls)
const CHILDREN: &str = "librevenge:childs";

/// Render a range given either as a string or as a child record
pub fn range_address(record: &PropertyRecord, key: &str) -> Option<String> {
    if let Some(address) = record.get_str(key) {
        return Some(address.to_string());
    }
    let range = record.children(key)?.first()?;
    let cell = |row: &str, column: &str| -> Option<CellRef> {
        let row = usize::try_from(range.get_int(row)?).ok()?;
        let column = usize::try_from(range.get_int(column)?).ok()?;
        let cell = CellRef::new(column, row);
        Some(match range.get_str("librevenge:sheet-name") {
            Some(sheet) => cell.on_sheet(sheet),
            None => cell,
        })
    };
    let start = cell("librevenge:start-row", "librevenge:start-column")?;
    match cell("librevenge:end-row", "librevenge:end-column") {
        Some(end) => Some(CellRangeRef::new(start, end).to_string()),
        None => Some(start.to_string()),
    }
}

impl DocumentAssembler {
    /// Attributes of a chart element: placement keys, ranges and a `ch` style
    fn chart_attributes(&mut self, record: &PropertyRecord, keys: &[&str]) -> Attributes {
        let mut attributes = Attributes::new();
        for key in keys {
            if RANGE_KEYS.contains(key) {
                if let Some(address) = range_address(record, key) {
                    attributes.insert(key, address);
                }
            } else if let Some(value) = record.get(key) {
                attributes.insert(key, value.to_odf_string());
            }
        }
        let style = record
            .style_attributes()
            .filtered(|k| !ELEMENT_KEYS.contains(&k));
        if !style.is_empty() {
            let zone = self.zone();
            attributes.insert("chart:style-name", self.styles.charts.intern(&style, zone));
        }
        attributes
    }

    fn in_chart(&self, what: &str) -> bool {
        if self.context.contains(ScopeFlags::CHART) {
            true
        } else {
            log::warn!("{} outside of a chart, ignored", what);
            false
        }
    }

    /// Write the sub-elements listed under `librevenge:childs`
    fn chart_children(&mut self, record: &PropertyRecord) {
        for child in record.children(CHILDREN).unwrap_or_default() {
            let (element, keys): (&str, &[&str]) = match child.get_str("librevenge:type") {
                Some("grid") => ("chart:grid", &["chart:class"]),
                Some("categories") => ("chart:categories", &["table:cell-range-address"]),
                Some("data-point") => ("chart:data-point", &["chart:repeated"]),
                Some("domain") => ("chart:domain", &["table:cell-range-address"]),
                Some("floor") => ("chart:floor", &[]),
                Some("wall") => ("chart:wall", &[]),
                Some("mean-value") => ("chart:mean-value", &[]),
                Some("error-indicator") => ("chart:error-indicator", &[]),
                other => {
                    log::debug!("unknown chart child {:?}", other);
                    continue;
                },
            };
            let attributes = self.chart_attributes(child, keys);
            self.context.tree().push_empty(element, attributes);
        }
    }

    /// Open `chart:chart`; its kind comes from `chart:class`
    pub fn open_chart(&mut self, record: &PropertyRecord) {
        if self.context.contains(ScopeFlags::CHART) {
            log::warn!("chart inside a chart, ignored");
            return;
        }
        let mut attributes = self.chart_attributes(record, &["svg:width", "svg:height", "chart:class"]);
        if attributes.get("chart:class").is_none() {
            attributes.insert("chart:class", "chart:bar");
        }
        self.context.open(Scope::Chart, "chart:chart", attributes);
    }

    pub fn close_chart(&mut self) {
        self.context.close(Scope::Chart);
    }

    /// Open a title, subtitle, footer or legend (`librevenge:type`)
    pub fn open_chart_text_object(&mut self, record: &PropertyRecord) {
        if !self.in_chart("chart text object") {
            return;
        }
        let element = match record.get_str("librevenge:type") {
            Some("title") => "chart:title",
            Some("subtitle") => "chart:subtitle",
            Some("footer") => "chart:footer",
            Some("legend") => "chart:legend",
            other => {
                log::warn!("unknown chart text object {:?}, ignored", other);
                return;
            },
        };
        let attributes = self.chart_attributes(
            record,
            &["svg:x", "svg:y", "chart:legend-position", "chart:legend-align", "table:cell-range-address"],
        );
        self.context.open(Scope::ChartPart, element, attributes);
    }

    pub fn close_chart_text_object(&mut self) {
        self.context.close(Scope::ChartPart);
    }

    pub fn open_chart_plot_area(&mut self, record: &PropertyRecord) {
        if !self.in_chart("plot area") {
            return;
        }
        let attributes = self.chart_attributes(
            record,
            &[
                "svg:x",
                "svg:y",
                "svg:width",
                "svg:height",
                "table:cell-range-address",
                "chart:data-source-has-labels",
            ],
        );
        self.context.open(Scope::ChartPart, "chart:plot-area", attributes);
        self.chart_children(record);
    }

    pub fn close_chart_plot_area(&mut self) {
        self.context.close(Scope::ChartPart);
    }

    /// Insert a complete axis with its grids and categories
    pub fn insert_chart_axis(&mut self, record: &PropertyRecord) {
        if !self.in_chart("axis") {
            return;
        }
        if !record.contains("chart:dimension") {
            log::warn!("axis without chart:dimension, ignored");
            return;
        }
        let mut attributes = self.chart_attributes(record, &["chart:dimension", "chart:name"]);
        if attributes.get("chart:name").is_none()
            && let Some(dimension) = attributes.get("chart:dimension").map(str::to_string)
        {
            attributes.insert("chart:name", format!("primary-{}", dimension));
        }
        self.context.tree().push_open("chart:axis", attributes);
        self.chart_children(record);
        self.context.tree().push_close("chart:axis");
    }

    /// Open a series; data points come from `librevenge:childs`
    pub fn open_chart_serie(&mut self, record: &PropertyRecord) {
        if !self.in_chart("series") {
            return;
        }
        let attributes = self.chart_attributes(
            record,
            &[
                "chart:class",
                "chart:values-cell-range-address",
                "chart:label-cell-address",
                "chart:attached-axis",
            ],
        );
        self.context.open(Scope::ChartPart, "chart:series", attributes);
        self.chart_children(record);
    }

    pub fn close_chart_serie(&mut self) {
        self.context.close(Scope::ChartPart);
    }
}
