//! Tables, sheets, rows and cells.
//!
//! Rows and cells may arrive with gaps in their indices (a sheet omits empty
//! cells). Before a row or cell is emitted, the gap to the last filled
//! position is covered by one filler row or cell carrying a repeat count, so
//! the output grid stays dense without one node per skipped cell.

use super::DocumentAssembler;
use super::context::{Scope, TableState};
use crate::common::unit::format_real;
use crate::odf::coordinates::{CellRangeRef, CellRef};
use crate::odf::elements::Attributes;
use crate::odf::property::PropertyRecord;
use chrono::{NaiveDate, NaiveTime};
use std::str::FromStr;

/// Keys that are attributes of the cell element, not of its style
const CELL_ELEMENT_KEYS: [&str; 12] = [
    "table:number-columns-spanned",
    "table:number-rows-spanned",
    "table:number-columns-repeated",
    "table:formula",
    "table:content-validation-name",
    "office:value-type",
    "office:value",
    "office:date-value",
    "office:time-value",
    "office:boolean-value",
    "office:string-value",
    "office:currency",
];

const SPAN_KEYS: [&str; 2] = ["table:number-columns-spanned", "table:number-rows-spanned"];

/// Repeat count stored under `key`, at least 1
fn repeat_count(record: &PropertyRecord, key: &str) -> usize {
    record.get_int(key).map_or(1, |n| n.max(1) as usize)
}

fn index(record: &PropertyRecord, key: &str) -> Option<usize> {
    record.get_int(key).and_then(|i| usize::try_from(i).ok())
}

/// Convert a `librevenge:formula` token sequence to an OpenFormula string.
///
/// Tokens are typed by `librevenge:type`: `function`, `operator`, `number`,
/// `text`, `cell` and `cells`. Cells are given by zero-based
/// `librevenge:column`/`librevenge:row` (prefixed by `start-`/`end-` for
/// ranges) or by an `A1` style `librevenge:address`.
///
/// # Examples
///
/// ```
/// use odfgen::odf::PropertyRecord;
/// use odfgen::odf::generator::table::to_open_formula;
///
/// let tokens = vec![
///     PropertyRecord::new().with("librevenge:type", "librevenge-function").with("librevenge:function", "SUM"),
///     PropertyRecord::new().with("librevenge:type", "librevenge-operator").with("librevenge:operator", "("),
///     PropertyRecord::new()
///         .with("librevenge:type", "librevenge-cells")
///         .with("librevenge:start-column", 0)
///         .with("librevenge:start-row", 0)
///         .with("librevenge:end-column", 0)
///         .with("librevenge:end-row", 2),
///     PropertyRecord::new().with("librevenge:type", "librevenge-operator").with("librevenge:operator", ")"),
/// ];
/// assert_eq!(to_open_formula(&tokens).as_deref(), Some("of:=SUM([.A1:.A3])"));
/// ```
pub fn to_open_formula(tokens: &[PropertyRecord]) -> Option<String> {
    let mut formula = String::from("of:=");
    for token in tokens {
        let kind = token.get_str("librevenge:type")?;
        match kind.trim_start_matches("librevenge-") {
            "function" => formula.push_str(token.get_str("librevenge:function")?),
            "operator" => formula.push_str(token.get_str("librevenge:operator")?),
            "number" => formula.push_str(&format_real(token.get_f64("librevenge:number")?)),
            "text" => {
                formula.push('"');
                formula.push_str(&token.get_str("librevenge:text")?.replace('"', "\"\""));
                formula.push('"');
            },
            "cell" => formula.push_str(&formula_cell(token, "")?.to_open_formula()),
            "cells" => {
                let range = CellRangeRef::new(formula_cell(token, "start-")?, formula_cell(token, "end-")?);
                formula.push_str(&range.to_open_formula());
            },
            other => {
                log::debug!("unknown formula token {}", other);
                return None;
            },
        }
    }
    Some(formula)
}

fn formula_cell(token: &PropertyRecord, prefix: &str) -> Option<CellRef> {
    let key = |name: &str| format!("librevenge:{}{}", prefix, name);
    if let Some(address) = token.get_str(&key("address")) {
        return CellRef::from_str(address).ok();
    }
    let mut cell = CellRef::new(index(token, &key("column"))?, index(token, &key("row"))?).absolute(
        token.get_bool(&key("column-absolute")).unwrap_or(false),
        token.get_bool(&key("row-absolute")).unwrap_or(false),
    );
    if let Some(sheet) = token.get_str(&key("sheet-name")) {
        cell = cell.on_sheet(sheet);
    }
    Some(cell)
}

/// `office:date-value` from `librevenge:year`/`month`/`day` and optional time
fn date_value(record: &PropertyRecord) -> Option<String> {
    let date = NaiveDate::from_ymd_opt(
        record.get_int("librevenge:year")? as i32,
        record.get_int("librevenge:month").unwrap_or(1) as u32,
        record.get_int("librevenge:day").unwrap_or(1) as u32,
    )?;
    if record.contains("librevenge:hours") {
        let time = NaiveTime::from_hms_opt(
            record.get_int("librevenge:hours").unwrap_or(0) as u32,
            record.get_int("librevenge:minutes").unwrap_or(0) as u32,
            record.get_int("librevenge:seconds").unwrap_or(0) as u32,
        )?;
        Some(date.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string())
    } else {
        Some(date.format("%Y-%m-%d").to_string())
    }
}

/// `office:time-value` duration (`PT10H05M30S`)
fn time_value(record: &PropertyRecord) -> String {
    let hours = record.get_int("librevenge:hours").unwrap_or(0);
    let minutes = record.get_int("librevenge:minutes").unwrap_or(0);
    let seconds = record.get_f64("librevenge:seconds").unwrap_or(0.0);
    if seconds.fract() == 0.0 {
        format!("PT{:02}H{:02}M{:02}S", hours, minutes, seconds as i64)
    } else {
        format!("PT{:02}H{:02}M{}S", hours, minutes, format_real(seconds))
    }
}

/// Value attributes of a sheet cell
fn value_attributes(record: &PropertyRecord, attributes: &mut Attributes) {
    let Some(value_type) = record.get_str("librevenge:value-type") else {
        return;
    };
    let value = record.get("librevenge:value").map(|v| v.to_odf_string());
    let numeric = |kind: &str, attributes: &mut Attributes| {
        attributes.insert("office:value-type", kind);
        if let Some(value) = &value {
            attributes.insert("office:value", value.as_str());
        }
    };
    match value_type {
        "float" | "double" | "number" => numeric("float", attributes),
        "percent" | "percentage" => numeric("percentage", attributes),
        "currency" => {
            numeric("currency", attributes);
            if let Some(currency) = record.get_str("librevenge:currency") {
                attributes.insert("office:currency", currency);
            }
        },
        "bool" | "boolean" => {
            attributes.insert("office:value-type", "boolean");
            let value = record.get_bool("librevenge:value").unwrap_or(false);
            attributes.insert("office:boolean-value", if value { "true" } else { "false" });
        },
        "date" => {
            attributes.insert("office:value-type", "date");
            match date_value(record) {
                Some(date) => attributes.insert("office:date-value", date),
                None => log::debug!("date cell without a valid date"),
            }
        },
        "time" => {
            attributes.insert("office:value-type", "time");
            attributes.insert("office:time-value", time_value(record));
        },
        "text" | "string" => attributes.insert("office:value-type", "string"),
        other => log::debug!("unknown cell value type {}", other),
    }
}

impl DocumentAssembler {
    /// Emit `table:table-column` elements, merging runs of one style
    fn write_columns(&mut self, columns: Vec<(String, usize)>) -> usize {
        let mut runs: Vec<(String, usize)> = Vec::new();
        for (name, count) in columns {
            match runs.last_mut() {
                Some((last, total)) if *last == name => *total += count,
                _ => runs.push((name, count)),
            }
        }
        let tree = self.context.tree();
        let mut total = 0;
        for (name, count) in runs {
            let mut attributes = Attributes::new().with("table:style-name", name);
            if count > 1 {
                attributes.insert("table:number-columns-repeated", count.to_string());
            }
            tree.push_empty("table:table-column", attributes);
            total += count;
        }
        total
    }

    /// Open a text table; columns come from `librevenge:table-columns`
    pub fn open_table(&mut self, record: &PropertyRecord) {
        if self.context.is_open(Scope::Paragraph) {
            log::warn!("table opened inside a paragraph, closing the paragraph");
            self.context.close(Scope::Paragraph);
        }
        let zone = self.zone();
        let mut style = record.style_attributes();
        style.remove_children("librevenge:table-columns");
        style.remove("table:name");
        if self.at_body_level()
            && let Some(master) = self.pages.take_pending_master()
        {
            style.insert("style:master-page-name", master);
        }
        let style_name = self.styles.tables.intern(&style, zone);
        self.counters.tables += 1;
        let name = record
            .get_string("table:name")
            .unwrap_or_else(|| format!("Table{}", self.counters.tables));
        self.context.open(
            Scope::Table,
            "table:table",
            Attributes::new().with("table:name", name).with("table:style-name", style_name),
        );

        let columns: Vec<(String, usize)> = record
            .children("librevenge:table-columns")
            .unwrap_or_default()
            .iter()
            .map(|column| (self.styles.table_columns.intern(&column.style_attributes(), zone), 1))
            .collect();
        let count = self.write_columns(columns);
        self.context.push_table(TableState::new(count, false));
    }

    pub fn close_table(&mut self) {
        self.context.close(Scope::Table);
    }

    /// Open a spreadsheet sheet; columns come from `librevenge:columns`
    pub fn open_sheet(&mut self, record: &PropertyRecord) {
        if self.context.is_open(Scope::Table) {
            log::warn!("sheet opened inside a table, closing it");
            self.context.close(Scope::Table);
        }
        let zone = self.zone();
        let mut style = record.style_attributes();
        style.remove_children("librevenge:columns");
        style.remove("table:name");
        let style_name = self.styles.sheets.intern(&style, zone);
        self.counters.sheets += 1;
        let name = record
            .get_string("librevenge:sheet-name")
            .or_else(|| record.get_string("table:name"))
            .unwrap_or_else(|| format!("Sheet{}", self.counters.sheets));
        self.context.open(
            Scope::Table,
            "table:table",
            Attributes::new().with("table:name", name).with("table:style-name", style_name),
        );

        let columns: Vec<(String, usize)> = record
            .children("librevenge:columns")
            .unwrap_or_default()
            .iter()
            .map(|column| {
                let count = column
                    .get_int("table:number-columns-repeated")
                    .or_else(|| column.get_int("librevenge:repeated"))
                    .map_or(1, |n| n.max(1) as usize);
                let mut style = column.style_attributes();
                style.remove("table:number-columns-repeated");
                (self.styles.sheet_columns.intern(&style, zone), count)
            })
            .collect();
        let count = self.write_columns(columns);
        self.context.push_table(TableState::new(count, true));
    }

    pub fn close_sheet(&mut self) {
        self.context.close(Scope::Table);
    }

    /// Emit one filler row for the rows skipped before `row`
    fn fill_rows(&mut self, row: usize) {
        let Some(table) = self.context.table() else {
            return;
        };
        if row < table.next_row {
            log::warn!("row {} comes after row {}, emitted in place", row, table.next_row);
            return;
        }
        let gap = row - table.next_row;
        if gap == 0 {
            return;
        }
        let columns = table.columns;
        log::debug!("{} empty rows before row {}", gap, row);
        let tree = self.context.tree();
        tree.push_open(
            "table:table-row",
            Attributes::new().with("table:number-rows-repeated", gap.to_string()),
        );
        let mut cell = Attributes::new();
        if columns > 0 {
            cell.insert("table:number-columns-repeated", columns.to_string());
        }
        tree.push_empty("table:table-cell", cell);
        tree.push_close("table:table-row");
        if let Some(table) = self.context.table_mut() {
            table.next_row = row;
        }
    }

    /// Emit one filler cell for the columns skipped before `column`,
    /// returning the column the next cell actually lands in
    fn fill_cells(&mut self, column: Option<usize>) -> usize {
        let next = self.context.table().map_or(0, |table| table.next_column);
        let column = column.unwrap_or(next);
        if column < next {
            log::warn!("cell column {} before next free column {}, emitted in place", column, next);
            return next;
        }
        let gap = column - next;
        if gap > 0 {
            log::debug!("{} empty cells before column {}", gap, column);
            self.context.tree().push_empty(
                "table:table-cell",
                Attributes::new().with("table:number-columns-repeated", gap.to_string()),
            );
        }
        column
    }

    fn open_row(&mut self, record: &PropertyRecord, sheet: bool) {
        let Some(table) = self.context.table() else {
            log::warn!("row outside of a table, ignored");
            return;
        };
        if table.is_sheet != sheet {
            log::warn!("row kind does not match the open table");
        }
        if table.row_open {
            log::warn!("row opened inside a row, closing the previous one");
            self.context.close(Scope::Row);
        }

        let in_header_rows = self.context.table().is_some_and(|t| t.in_header_rows);
        let header = record.get_bool("librevenge:is-header-row").unwrap_or(false);
        if header && !in_header_rows {
            self.context
                .open(Scope::HeaderRows, "table:table-header-rows", Attributes::new());
            if let Some(table) = self.context.table_mut() {
                table.in_header_rows = true;
            }
        } else if !header && in_header_rows {
            self.context.close(Scope::HeaderRows);
        }

        if sheet && let Some(row) = index(record, "librevenge:row") {
            self.fill_rows(row);
        }

        let zone = self.zone();
        let mut style = record.style_attributes();
        style.remove("table:number-rows-repeated");
        let mut attributes = Attributes::new();
        if sheet {
            attributes.insert("table:style-name", self.styles.sheet_rows.intern(&style, zone));
        } else if !style.is_empty() {
            attributes.insert("table:style-name", self.styles.table_rows.intern(&style, zone));
        }
        let repeat = repeat_count(record, "table:number-rows-repeated");
        if repeat > 1 {
            attributes.insert("table:number-rows-repeated", repeat.to_string());
        }
        self.context.open(Scope::Row, "table:table-row", attributes);
        if let Some(table) = self.context.table_mut() {
            table.row_open = true;
            table.next_column = 0;
            table.next_row += repeat;
        }
    }

    pub fn open_table_row(&mut self, record: &PropertyRecord) {
        self.open_row(record, false);
    }

    pub fn close_table_row(&mut self) {
        self.context.close(Scope::Row);
    }

    pub fn open_sheet_row(&mut self, record: &PropertyRecord) {
        self.open_row(record, true);
    }

    pub fn close_sheet_row(&mut self) {
        self.context.close(Scope::Row);
    }

    /// `true` if a cell may be opened now; closes a dangling cell
    fn cell_allowed(&mut self) -> bool {
        match self.context.table() {
            None => {
                log::warn!("cell outside of a table, ignored");
                false
            },
            Some(table) if !table.row_open => {
                log::warn!("cell outside of a row, ignored");
                false
            },
            Some(table) => {
                if table.cell_open {
                    log::warn!("cell opened inside a cell, closing the previous one");
                    self.context.close(Scope::Cell);
                }
                true
            },
        }
    }

    fn open_cell(&mut self, column: usize, mut attributes: Attributes, record: &PropertyRecord) {
        for key in SPAN_KEYS {
            if let Some(value) = record.get(key) {
                attributes.insert(key, value.to_odf_string());
            }
        }
        let repeat = repeat_count(record, "table:number-columns-repeated");
        if repeat > 1 {
            attributes.insert("table:number-columns-repeated", repeat.to_string());
        }
        self.context.open(Scope::Cell, "table:table-cell", attributes);
        if let Some(table) = self.context.table_mut() {
            table.cell_open = true;
            table.next_column = column + repeat;
        }
    }

    /// Open a cell of a text table; its paragraphs default to "Table Contents"
    pub fn open_table_cell(&mut self, record: &PropertyRecord) {
        if !self.cell_allowed() {
            return;
        }
        let column = self.fill_cells(index(record, "librevenge:column"));
        let zone = self.zone();
        let style = record
            .style_attributes()
            .filtered(|k| !CELL_ELEMENT_KEYS.contains(&k));
        let name = self.styles.table_cells.intern(&style, zone);
        let attributes = Attributes::new()
            .with("table:style-name", name)
            .with("office:value-type", "string");
        self.open_cell(column, attributes, record);
    }

    pub fn close_table_cell(&mut self) {
        self.context.close(Scope::Cell);
    }

    /// Insert a cell covered by a spanning neighbour
    pub fn insert_covered_table_cell(&mut self, record: &PropertyRecord) {
        if !self.cell_allowed() {
            return;
        }
        let column = self.fill_cells(index(record, "librevenge:column"));
        let repeat = repeat_count(record, "table:number-columns-repeated");
        let mut attributes = Attributes::new();
        if repeat > 1 {
            attributes.insert("table:number-columns-repeated", repeat.to_string());
        }
        self.context
            .tree()
            .push_empty("table:covered-table-cell", attributes);
        if let Some(table) = self.context.table_mut() {
            table.next_column = column + repeat;
        }
    }

    /// Open a sheet cell with its value, formula and data style
    pub fn open_sheet_cell(&mut self, record: &PropertyRecord) {
        if !self.cell_allowed() {
            return;
        }
        let column = self.fill_cells(index(record, "librevenge:column"));
        let zone = self.zone();
        let mut style = record
            .style_attributes()
            .filtered(|k| !CELL_ELEMENT_KEYS.contains(&k));
        if let Some(numbering) = record.get_str("librevenge:numbering-name") {
            match self.sheet_numberings.get(numbering) {
                Some(data_style) => style.insert("style:data-style-name", data_style.as_str()),
                None => log::debug!("numbering style {} is not defined", numbering),
            }
        }

        let mut attributes = Attributes::new();
        if !style.is_empty() {
            attributes.insert("table:style-name", self.styles.sheet_cells.intern(&style, zone));
        }
        value_attributes(record, &mut attributes);
        if let Some(tokens) = record.children("librevenge:formula") {
            match to_open_formula(tokens) {
                Some(formula) => attributes.insert("table:formula", formula),
                None => log::warn!("malformed formula dropped"),
            }
        }
        self.open_cell(column, attributes, record);
    }

    pub fn close_sheet_cell(&mut self) {
        self.context.close(Scope::Cell);
    }

    /// Register a data style under its `librevenge:name`
    pub fn define_sheet_numbering_style(&mut self, record: &PropertyRecord) {
        let Some(name) = record.get_string("librevenge:name") else {
            log::warn!("numbering style without librevenge:name, ignored");
            return;
        };
        let mut numbering = record.clone();
        numbering.remove("librevenge:name");
        let zone = self.zone();
        let style = self.styles.numberings.intern(&numbering, zone);
        self.sheet_numberings.insert(name, style);
    }

    /// Open a table placed on a drawing or slide, in its own frame
    pub fn open_table_object(&mut self, record: &PropertyRecord) {
        let mut attributes = Attributes::new();
        for key in ["svg:x", "svg:y", "svg:width", "svg:height", "draw:z-index"] {
            if let Some(value) = record.get(key) {
                attributes.insert(key, value.to_odf_string());
            }
        }
        self.context.open(Scope::Frame, "draw:frame", attributes);
        let mut table = record.filtered(|k| !k.starts_with("svg:") && k != "draw:z-index");
        if let Some(columns) = record.children("librevenge:table-columns") {
            table.set_children("librevenge:table-columns", columns.to_vec());
        }
        self.open_table(&table);
    }

    pub fn close_table_object(&mut self) {
        self.context.close(Scope::Table);
        self.context.close(Scope::Frame);
    }
}
