//! Table and sheet styles.
//!
//! Text-document tables and spreadsheet sheets use the same ODF style
//! families but distinct naming schemes (`Table1`/`Row1` versus `ta1`/`ro1`),
//! so each gets its own interner.

use super::properties::{
    is_cell_property, is_structural, is_text_property, start_style, write_property_element,
};
use super::{Style, StyleFamily};
use crate::odf::core::DocumentHandler;

fn write_single(style: &Style, handler: &mut dyn DocumentHandler, family: &str, element: &str) {
    start_style(handler, &style.name, family, &style.record);
    let attributes = super::properties::attributes_where(&style.record, |k| !is_structural(k));
    handler.start_element(element, &attributes);
    handler.end_element(element);
    handler.end_element("style:style");
}

fn write_cell(style: &Style, handler: &mut dyn DocumentHandler) {
    let record = &style.record;
    start_style(handler, &style.name, "table-cell", record);
    write_property_element(
        handler,
        "style:table-cell-properties",
        record,
        |k| is_cell_property(k) && !is_structural(k),
        None,
    );
    write_property_element(
        handler,
        "style:paragraph-properties",
        record,
        |k| !is_structural(k) && !is_cell_property(k) && !is_text_property(k),
        None,
    );
    write_property_element(handler, "style:text-properties", record, is_text_property, None);
    handler.end_element("style:style");
}

macro_rules! single_element_family {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $family:literal, $element:literal) => {
        $(#[$meta])*
        pub struct $name;

        impl StyleFamily for $name {
            const NAME_PREFIX: &'static str = $prefix;

            fn write(style: &Style, handler: &mut dyn DocumentHandler) {
                write_single(style, handler, $family, $element);
            }
        }
    };
}

single_element_family!(
    /// Text table styles, `Table{n}`
    TableFamily, "Table", "table", "style:table-properties"
);
single_element_family!(
    /// Text table column styles, `Column{n}`
    TableColumnFamily, "Column", "table-column", "style:table-column-properties"
);
single_element_family!(
    /// Text table row styles, `Row{n}`
    TableRowFamily, "Row", "table-row", "style:table-row-properties"
);
single_element_family!(
    /// Sheet styles, `ta{n}`
    SheetFamily, "ta", "table", "style:table-properties"
);
single_element_family!(
    /// Sheet column styles, `co{n}`
    SheetColumnFamily, "co", "table-column", "style:table-column-properties"
);
single_element_family!(
    /// Sheet row styles, `ro{n}`
    SheetRowFamily, "ro", "table-row", "style:table-row-properties"
);

/// Text table cell styles, `Cell{n}`
pub struct TableCellFamily;

impl StyleFamily for TableCellFamily {
    const NAME_PREFIX: &'static str = "Cell";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        write_cell(style, handler);
    }
}

/// Sheet cell styles, `ce{n}`
pub struct SheetCellFamily;

impl StyleFamily for SheetCellFamily {
    const NAME_PREFIX: &'static str = "ce";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        write_cell(style, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::XmlWriter;
    use crate::odf::property::PropertyRecord;
    use crate::odf::style::{StyleInterner, Zone};

    #[test]
    fn test_cell_properties_split() {
        let record = PropertyRecord::new()
            .with("fo:border", "0.5pt solid #000000")
            .with("fo:text-align", "end")
            .with("fo:font-style", "italic")
            .with("style:data-style-name", "N1");
        let mut cells = StyleInterner::<SheetCellFamily>::new();
        assert_eq!(cells.intern(&record, Zone::ContentAutomatic), "ce1");

        let mut writer = XmlWriter::new();
        cells.write(&mut writer, Zone::ContentAutomatic);
        assert_eq!(
            writer.as_str(),
            concat!(
                r#"<style:style style:name="ce1" style:family="table-cell" style:data-style-name="N1">"#,
                r#"<style:table-cell-properties fo:border="0.5pt solid #000000"/>"#,
                r#"<style:paragraph-properties fo:text-align="end"/>"#,
                r#"<style:text-properties fo:font-style="italic"/>"#,
                r#"</style:style>"#
            )
        );
    }

    #[test]
    fn test_table_and_sheet_prefixes() {
        let record = PropertyRecord::new().with("style:width", "6in");
        let mut tables = StyleInterner::<TableFamily>::new();
        let mut sheets = StyleInterner::<SheetFamily>::new();
        assert_eq!(tables.intern(&record, Zone::ContentAutomatic), "Table1");
        assert_eq!(sheets.intern(&record, Zone::ContentAutomatic), "ta1");

        let mut writer = XmlWriter::new();
        tables.write(&mut writer, Zone::ContentAutomatic);
        assert_eq!(
            writer.as_str(),
            r#"<style:style style:name="Table1" style:family="table"><style:table-properties style:width="6in"/></style:style>"#
        );
    }
}
