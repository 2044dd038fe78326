use crate::odf::DocumentKind;
use crate::odf::generator::{DocumentAssembler, GeneratorOptions, ScopeFlags};
use crate::odf::property::PropertyRecord;

/// Name of the data table a chart carries with it
const LOCAL_TABLE: &str = "local-table";

/// Front end producing OpenDocument Charts.
///
/// The chart's data lives in a local table written inside `chart:chart`;
/// its rows and cells take the same records as spreadsheet rows and cells.
#[derive(Debug)]
pub struct ChartGenerator {
    document: DocumentAssembler,
}

impl ChartGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            document: DocumentAssembler::new(DocumentKind::Chart, options),
        }
    }

    assembler_access!(document);

    /// Open the local data table, named `local-table` unless
    /// `librevenge:sheet-name` says otherwise
    pub fn open_table(&mut self, record: &PropertyRecord) {
        if !self.document.context.contains(ScopeFlags::CHART) {
            log::warn!("data table outside of a chart, ignored");
            return;
        }
        if record.contains("librevenge:sheet-name") {
            self.document.open_sheet(record);
        } else {
            self.document
                .open_sheet(&record.clone().with("librevenge:sheet-name", LOCAL_TABLE));
        }
    }

    pub fn close_table(&mut self) {
        self.document.close_sheet();
    }

    pub fn open_table_row(&mut self, record: &PropertyRecord) {
        self.document.open_sheet_row(record);
    }

    pub fn close_table_row(&mut self) {
        self.document.close_sheet_row();
    }

    /// Open a data cell; `librevenge:value-type` and `librevenge:value`
    /// give its value
    pub fn open_table_cell(&mut self, record: &PropertyRecord) {
        self.document.open_sheet_cell(record);
    }

    pub fn close_table_cell(&mut self) {
        self.document.close_sheet_cell();
    }

    forward_events! { document;
        fn start_document(&mut self, record: &PropertyRecord);
        fn end_document(&mut self);
        fn set_document_metadata(&mut self, record: &PropertyRecord);

        fn open_chart(&mut self, record: &PropertyRecord);
        fn close_chart(&mut self);
        fn open_chart_text_object(&mut self, record: &PropertyRecord);
        fn close_chart_text_object(&mut self);
        fn open_chart_plot_area(&mut self, record: &PropertyRecord);
        fn close_chart_plot_area(&mut self);
        fn insert_chart_axis(&mut self, record: &PropertyRecord);
        fn open_chart_serie(&mut self, record: &PropertyRecord);
        fn close_chart_serie(&mut self);

        fn open_paragraph(&mut self, record: &PropertyRecord);
        fn close_paragraph(&mut self);
        fn open_span(&mut self, record: &PropertyRecord);
        fn close_span(&mut self);
        fn insert_text(&mut self, text: &str);
        fn insert_tab(&mut self);
        fn insert_space(&mut self);
        fn insert_line_break(&mut self);
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}
