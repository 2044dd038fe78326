//! Chart styles (`ch{n}`).
//!
//! `chart:` keys go to `style:chart-properties`, character keys to
//! `style:text-properties` and everything else (fills, strokes) to
//! `style:graphic-properties`.

use super::properties::{is_structural, is_text_property, start_style, write_property_element};
use super::{Style, StyleFamily};
use crate::odf::core::DocumentHandler;

pub struct ChartFamily;

#[inline]
fn is_chart_property(key: &str) -> bool {
    key.starts_with("chart:")
}

impl StyleFamily for ChartFamily {
    const NAME_PREFIX: &'static str = "ch";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        let record = &style.record;
        start_style(handler, &style.name, "chart", record);
        write_property_element(handler, "style:chart-properties", record, is_chart_property, None);
        write_property_element(
            handler,
            "style:graphic-properties",
            record,
            |k| !is_structural(k) && !is_text_property(k) && !is_chart_property(k),
            None,
        );
        write_property_element(handler, "style:text-properties", record, is_text_property, None);
        handler.end_element("style:style");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::XmlWriter;
    use crate::odf::property::PropertyRecord;
    use crate::odf::style::{StyleInterner, Zone};

    #[test]
    fn test_chart_property_groups() {
        let record = PropertyRecord::new()
            .with("chart:symbol-type", "none")
            .with("draw:fill-color", "#ff0000")
            .with("fo:font-size", "8pt");
        let mut charts = StyleInterner::<ChartFamily>::new();
        assert_eq!(charts.intern(&record, Zone::ContentAutomatic), "ch1");
        let mut writer = XmlWriter::new();
        charts.write(&mut writer, Zone::ContentAutomatic);
        assert_eq!(
            writer.as_str(),
            concat!(
                r#"<style:style style:name="ch1" style:family="chart">"#,
                r#"<style:chart-properties chart:symbol-type="none"/>"#,
                r##"<style:graphic-properties draw:fill-color="#ff0000"/>"##,
                r#"<style:text-properties fo:font-size="8pt"/>"#,
                r#"</style:style>"#
            )
        );
    }
}
