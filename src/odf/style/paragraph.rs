//! Paragraph and span (character) styles.

use super::properties::{is_structural, is_text_property, start_style, write_property_element, write_tab_stops};
use super::{Style, StyleFamily};
use crate::odf::core::DocumentHandler;

/// `style:family="paragraph"`, named `P{n}`
pub struct ParagraphFamily;

impl StyleFamily for ParagraphFamily {
    const NAME_PREFIX: &'static str = "P";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        let record = &style.record;
        start_style(handler, &style.name, "paragraph", record);

        let tabs = |h: &mut dyn DocumentHandler| write_tab_stops(h, record);
        let has_tabs = record.children("style:tab-stops").is_some_and(|s| !s.is_empty());
        write_property_element(
            handler,
            "style:paragraph-properties",
            record,
            |k| !is_structural(k) && !is_text_property(k),
            has_tabs.then_some(&tabs as &dyn Fn(&mut dyn DocumentHandler)),
        );
        write_property_element(handler, "style:text-properties", record, is_text_property, None);

        handler.end_element("style:style");
    }
}

/// `style:family="text"`, named `Span{n}`
pub struct SpanFamily;

impl StyleFamily for SpanFamily {
    const NAME_PREFIX: &'static str = "Span";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        start_style(handler, &style.name, "text", &style.record);
        write_property_element(handler, "style:text-properties", &style.record, |k| !is_structural(k), None);
        handler.end_element("style:style");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Unit;
    use crate::odf::core::XmlWriter;
    use crate::odf::property::{PropertyRecord, PropertyValue};
    use crate::odf::style::{StyleInterner, Zone};

    #[test]
    fn test_paragraph_splits_properties() {
        let record = PropertyRecord::new()
            .with("style:parent-style-name", "Standard")
            .with("fo:text-align", "center")
            .with("fo:font-weight", "bold")
            .with_children(
                "style:tab-stops",
                vec![PropertyRecord::new().with("style:position", PropertyValue::Measure(1.0, Unit::Inch))],
            );
        let mut paragraphs = StyleInterner::<ParagraphFamily>::new();
        paragraphs.intern(&record, Zone::ContentAutomatic);

        let mut writer = XmlWriter::new();
        paragraphs.write(&mut writer, Zone::ContentAutomatic);
        assert_eq!(
            writer.as_str(),
            concat!(
                r#"<style:style style:name="P1" style:family="paragraph" style:parent-style-name="Standard">"#,
                r#"<style:paragraph-properties fo:text-align="center">"#,
                r#"<style:tab-stops><style:tab-stop style:position="1in"/></style:tab-stops>"#,
                r#"</style:paragraph-properties>"#,
                r#"<style:text-properties fo:font-weight="bold"/>"#,
                r#"</style:style>"#
            )
        );
    }

    #[test]
    fn test_span_writes_text_properties() {
        let mut spans = StyleInterner::<SpanFamily>::new();
        spans.intern(&PropertyRecord::new().with("style:font-name", "Arial"), Zone::ContentAutomatic);
        let mut writer = XmlWriter::new();
        spans.write(&mut writer, Zone::ContentAutomatic);
        assert_eq!(
            writer.as_str(),
            r#"<style:style style:name="Span1" style:family="text"><style:text-properties style:font-name="Arial"/></style:style>"#
        );
    }
}
