//! Data styles (`number:*-style`), named `N{n}`.
//!
//! The kind of data style comes from `librevenge:value-type`. Date and time
//! styles are described by a `librevenge:format` child sequence, one record
//! per displayed component.

use super::properties::attributes_where;
use super::{Style, StyleFamily};
use crate::odf::core::DocumentHandler;
use crate::odf::elements::Attributes;
use crate::odf::property::{PropertyRecord, is_internal_key};

pub struct NumberingFamily;

const NUMBER_KEYS: [&str; 3] = ["number:decimal-places", "number:min-integer-digits", "number:grouping"];
const SCIENTIFIC_KEYS: [&str; 3] = ["number:decimal-places", "number:min-integer-digits", "number:min-exponent-digits"];
const FRACTION_KEYS: [&str; 3] = [
    "number:min-integer-digits",
    "number:min-numerator-digits",
    "number:min-denominator-digits",
];

/// Root element of the data style for a value type
pub fn style_element(value_type: &str) -> &'static str {
    match value_type {
        "percentage" | "percent" => "number:percentage-style",
        "currency" => "number:currency-style",
        "boolean" | "bool" => "number:boolean-style",
        "text" | "string" => "number:text-style",
        "date" => "number:date-style",
        "time" => "number:time-style",
        _ => "number:number-style",
    }
}

fn pick(record: &PropertyRecord, keys: &[&str]) -> Attributes {
    attributes_where(record, |k| keys.contains(&k))
}

fn empty_element(handler: &mut dyn DocumentHandler, name: &str, attributes: &Attributes) {
    handler.start_element(name, attributes);
    handler.end_element(name);
}

fn text_element(handler: &mut dyn DocumentHandler, name: &str, text: &str) {
    handler.start_element(name, &Attributes::new());
    handler.characters(text);
    handler.end_element(name);
}

fn write_format(handler: &mut dyn DocumentHandler, format: &[PropertyRecord]) {
    for component in format {
        let kind = component.get_str("librevenge:value-type").unwrap_or("text");
        if kind == "text" {
            text_element(handler, "number:text", component.get_str("librevenge:text").unwrap_or(""));
            continue;
        }
        let element = match kind {
            "year" => "number:year",
            "month" => "number:month",
            "day" => "number:day",
            "day-of-week" => "number:day-of-week",
            "week-of-year" => "number:week-of-year",
            "quarter" => "number:quarter",
            "era" => "number:era",
            "hours" => "number:hours",
            "minutes" => "number:minutes",
            "seconds" => "number:seconds",
            "am-pm" => "number:am-pm",
            other => {
                log::debug!("skipping unknown date/time component {}", other);
                continue;
            },
        };
        empty_element(handler, element, &attributes_where(component, |k| !is_internal_key(k)));
    }
}

impl StyleFamily for NumberingFamily {
    const NAME_PREFIX: &'static str = "N";

    fn write(style: &Style, handler: &mut dyn DocumentHandler) {
        let record = &style.record;
        let value_type = record.get_str("librevenge:value-type").unwrap_or("number");
        let root = style_element(value_type);

        let mut attributes = Attributes::new().with("style:name", style.name.as_str());
        for key in ["number:language", "number:country", "number:automatic-order"] {
            if let Some(value) = record.get_string(key) {
                attributes.insert(key, value);
            }
        }
        handler.start_element(root, &attributes);

        match value_type {
            "percentage" | "percent" => {
                empty_element(handler, "number:number", &pick(record, &NUMBER_KEYS));
                text_element(handler, "number:text", "%");
            },
            "currency" => {
                let symbol = record
                    .get_string("librevenge:currency")
                    .or_else(|| record.get_string("number:currency-symbol"))
                    .unwrap_or_else(|| "$".to_string());
                text_element(handler, "number:currency-symbol", &symbol);
                empty_element(handler, "number:number", &pick(record, &NUMBER_KEYS));
            },
            "scientific" => empty_element(handler, "number:scientific-number", &pick(record, &SCIENTIFIC_KEYS)),
            "fraction" => empty_element(handler, "number:fraction", &pick(record, &FRACTION_KEYS)),
            "boolean" | "bool" => empty_element(handler, "number:boolean", &Attributes::new()),
            "text" | "string" => empty_element(handler, "number:text-content", &Attributes::new()),
            "date" | "time" => write_format(handler, record.children("librevenge:format").unwrap_or_default()),
            _ => empty_element(handler, "number:number", &pick(record, &NUMBER_KEYS)),
        }

        handler.end_element(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::XmlWriter;
    use crate::odf::style::{StyleInterner, Zone};

    fn render(record: PropertyRecord) -> String {
        let mut styles = StyleInterner::<NumberingFamily>::new();
        styles.intern(&record, Zone::ContentAutomatic);
        let mut writer = XmlWriter::new();
        styles.write(&mut writer, Zone::ContentAutomatic);
        writer.into_string()
    }

    #[test]
    fn test_percentage_style() {
        let xml = render(
            PropertyRecord::new()
                .with("librevenge:value-type", "percentage")
                .with("number:decimal-places", 2),
        );
        assert_eq!(
            xml,
            r#"<number:percentage-style style:name="N1"><number:number number:decimal-places="2"/><number:text>%</number:text></number:percentage-style>"#
        );
    }

    #[test]
    fn test_date_style_components() {
        let format = vec![
            PropertyRecord::new().with("librevenge:value-type", "day").with("number:style", "long"),
            PropertyRecord::new().with("librevenge:value-type", "text").with("librevenge:text", "/"),
            PropertyRecord::new().with("librevenge:value-type", "month"),
            PropertyRecord::new().with("librevenge:value-type", "bogus"),
        ];
        let xml = render(
            PropertyRecord::new()
                .with("librevenge:value-type", "date")
                .with_children("librevenge:format", format),
        );
        assert_eq!(
            xml,
            concat!(
                r#"<number:date-style style:name="N1"><number:day number:style="long"/>"#,
                r#"<number:text>/</number:text><number:month/></number:date-style>"#
            )
        );
    }

    #[test]
    fn test_currency_and_boolean() {
        let xml = render(
            PropertyRecord::new()
                .with("librevenge:value-type", "currency")
                .with("librevenge:currency", "€"),
        );
        assert!(xml.starts_with(r#"<number:currency-style style:name="N1"><number:currency-symbol>€</number:currency-symbol>"#));
        let xml = render(PropertyRecord::new().with("librevenge:value-type", "boolean"));
        assert!(xml.contains("<number:boolean/>"));
    }
}
