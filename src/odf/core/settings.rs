//! Document settings (`office:settings`).

use super::handler::DocumentHandler;
use crate::odf::elements::Attributes;

/// View area written into `ooo:view-settings`, in 1/100 mm
const VIEW_AREA: [(&str, &str); 4] = [
    ("ViewAreaTop", "0"),
    ("ViewAreaLeft", "0"),
    ("ViewAreaWidth", "10000"),
    ("ViewAreaHeight", "10000"),
];

/// Write the children of `office:settings`
pub fn write_settings(handler: &mut dyn DocumentHandler) {
    handler.start_element(
        "config:config-item-set",
        &Attributes::new().with("config:name", "ooo:view-settings"),
    );
    for (name, value) in VIEW_AREA {
        handler.start_element(
            "config:config-item",
            &Attributes::new()
                .with("config:name", name)
                .with("config:type", "long"),
        );
        handler.characters(value);
        handler.end_element("config:config-item");
    }
    handler.end_element("config:config-item-set");
}
