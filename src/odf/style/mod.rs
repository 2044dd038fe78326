//! Style interning.
//!
//! Every style family shares one mechanism: a [`StyleInterner`] turns a
//! [`PropertyRecord`] into a stable generated name, creating at most one
//! [`Style`] per canonical key and [`Zone`]. Families only differ in their
//! name prefix, in how they compute the key, and in how they write a style.
//!
//! # Zones
//!
//! | Zone | Written into |
//! |------|--------------|
//! | `Style` | `office:styles` (styles stream) |
//! | `StyleAutomatic` | `office:automatic-styles` of the styles stream |
//! | `ContentAutomatic` | `office:automatic-styles` of the content stream |
//! | `Font` | `office:font-face-decls` of both streams |
//!
//! A flat document writes both automatic zones into its single
//! `office:automatic-styles`.

use crate::odf::core::DocumentHandler;
use crate::odf::property::PropertyRecord;
use std::collections::HashMap;
use std::marker::PhantomData;

pub mod chart;
pub mod font;
pub mod graphic;
pub mod list;
pub mod numbering;
pub mod page;
pub mod paragraph;
pub mod properties;
pub mod section;
pub mod table;

pub use chart::ChartFamily;
pub use font::FontFamily;
pub use graphic::{
    DashFamily, FillImageFamily, GradientFamily, GraphicFamily, HatchFamily, MarkerFamily,
    OpacityFamily,
};
pub use list::{ListLevelDefinition, ListRegistry};
pub use numbering::NumberingFamily;
pub use page::{DrawingPageFamily, HeaderFooterSlot, PageLayoutFamily, PageSpan, PageSpanRegistry};
pub use paragraph::{ParagraphFamily, SpanFamily};
pub use section::SectionFamily;
pub use table::{
    SheetCellFamily, SheetColumnFamily, SheetFamily, SheetRowFamily, TableCellFamily,
    TableColumnFamily, TableFamily, TableRowFamily,
};

/// Output partition of a style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Named, reusable styles
    Style,
    /// Automatic styles used from the styles stream (headers, footers, masters)
    StyleAutomatic,
    /// Automatic styles used from the content stream
    ContentAutomatic,
    /// Font face declarations
    Font,
}

/// A created style: generated name, attributes and zone
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
    pub record: PropertyRecord,
    pub zone: Zone,
}

/// Per-family behaviour plugged into [`StyleInterner`]
pub trait StyleFamily {
    /// Prefix of generated names (`P`, `Span`, `gr_`, ...)
    const NAME_PREFIX: &'static str;

    /// Deduplication key of a record
    fn canonical_key(record: &PropertyRecord) -> String {
        record.canonical_key()
    }

    /// Name proposed for the `index`-th style of the family
    fn generate_name(_record: &PropertyRecord, index: usize) -> String {
        format!("{}{}", Self::NAME_PREFIX, index)
    }

    /// Serialize one style
    fn write(style: &Style, handler: &mut dyn DocumentHandler);
}

/// Deduplicating style store for one family
///
/// # Examples
///
/// ```
/// use odfgen::odf::PropertyRecord;
/// use odfgen::odf::style::{ParagraphFamily, StyleInterner, Zone};
///
/// let mut paragraphs = StyleInterner::<ParagraphFamily>::new();
/// let bold = PropertyRecord::new().with("fo:font-weight", "bold");
///
/// let first = paragraphs.intern(&bold, Zone::ContentAutomatic);
/// let again = paragraphs.intern(&bold, Zone::ContentAutomatic);
/// assert_eq!(first, "P1");
/// assert_eq!(first, again);
/// assert_eq!(paragraphs.len(), 1);
/// ```
pub struct StyleInterner<F: StyleFamily> {
    styles: Vec<Style>,
    by_key: HashMap<(Zone, String), usize>,
    by_name: HashMap<String, usize>,
    counter: usize,
    _family: PhantomData<fn() -> F>,
}

impl<F: StyleFamily> std::fmt::Debug for StyleInterner<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleInterner")
            .field("prefix", &F::NAME_PREFIX)
            .field("styles", &self.styles)
            .finish()
    }
}

impl<F: StyleFamily> Default for StyleInterner<F> {
    fn default() -> Self {
        Self {
            styles: Vec::new(),
            by_key: HashMap::new(),
            by_name: HashMap::new(),
            counter: 0,
            _family: PhantomData,
        }
    }
}

impl<F: StyleFamily> StyleInterner<F> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `record` to a style name, creating the style if needed
    pub fn intern(&mut self, record: &PropertyRecord, zone: Zone) -> String {
        let key = F::canonical_key(record);
        if let Some(&index) = self.by_key.get(&(zone, key.clone())) {
            return self.styles[index].name.clone();
        }

        self.counter += 1;
        let mut name = F::generate_name(record, self.counter);
        while self.by_name.contains_key(&name) {
            self.counter += 1;
            name = format!("{}_{}", F::generate_name(record, self.counter), self.counter);
        }
        self.insert(record, zone, key, name)
    }

    /// Like [`intern`](Self::intern), preferring `preferred` as the name
    pub fn intern_named(&mut self, record: &PropertyRecord, zone: Zone, preferred: &str) -> String {
        let key = F::canonical_key(record);
        if let Some(&index) = self.by_key.get(&(zone, key.clone())) {
            return self.styles[index].name.clone();
        }

        let mut name = preferred.to_string();
        let mut suffix = 1;
        while self.by_name.contains_key(&name) {
            suffix += 1;
            name = format!("{}_{}", preferred, suffix);
        }
        self.insert(record, zone, key, name)
    }

    fn insert(&mut self, record: &PropertyRecord, zone: Zone, key: String, name: String) -> String {
        let index = self.styles.len();
        self.styles.push(Style {
            name: name.clone(),
            record: record.clone(),
            zone,
        });
        self.by_key.insert((zone, key), index);
        self.by_name.insert(name.clone(), index);
        name
    }

    pub fn get(&self, name: &str) -> Option<&Style> {
        self.by_name.get(name).map(|&index| &self.styles[index])
    }

    /// Styles in creation order
    #[inline]
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn has_zone(&self, zone: Zone) -> bool {
        self.styles.iter().any(|style| style.zone == zone)
    }

    /// Write every style of `zone`, in creation order
    pub fn write(&self, handler: &mut dyn DocumentHandler, zone: Zone) {
        for style in self.styles.iter().filter(|style| style.zone == zone) {
            F::write(style, handler);
        }
    }
}

/// Encode a display name into a valid style name.
///
/// Characters outside `[A-Za-z0-9-.]` become `_xx_` with their hex code.
///
/// # Examples
///
/// ```
/// use odfgen::odf::style::encode_style_name;
///
/// assert_eq!(encode_style_name("Text body"), "Text_20_body");
/// assert_eq!(encode_style_name("Heading 1"), "Heading_20_1");
/// ```
pub fn encode_style_name(display_name: &str) -> String {
    let mut encoded = String::with_capacity(display_name.len());
    for c in display_name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
            encoded.push(c);
        } else {
            encoded.push_str(&format!("_{:x}_", c as u32));
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::XmlWriter;

    struct TestFamily;

    impl StyleFamily for TestFamily {
        const NAME_PREFIX: &'static str = "T";

        fn write(style: &Style, handler: &mut dyn DocumentHandler) {
            handler.characters(&style.name);
        }
    }

    #[test]
    fn test_zones_do_not_share_names() {
        let mut interner = StyleInterner::<TestFamily>::new();
        let record = PropertyRecord::new().with("a", 1);
        let content = interner.intern(&record, Zone::ContentAutomatic);
        let styles = interner.intern(&record, Zone::StyleAutomatic);
        assert_eq!(content, "T1");
        assert_eq!(styles, "T2");
        assert_eq!(interner.intern(&record, Zone::StyleAutomatic), "T2");
    }

    #[test]
    fn test_empty_record_gets_a_name() {
        let mut interner = StyleInterner::<TestFamily>::new();
        assert_eq!(interner.intern(&PropertyRecord::new(), Zone::ContentAutomatic), "T1");
    }

    #[test]
    fn test_intern_named_avoids_collisions() {
        let mut interner = StyleInterner::<TestFamily>::new();
        let first = interner.intern_named(&PropertyRecord::new().with("a", 1), Zone::Style, "Body");
        let second = interner.intern_named(&PropertyRecord::new().with("a", 2), Zone::Style, "Body");
        assert_eq!(first, "Body");
        assert_eq!(second, "Body_2");

        let generated = interner.intern(&PropertyRecord::new().with("a", 3), Zone::Style);
        assert_eq!(generated, "T1");
    }

    #[test]
    fn test_write_filters_zone_in_creation_order() {
        let mut interner = StyleInterner::<TestFamily>::new();
        interner.intern(&PropertyRecord::new().with("a", 1), Zone::ContentAutomatic);
        interner.intern(&PropertyRecord::new().with("a", 2), Zone::StyleAutomatic);
        interner.intern(&PropertyRecord::new().with("a", 3), Zone::ContentAutomatic);

        let mut writer = XmlWriter::new();
        interner.write(&mut writer, Zone::ContentAutomatic);
        assert_eq!(writer.as_str(), "T1T3");
    }

    #[test]
    fn test_encode_style_name() {
        assert_eq!(encode_style_name("Table Contents"), "Table_20_Contents");
        assert_eq!(encode_style_name("a_b"), "a_5f_b");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_same_name_iff_same_key(
                a in proptest::collection::vec(("[a-c]", 0i64..3), 0..4),
                b in proptest::collection::vec(("[a-c]", 0i64..3), 0..4),
            ) {
                let ra: PropertyRecord = a.into_iter().collect();
                let rb: PropertyRecord = b.into_iter().collect();
                let mut interner = StyleInterner::<TestFamily>::new();
                let na = interner.intern(&ra, Zone::ContentAutomatic);
                let nb = interner.intern(&rb, Zone::ContentAutomatic);
                prop_assert_eq!(na == nb, ra.canonical_key() == rb.canonical_key());
            }
        }
    }
}
