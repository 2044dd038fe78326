//! List styles and numbering continuation.
//!
//! The event stream identifies lists by a source id (`librevenge:list-id`)
//! and may split one logical list into several fragments separated by other
//! content. The registry remembers, per id, the level definitions seen so far
//! (the first definition of a level wins). Each scope also keeps the style and
//! last number of every id used in it, so a later fragment can continue the
//! same list style instead of restarting.
//!
//! Lists without an id are anonymous: they never share a style.
//!
//! Footnotes, comments and text boxes open a fresh scope with
//! [`push_scope`](ListRegistry::push_scope): the lists inside them do not
//! continue the ones around them, and leave those untouched.

use super::Zone;
use super::properties::{attributes_where, is_text_property};
use crate::odf::core::DocumentHandler;
use crate::odf::elements::Attributes;
use crate::odf::property::PropertyRecord;
use std::collections::{BTreeMap, HashMap};

/// Keys that make a record a level definition
const DEFINITION_KEYS: [&str; 8] = [
    "style:num-format",
    "style:num-prefix",
    "style:num-suffix",
    "text:bullet-char",
    "text:display-levels",
    "text:space-before",
    "text:min-label-width",
    "text:min-label-distance",
];

const LEVEL_STYLE_KEYS: [&str; 5] = [
    "style:num-prefix",
    "style:num-suffix",
    "text:display-levels",
    "text:start-value",
    "text:style-name",
];

const LEVEL_PROPERTY_KEYS: [&str; 4] = [
    "text:space-before",
    "text:min-label-width",
    "text:min-label-distance",
    "fo:text-align",
];

/// One level of a list style
#[derive(Debug, Clone, PartialEq)]
pub struct ListLevelDefinition {
    pub ordered: bool,
    pub record: PropertyRecord,
}

impl ListLevelDefinition {
    pub fn new(record: &PropertyRecord, ordered: bool) -> Self {
        Self {
            ordered,
            record: record.clone(),
        }
    }

    /// `true` if `record` carries anything describing how a level looks
    pub fn is_definition(record: &PropertyRecord) -> bool {
        DEFINITION_KEYS.iter().any(|key| record.contains(key))
    }

    fn write(&self, handler: &mut dyn DocumentHandler, level: u32) {
        let record = &self.record;
        let mut attributes = Attributes::new().with("text:level", level.to_string());
        let element = if self.ordered {
            attributes.insert(
                "style:num-format",
                record.get_string("style:num-format").unwrap_or_else(|| "1".to_string()),
            );
            "text:list-level-style-number"
        } else {
            attributes.insert(
                "text:bullet-char",
                record.get_string("text:bullet-char").unwrap_or_else(|| "\u{2022}".to_string()),
            );
            "text:list-level-style-bullet"
        };
        for (key, value) in attributes_where(record, |k| LEVEL_STYLE_KEYS.contains(&k)).iter() {
            if self.ordered || key != "text:start-value" && key != "text:display-levels" {
                attributes.insert(key, value);
            }
        }

        handler.start_element(element, &attributes);
        let properties = attributes_where(record, |k| LEVEL_PROPERTY_KEYS.contains(&k));
        handler.start_element("style:list-level-properties", &properties);
        handler.end_element("style:list-level-properties");
        let text = attributes_where(record, is_text_property);
        if !text.is_empty() {
            handler.start_element("style:text-properties", &text);
            handler.end_element("style:text-properties");
        }
        handler.end_element(element);
    }
}

/// A generated `text:list-style`
#[derive(Debug, Clone)]
pub struct ListStyle {
    pub name: String,
    pub zone: Zone,
    pub list_id: Option<i64>,
    levels: BTreeMap<u32, ListLevelDefinition>,
}

impl ListStyle {
    pub fn level(&self, level: u32) -> Option<&ListLevelDefinition> {
        self.levels.get(&level)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn define(&mut self, level: u32, definition: &ListLevelDefinition) {
        self.levels.entry(level).or_insert_with(|| definition.clone());
    }

    fn write(&self, handler: &mut dyn DocumentHandler) {
        handler.start_element(
            "text:list-style",
            &Attributes::new().with("style:name", self.name.as_str()),
        );
        for (level, definition) in &self.levels {
            definition.write(handler, *level);
        }
        handler.end_element("text:list-style");
    }
}

#[derive(Debug, Default)]
struct ListEntry {
    definitions: BTreeMap<u32, ListLevelDefinition>,
}

/// Style and level-1 counter of one list id inside a scope
#[derive(Debug, Clone, Copy)]
struct ListCounter {
    style: usize,
    last_number: i64,
}

#[derive(Debug, Default, Clone)]
struct ListScope {
    last_id: Option<i64>,
    active_style: Option<usize>,
    pending_start: Option<i64>,
    counters: HashMap<i64, ListCounter>,
}

/// Result of opening a list level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOpening {
    /// Style name for a top-level `text:list`; nested lists inherit
    pub style_name: Option<String>,
    /// The list continues the numbering of an earlier fragment
    pub continue_numbering: bool,
}

/// Registry of list styles, level definitions and numbering counters
#[derive(Debug)]
pub struct ListRegistry {
    styles: Vec<ListStyle>,
    entries: HashMap<i64, ListEntry>,
    anonymous: BTreeMap<u32, ListLevelDefinition>,
    scopes: Vec<ListScope>,
}

impl Default for ListRegistry {
    fn default() -> Self {
        Self {
            styles: Vec::new(),
            entries: HashMap::new(),
            anonymous: BTreeMap::new(),
            scopes: vec![ListScope::default()],
        }
    }
}

fn level_of(record: &PropertyRecord, fallback: u32) -> u32 {
    record
        .get_int("librevenge:level")
        .map(|level| level.clamp(1, 10) as u32)
        .unwrap_or(fallback)
}

impl ListRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn scope(&mut self) -> &mut ListScope {
        if self.scopes.is_empty() {
            self.scopes.push(ListScope::default());
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Enter an independent numbering universe
    pub fn push_scope(&mut self) {
        self.scopes.push(ListScope::default());
    }

    /// Leave the scope entered by [`push_scope`](Self::push_scope)
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        } else {
            log::warn!("list scope underflow ignored");
        }
    }

    /// Record a level definition; the first definition of a level wins
    pub fn define_level(&mut self, record: &PropertyRecord, ordered: bool) {
        let level = level_of(record, 1);
        let definition = ListLevelDefinition::new(record, ordered);
        match record.get_int("librevenge:list-id") {
            Some(id) => {
                let entry = self.entries.entry(id).or_default();
                entry.definitions.entry(level).or_insert_with(|| definition.clone());
                if let Some(counter) = self.scope().counters.get(&id).copied() {
                    self.styles[counter.style].define(level, &definition);
                }
            },
            None => {
                self.anonymous.entry(level).or_insert(definition);
            },
        }
    }

    /// Resolve the style of a list level being opened at `depth` (0 = top level)
    pub fn open_level(&mut self, record: &PropertyRecord, ordered: bool, depth: usize, zone: Zone) -> ListOpening {
        let id = record.get_int("librevenge:list-id");
        let level = level_of(record, depth as u32 + 1);
        let definition = ListLevelDefinition::is_definition(record)
            .then(|| ListLevelDefinition::new(record, ordered));

        if depth > 0 {
            let active = self.scope().active_style;
            if let (Some(index), Some(definition)) = (active, definition.as_ref()) {
                self.styles[index].define(level, definition);
                if let Some(entry) = self.styles[index].list_id.and_then(|id| self.entries.get_mut(&id)) {
                    entry.definitions.entry(level).or_insert_with(|| definition.clone());
                }
            }
            return ListOpening {
                style_name: None,
                continue_numbering: false,
            };
        }

        let start = if ordered { record.get_int("text:start-value") } else { None };
        let scope = self.scope();
        let last_id = scope.last_id;
        let counter = id.and_then(|id| scope.counters.get(&id).copied());
        let reuse = counter.and_then(|counter| {
            let continues = level != 1 || start.is_none_or(|s| s == counter.last_number + 1);
            let same_zone = self.styles[counter.style].zone == zone;
            (last_id == id && continues && same_zone).then_some(counter.style)
        });

        let (index, continue_numbering) = match reuse {
            Some(index) => {
                log::debug!("list {:?} continues style {}", id, self.styles[index].name);
                self.scope().pending_start = None;
                (index, ordered)
            },
            None => {
                let index = self.allocate(id, zone);
                let scope = self.scope();
                if let Some(id) = id {
                    scope.counters.insert(
                        id,
                        ListCounter {
                            style: index,
                            last_number: start.map_or(0, |s| s - 1),
                        },
                    );
                }
                scope.pending_start = start.filter(|&s| s != 1);
                (index, false)
            },
        };

        if let Some(definition) = definition.as_ref() {
            self.styles[index].define(level, definition);
            if let Some(entry) = id.and_then(|id| self.entries.get_mut(&id)) {
                entry.definitions.entry(level).or_insert_with(|| definition.clone());
            }
        }

        let scope = self.scope();
        scope.last_id = id;
        scope.active_style = Some(index);

        ListOpening {
            style_name: Some(self.styles[index].name.clone()),
            continue_numbering,
        }
    }

    fn allocate(&mut self, id: Option<i64>, zone: Zone) -> usize {
        let name = format!("L{}", self.styles.len() + 1);
        let levels = match id {
            Some(id) => self
                .entries
                .get(&id)
                .map(|entry| entry.definitions.clone())
                .unwrap_or_default(),
            None => std::mem::take(&mut self.anonymous),
        };
        log::debug!("new list style {} for list {:?}", name, id);
        self.styles.push(ListStyle {
            name,
            zone,
            list_id: id,
            levels,
        });
        self.styles.len() - 1
    }

    /// Account for a new item at `depth` (1 = top level).
    ///
    /// Returns the explicit start value to put on the item, if any.
    pub fn start_item(&mut self, depth: usize) -> Option<i64> {
        if depth != 1 {
            return None;
        }
        let scope = self.scope();
        let pending = scope.pending_start.take();
        let active = scope.active_style;
        let list_id = active
            .and_then(|index| self.styles.get(index))
            .and_then(|style| style.list_id);
        if let Some(id) = list_id
            && let Some(counter) = self.scope().counters.get_mut(&id)
            && Some(counter.style) == active
        {
            counter.last_number += 1;
        }
        pending
    }

    /// First recorded definition of `level` for list `id`
    pub fn definition(&self, id: i64, level: u32) -> Option<&ListLevelDefinition> {
        self.entries.get(&id)?.definitions.get(&level)
    }

    /// Last number emitted at level 1 for list `id` in the current scope
    pub fn last_number(&self, id: i64) -> Option<i64> {
        self.scopes.last()?.counters.get(&id).map(|counter| counter.last_number)
    }

    pub fn style(&self, name: &str) -> Option<&ListStyle> {
        self.styles.iter().find(|style| style.name == name)
    }

    pub fn styles(&self) -> &[ListStyle] {
        &self.styles
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Write every list style of `zone`
    pub fn write(&self, handler: &mut dyn DocumentHandler, zone: Zone) {
        for style in self.styles.iter().filter(|style| style.zone == zone) {
            style.write(handler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::XmlWriter;

    fn list(id: i64) -> PropertyRecord {
        PropertyRecord::new().with("librevenge:list-id", id).with("librevenge:level", 1)
    }

    #[test]
    fn test_continuation_reuses_style() {
        let mut lists = ListRegistry::new();
        let first = lists.open_level(&list(1).with("text:start-value", 1), true, 0, Zone::ContentAutomatic);
        lists.start_item(1);
        lists.start_item(1);
        assert_eq!(lists.last_number(1), Some(2));

        let again = lists.open_level(&list(1).with("text:start-value", 3), true, 0, Zone::ContentAutomatic);
        assert_eq!(again.style_name, first.style_name);
        assert!(again.continue_numbering);

        let restart = lists.open_level(&list(1).with("text:start-value", 1), true, 0, Zone::ContentAutomatic);
        assert_ne!(restart.style_name, first.style_name);
        assert!(!restart.continue_numbering);
    }

    #[test]
    fn test_other_list_in_between_breaks_continuation() {
        let mut lists = ListRegistry::new();
        let first = lists.open_level(&list(1), true, 0, Zone::ContentAutomatic);
        lists.open_level(&list(2), true, 0, Zone::ContentAutomatic);
        let back = lists.open_level(&list(1), true, 0, Zone::ContentAutomatic);
        assert_ne!(back.style_name, first.style_name);
    }

    #[test]
    fn test_anonymous_lists_never_share() {
        let mut lists = ListRegistry::new();
        let a = lists.open_level(&PropertyRecord::new(), false, 0, Zone::ContentAutomatic);
        let b = lists.open_level(&PropertyRecord::new(), false, 0, Zone::ContentAutomatic);
        assert_ne!(a.style_name, b.style_name);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut lists = ListRegistry::new();
        lists.define_level(&list(7).with("style:num-format", "1"), true);
        lists.define_level(&list(7).with("style:num-format", "a"), true);
        let stored = lists.definition(7, 1).unwrap();
        assert_eq!(stored.record.get_str("style:num-format"), Some("1"));

        let opened = lists.open_level(&list(7), true, 0, Zone::ContentAutomatic);
        let style = lists.style(opened.style_name.as_deref().unwrap()).unwrap();
        assert_eq!(style.level(1).unwrap().record.get_str("style:num-format"), Some("1"));
    }

    #[test]
    fn test_scopes_isolate_continuation() {
        let mut lists = ListRegistry::new();
        let outer = lists.open_level(&list(1), true, 0, Zone::ContentAutomatic);
        lists.push_scope();
        let inner = lists.open_level(&list(1), true, 0, Zone::ContentAutomatic);
        assert_ne!(inner.style_name, outer.style_name);
        lists.pop_scope();
        lists.pop_scope();
    }

    #[test]
    fn test_outer_list_continues_after_inner_scope() {
        let mut lists = ListRegistry::new();
        let outer = lists.open_level(&list(1).with("text:start-value", 1), true, 0, Zone::ContentAutomatic);
        lists.start_item(1);
        lists.start_item(1);

        lists.push_scope();
        let inner = lists.open_level(&list(1).with("text:start-value", 1), true, 0, Zone::ContentAutomatic);
        lists.start_item(1);
        assert_ne!(inner.style_name, outer.style_name);
        assert_eq!(lists.last_number(1), Some(1));
        lists.pop_scope();

        assert_eq!(lists.last_number(1), Some(2));
        let again = lists.open_level(&list(1).with("text:start-value", 3), true, 0, Zone::ContentAutomatic);
        assert_eq!(again.style_name, outer.style_name);
        assert!(again.continue_numbering);
    }

    #[test]
    fn test_continuation_stays_in_its_zone() {
        let mut lists = ListRegistry::new();
        let body = lists.open_level(&list(1), true, 0, Zone::ContentAutomatic);

        lists.push_scope();
        let header = lists.open_level(&list(1), true, 0, Zone::StyleAutomatic);
        assert_ne!(header.style_name, body.style_name);
        lists.pop_scope();

        let again = lists.open_level(&list(1), true, 0, Zone::ContentAutomatic);
        assert_eq!(again.style_name, body.style_name);
        let style = lists.style(again.style_name.as_deref().unwrap()).unwrap();
        assert_eq!(style.zone, Zone::ContentAutomatic);

        let other_zone = lists.open_level(&list(1), true, 0, Zone::StyleAutomatic);
        assert_ne!(other_zone.style_name, body.style_name);
    }

    #[test]
    fn test_explicit_start_goes_on_first_item() {
        let mut lists = ListRegistry::new();
        lists.open_level(&list(3).with("text:start-value", 5), true, 0, Zone::ContentAutomatic);
        assert_eq!(lists.start_item(1), Some(5));
        assert_eq!(lists.start_item(1), None);
        assert_eq!(lists.last_number(3), Some(6));
    }

    #[test]
    fn test_write_levels() {
        let mut lists = ListRegistry::new();
        lists.define_level(
            &list(1).with("style:num-format", "i").with("style:num-suffix", ")"),
            true,
        );
        lists.define_level(
            &PropertyRecord::new()
                .with("librevenge:list-id", 1)
                .with("librevenge:level", 2)
                .with("text:bullet-char", "-"),
            false,
        );
        lists.open_level(&list(1), true, 0, Zone::ContentAutomatic);

        let mut writer = XmlWriter::new();
        lists.write(&mut writer, Zone::ContentAutomatic);
        assert_eq!(
            writer.as_str(),
            concat!(
                r#"<text:list-style style:name="L1">"#,
                r#"<text:list-level-style-number text:level="1" style:num-format="i" style:num-suffix=")">"#,
                r#"<style:list-level-properties/></text:list-level-style-number>"#,
                r#"<text:list-level-style-bullet text:level="2" text:bullet-char="-">"#,
                r#"<style:list-level-properties/></text:list-level-style-bullet>"#,
                r#"</text:list-style>"#
            )
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_first_definition_is_kept(formats in proptest::collection::vec("[1aAiI]", 1..8), level in 1i64..4) {
                let mut lists = ListRegistry::new();
                for format in &formats {
                    let record = PropertyRecord::new()
                        .with("librevenge:list-id", 9)
                        .with("librevenge:level", level)
                        .with("style:num-format", format.as_str());
                    lists.define_level(&record, true);
                }
                let stored = lists.definition(9, level as u32).unwrap();
                prop_assert_eq!(stored.record.get_str("style:num-format"), Some(formats[0].as_str()));
            }
        }
    }
}
