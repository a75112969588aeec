//! Typed schema entries.
//!
//! A [`PatternDefinition`] is what one raw schema entry becomes once groups
//! are expanded and seeds are parsed. Definitions are only built by
//! [`compose`](crate::compose), so every invariant checked there holds for
//! any definition reachable through a registry.

use folio_common::TEXT_MARKER;
use folio_seed::Seed;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Metadata key flagging a pattern that may appear at most once among siblings
pub const OCCURS_ONCE: &str = "occursOnce";

/// Legal values of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "values")]
pub enum AttributeDomain {
    /// Any text
    Free,
    Enumerated(BTreeSet<String>),
}

impl AttributeDomain {
    pub fn enumerated<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeDomain::Enumerated(values.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            AttributeDomain::Free => true,
            AttributeDomain::Enumerated(values) => values.contains(value),
        }
    }

    /// Choices to offer in an attribute editor, `None` for free text
    pub fn values(&self) -> Option<&BTreeSet<String>> {
        match self {
            AttributeDomain::Free => None,
            AttributeDomain::Enumerated(values) => Some(values),
        }
    }
}

pub fn is_value_in_domain(domain: &AttributeDomain, value: &str) -> bool {
    domain.contains(value)
}

/// Member of a content alternative
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ContentItem {
    Text,
    Pattern(String),
}

impl ContentItem {
    /// Map a raw member id, accepting the legacy `.text` spelling
    pub fn from_id(id: &str) -> Self {
        match id {
            TEXT_MARKER | ".text" => ContentItem::Text,
            other => ContentItem::Pattern(other.to_string()),
        }
    }

    pub fn as_id(&self) -> &str {
        match self {
            ContentItem::Text => TEXT_MARKER,
            ContentItem::Pattern(id) => id,
        }
    }
}

/// One way of filling a pattern's children
///
/// Membership decides, not position: a child sequence is accepted when each
/// of its ids is a member, in any order and with any repetition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentAlternative {
    items: Vec<ContentItem>,
}

impl ContentAlternative {
    /// Build an alternative, dropping repeated members
    pub fn new(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let mut unique: Vec<ContentItem> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Self { items: unique }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `id` (a pattern id or [`TEXT_MARKER`]) is a member
    pub fn admits(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.as_id() == id)
    }

    pub fn admits_text(&self) -> bool {
        self.items.contains(&ContentItem::Text)
    }

    /// Pattern members in declaration order, text excluded
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            ContentItem::Pattern(id) => Some(id.as_str()),
            ContentItem::Text => None,
        })
    }

    /// Whether every id of `children` is a member
    pub fn accepts<S: AsRef<str>>(&self, children: &[S]) -> bool {
        children.iter().all(|child| self.admits(child.as_ref()))
    }
}

/// Parsed seeds of a pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeedSet {
    pub default: Option<Seed>,
    /// Named variants, selected by insertion context
    pub variants: BTreeMap<String, Seed>,
}

impl SeedSet {
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.variants.is_empty()
    }

    /// First variant matching one of `keys`, falling back to the default seed
    pub fn select(&self, keys: &[&str]) -> Option<&Seed> {
        keys.iter()
            .find_map(|key| self.variants.get(*key))
            .or(self.default.as_ref())
    }
}

/// Schema facts for one construct
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternDefinition {
    pub id: String,
    /// Declared element name; [`element_name`](Self::element_name) applies the default
    pub declared_element: Option<String>,
    pub attributes: BTreeMap<String, AttributeDomain>,
    pub content: Vec<ContentAlternative>,
    pub seeds: SeedSet,
    /// Auxiliary keys of the raw entry, kept verbatim
    pub metadata: BTreeMap<String, Value>,
}

impl PatternDefinition {
    /// Serialized tag name: the declared one, else the pattern id
    pub fn element_name(&self) -> &str {
        self.declared_element.as_deref().unwrap_or(&self.id)
    }

    pub fn is_occurs_once(&self) -> bool {
        matches!(self.metadata.get(OCCURS_ONCE), Some(Value::Bool(true)))
    }

    pub fn has_seed(&self) -> bool {
        !self.seeds.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDomain> {
        self.attributes.get(name)
    }

    /// Whether any alternative lists `id` as a member
    pub fn mentions(&self, id: &str) -> bool {
        self.content.iter().any(|alternative| alternative.admits(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternative(ids: &[&str]) -> ContentAlternative {
        ContentAlternative::new(ids.iter().map(|id| ContentItem::from_id(id)))
    }

    #[test]
    fn test_free_domain_accepts_anything() {
        assert!(is_value_in_domain(&AttributeDomain::Free, ""));
        assert!(is_value_in_domain(&AttributeDomain::Free, "anything"));
        assert_eq!(AttributeDomain::Free.values(), None);
    }

    #[test]
    fn test_enumerated_domain_membership() {
        let align = AttributeDomain::enumerated(["left", "right", "center", "justify"]);
        assert!(align.contains("center"));
        assert!(!align.contains("top"));
        assert!(!align.contains("Left"));
    }

    #[test]
    fn test_alternative_membership_ignores_order_and_repetition() {
        let list = alternative(&["block.head", "item"]);
        assert!(list.accepts(&["item", "item", "block.head"]));
        assert!(list.accepts::<&str>(&[]));
        assert!(!list.accepts(&["item", "p"]));
    }

    #[test]
    fn test_text_aliases() {
        let s = alternative(&[".text"]);
        assert!(s.admits_text());
        assert!(s.admits(TEXT_MARKER));
        assert_eq!(s.patterns().count(), 0);
    }

    #[test]
    fn test_duplicate_members_are_dropped() {
        let alt = alternative(&["TEXT", "emphasis", "TEXT", "emphasis", "blank"]);
        assert_eq!(alt.items().len(), 3);
        assert_eq!(alt.patterns().collect::<Vec<_>>(), vec!["emphasis", "blank"]);
    }

    #[test]
    fn test_element_name_defaults_to_id() {
        let mut definition = PatternDefinition {
            id: "item".to_string(),
            declared_element: None,
            attributes: BTreeMap::new(),
            content: Vec::new(),
            seeds: SeedSet::default(),
            metadata: BTreeMap::new(),
        };
        assert_eq!(definition.element_name(), "item");

        definition.id = "sort.item".to_string();
        definition.declared_element = Some("item".to_string());
        assert_eq!(definition.element_name(), "item");
    }

    #[test]
    fn test_occurs_once_requires_literal_true() {
        let mut metadata = BTreeMap::new();
        metadata.insert(OCCURS_ONCE.to_string(), Value::String("true".to_string()));
        let definition = PatternDefinition {
            id: "caption".to_string(),
            declared_element: None,
            attributes: BTreeMap::new(),
            content: Vec::new(),
            seeds: SeedSet::default(),
            metadata,
        };
        assert!(!definition.is_occurs_once());
    }
}
