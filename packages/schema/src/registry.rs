use crate::definition::PatternDefinition;
use crate::error::{SchemaError, SchemaResult};
use std::collections::BTreeMap;

/// Immutable map of pattern id to definition
///
/// Built by [`compose`](crate::compose) and read-only afterwards; share it
/// between sessions behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    patterns: BTreeMap<String, PatternDefinition>,
    /// Element name -> pattern ids serialized with that tag, in id order
    by_element: BTreeMap<String, Vec<String>>,
}

impl SchemaRegistry {
    pub(crate) fn new(patterns: BTreeMap<String, PatternDefinition>) -> Self {
        let mut by_element: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (id, definition) in &patterns {
            by_element
                .entry(definition.element_name().to_string())
                .or_default()
                .push(id.clone());
        }
        Self {
            patterns,
            by_element,
        }
    }

    pub fn lookup(&self, pattern_id: &str) -> SchemaResult<&PatternDefinition> {
        self.patterns
            .get(pattern_id)
            .ok_or_else(|| SchemaError::unknown_pattern(pattern_id))
    }

    pub fn get(&self, pattern_id: &str) -> Option<&PatternDefinition> {
        self.patterns.get(pattern_id)
    }

    pub fn contains(&self, pattern_id: &str) -> bool {
        self.patterns.contains_key(pattern_id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn pattern_ids(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &PatternDefinition> {
        self.patterns.values()
    }

    pub fn resolve_element_name(&self, pattern_id: &str) -> SchemaResult<&str> {
        Ok(self.lookup(pattern_id)?.element_name())
    }

    /// Every pattern serialized as `element`
    pub fn patterns_for_element(&self, element: &str) -> &[String] {
        self.by_element
            .get(element)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Occurs-once flag of a member; unknown members are unrestricted
    pub fn is_occurs_once(&self, pattern_id: &str) -> bool {
        self.patterns
            .get(pattern_id)
            .map(PatternDefinition::is_occurs_once)
            .unwrap_or(false)
    }
}
