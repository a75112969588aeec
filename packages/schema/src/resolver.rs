//! Content-model queries over a registry.
//!
//! All queries use set membership: an alternative is compatible with a
//! child sequence when every child id is one of its members, whatever the
//! order or repetition. Occurs-once members are the only counted ones.

use crate::definition::{AttributeDomain, ContentAlternative, PatternDefinition};
use crate::error::{SchemaError, SchemaResult};
use crate::registry::SchemaRegistry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Why a child sequence is rejected by a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentMismatch {
    /// The pattern declares no content but has children
    ChildrenNotAllowed { children: Vec<String> },
    /// An occurs-once member appears more than once
    RepeatedOnceChild { pattern: String, count: usize },
    /// No single alternative holds every child
    NoAlternative {
        /// Children no alternative mentions at all
        strays: Vec<String>,
    },
}

impl fmt::Display for ContentMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentMismatch::ChildrenNotAllowed { children } => {
                write!(f, "no children, found [{}]", children.join(", "))
            }
            ContentMismatch::RepeatedOnceChild { pattern, count } => {
                write!(f, "'{}' at most once, found {} times", pattern, count)
            }
            ContentMismatch::NoAlternative { strays } if strays.is_empty() => {
                write!(f, "this combination of children")
            }
            ContentMismatch::NoAlternative { strays } => {
                write!(f, "[{}]", strays.join(", "))
            }
        }
    }
}

/// Answers insertion and attribute questions against a registry
#[derive(Debug, Clone, Copy)]
pub struct ContentModelResolver<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> ContentModelResolver<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Alternatives of `definition` holding every id of `current`, in declaration order
    pub fn compatible_alternatives<S: AsRef<str>>(
        &self,
        definition: &'r PatternDefinition,
        current: &[S],
    ) -> Vec<&'r ContentAlternative> {
        definition
            .content
            .iter()
            .filter(|alternative| alternative.accepts(current))
            .collect()
    }

    /// Patterns that may be inserted among `current` children of `pattern_id`
    ///
    /// Members of every compatible alternative, minus occurs-once members
    /// already present. Text is not included, see [`accepts_text`](Self::accepts_text).
    pub fn allowed_child_patterns<S: AsRef<str>>(
        &self,
        pattern_id: &str,
        current: &[S],
    ) -> SchemaResult<BTreeSet<String>> {
        let definition = self.registry.lookup(pattern_id)?;
        let counts = count_ids(current);

        let mut allowed = BTreeSet::new();
        for alternative in self.compatible_alternatives(definition, current) {
            for member in alternative.patterns() {
                let present = counts.get(member).copied().unwrap_or(0);
                if present > 0 && self.registry.is_occurs_once(member) {
                    continue;
                }
                allowed.insert(member.to_string());
            }
        }
        Ok(allowed)
    }

    /// Whether raw text may be typed among `current` children of `pattern_id`
    pub fn accepts_text<S: AsRef<str>>(&self, pattern_id: &str, current: &[S]) -> SchemaResult<bool> {
        let definition = self.registry.lookup(pattern_id)?;
        Ok(self
            .compatible_alternatives(definition, current)
            .iter()
            .any(|alternative| alternative.admits_text()))
    }

    /// First declared alternative compatible with `current`
    pub fn canonical_alternative<S: AsRef<str>>(
        &self,
        pattern_id: &str,
        current: &[S],
    ) -> SchemaResult<Option<&'r ContentAlternative>> {
        let definition = self.registry.lookup(pattern_id)?;
        Ok(definition
            .content
            .iter()
            .find(|alternative| alternative.accepts(current)))
    }

    /// Check a complete child sequence the way validation does
    pub fn check_children<S: AsRef<str>>(
        &self,
        definition: &PatternDefinition,
        children: &[S],
    ) -> Result<(), ContentMismatch> {
        if definition.content.is_empty() {
            if children.is_empty() {
                return Ok(());
            }
            return Err(ContentMismatch::ChildrenNotAllowed {
                children: children.iter().map(|c| c.as_ref().to_string()).collect(),
            });
        }

        for (id, count) in count_ids(children) {
            if count > 1 && self.registry.is_occurs_once(id) {
                return Err(ContentMismatch::RepeatedOnceChild {
                    pattern: id.to_string(),
                    count,
                });
            }
        }

        if definition
            .content
            .iter()
            .any(|alternative| alternative.accepts(children))
        {
            return Ok(());
        }

        let mut strays: Vec<String> = Vec::new();
        for child in children {
            let child = child.as_ref();
            if !definition.mentions(child) && !strays.iter().any(|s| s == child) {
                strays.push(child.to_string());
            }
        }
        Err(ContentMismatch::NoAlternative { strays })
    }

    /// Like [`check_children`](Self::check_children), as a schema error
    pub fn ensure_children<S: AsRef<str>>(&self, pattern_id: &str, children: &[S]) -> SchemaResult<()> {
        let definition = self.registry.lookup(pattern_id)?;
        self.check_children(definition, children)
            .map_err(|mismatch| SchemaError::no_alternative(pattern_id, mismatch.to_string()))
    }

    pub fn attribute_domain(&self, pattern_id: &str, attribute: &str) -> SchemaResult<&'r AttributeDomain> {
        self.registry
            .lookup(pattern_id)?
            .attribute(attribute)
            .ok_or_else(|| SchemaError::unknown_attribute(pattern_id, attribute))
    }

    /// Check that `value` may be set on `attribute` of `pattern_id`
    pub fn ensure_attribute_value(&self, pattern_id: &str, attribute: &str, value: &str) -> SchemaResult<()> {
        if self.attribute_domain(pattern_id, attribute)?.contains(value) {
            Ok(())
        } else {
            Err(SchemaError::not_in_domain(pattern_id, attribute, value))
        }
    }

    pub fn resolve_element_name(&self, pattern_id: &str) -> SchemaResult<&'r str> {
        self.registry.resolve_element_name(pattern_id)
    }

    /// Pattern of an `element` child of `parent`
    ///
    /// Alternatives are tried in order; the first one holding exactly one
    /// pattern serialized as `element` decides. `None` when no alternative
    /// is unambiguous.
    pub fn resolve_child_pattern(&self, parent: &str, element: &str) -> SchemaResult<Option<&'r str>> {
        let definition = self.registry.lookup(parent)?;
        let candidates = self.registry.patterns_for_element(element);

        for alternative in &definition.content {
            let mut matches = alternative
                .patterns()
                .filter(|member| candidates.iter().any(|candidate| candidate == member));
            if let (Some(found), None) = (matches.next(), matches.next()) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

fn count_ids<S: AsRef<str>>(ids: &[S]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for id in ids {
        *counts.entry(id.as_ref()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compose, RawSchema};

    fn registry() -> SchemaRegistry {
        let raw = RawSchema::from_json(
            r#"{
                "groups": { "inline": ["TEXT", "emphasis"] },
                "patterns": {
                    "list": { "content": [["block.head", "item"]] },
                    "block.head": { "elementName": "head", "content": [["title"]], "occursOnce": true },
                    "item": { "content": [["p", "list"], { "group": "inline" }] },
                    "p": { "content": [{ "group": "inline" }] },
                    "emphasis": { "content": [{ "group": "inline" }] },
                    "title": { "content": [["TEXT"]] },
                    "blank": { "content": [["TEXT"], ["s"]] },
                    "s": { "content": [["TEXT"]] },
                    "image": { "attributes": { "id": null } },
                    "tr": { "attributes": { "align": ["left", "right", "center", "justify"] } }
                }
            }"#,
        )
        .unwrap();
        compose(raw, []).unwrap()
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_occurs_once_member_is_excluded_once_present() {
        let registry = registry();
        let resolver = ContentModelResolver::new(&registry);
        assert_eq!(
            resolver.allowed_child_patterns::<&str>("list", &[]).unwrap(),
            set(&["block.head", "item"])
        );
        assert_eq!(
            resolver.allowed_child_patterns("list", &["block.head"]).unwrap(),
            set(&["item"])
        );
        assert_eq!(
            resolver.allowed_child_patterns("list", &["item", "item"]).unwrap(),
            set(&["block.head", "item"])
        );
    }

    #[test]
    fn test_children_select_compatible_alternatives() {
        let registry = registry();
        let resolver = ContentModelResolver::new(&registry);

        assert_eq!(
            resolver.allowed_child_patterns::<&str>("item", &[]).unwrap(),
            set(&["p", "list", "emphasis"])
        );
        assert_eq!(
            resolver.allowed_child_patterns("item", &["p"]).unwrap(),
            set(&["p", "list"])
        );
        assert_eq!(
            resolver.allowed_child_patterns("item", &["TEXT"]).unwrap(),
            set(&["emphasis"])
        );
        assert!(resolver
            .allowed_child_patterns("item", &["p", "TEXT"])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unknown_pattern_propagates() {
        let registry = registry();
        let resolver = ContentModelResolver::new(&registry);
        let err = resolver.allowed_child_patterns::<&str>("table", &[]).unwrap_err();
        assert_eq!(err, SchemaError::unknown_pattern("table"));
    }

    #[test]
    fn test_accepts_text() {
        let registry = registry();
        let resolver = ContentModelResolver::new(&registry);
        assert!(resolver.accepts_text::<&str>("item", &[]).unwrap());
        assert!(!resolver.accepts_text("item", &["list"]).unwrap());
        assert!(!resolver.accepts_text::<&str>("list", &[]).unwrap());
        assert!(resolver.accepts_text::<&str>("blank", &[]).unwrap());
        assert!(!resolver.accepts_text("blank", &["s"]).unwrap());
    }

    #[test]
    fn test_canonical_alternative_is_first_compatible() {
        let registry = registry();
        let resolver = ContentModelResolver::new(&registry);
        let first = resolver.canonical_alternative::<&str>("blank", &[]).unwrap().unwrap();
        assert!(first.admits_text());

        let second = resolver.canonical_alternative("blank", &["s"]).unwrap().unwrap();
        assert!(second.admits("s"));

        assert!(resolver
            .canonical_alternative("blank", &["TEXT", "s"])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_check_children() {
        let registry = registry();
        let resolver = ContentModelResolver::new(&registry);
        let list = registry.lookup("list").unwrap();
        let image = registry.lookup("image").unwrap();

        assert_eq!(resolver.check_children(list, &["block.head", "item", "item"]), Ok(()));
        assert_eq!(resolver.check_children::<&str>(image, &[]), Ok(()));
        assert_eq!(
            resolver.check_children(list, &["block.head", "block.head", "item"]),
            Err(ContentMismatch::RepeatedOnceChild {
                pattern: "block.head".to_string(),
                count: 2
            })
        );
        assert_eq!(
            resolver.check_children(list, &["item", "p"]),
            Err(ContentMismatch::NoAlternative {
                strays: vec!["p".to_string()]
            })
        );
        assert_eq!(
            resolver.check_children(image, &["TEXT"]),
            Err(ContentMismatch::ChildrenNotAllowed {
                children: vec!["TEXT".to_string()]
            })
        );

        let item = registry.lookup("item").unwrap();
        let mixed = resolver.check_children(item, &["p", "TEXT"]).unwrap_err();
        assert_eq!(mixed, ContentMismatch::NoAlternative { strays: vec![] });
        assert_eq!(mixed.to_string(), "this combination of children");
    }

    #[test]
    fn test_attribute_domains() {
        let registry = registry();
        let resolver = ContentModelResolver::new(&registry);

        assert_eq!(
            resolver.attribute_domain("image", "id").unwrap(),
            &AttributeDomain::Free
        );
        assert!(resolver.ensure_attribute_value("tr", "align", "center").is_ok());
        assert_eq!(
            resolver.ensure_attribute_value("tr", "align", "top").unwrap_err(),
            SchemaError::not_in_domain("tr", "align", "top")
        );
        assert_eq!(
            resolver.attribute_domain("tr", "valign").unwrap_err(),
            SchemaError::unknown_attribute("tr", "valign")
        );
    }

    #[test]
    fn test_resolve_child_pattern() {
        let registry = registry();
        let resolver = ContentModelResolver::new(&registry);
        assert_eq!(resolver.resolve_child_pattern("list", "head").unwrap(), Some("block.head"));
        assert_eq!(resolver.resolve_child_pattern("list", "item").unwrap(), Some("item"));
        assert_eq!(resolver.resolve_child_pattern("list", "p").unwrap(), None);
    }
}
