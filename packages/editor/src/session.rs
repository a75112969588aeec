//! # Edit Session Management
//!
//! An EditSession owns one document and the registry it is edited against.
//! Every mutation is checked against the schema before it touches the
//! tree, so a refused edit leaves the document exactly as it was.

use crate::errors::{EditorError, EditorResult};
use crate::instantiate::{Fragment, InsertionContext, Placement, SeedInstantiator};
use crate::mutations::{self, InsertionPoint, Mutation, MutationError};
use folio_common::{Child, Node, NodePath};
use folio_schema::{AttributeDomain, ContentModelResolver, SchemaRegistry};
use folio_validator::{validate, validate_with, ValidateOptions, ValidationReport};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub struct EditSession {
    registry: Arc<SchemaRegistry>,
    document: Node,
}

impl EditSession {
    pub fn new(registry: Arc<SchemaRegistry>, document: Node) -> Self {
        Self { registry, document }
    }

    /// Start a new document from an instance of `pattern_id`
    pub fn create(registry: Arc<SchemaRegistry>, pattern_id: &str) -> EditorResult<Self> {
        let fragment =
            SeedInstantiator::new(&registry).instantiate(pattern_id, &InsertionContext::nested())?;
        Ok(Self::new(registry, fragment.root))
    }

    /// Like [`EditSession::create`], for a document living inside a container
    ///
    /// `container` is the configured root pattern (`rootPattern`); the new
    /// document's pattern must be one its content admits.
    pub fn create_within(
        registry: Arc<SchemaRegistry>,
        container: Option<&str>,
        pattern_id: &str,
    ) -> EditorResult<Self> {
        if let Some(container) = container {
            let admitted = ContentModelResolver::new(&registry)
                .allowed_child_patterns::<&str>(container, &[])?;
            if !admitted.contains(pattern_id) {
                return Err(EditorError::NotAllowed {
                    parent: container.to_string(),
                    pattern: pattern_id.to_string(),
                    path: NodePath::root(),
                });
            }
        }
        Self::create(registry, pattern_id)
    }

    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn into_document(self) -> Node {
        self.document
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> ContentModelResolver<'_> {
        ContentModelResolver::new(&self.registry)
    }

    /// Patterns insertable as children of the node at `path`
    pub fn insertion_menu(&self, path: &NodePath) -> EditorResult<BTreeSet<String>> {
        let node = mutations::element_at(&self.document, path)?;
        Ok(self
            .resolver()
            .allowed_child_patterns(&node.pattern, &node.child_pattern_ids())?)
    }

    /// Whether text may be typed inside the node at `path`
    pub fn accepts_text(&self, path: &NodePath) -> EditorResult<bool> {
        let node = mutations::element_at(&self.document, path)?;
        Ok(self
            .resolver()
            .accepts_text(&node.pattern, &node.child_pattern_ids())?)
    }

    pub fn attribute_domain(&self, path: &NodePath, name: &str) -> EditorResult<&AttributeDomain> {
        let node = mutations::element_at(&self.document, path)?;
        Ok(self.resolver().attribute_domain(&node.pattern, name)?)
    }

    /// Full report for the current document
    pub fn validate(&self) -> ValidationReport {
        validate(&self.registry, &self.document)
    }

    /// Apply a mutation, returning the path that should receive focus
    ///
    /// Insertions focus the new content, removals the former parent;
    /// in-place edits return `None`.
    #[instrument(skip_all, fields(mutation = mutation.name()))]
    pub fn apply(&mut self, mutation: Mutation) -> EditorResult<Option<NodePath>> {
        let result = match mutation {
            Mutation::InsertPattern {
                target,
                pattern,
                context,
                index,
            } => self.insert_pattern(&target, &pattern, &context, index).map(Some),
            Mutation::Paste {
                target,
                fragment,
                placement,
                index,
            } => self.paste(&target, fragment, placement, index).map(Some),
            Mutation::SetAttribute { path, name, value } => {
                self.set_attribute(&path, &name, &value).map(|_| None)
            }
            Mutation::RemoveAttribute { path, name } => {
                self.remove_attribute(&path, &name).map(|_| None)
            }
            Mutation::RemoveNode { path } => self.remove_node(&path).map(Some),
            Mutation::UpdateText { path, content } => {
                self.update_text(&path, content).map(|_| None)
            }
        };

        match &result {
            Ok(focus) => info!(focus = ?focus, "mutation applied"),
            Err(err) => warn!(error = %err, "mutation refused"),
        }
        result
    }

    fn insert_pattern(
        &mut self,
        target: &NodePath,
        pattern: &str,
        context: &InsertionContext,
        index: Option<usize>,
    ) -> EditorResult<NodePath> {
        let point = mutations::insertion_point(&self.document, target, context.placement, index)?;
        self.ensure_insertable(&point, pattern)?;

        let Fragment { root, focus } = SeedInstantiator::new(&self.registry).instantiate(pattern, context)?;
        mutations::insert_at(&mut self.document, &point, root)?;
        Ok(focus.rebase(&point.path()))
    }

    fn paste(
        &mut self,
        target: &NodePath,
        fragment: Node,
        placement: Placement,
        index: Option<usize>,
    ) -> EditorResult<NodePath> {
        let point = mutations::insertion_point(&self.document, target, placement, index)?;
        self.ensure_insertable(&point, &fragment.pattern)?;

        let report = validate_with(
            &self.registry,
            &fragment,
            ValidateOptions {
                base_path: point.path(),
                ..Default::default()
            },
        );
        if !report.is_valid() {
            return Err(EditorError::InvalidFragment(report));
        }

        mutations::insert_at(&mut self.document, &point, fragment)?;
        Ok(point.path())
    }

    /// Refuse `pattern` unless the insertion menu at `point` offers it
    fn ensure_insertable(&self, point: &InsertionPoint, pattern: &str) -> EditorResult<()> {
        let parent = mutations::element_at(&self.document, &point.parent)?;
        let menu = self
            .resolver()
            .allowed_child_patterns(&parent.pattern, &parent.child_pattern_ids())?;
        if menu.contains(pattern) {
            Ok(())
        } else {
            Err(EditorError::NotAllowed {
                parent: parent.pattern.clone(),
                pattern: pattern.to_string(),
                path: point.parent.clone(),
            })
        }
    }

    fn set_attribute(&mut self, path: &NodePath, name: &str, value: &str) -> EditorResult<()> {
        let pattern = mutations::element_at(&self.document, path)?.pattern.clone();
        self.resolver().ensure_attribute_value(&pattern, name, value)?;
        mutations::element_at_mut(&mut self.document, path)?.set_attribute(name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, path: &NodePath, name: &str) -> EditorResult<()> {
        let node = mutations::element_at_mut(&mut self.document, path)?;
        node.remove_attribute(name)
            .map(|_| ())
            .ok_or_else(|| {
                MutationError::AttributeNotFound {
                    path: path.clone(),
                    name: name.to_string(),
                }
                .into()
            })
    }

    fn remove_node(&mut self, path: &NodePath) -> EditorResult<NodePath> {
        mutations::remove_at(&mut self.document, path)?;
        // Membership content models stay satisfied when a child goes away
        Ok(path.split_last().map(|(parent, _)| parent).unwrap_or_default())
    }

    fn update_text(&mut self, path: &NodePath, content: String) -> EditorResult<()> {
        let (parent_path, index) = path
            .split_last()
            .ok_or_else(|| MutationError::NotText(path.clone()))?;
        let parent = mutations::element_at(&self.document, &parent_path)?;

        match parent.children.get(index) {
            Some(Child::Text { .. }) => {}
            Some(Child::Placeholder { .. }) => {
                if !self
                    .resolver()
                    .accepts_text(&parent.pattern, &parent.child_pattern_ids())?
                {
                    return Err(MutationError::TextNotAccepted(path.clone()).into());
                }
            }
            Some(Child::Element(_)) => return Err(MutationError::NotText(path.clone()).into()),
            None => return Err(MutationError::NodeNotFound(path.clone()).into()),
        }

        let parent = mutations::element_at_mut(&mut self.document, &parent_path)?;
        parent.children[index] = Child::text(content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_schema::{compose, RawSchema};

    fn registry() -> Arc<SchemaRegistry> {
        let raw = RawSchema::from_json(
            r#"{ "patterns": {
                "list": {
                    "content": [["block.head", "item"]],
                    "seed": "<list><item e4x='here'/><item e4x='hold'/></list>"
                },
                "block.head": { "elementName": "head", "occursOnce": true },
                "item": { "content": [["TEXT"]] }
            } }"#,
        )
        .unwrap();
        Arc::new(compose(raw, []).unwrap())
    }

    #[test]
    fn test_create_from_seed() {
        let session = EditSession::create(registry(), "list").unwrap();
        assert_eq!(session.document().children.len(), 2);
        assert!(session.validate().is_valid());
    }

    #[test]
    fn test_insertion_menu_shrinks_after_head() {
        let mut session = EditSession::create(registry(), "list").unwrap();
        let root = NodePath::root();
        assert!(session.insertion_menu(&root).unwrap().contains("block.head"));

        session
            .apply(Mutation::InsertPattern {
                target: root.clone(),
                pattern: "block.head".to_string(),
                context: InsertionContext::nested(),
                index: Some(0),
            })
            .unwrap();

        let menu: Vec<_> = session.insertion_menu(&root).unwrap().into_iter().collect();
        assert_eq!(menu, vec!["item"]);
    }

    #[test]
    fn test_typing_into_focus_slot() {
        let mut session = EditSession::create(registry(), "list").unwrap();
        let slot = NodePath::from_indices(vec![0, 0]);
        session
            .apply(Mutation::UpdateText {
                path: slot.clone(),
                content: "first".to_string(),
            })
            .unwrap();

        let item = session.document().get(&NodePath::from_indices(vec![0])).unwrap();
        assert_eq!(item.children[0], Child::text("first"));
    }

    #[test]
    fn test_text_refused_where_not_accepted() {
        let mut session = EditSession::new(
            registry(),
            Node::new("list", "list").with_placeholder(folio_common::Placeholder::Hold),
        );
        let err = session
            .apply(Mutation::UpdateText {
                path: NodePath::from_indices(vec![0]),
                content: "loose".to_string(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::Mutation(MutationError::TextNotAccepted(_))
        ));
    }
}
