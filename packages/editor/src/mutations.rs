//! # Document Mutations
//!
//! Edits an editor can request on a session's document. Paths address nodes
//! by child index from the document root, on the snapshot the mutation was
//! built against.
//!
//! ## Mutation Semantics
//!
//! ### InsertPattern
//! - Instantiates the pattern and inserts the fragment
//! - Refused unless the pattern is in the target's insertion menu
//! - Nested without an index fills the target's first placeholder, else appends
//! - Sibling goes right after the target, in its parent
//!
//! ### Paste
//! - Inserts a ready-made subtree with the same placement rules
//! - Refused with the validation report when the subtree is invalid
//!
//! ### UpdateText
//! - Atomic replacement of a text child
//! - A placeholder becomes text when the parent accepts text there

use folio_common::{Child, Node, NodePath};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::instantiate::{InsertionContext, Placement};

/// Schema-checked edits on a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a new instance of a pattern
    InsertPattern {
        target: NodePath,
        pattern: String,
        #[serde(default)]
        context: InsertionContext,
        /// Child position for nested insertion
        #[serde(default)]
        index: Option<usize>,
    },

    /// Insert an existing subtree, e.g. from the clipboard
    Paste {
        target: NodePath,
        fragment: Node,
        #[serde(default)]
        placement: Placement,
        #[serde(default)]
        index: Option<usize>,
    },

    SetAttribute {
        path: NodePath,
        name: String,
        value: String,
    },

    RemoveAttribute {
        path: NodePath,
        name: String,
    },

    /// Remove a node and all its descendants
    RemoveNode {
        path: NodePath,
    },

    /// Replace a text child (atomic replacement)
    UpdateText {
        path: NodePath,
        content: String,
    },
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertPattern { .. } => "insert-pattern",
            Mutation::Paste { .. } => "paste",
            Mutation::SetAttribute { .. } => "set-attribute",
            Mutation::RemoveAttribute { .. } => "remove-attribute",
            Mutation::RemoveNode { .. } => "remove-node",
            Mutation::UpdateText { .. } => "update-text",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodePath),

    #[error("Child {index} out of bounds under {parent}")]
    IndexOutOfBounds { parent: NodePath, index: usize },

    #[error("Attribute '{name}' not set on {path}")]
    AttributeNotFound { path: NodePath, name: String },

    #[error("Node at {0} is not text")]
    NotText(NodePath),

    #[error("Text cannot be typed at {0}")]
    TextNotAccepted(NodePath),

    #[error("Cannot remove the document root")]
    CannotRemoveRoot,

    #[error("Cannot insert a sibling of the document root")]
    SiblingOfRoot,
}

/// Where an insertion lands: parent path and child index
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    pub parent: NodePath,
    pub index: usize,
    /// The child at `index` is a placeholder being filled
    pub fills_placeholder: bool,
}

impl InsertionPoint {
    pub fn path(&self) -> NodePath {
        self.parent.child(self.index)
    }
}

/// Resolve where a node inserted at `target` with `placement` goes
pub(crate) fn insertion_point(
    document: &Node,
    target: &NodePath,
    placement: Placement,
    index: Option<usize>,
) -> Result<InsertionPoint, MutationError> {
    match placement {
        Placement::Sibling => {
            let (parent, position) = target.split_last().ok_or(MutationError::SiblingOfRoot)?;
            let siblings = element_at(document, &parent)?.children.len();
            if position >= siblings {
                return Err(MutationError::NodeNotFound(target.clone()));
            }
            Ok(InsertionPoint {
                parent,
                index: position + 1,
                fills_placeholder: false,
            })
        }
        Placement::Nested => {
            let node = element_at(document, target)?;
            if let Some(index) = index {
                if index > node.children.len() {
                    return Err(MutationError::IndexOutOfBounds {
                        parent: target.clone(),
                        index,
                    });
                }
                return Ok(InsertionPoint {
                    parent: target.clone(),
                    index,
                    fills_placeholder: false,
                });
            }
            let slot = node
                .children
                .iter()
                .position(|child| matches!(child, Child::Placeholder { .. }));
            Ok(InsertionPoint {
                parent: target.clone(),
                index: slot.unwrap_or(node.children.len()),
                fills_placeholder: slot.is_some(),
            })
        }
    }
}

pub(crate) fn element_at<'a>(document: &'a Node, path: &NodePath) -> Result<&'a Node, MutationError> {
    document
        .get(path)
        .ok_or_else(|| MutationError::NodeNotFound(path.clone()))
}

pub(crate) fn element_at_mut<'a>(
    document: &'a mut Node,
    path: &NodePath,
) -> Result<&'a mut Node, MutationError> {
    document
        .get_mut(path)
        .ok_or_else(|| MutationError::NodeNotFound(path.clone()))
}

/// Insert `node` at `point`, replacing the placeholder it fills
pub(crate) fn insert_at(document: &mut Node, point: &InsertionPoint, node: Node) -> Result<(), MutationError> {
    let parent = element_at_mut(document, &point.parent)?;
    if point.fills_placeholder {
        parent.children[point.index] = Child::Element(node);
    } else {
        parent.children.insert(point.index, Child::Element(node));
    }
    Ok(())
}

/// Remove the child at `path` and return it
pub(crate) fn remove_at(document: &mut Node, path: &NodePath) -> Result<Child, MutationError> {
    let (parent, index) = path.split_last().ok_or(MutationError::CannotRemoveRoot)?;
    let parent_node = element_at_mut(document, &parent)?;
    if index >= parent_node.children.len() {
        return Err(MutationError::NodeNotFound(path.clone()));
    }
    Ok(parent_node.children.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::Placeholder;

    fn document() -> Node {
        Node::new("section", "section")
            .with_child(Node::new("p", "p").with_text("one"))
            .with_child(Node::new("list", "list").with_placeholder(Placeholder::Hold))
    }

    #[test]
    fn test_sibling_goes_after_target() {
        let doc = document();
        let point =
            insertion_point(&doc, &NodePath::from_indices(vec![0]), Placement::Sibling, None).unwrap();
        assert_eq!(point.parent, NodePath::root());
        assert_eq!(point.index, 1);
        assert!(!point.fills_placeholder);
    }

    #[test]
    fn test_nested_fills_placeholder_first() {
        let doc = document();
        let list = NodePath::from_indices(vec![1]);
        let point = insertion_point(&doc, &list, Placement::Nested, None).unwrap();
        assert_eq!(point.path(), NodePath::from_indices(vec![1, 0]));
        assert!(point.fills_placeholder);

        let explicit = insertion_point(&doc, &list, Placement::Nested, Some(1)).unwrap();
        assert!(!explicit.fills_placeholder);
        assert_eq!(
            insertion_point(&doc, &list, Placement::Nested, Some(2)),
            Err(MutationError::IndexOutOfBounds {
                parent: list,
                index: 2
            })
        );
    }

    #[test]
    fn test_root_has_no_siblings() {
        let doc = document();
        assert_eq!(
            insertion_point(&doc, &NodePath::root(), Placement::Sibling, None),
            Err(MutationError::SiblingOfRoot)
        );
        assert_eq!(
            remove_at(&mut document(), &NodePath::root()),
            Err(MutationError::CannotRemoveRoot)
        );
    }

    #[test]
    fn test_text_child_is_not_an_element() {
        let doc = document();
        let text = NodePath::from_indices(vec![0, 0]);
        assert_eq!(
            insertion_point(&doc, &text, Placement::Nested, None),
            Err(MutationError::NodeNotFound(text))
        );
    }

    #[test]
    fn test_mutation_json_shape() {
        let mutation: Mutation = serde_json::from_str(
            r#"{ "InsertPattern": { "target": [1], "pattern": "item", "context": { "placement": "sibling" } } }"#,
        )
        .unwrap();
        assert_eq!(
            mutation,
            Mutation::InsertPattern {
                target: NodePath::from_indices(vec![1]),
                pattern: "item".to_string(),
                context: InsertionContext::sibling(),
                index: None,
            }
        );
        assert_eq!(mutation.name(), "insert-pattern");
    }
}
