//! Tree view of a document fragment.
//!
//! This is the snapshot the editor hands in for validation and the shape
//! instantiated fragments are handed back in. Nodes are typed by pattern id;
//! the element name is what a serializer writes as the tag.

use crate::path::NodePath;
use serde::{Deserialize, Serialize};

/// Content marker standing for raw text in child sequences and content models
pub const TEXT_MARKER: &str = "TEXT";

/// Element node typed by its schema pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub pattern: String,
    pub element: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Child of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Child {
    Element(Node),
    Text { content: String },
    /// Empty slot left by seed instantiation, rendered by the editor
    Placeholder { kind: Placeholder },
}

/// Editor-visible empty slots produced from seed markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// Where editing focus moves after insertion
    Focus,
    /// Required content that has not been filled yet
    Hold,
}

impl Node {
    pub fn new(pattern: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            element: element.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Child::Text {
            content: content.into(),
        });
        self
    }

    pub fn with_placeholder(mut self, kind: Placeholder) -> Self {
        self.children.push(Child::Placeholder { kind });
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(index).value)
    }

    /// Child pattern ids as seen by content models
    ///
    /// Text children map to [`TEXT_MARKER`]; placeholders are skipped since
    /// they stand for content that does not exist yet.
    pub fn child_pattern_ids(&self) -> Vec<&str> {
        self.children.iter().filter_map(Child::pattern_id).collect()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(node) => Some(node),
            _ => None,
        })
    }

    pub fn has_placeholders(&self) -> bool {
        self.children.iter().any(|child| match child {
            Child::Placeholder { .. } => true,
            Child::Element(node) => node.has_placeholders(),
            Child::Text { .. } => false,
        })
    }

    /// Find the element at `path`, relative to this node
    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        let mut current = self;
        for index in path.indices() {
            match current.children.get(*index)? {
                Child::Element(node) => current = node,
                _ => return None,
            }
        }
        Some(current)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let mut current = self;
        for index in path.indices() {
            match current.children.get_mut(*index)? {
                Child::Element(node) => current = node,
                _ => return None,
            }
        }
        Some(current)
    }
}

impl Child {
    pub fn text(content: impl Into<String>) -> Self {
        Child::Text {
            content: content.into(),
        }
    }

    /// Pattern id of this child for content matching, `None` for placeholders
    pub fn pattern_id(&self) -> Option<&str> {
        match self {
            Child::Element(node) => Some(node.pattern.as_str()),
            Child::Text { .. } => Some(TEXT_MARKER),
            Child::Placeholder { .. } => None,
        }
    }

    pub fn as_element(&self) -> Option<&Node> {
        match self {
            Child::Element(node) => Some(node),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::new("list", "list")
            .with_child(Node::new("block.head", "head"))
            .with_child(Node::new("item", "item").with_text("first"))
            .with_placeholder(Placeholder::Hold)
    }

    #[test]
    fn test_child_pattern_ids_skip_placeholders() {
        let list = sample();
        assert_eq!(list.child_pattern_ids(), vec!["block.head", "item"]);
        assert_eq!(
            list.get(&NodePath::from_indices(vec![1])).unwrap().child_pattern_ids(),
            vec![TEXT_MARKER]
        );
    }

    #[test]
    fn test_get_follows_element_children_only() {
        let list = sample();
        assert_eq!(list.get(&NodePath::root()).unwrap().pattern, "list");
        assert_eq!(
            list.get(&NodePath::from_indices(vec![1])).unwrap().pattern,
            "item"
        );
        // Text and placeholder children are not addressable as nodes
        assert!(list.get(&NodePath::from_indices(vec![1, 0])).is_none());
        assert!(list.get(&NodePath::from_indices(vec![2])).is_none());
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut node = Node::new("tr", "tr")
            .with_attribute("align", "left")
            .with_attribute("valign", "top");
        node.set_attribute("align", "right");
        assert_eq!(node.attributes[0].name, "align");
        assert_eq!(node.attribute("align"), Some("right"));
        assert_eq!(node.remove_attribute("valign"), Some("top".to_string()));
        assert_eq!(node.attributes.len(), 1);
    }

    #[test]
    fn test_serde_shape() {
        let node = Node::new("p", "p").with_text("Hi");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["children"][0]["type"], "Text");
        assert_eq!(json["children"][0]["content"], "Hi");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
