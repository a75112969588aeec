use crate::path::NodePath;
use crate::tree::{Child, Node, Placeholder};

/// Visitor pattern for traversing document trees immutably
///
/// The default implementations walk the entire tree in document order.
/// Override specific visit_* methods to act on nodes; call [`walk_node`]
/// from an override to keep descending.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &Node, path: &NodePath) {
        walk_node(self, node, path);
    }

    fn visit_text(&mut self, _content: &str, _path: &NodePath) {
        // Leaf, nothing to walk
    }

    fn visit_placeholder(&mut self, _kind: Placeholder, _path: &NodePath) {
        // Leaf, nothing to walk
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node, path: &NodePath) {
    for (index, child) in node.children.iter().enumerate() {
        let child_path = path.child(index);
        match child {
            Child::Element(node) => visitor.visit_node(node, &child_path),
            Child::Text { content } => visitor.visit_text(content, &child_path),
            Child::Placeholder { kind } => visitor.visit_placeholder(*kind, &child_path),
        }
    }
}

/// Collects every placeholder in a tree with the path of the node holding it
#[derive(Debug, Default)]
pub struct PlaceholderCollector {
    pub found: Vec<(NodePath, Placeholder)>,
}

impl Visitor for PlaceholderCollector {
    fn visit_placeholder(&mut self, kind: Placeholder, path: &NodePath) {
        if let Some((owner, _)) = path.split_last() {
            self.found.push((owner, kind));
        }
    }
}

impl PlaceholderCollector {
    pub fn collect(root: &Node) -> Vec<(NodePath, Placeholder)> {
        let mut collector = Self::default();
        collector.visit_node(root, &NodePath::root());
        collector.found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PatternCounter {
        patterns: Vec<(String, String)>,
        texts: usize,
    }

    impl Visitor for PatternCounter {
        fn visit_node(&mut self, node: &Node, path: &NodePath) {
            self.patterns.push((path.to_string(), node.pattern.clone()));
            walk_node(self, node, path);
        }

        fn visit_text(&mut self, _content: &str, _path: &NodePath) {
            self.texts += 1;
        }
    }

    #[test]
    fn test_walks_in_document_order() {
        let tree = Node::new("section", "section")
            .with_child(Node::new("p", "p").with_text("one"))
            .with_child(Node::new("p", "p").with_text("two"));

        let mut counter = PatternCounter {
            patterns: Vec::new(),
            texts: 0,
        };
        counter.visit_node(&tree, &NodePath::root());

        assert_eq!(
            counter.patterns,
            vec![
                ("/".to_string(), "section".to_string()),
                ("/0".to_string(), "p".to_string()),
                ("/1".to_string(), "p".to_string()),
            ]
        );
        assert_eq!(counter.texts, 2);
    }

    #[test]
    fn test_placeholder_collector_reports_owner_paths() {
        let tree = Node::new("list", "list")
            .with_child(Node::new("item", "item").with_placeholder(Placeholder::Focus))
            .with_child(Node::new("item", "item").with_placeholder(Placeholder::Hold));

        let found = PlaceholderCollector::collect(&tree);
        assert_eq!(
            found,
            vec![
                (NodePath::from_indices(vec![0]), Placeholder::Focus),
                (NodePath::from_indices(vec![1]), Placeholder::Hold),
            ]
        );
    }
}
