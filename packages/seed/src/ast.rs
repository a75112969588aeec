use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Parsed seed template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub root: SeedElement,
}

/// Literal element of a seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<SeedNode>,
    /// Byte range of the start tag in the seed source
    pub span: Range<usize>,
}

/// Seed AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SeedNode {
    Element(SeedElement),
    Text { content: String },
    /// Focus slot, exactly one per well-formed seed
    Here,
    /// Required-but-unfilled slot
    Hold,
}

/// Number of placeholder markers in a seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerCount {
    pub here: usize,
    pub hold: usize,
}

impl Seed {
    pub fn root_tag(&self) -> &str {
        &self.root.tag
    }

    pub fn markers(&self) -> MarkerCount {
        let mut count = MarkerCount::default();
        self.root.count_markers(&mut count);
        count
    }

    /// A seed is well formed when it holds exactly one focus slot
    pub fn is_well_formed(&self) -> bool {
        self.markers().here == 1
    }

    /// Every element tag used below the root, in document order
    pub fn descendant_tags(&self) -> Vec<&str> {
        let mut tags = Vec::new();
        self.root.collect_tags(&mut tags);
        tags
    }
}

impl SeedElement {
    fn count_markers(&self, count: &mut MarkerCount) {
        for child in &self.children {
            match child {
                SeedNode::Here => count.here += 1,
                SeedNode::Hold => count.hold += 1,
                SeedNode::Element(element) => element.count_markers(count),
                SeedNode::Text { .. } => {}
            }
        }
    }

    fn collect_tags<'a>(&'a self, tags: &mut Vec<&'a str>) {
        for child in &self.children {
            if let SeedNode::Element(element) = child {
                tags.push(element.tag.as_str());
                element.collect_tags(tags);
            }
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
