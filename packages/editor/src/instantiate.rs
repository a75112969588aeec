//! # Seed Instantiation
//!
//! Turns a pattern into a new subtree ready for editing. When the pattern
//! has a seed, its markup is materialized: literal elements are typed by
//! resolving their tag against the enclosing pattern, `here` becomes the
//! focus placeholder and every `hold` an unfilled placeholder. Without a
//! seed the result is the bare element.

use folio_common::{Child, Node, NodePath, Placeholder};
use folio_schema::{ContentModelResolver, SchemaError, SchemaRegistry, SchemaResult};
use folio_seed::{SeedElement, SeedNode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Where a new node goes relative to the node the user acted on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// As a child of the target
    #[default]
    Nested,
    /// Next to the target, in its parent
    Sibling,
}

impl Placement {
    /// Seed variant name consulted for this placement
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Nested => "nested",
            Placement::Sibling => "sibling",
        }
    }
}

/// How the user asked for a new node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionContext {
    #[serde(default)]
    pub placement: Placement,

    /// Seed variant to prefer over the placement's and the default seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Fail with `MissingSeed` instead of producing a bare element
    #[serde(default)]
    pub require_seed: bool,
}

impl InsertionContext {
    pub fn nested() -> Self {
        Self::default()
    }

    pub fn sibling() -> Self {
        Self {
            placement: Placement::Sibling,
            ..Self::default()
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn requiring_seed(mut self) -> Self {
        self.require_seed = true;
        self
    }

    /// Variant names to try, most specific first
    fn seed_keys(&self) -> Vec<&str> {
        self.variant
            .as_deref()
            .into_iter()
            .chain(std::iter::once(self.placement.as_str()))
            .collect()
    }
}

/// A freshly instantiated subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub root: Node,

    /// Node receiving editing focus, relative to `root`
    pub focus: NodePath,
}

pub struct SeedInstantiator<'r> {
    resolver: ContentModelResolver<'r>,
}

impl<'r> SeedInstantiator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            resolver: ContentModelResolver::new(registry),
        }
    }

    #[instrument(skip(self, context), fields(placement = context.placement.as_str(), variant = ?context.variant))]
    pub fn instantiate(&self, pattern_id: &str, context: &InsertionContext) -> SchemaResult<Fragment> {
        let definition = self.resolver.registry().lookup(pattern_id)?;

        let Some(seed) = definition.seeds.select(&context.seed_keys()) else {
            if context.require_seed {
                return Err(SchemaError::MissingSeed(pattern_id.to_string()));
            }
            debug!("no seed, instantiating bare element");
            return Ok(Fragment {
                root: Node::new(pattern_id, definition.element_name()),
                focus: NodePath::root(),
            });
        };

        let mut focus = None;
        let root = self.materialize(pattern_id, &seed.root, &NodePath::root(), &mut focus)?;
        Ok(Fragment {
            root,
            focus: focus.unwrap_or_default(),
        })
    }

    fn materialize(
        &self,
        pattern_id: &str,
        element: &SeedElement,
        path: &NodePath,
        focus: &mut Option<NodePath>,
    ) -> SchemaResult<Node> {
        let mut node = Node::new(pattern_id, self.resolver.resolve_element_name(pattern_id)?);
        for (name, value) in &element.attributes {
            node.set_attribute(name.as_str(), value.as_str());
        }

        for (index, child) in element.children.iter().enumerate() {
            match child {
                SeedNode::Element(child) => {
                    let Some(child_pattern) =
                        self.resolver.resolve_child_pattern(pattern_id, &child.tag)?
                    else {
                        warn!(parent = pattern_id, tag = %child.tag, "seed element matches no child pattern");
                        return Err(SchemaError::unknown_pattern(child.tag.clone()));
                    };
                    let child = self.materialize(child_pattern, child, &path.child(index), focus)?;
                    node.children.push(Child::Element(child));
                }
                SeedNode::Text { content } => node.children.push(Child::text(content.as_str())),
                SeedNode::Here => {
                    *focus = Some(path.clone());
                    node.children.push(Child::Placeholder {
                        kind: Placeholder::Focus,
                    });
                }
                SeedNode::Hold => node.children.push(Child::Placeholder {
                    kind: Placeholder::Hold,
                }),
            }
        }

        Ok(node)
    }
}
