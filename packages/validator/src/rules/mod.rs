mod attributes;
mod content_model;
mod element_name;

pub use attributes::AttributeRule;
pub use content_model::ContentModelRule;
pub use element_name::ElementNameRule;

use crate::report::Violation;
use folio_common::{Node, NodePath};
use folio_schema::{ContentModelResolver, PatternDefinition};

/// What a rule sees of the node under check
pub struct RuleContext<'a> {
    pub resolver: ContentModelResolver<'a>,

    /// Definition of the node's pattern, already resolved
    pub definition: &'a PatternDefinition,

    pub node: &'a Node,
    pub path: &'a NodePath,
}

impl<'a> RuleContext<'a> {
    pub fn violation(&self, kind: folio_common::ErrorKind, detail: impl Into<String>) -> Violation {
        Violation::new(self.path.clone(), self.node.pattern.clone(), kind, detail)
    }
}

/// Trait for implementing structural checks
///
/// Rules only run on nodes whose pattern is declared; unknown patterns are
/// reported by the validator itself.
pub trait ValidationRule {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    fn check_node(&self, context: &RuleContext<'_>) -> Vec<Violation>;
}

/// Ordered set of rules run on every node
pub struct RuleSet {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RuleSet {
    /// Element name, then content model, then attributes
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(ElementNameRule),
                Box::new(ContentModelRule),
                Box::new(AttributeRule),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[Box<dyn ValidationRule>] {
        &self.rules
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field(
                "rules",
                &self.rules.iter().map(|rule| rule.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
