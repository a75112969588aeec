use crate::report::Violation;
use crate::rules::{RuleContext, ValidationRule};
use folio_common::ErrorKind;

/// A node's tag must be the element name its pattern serializes to
pub struct ElementNameRule;

impl ValidationRule for ElementNameRule {
    fn name(&self) -> &'static str {
        "element-name"
    }

    fn description(&self) -> &'static str {
        "Element tag matches the pattern's element name"
    }

    fn check_node(&self, context: &RuleContext<'_>) -> Vec<Violation> {
        let expected = context.definition.element_name();
        if context.node.element == expected {
            return Vec::new();
        }
        vec![context.violation(
            ErrorKind::UnknownPattern,
            format!(
                "element '{}' does not match pattern '{}' (expected '{}')",
                context.node.element, context.node.pattern, expected
            ),
        )]
    }
}
