use crate::report::Violation;
use crate::rules::{RuleContext, ValidationRule};
use folio_common::ErrorKind;

/// Children must fit one content alternative of the node's pattern
///
/// Text children count as `TEXT`; placeholders are ignored.
pub struct ContentModelRule;

impl ValidationRule for ContentModelRule {
    fn name(&self) -> &'static str {
        "content-model"
    }

    fn description(&self) -> &'static str {
        "Child sequence accepted by at least one content alternative"
    }

    fn check_node(&self, context: &RuleContext<'_>) -> Vec<Violation> {
        let children = context.node.child_pattern_ids();
        match context.resolver.check_children(context.definition, &children) {
            Ok(()) => Vec::new(),
            Err(mismatch) => vec![context.violation(
                ErrorKind::NoCompatibleContentAlternative,
                format!("no content alternative accepts {}", mismatch),
            )],
        }
    }
}
