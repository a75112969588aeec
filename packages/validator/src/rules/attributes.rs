use crate::report::Violation;
use crate::rules::{RuleContext, ValidationRule};
use folio_common::ErrorKind;

/// Attributes must be declared and hold a value of their domain
pub struct AttributeRule;

impl ValidationRule for AttributeRule {
    fn name(&self) -> &'static str {
        "attributes"
    }

    fn description(&self) -> &'static str {
        "Attributes declared by the pattern, with values in their domain"
    }

    fn check_node(&self, context: &RuleContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for attribute in &context.node.attributes {
            match context.definition.attribute(&attribute.name) {
                None => violations.push(context.violation(
                    ErrorKind::UnknownAttribute,
                    format!("attribute '{}' is not declared", attribute.name),
                )),
                Some(domain) if !domain.contains(&attribute.value) => {
                    let mut detail = format!(
                        "{}=\"{}\" is not an allowed value",
                        attribute.name, attribute.value
                    );
                    if let Some(values) = domain.values() {
                        let values: Vec<&str> = values.iter().map(String::as_str).collect();
                        detail.push_str(&format!(" (expected one of: {})", values.join(", ")));
                    }
                    violations.push(context.violation(ErrorKind::AttributeValueNotInDomain, detail));
                }
                Some(_) => {}
            }
        }

        violations
    }
}
