//! Structural validation of document trees against a schema registry.
//!
//! Validation never stops at the first problem: every node is visited and
//! the [`ValidationReport`] lists each violation in document order, a
//! node's own violations before those of its children.

mod report;
mod rules;
mod validator;

pub use report::{ValidationReport, Violation};
pub use rules::{
    AttributeRule, ContentModelRule, ElementNameRule, RuleContext, RuleSet, ValidationRule,
};
pub use validator::{validate, validate_with, StructureValidator, ValidateOptions};
