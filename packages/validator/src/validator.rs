use crate::report::{ValidationReport, Violation};
use crate::rules::{RuleContext, RuleSet};
use folio_common::{walk_node, ErrorKind, Node, NodePath, Visitor};
use folio_schema::{ContentModelResolver, SchemaRegistry};
use tracing::{debug, instrument};

/// Options for configuring validation
#[derive(Debug, Default)]
pub struct ValidateOptions {
    /// Custom rule set (uses default if None)
    pub rules: Option<RuleSet>,

    /// Path of the validated root inside a larger document
    pub base_path: NodePath,
}

/// Validate `root` and everything below it with the default rules
pub fn validate(registry: &SchemaRegistry, root: &Node) -> ValidationReport {
    validate_with(registry, root, ValidateOptions::default())
}

#[instrument(skip_all, fields(root = %root.pattern, base = %options.base_path))]
pub fn validate_with(
    registry: &SchemaRegistry,
    root: &Node,
    options: ValidateOptions,
) -> ValidationReport {
    let rules = options.rules.unwrap_or_default();
    let mut validator = StructureValidator::new(registry, &rules);
    validator.visit_node(root, &options.base_path);

    let report = validator.finish();
    debug!(violations = report.len(), "validation finished");
    report
}

/// Visitor running every rule on every node with a declared pattern
pub struct StructureValidator<'a> {
    resolver: ContentModelResolver<'a>,
    rules: &'a RuleSet,
    report: ValidationReport,
}

impl<'a> StructureValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry, rules: &'a RuleSet) -> Self {
        Self {
            resolver: ContentModelResolver::new(registry),
            rules,
            report: ValidationReport::new(),
        }
    }

    pub fn finish(self) -> ValidationReport {
        self.report
    }
}

impl<'a> Visitor for StructureValidator<'a> {
    fn visit_node(&mut self, node: &Node, path: &NodePath) {
        let Some(definition) = self.resolver.registry().get(&node.pattern) else {
            // Without a definition nothing below can be checked meaningfully
            self.report.push(Violation::new(
                path.clone(),
                node.pattern.clone(),
                ErrorKind::UnknownPattern,
                format!("pattern '{}' is not declared", node.pattern),
            ));
            return;
        };

        let context = RuleContext {
            resolver: self.resolver,
            definition,
            node,
            path,
        };
        for rule in self.rules.rules() {
            self.report.extend(rule.check_node(&context));
        }

        walk_node(self, node, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_schema::{compose, RawSchema};

    fn registry() -> SchemaRegistry {
        let raw = RawSchema::from_json(
            r#"{ "patterns": {
                "table": { "content": [["tr"]] },
                "tr": {
                    "attributes": { "align": ["left", "right", "center", "justify"] },
                    "content": [["td"]]
                },
                "td": { "content": [["TEXT"]] }
            } }"#,
        )
        .unwrap();
        compose(raw, []).unwrap()
    }

    #[test]
    fn test_unknown_pattern_is_not_descended() {
        let registry = registry();
        let table = Node::new("table", "table").with_child(
            Node::new("row", "row").with_child(Node::new("cell", "cell")),
        );

        let report = validate(&registry, &table);
        let kinds: Vec<_> = report.iter().map(|v| (v.path.to_string(), v.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("/".to_string(), ErrorKind::NoCompatibleContentAlternative),
                ("/0".to_string(), ErrorKind::UnknownPattern),
            ]
        );
    }

    #[test]
    fn test_base_path_prefixes_reported_paths() {
        let registry = registry();
        let tr = Node::new("tr", "tr").with_attribute("align", "top");
        let report = validate_with(
            &registry,
            &tr,
            ValidateOptions {
                base_path: NodePath::from_indices(vec![3, 1]),
                ..Default::default()
            },
        );
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations()[0].path.to_string(), "/3/1");
    }

    #[test]
    fn test_empty_rule_set_only_checks_patterns() {
        let registry = registry();
        let tr = Node::new("tr", "tr")
            .with_attribute("align", "top")
            .with_child(Node::new("td", "td").with_child(Node::new("b", "b")));
        let report = validate_with(
            &registry,
            &tr,
            ValidateOptions {
                rules: Some(RuleSet::empty()),
                ..Default::default()
            },
        );
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations()[0].kind, ErrorKind::UnknownPattern);
        assert_eq!(report.violations()[0].path.to_string(), "/0/0");
    }
}
