use folio_common::{ErrorKind, NodePath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One structural problem found in a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Location of the offending node, relative to the validated root
    pub path: NodePath,

    /// Pattern id of the offending node
    pub pattern: String,

    pub kind: ErrorKind,

    /// Human-readable explanation
    pub detail: String,
}

impl Violation {
    pub fn new(
        path: NodePath,
        pattern: impl Into<String>,
        kind: ErrorKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            path,
            pattern: pattern.into(),
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.path, self.pattern, self.kind, self.detail
        )
    }
}

/// Ordered list of violations; empty means valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    pub fn at<'a>(&'a self, path: &'a NodePath) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| &v.path == path)
    }

    pub fn has(&self, kind: ErrorKind) -> bool {
        self.of_kind(kind).next().is_some()
    }
}

impl Extend<Violation> for ValidationReport {
    fn extend<T: IntoIterator<Item = Violation>>(&mut self, iter: T) {
        self.violations.extend(iter);
    }
}

impl IntoIterator for ValidationReport {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "valid");
        }
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_violations_in_order() {
        let mut report = ValidationReport::new();
        assert_eq!(report.to_string(), "valid");

        report.push(Violation::new(
            NodePath::from_indices(vec![0, 2]),
            "tr",
            ErrorKind::AttributeValueNotInDomain,
            "align=\"top\"",
        ));
        report.push(Violation::new(
            NodePath::root(),
            "cell",
            ErrorKind::UnknownPattern,
            "not declared",
        ));

        assert_eq!(
            report.to_string(),
            "/0/2 [tr] attribute-value-not-in-domain: align=\"top\"\n/ [cell] unknown-pattern: not declared"
        );
        assert!(report.has(ErrorKind::UnknownPattern));
        assert!(!report.has(ErrorKind::UnknownAttribute));
        assert_eq!(report.at(&NodePath::root()).count(), 1);
    }
}
