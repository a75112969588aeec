use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of structural problems shared by schema lookups and validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The pattern id is not declared in the registry
    UnknownPattern,

    /// The attribute is not declared for the pattern
    UnknownAttribute,

    /// The attribute is declared but the value is outside its domain
    AttributeValueNotInDomain,

    /// No content alternative accepts the node's children
    NoCompatibleContentAlternative,

    /// A non-bare seed was required but the pattern has none
    MissingSeed,

    /// The schema entry itself is structurally invalid
    MalformedPattern,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownPattern => "unknown-pattern",
            ErrorKind::UnknownAttribute => "unknown-attribute",
            ErrorKind::AttributeValueNotInDomain => "attribute-value-not-in-domain",
            ErrorKind::NoCompatibleContentAlternative => "no-compatible-content-alternative",
            ErrorKind::MissingSeed => "missing-seed",
            ErrorKind::MalformedPattern => "malformed-pattern",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_by_variant_name() {
        let json = serde_json::to_string(&ErrorKind::MissingSeed).unwrap();
        assert_eq!(json, "\"MissingSeed\"");
        assert_eq!(ErrorKind::MissingSeed.to_string(), "missing-seed");
    }
}
