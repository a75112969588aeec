use folio_common::ErrorKind;
use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Failure of a schema lookup, query or composition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Unknown pattern '{0}'")]
    UnknownPattern(String),

    #[error("Attribute '{attribute}' is not declared on pattern '{pattern}'")]
    UnknownAttribute { pattern: String, attribute: String },

    #[error("Value '{value}' is not allowed for attribute '{attribute}' on pattern '{pattern}'")]
    AttributeValueNotInDomain {
        pattern: String,
        attribute: String,
        value: String,
    },

    #[error("No content alternative of '{pattern}' accepts {detail}")]
    NoCompatibleContentAlternative { pattern: String, detail: String },

    #[error("Pattern '{0}' has no seed")]
    MissingSeed(String),

    #[error("Malformed pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },
}

impl SchemaError {
    pub fn unknown_pattern(pattern: impl Into<String>) -> Self {
        Self::UnknownPattern(pattern.into())
    }

    pub fn unknown_attribute(pattern: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            pattern: pattern.into(),
            attribute: attribute.into(),
        }
    }

    pub fn not_in_domain(
        pattern: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::AttributeValueNotInDomain {
            pattern: pattern.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn no_alternative(pattern: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NoCompatibleContentAlternative {
            pattern: pattern.into(),
            detail: detail.into(),
        }
    }

    pub fn malformed(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Position of this error in the shared taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchemaError::UnknownPattern(_) => ErrorKind::UnknownPattern,
            SchemaError::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            SchemaError::AttributeValueNotInDomain { .. } => ErrorKind::AttributeValueNotInDomain,
            SchemaError::NoCompatibleContentAlternative { .. } => {
                ErrorKind::NoCompatibleContentAlternative
            }
            SchemaError::MissingSeed(_) => ErrorKind::MissingSeed,
            SchemaError::MalformedPattern { .. } => ErrorKind::MalformedPattern,
        }
    }
}
