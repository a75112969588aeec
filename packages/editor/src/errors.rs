//! Error types for the editor

use folio_common::NodePath;
use folio_schema::SchemaError;
use folio_validator::ValidationReport;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Pattern '{pattern}' cannot be inserted into '{parent}' at {path}")]
    NotAllowed {
        parent: String,
        pattern: String,
        path: NodePath,
    },

    #[error("Fragment does not validate:\n{0}")]
    InvalidFragment(ValidationReport),
}

impl EditorError {
    /// Violations that caused a refused paste, if any
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            EditorError::InvalidFragment(report) => Some(report),
            _ => None,
        }
    }
}
