//! Schema side of Folio.
//!
//! Raw JSON schema layers are composed into an immutable [`SchemaRegistry`]
//! of typed [`PatternDefinition`]s. The [`ContentModelResolver`] answers the
//! questions an editor asks while building a document: which child patterns
//! may be inserted at a point, whether text may be typed there, and which
//! values an attribute accepts.

pub mod compose;
pub mod config;
pub mod definition;
pub mod error;
pub mod raw;
pub mod registry;
pub mod resolver;

pub use compose::compose;
pub use config::{ConfigError, ConfigResult, SchemaConfig, DEFAULT_CONFIG_NAME};
pub use definition::{
    is_value_in_domain, AttributeDomain, ContentAlternative, ContentItem, PatternDefinition,
    SeedSet, OCCURS_ONCE,
};
pub use error::{SchemaError, SchemaResult};
pub use raw::{GroupRef, RawAlternative, RawContentItem, RawPattern, RawSchema};
pub use registry::SchemaRegistry;
pub use resolver::{ContentMismatch, ContentModelResolver};
