//! # Folio Editor
//!
//! Schema-aware construction and editing of document trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: JSON layers → SchemaRegistry        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession + mutations             │
//! │  - Insertion menus from content models      │
//! │  - Seed instantiation with placeholders     │
//! │  - Attribute domain checks                  │
//! │  - Paste refused unless it validates        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ validator: tree → ValidationReport          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{EditSession, InsertionContext, Mutation};
//! use folio_schema::SchemaConfig;
//! use std::sync::Arc;
//!
//! let config = SchemaConfig::load("schemas")?;
//! let registry = Arc::new(config.load_registry("schemas".as_ref())?);
//! let mut session = EditSession::create(registry, "section")?;
//!
//! // Offer what fits at the root, then insert a list
//! let menu = session.insertion_menu(&NodePath::root())?;
//! let focus = session.apply(Mutation::InsertPattern {
//!     target: NodePath::root(),
//!     pattern: "list".to_string(),
//!     context: InsertionContext::nested(),
//!     index: None,
//! })?;
//! ```
//!
//! The registry is immutable and may be shared by any number of sessions.

mod errors;
mod instantiate;
mod mutations;
mod session;

pub use errors::{EditorError, EditorResult};
pub use instantiate::{Fragment, InsertionContext, Placement, SeedInstantiator};
pub use mutations::{Mutation, MutationError};
pub use session::EditSession;
