//! # Folio Seeds
//!
//! Seed templates describe how to build a new, minimally valid instance of
//! a pattern. They are written as a small markup dialect inside schema files:
//!
//! ```text
//! <list><item e4x='here'/><item e4x='hold'/></list>
//! ```
//!
//! The `e4x` pseudo-attribute marks an element as the focus slot (`here`)
//! or as a required-but-unfilled slot (`hold`). Parsing happens once, when
//! the schema is loaded; the resulting [`Seed`] AST carries explicit
//! [`SeedNode::Here`] and [`SeedNode::Hold`] markers instead of attributes.

pub mod ast;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use ast::{MarkerCount, Seed, SeedElement, SeedNode};
pub use error::{ParseError, ParseResult};
pub use parser::{parse_seed, Parser, MARKER_ATTRIBUTE};
pub use tokenizer::{tokenize, Token};

#[cfg(feature = "pretty-errors")]
pub use error::format_error;
