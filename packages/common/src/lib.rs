pub mod error;
pub mod path;
pub mod tree;
pub mod visitor;

pub use error::*;
pub use path::*;
pub use tree::*;
pub use visitor::*;
