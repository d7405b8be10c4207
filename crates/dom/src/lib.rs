//! Tree backend contract and an arena-backed markup tree.
//!
//! The builder in `mixup-core` is written against [`TreeBackend`]; [`Tree`]
//! is the in-memory implementation the rest of the workspace uses, and
//! [`serialize`] turns a built tree into XML text.

pub mod backend;
pub mod error;
pub mod node;
pub mod serialize;
pub mod tree;

pub use backend::TreeBackend;
pub use error::DomError;
pub use node::{Attribute, NodeType};
pub use serialize::{SerializeOptions, serialize};
pub use tree::{Children, NodeId, Tree};
