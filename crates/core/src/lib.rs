//! # mixup-core
//!
//! Interprets declarative markup specs and attaches the resulting nodes to a
//! live tree.
//!
//! A spec is a [`Spec`] value: strings become text nodes, lists become
//! sibling batches, callables are evaluated with the build args, existing
//! nodes are deep-cloned, and mappings describe elements, comments, CDATA
//! sections and processing instructions through a `#`-prefixed designator key.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mixup_core::{BuildOptions, MarkupBuilder};
//! use mixup_dom::{Tree, TreeBackend};
//! use mixup_spec::Spec;
//! use serde_json::json;
//!
//! let mut tree = Tree::new();
//! let spec = Spec::from(json!({
//!     "#html": [{ "#body": { "#p": "Hello" } }],
//!     "xmlns": "http://www.w3.org/1999/xhtml"
//! }));
//! let html = MarkupBuilder::new(&mut tree).build(BuildOptions::new_document(), spec, vec![])?;
//! ```
//!
//! ## Modules
//!
//! - [`request`]: the two calling conventions and their normalization
//! - [`namespace`]: namespace scopes and their recovery from a tree
//! - [`element`]: element creation with namespace-aware attributes
//! - [`attach`]: the `parent`/`before`/`after`/`replace` strategies
//! - [`builder`]: the recursive interpreter

pub mod attach;
pub mod builder;
pub mod config;
pub mod element;
pub mod error;
pub mod namespace;
pub mod request;

pub use attach::Attachment;
pub use builder::{MarkupBuilder, build};
pub use config::{BuildConfig, NamespacePolicy};
pub use element::{TagName, materialize_element};
pub use error::BuildError;
pub use namespace::{NamespaceMap, declared_scope, gather_namespaces};
pub use request::{BuildOptions, Request, Target, normalize};

// Re-export the value model so callers need only this crate.
pub use mixup_spec::{Spec, SpecMap, Thunk, flatten, flatten_with};
