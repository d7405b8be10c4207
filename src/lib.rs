//! # mixup
//!
//! Builds XML trees from declarative, JSON-like markup specs.
//!
//! The work is split across the workspace crates, re-exported here:
//! - **names**: XML name grammar and the spec key vocabulary
//! - **dom**: the [`TreeBackend`] contract, an arena [`Tree`] and its serializer
//! - **spec**: the [`Spec`] value model and [`flatten`]
//! - **core**: the [`MarkupBuilder`] interpreter
//!
//! This crate adds [`Renderer`], which builds a spec into a fresh tree and
//! serializes it, and the `mixup` command line tool.
//!
//! ```ignore
//! let xml = mixup::render_json(serde_json::json!({ "#p": ["Hi ", { "#b": "there" }] }))?;
//! assert_eq!(xml, "<p>Hi <b>there</b></p>");
//! ```

pub mod error;
pub mod render;

pub use error::MixupError;
pub use render::{RenderBuilder, RenderConfig, Renderer, RootKind};

// Re-export the workspace crates
pub use mixup_core::{
    Attachment, BuildConfig, BuildError, BuildOptions, MarkupBuilder, NamespaceMap,
    NamespacePolicy, Target, build, gather_namespaces,
};
pub use mixup_dom::{DomError, NodeId, NodeType, SerializeOptions, Tree, TreeBackend, serialize};
pub use mixup_names as names;
pub use mixup_spec::{Spec, SpecMap, Thunk, flatten, flatten_with};

/// Renders a JSON spec as a document with default settings.
pub fn render_json(value: serde_json::Value) -> Result<String, MixupError> {
    RenderBuilder::new().build().render_value(value)
}
