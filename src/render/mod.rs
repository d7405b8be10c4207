//! Spec rendering: build into a fresh tree, then serialize.
//!
//! - [`RenderBuilder`]: fluent builder for a [`Renderer`]
//! - [`RenderConfig`]: file-loadable settings
//! - [`RootKind`]: document or fragment output
//!
//! # Example
//!
//! ```ignore
//! use mixup::{RenderBuilder, RootKind};
//!
//! let renderer = RenderBuilder::new()
//!     .with_root(RootKind::Fragment)
//!     .with_indent(2)
//!     .build();
//!
//! let xml = renderer.render_str(r#"[{ "#p": "one" }, { "#p": "two" }]"#)?;
//! ```

mod builder;
pub mod config;

pub use builder::{RenderBuilder, Renderer};
pub use config::{RenderConfig, RootKind};
