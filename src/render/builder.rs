// src/render/builder.rs
use super::config::{RenderConfig, RootKind};
use crate::error::MixupError;
use mixup_core::{BuildOptions, MarkupBuilder, NamespacePolicy};
use mixup_dom::{NodeId, Tree, TreeBackend, serialize};
use mixup_spec::Spec;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

/// A builder for creating a [`Renderer`].
#[derive(Debug, Clone, Default)]
pub struct RenderBuilder {
    config: RenderConfig,
}

impl RenderBuilder {
    /// Creates a `RenderBuilder` with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Starts from settings stored in a JSON file.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self, MixupError> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|e| {
            MixupError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path_ref.display(), e),
            ))
        })?;
        let config = serde_json::from_str(&source)
            .map_err(|e| MixupError::Config(format!("'{}': {}", path_ref.display(), e)))?;
        Ok(Self::from_config(config))
    }

    pub fn with_indent(mut self, width: usize) -> Self {
        self.config.indent = Some(width);
        self
    }

    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.config.xml_declaration = declaration;
        self
    }

    pub fn with_namespace_policy(mut self, policy: NamespacePolicy) -> Self {
        self.config.namespace_policy = policy;
        self
    }

    pub fn with_root(mut self, root: RootKind) -> Self {
        self.config.root = root;
        self
    }

    pub fn build(self) -> Renderer {
        Renderer {
            config: self.config,
        }
    }
}

/// Builds specs into a fresh tree and serializes the result.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Parses `source` as JSON and renders it.
    pub fn render_str(&self, source: &str) -> Result<String, MixupError> {
        let value: Value = serde_json::from_str(source)?;
        self.render_value(value)
    }

    pub fn render_value(&self, value: Value) -> Result<String, MixupError> {
        self.render_spec(Spec::from(value), Vec::new())
    }

    /// Renders a spec that may hold callables, evaluated with `args`.
    pub fn render_spec(
        &self,
        spec: Spec<NodeId>,
        args: Vec<Spec<NodeId>>,
    ) -> Result<String, MixupError> {
        let mut tree = Tree::new();
        let root = self.build_into(&mut tree, spec, args)?;
        Ok(serialize(&tree, root, &self.config.serialize_options())?)
    }

    /// Builds `spec` into a new document or fragment of `tree` and returns
    /// that container.
    pub fn build_into(
        &self,
        tree: &mut Tree,
        spec: Spec<NodeId>,
        args: Vec<Spec<NodeId>>,
    ) -> Result<NodeId, MixupError> {
        let doc = tree.create_document();
        let root = match self.config.root {
            RootKind::Document => doc,
            RootKind::Fragment => tree.create_document_fragment(doc),
        };
        log::debug!("Rendering into a new {}", tree.node_type(root));
        MarkupBuilder::new(tree)
            .with_config(self.config.build_config())
            .build(BuildOptions::parent(root).with_doc(doc), spec, args)?;
        Ok(root)
    }
}
