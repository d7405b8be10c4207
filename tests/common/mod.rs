#![allow(dead_code)]

use mixup::{MixupError, NodeId, RenderBuilder, RootKind, SerializeOptions, Tree, TreeBackend, serialize};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Render a JSON spec into a new document with default settings
pub fn render(spec: Value) -> Result<String, MixupError> {
    RenderBuilder::new().build().render_value(spec)
}

/// Render a JSON spec into a document fragment
pub fn render_fragment(spec: Value) -> Result<String, MixupError> {
    RenderBuilder::new()
        .with_root(RootKind::Fragment)
        .build()
        .render_value(spec)
}

/// A tree with a document holding a single `<root/>` element
pub fn doc_with_root() -> Result<(Tree, NodeId, NodeId), MixupError> {
    let mut tree = Tree::new();
    let doc = tree.create_document();
    let root = tree.create_element(doc, "root")?;
    tree.append_child(doc, root)?;
    Ok((tree, doc, root))
}

/// Compact serialization of `node`
pub fn to_xml(tree: &Tree, node: NodeId) -> Result<String, MixupError> {
    Ok(serialize(tree, node, &SerializeOptions::default())?)
}
