use mixup_core::{BuildConfig, NamespacePolicy};
use mixup_dom::SerializeOptions;
use serde::Deserialize;

/// What the rendered spec is built into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootKind {
    /// A new document. Top-level text and extra root elements are rejected. (Default)
    #[default]
    Document,
    /// A document fragment, which accepts any mix of top-level nodes.
    Fragment,
}

/// Settings for a render run, loadable from a JSON file:
///
/// ```json
/// { "namespace-policy": "strict", "indent": 2, "xml-declaration": true, "root": "fragment" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderConfig {
    pub namespace_policy: NamespacePolicy,
    /// Indent width for pretty output. Compact when absent.
    pub indent: Option<usize>,
    pub xml_declaration: bool,
    pub root: RootKind,
}

impl RenderConfig {
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            namespace_policy: self.namespace_policy,
        }
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            indent: self.indent,
            xml_declaration: self.xml_declaration,
        }
    }
}
