//! Defines the contract the markup builder consumes from a mutable node tree.
use crate::error::DomError;
use crate::node::{Attribute, NodeType};
use std::fmt::Debug;
use std::hash::Hash;

/// The operations the spec interpreter performs against a host tree.
///
/// The builder is written exclusively against this trait, so it can attach
/// nodes to any tree that implements it. Nodes are addressed through cheap,
/// copyable handles; the backend owns the storage.
pub trait TreeBackend {
    /// A handle to a node owned by this backend.
    type Node: Debug + Clone + Copy + PartialEq + Eq + Hash;

    // --- Navigation ---

    fn node_type(&self, node: Self::Node) -> NodeType;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    fn last_child(&self, node: Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// The document that created `node`. `None` for documents themselves.
    fn owner_document(&self, node: Self::Node) -> Option<Self::Node>;

    // --- Element reads ---

    /// The namespace URI of an element, if it was created namespace-aware.
    fn namespace_uri(&self, node: Self::Node) -> Option<&str>;

    /// The prefix of an element's qualified name.
    fn prefix(&self, node: Self::Node) -> Option<&str>;

    /// All attributes of an element. Empty for every other node type.
    fn attributes(&self, node: Self::Node) -> &[Attribute];

    // --- Creation ---

    fn create_document(&mut self) -> Self::Node;

    fn create_document_fragment(&mut self, doc: Self::Node) -> Self::Node;

    /// Creates an element with no namespace.
    fn create_element(&mut self, doc: Self::Node, name: &str) -> Result<Self::Node, DomError>;

    /// Creates an element in `namespace` from a possibly prefixed qualified name.
    fn create_element_ns(
        &mut self,
        doc: Self::Node,
        namespace: &str,
        qualified_name: &str,
    ) -> Result<Self::Node, DomError>;

    fn create_text(&mut self, doc: Self::Node, data: &str) -> Self::Node;

    fn create_comment(&mut self, doc: Self::Node, data: &str) -> Self::Node;

    fn create_cdata_section(&mut self, doc: Self::Node, data: &str) -> Result<Self::Node, DomError>;

    fn create_processing_instruction(
        &mut self,
        doc: Self::Node,
        target: &str,
        data: &str,
    ) -> Result<Self::Node, DomError>;

    // --- Mutation ---

    /// Appends `child` as the last child of `parent`. Fragments are expanded.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), DomError>;

    /// Inserts `child` before `reference`, or appends when `reference` is `None`.
    fn insert_before(
        &mut self,
        parent: Self::Node,
        child: Self::Node,
        reference: Option<Self::Node>,
    ) -> Result<(), DomError>;

    /// Puts `new_child` where `old_child` was and detaches `old_child`.
    fn replace_child(
        &mut self,
        parent: Self::Node,
        new_child: Self::Node,
        old_child: Self::Node,
    ) -> Result<(), DomError>;

    /// Copies `node`, and its whole subtree when `deep` is set. The copy is detached.
    fn clone_node(&mut self, node: Self::Node, deep: bool) -> Self::Node;

    // --- Attributes ---

    fn set_attribute(&mut self, element: Self::Node, name: &str, value: &str)
    -> Result<(), DomError>;

    fn set_attribute_ns(
        &mut self,
        element: Self::Node,
        namespace: &str,
        qualified_name: &str,
        value: &str,
    ) -> Result<(), DomError>;
}
