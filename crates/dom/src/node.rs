//! Node categories and attribute records shared by every tree backend.

/// The type of a node in the tree, aligned with the DOM node categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    DocumentFragment,
    Element,
    Text,
    Comment,
    CDataSection,
    ProcessingInstruction,
}

impl NodeType {
    /// True for node types that may hold children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeType::Document | NodeType::DocumentFragment | NodeType::Element
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Document => "document",
            NodeType::DocumentFragment => "document fragment",
            NodeType::Element => "element",
            NodeType::Text => "text",
            NodeType::Comment => "comment",
            NodeType::CDataSection => "CDATA section",
            NodeType::ProcessingInstruction => "processing instruction",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attribute as stored on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub prefix: Option<String>,
    pub local_name: String,
    pub namespace_uri: Option<String>,
    pub value: String,
}

impl Attribute {
    /// The qualified name, e.g. `xlink:href`.
    pub fn name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}
