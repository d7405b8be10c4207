use crate::attach::Attachment;
use mixup_dom::{DomError, NodeType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Not sure what to do with a {0}")]
    UnsupportedInput(String),

    #[error("Cannot bind to {mode}: {existing} is already present")]
    ConflictingBinding {
        mode: Attachment,
        existing: Attachment,
    },

    #[error("{key}: {found} is not a node")]
    NotANode { key: String, found: String },

    #[error("{mode} must be a document or element, not a {found}")]
    NotElementOrDocument { mode: Attachment, found: NodeType },

    #[error("{0} node must have a parent node")]
    DetachedReference(Attachment),

    #[error("Ambiguous designators {0} and {1}")]
    AmbiguousDesignators(String, String),

    #[error("Spec object has no designator (keys: {0})")]
    MissingDesignator(String),

    #[error("Element designator has no tag name")]
    MissingTagName,

    #[error("Invalid element name '{0}'")]
    InvalidName(String),

    #[error("No namespace bound for prefix '{prefix}' in '{name}'")]
    UnboundPrefix { prefix: String, name: String },

    #[error("DTDs are not implemented")]
    DoctypeUnsupported,

    #[error("Processing instructions need a target")]
    MissingPiTarget,

    #[error("Tree error: {0}")]
    Dom(#[from] DomError),
}
