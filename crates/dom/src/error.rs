use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Node not found: {0}")]
    NotFound(String),

    #[error("Invalid character in name '{0}'")]
    InvalidCharacter(String),

    #[error("Wrong node type: expected {expected}, found {found}")]
    WrongNodeType { expected: &'static str, found: String },

    #[error("Serialization error: {0}")]
    Serialize(String),
}
