// src/error.rs
use mixup_core::BuildError;
use mixup_dom::DomError;
use thiserror::Error;

/// Everything that can go wrong between reading a spec and writing XML.
#[derive(Error, Debug)]
pub enum MixupError {
    #[error("Spec is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    #[error("Serialization failed: {0}")]
    Dom(#[from] DomError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration is invalid: {0}")]
    Config(String),
}
