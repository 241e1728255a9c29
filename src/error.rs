use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtokollError {
    #[error("Not in a protokoll project. Run 'protokoll init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .protokoll/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Sitzung not found: {0}")]
    SitzungNotFound(String),

    #[error("Not found: {0}")]
    EntityNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtokollError>;
