use thiserror::Error;

#[derive(Error, Debug)]
pub enum PastezError {
    /// The paste has no identifier or storage path yet (not created), or
    /// no paste with the given identifier exists.
    #[error("Paste not found: {0}")]
    NotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Storage init failed: {0}")]
    StorageInit(String),

    /// The version-history backend reported an error. Propagated as-is;
    /// mutations are never retried since a second commit would
    /// double-record.
    #[error("History backend error: {0}")]
    Backend(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A private paste was opened without ownership or its key.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PastezError>;
