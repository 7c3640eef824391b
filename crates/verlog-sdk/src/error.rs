use thiserror::Error;
use verlog_types::DocumentId;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("invalid argument for {id}: {reason}")]
    InvalidArgument { id: DocumentId, reason: String },

    #[error("gave up on {id} after {attempts} conflicting attempts")]
    RetriesExhausted { id: DocumentId, attempts: u32 },

    #[error("engine error: {0}")]
    Engine(#[from] verlog_engine::EngineError),

    #[error("store error: {0}")]
    Store(#[from] verlog_store::StoreError),

    #[error("type error: {0}")]
    Type(#[from] verlog_types::TypeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
