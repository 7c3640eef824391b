use thiserror::Error;
use verlog_types::DocumentId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("document {id} is at the maximum version and accepts no further writes")]
    VersionOverflow { id: DocumentId },
}

pub type EngineResult<T> = Result<T, EngineError>;
