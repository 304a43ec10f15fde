//! Error types for the Qualtive client.
//!
//! # Design
//! Each remote operation has its own error enum so that 404 keeps its
//! resource-specific meaning: fetching reports `FetchError::NotFound` for the
//! requested question, posting reports `PostError::QuestionNotFound` for the
//! referenced one. Everything else funnels into the shared `GeneralError`.

use thiserror::Error;

use crate::http::TransportError;

/// A response body did not have the expected wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("body is not valid JSON: {0}")]
    NotJson(String),

    #[error("root value is not an object")]
    NotAnObject,

    #[error("missing or invalid field `{0}`")]
    MissingOrInvalidField(String),
}

impl DecodeError {
    pub(crate) fn field(name: &str) -> Self {
        DecodeError::MissingOrInvalidField(name.to_string())
    }
}

/// A score value outside of `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("score {0} is outside of the valid range 0..=100")]
pub struct ScoreRangeError(pub i64);

/// Failures that are neither connection problems nor resource-specific.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnexpectedError {
    /// The API answered 503.
    #[error("remote is under maintenance")]
    RemoteMaintenance,

    /// Any non-2xx status without a dedicated meaning.
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The request body could not be serialized.
    #[error("request encoding failed: {0}")]
    Encode(String),
}

/// Failure modes shared by every remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneralError {
    #[error(transparent)]
    Unexpected(#[from] UnexpectedError),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request cancelled")]
    Cancelled,
}

/// Errors from fetching a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The requested question does not exist.
    #[error("question not found")]
    NotFound,

    #[error(transparent)]
    General(#[from] GeneralError),
}

/// Errors from posting an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostError {
    /// The question the entry refers to does not exist.
    #[error("question not found")]
    QuestionNotFound,

    #[error(transparent)]
    General(#[from] GeneralError),
}

/// Errors from creating and uploading an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error(transparent)]
    General(#[from] GeneralError),
}

impl From<TransportError> for GeneralError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(message) => GeneralError::Connection(message),
            TransportError::Cancelled => GeneralError::Cancelled,
        }
    }
}

impl From<UnexpectedError> for FetchError {
    fn from(err: UnexpectedError) -> Self {
        FetchError::General(err.into())
    }
}

impl From<UnexpectedError> for PostError {
    fn from(err: UnexpectedError) -> Self {
        PostError::General(err.into())
    }
}

impl From<UnexpectedError> for UploadError {
    fn from(err: UnexpectedError) -> Self {
        UploadError::General(err.into())
    }
}

impl FetchError {
    /// The wrapped general error, if this is not a `NotFound`.
    pub fn general(&self) -> Option<&GeneralError> {
        match self {
            FetchError::NotFound => None,
            FetchError::General(err) => Some(err),
        }
    }
}

impl PostError {
    pub fn general(&self) -> Option<&GeneralError> {
        match self {
            PostError::QuestionNotFound => None,
            PostError::General(err) => Some(err),
        }
    }
}

impl UploadError {
    pub fn general(&self) -> &GeneralError {
        match self {
            UploadError::General(err) => err,
        }
    }
}
