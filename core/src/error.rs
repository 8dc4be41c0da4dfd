use thiserror::Error;

/// Failures of the feedback engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A document that breaks the value contract of [`crate::Document`]
    /// (an invalid document type for the index).
    #[error("invalid document {key:?}: {reason}")]
    InvalidDocument { key: String, reason: String },
}

impl Error {
    pub fn invalid_document(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidDocument { key: key.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
