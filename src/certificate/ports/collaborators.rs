//! Recognition and extraction collaborator ports.

use async_trait::async_trait;
use thiserror::Error;

/// An uploaded certificate scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    file_name: String,
    content: Vec<u8>,
}

impl SourceDocument {
    /// Wraps an uploaded document.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Returns the uploaded file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the raw document bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Failure reported by a collaborator call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The service could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with an error status.
    #[error("service rejected request with status {status}: {message}")]
    Rejected {
        /// Status code reported by the service.
        status: u16,
        /// Message reported by the service.
        message: String,
    },

    /// The reply did not have the expected shape.
    #[error("malformed reply: {0}")]
    MalformedResponse(String),
}

/// Turns a document scan into lines of text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRecognizer: Send + Sync {
    /// Recognizes the text of every page, in reading order.
    async fn recognize(&self, document: &SourceDocument) -> Result<Vec<String>, CollaboratorError>;
}

/// Turns recognized text into the certificate JSON object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Returns the extractor's reply content, expected to be a JSON object.
    async fn extract(&self, text: &str) -> Result<String, CollaboratorError>;
}
