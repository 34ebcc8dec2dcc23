//! Error types for the RAGAI service

use thiserror::Error;

/// Result type alias for RAGAI operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAGAI errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chunk window parameters that would never advance the cursor
    #[error("Invalid chunking configuration: chunk_size={chunk_size}, overlap={overlap} (overlap must be smaller than a non-zero chunk_size)")]
    InvalidChunking { chunk_size: usize, overlap: usize },

    /// Client input error (missing file, invalid message, empty text)
    #[error("{0}")]
    BadRequest(String),

    /// Text extraction failed for a known format
    #[error("Failed to extract text from {format}: {message}")]
    Extraction { format: String, message: String },

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector database error
    #[error("Vector database error: {0}")]
    VectorDb(String),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a client input error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an extraction error tagged with the upper-cased format name
    pub fn extraction(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            format: format.into().to_uppercase(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector db error
    pub fn vector_db(message: impl Into<String>) -> Self {
        Self::VectorDb(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the caller supplied bad input (reported as 400)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_message_carries_format() {
        let err = Error::extraction("pdf", "PDF contains no extractable text");
        assert_eq!(
            err.to_string(),
            "Failed to extract text from PDF: PDF contains no extractable text"
        );
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_bad_request_is_client_error() {
        let err = Error::bad_request("No file provided");
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "No file provided");
    }
}
