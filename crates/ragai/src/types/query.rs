//! Chat request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Message returned for any missing or malformed chat message
pub const INVALID_MESSAGE: &str = "Invalid message";

/// Chat request body: `{"message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's question
    pub message: String,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Parse a raw request body
    ///
    /// Malformed JSON, a missing field, a non-string value and a blank string
    /// are all client errors.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| Error::bad_request(INVALID_MESSAGE))?;

        match value.get("message").and_then(|m| m.as_str()) {
            Some(message) if !message.trim().is_empty() => Ok(Self::new(message)),
            _ => Err(Error::bad_request(INVALID_MESSAGE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_message() {
        let request = ChatRequest::from_slice(br#"{"message": "What is in the report?"}"#).unwrap();
        assert_eq!(request.message, "What is in the report?");
    }

    #[test]
    fn test_rejects_invalid_bodies() {
        let bodies: [&[u8]; 6] = [
            b"not json",
            br#"{}"#,
            br#"{"message": 42}"#,
            br#"{"message": ""}"#,
            br#"{"message": "   "}"#,
            br#"["message"]"#,
        ];
        for body in bodies {
            let err = ChatRequest::from_slice(body).unwrap_err();
            assert!(err.is_client_error());
            assert_eq!(err.to_string(), INVALID_MESSAGE);
        }
    }
}
