//! Response types for the upload and chat endpoints

use serde::{Deserialize, Serialize};

use super::document::ChunkMetadata;

/// Answer returned when the collection has nothing to retrieve
pub const NO_DOCUMENTS_MESSAGE: &str =
    "I don't have any documents loaded yet. Please upload a document first to get started.";

/// Response from a successful upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_name: String,
    pub chunks_added: usize,
    pub message: String,
}

impl UploadResponse {
    /// Create a success response for an indexed file
    pub fn new(file_name: impl Into<String>, chunks_added: usize) -> Self {
        let file_name = file_name.into();
        Self {
            success: true,
            message: format!("Document \"{}\" uploaded and processed successfully", file_name),
            file_name,
            chunks_added,
        }
    }
}

/// A retrieved chunk echoed back to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub file_name: String,
    pub chunk_index: usize,
}

impl From<&ChunkMetadata> for Source {
    fn from(metadata: &ChunkMetadata) -> Self {
        Self {
            file_name: metadata.file_name.clone(),
            chunk_index: metadata.chunk_index,
        }
    }
}

/// Response from the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// Generated answer
    pub response: String,
    /// Context sent to the generator
    pub context: String,
    /// Where the context came from
    pub sources: Vec<Source>,
}

impl ChatResponse {
    /// Fixed reply for an empty corpus
    pub fn no_documents() -> Self {
        Self {
            response: NO_DOCUMENTS_MESSAGE.to_string(),
            context: String::new(),
            sources: Vec::new(),
        }
    }
}

/// JSON error body: `{"error": "...", "details": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
