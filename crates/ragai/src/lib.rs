//! ragai: retrieval-augmented document chat
//!
//! Uploaded files are reduced to plain text, split into overlapping windows
//! and indexed in a vector collection under identifiers derived from the file
//! name. Chat messages retrieve the closest chunks and hand them to Gemini as
//! context for the answer.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use ingestion::{chunk_id, chunk_text, FileParser, IngestPipeline, TextChunker};
pub use retrieval::ChatService;
pub use types::{
    document::{Chunk, ChunkMetadata, FileType},
    query::ChatRequest,
    response::{ChatResponse, UploadResponse},
};
