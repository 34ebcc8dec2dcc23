//! Core types for the RAGAI service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ChunkMetadata, FileType, IndexBatch};
pub use query::ChatRequest;
pub use response::{ChatResponse, ErrorBody, Source, UploadResponse};
