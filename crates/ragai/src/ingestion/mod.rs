//! Document ingestion: extraction, chunking and chunk identity

pub mod chunker;
pub mod identifier;
mod parser;
mod processor;

pub use chunker::{chunk_text, ChunkSpan, TextChunker};
pub use identifier::chunk_id;
pub use parser::{ExtractedText, FileParser};
pub use processor::IngestPipeline;
