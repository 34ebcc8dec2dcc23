//! Provider abstractions for embeddings, answer generation and vector storage
//!
//! The core only talks to these traits, so chunking and orchestration stay
//! testable without network access.

pub mod chroma;
pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod memory;
pub mod vector_store;

pub use chroma::{ChromaClient, ChromaCollection};
pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::LlmProvider;
pub use memory::{InMemoryCollection, InMemoryStore};
pub use vector_store::{RetrievedChunk, VectorCollection, VectorStoreProvider};
