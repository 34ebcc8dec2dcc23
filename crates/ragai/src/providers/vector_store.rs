//! Vector store traits: collection handles with add and query

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{ChunkMetadata, IndexBatch};

/// A chunk returned by a similarity query, best match first
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    /// Store key
    pub id: String,
    /// Chunk text
    pub text: String,
    /// Metadata written at insert time, if the store returned it
    pub metadata: Option<ChunkMetadata>,
    /// Store-reported distance (lower is closer)
    pub distance: Option<f32>,
}

/// Handle to one named collection
///
/// Embeddings are computed inside the collection; callers only pass text.
///
/// Implementations:
/// - `ChromaCollection`: Chroma v2 REST API
/// - `InMemoryCollection`: process-local cosine search
#[async_trait]
pub trait VectorCollection: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Insert or overwrite the batch, keyed by id
    async fn add(&self, batch: &IndexBatch) -> Result<()>;

    /// Up to `top_k` chunks ranked by similarity to `text`
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievedChunk>>;

    /// Number of chunks stored
    async fn count(&self) -> Result<usize>;

    /// Check if the backing store is reachable
    async fn health_check(&self) -> Result<bool>;
}

/// Opens collection handles
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Look up a collection by name, creating it if it does not exist
    async fn get_or_create_collection(&self, name: &str) -> Result<Arc<dyn VectorCollection>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Checks shared by every `add` implementation
pub(crate) fn validate_batch(batch: &IndexBatch) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::vector_db("No documents to add"));
    }
    if batch.documents.len() != batch.ids.len() || batch.metadatas.len() != batch.ids.len() {
        return Err(Error::vector_db(format!(
            "IDs and documents length mismatch ({} ids, {} documents, {} metadatas)",
            batch.ids.len(),
            batch.documents.len(),
            batch.metadatas.len()
        )));
    }
    Ok(())
}

/// Checks shared by every `query` implementation
pub(crate) fn validate_query(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::bad_request("Query cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_batch() {
        assert!(matches!(validate_batch(&IndexBatch::default()), Err(Error::VectorDb(_))));

        let mismatched = IndexBatch {
            ids: vec!["a_chunk_0".to_string()],
            documents: Vec::new(),
            metadatas: Vec::new(),
        };
        let err = validate_batch(&mismatched).unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }

    #[test]
    fn test_validate_query() {
        assert!(validate_query("what is this?").is_ok());
        assert!(validate_query("  ").unwrap_err().is_client_error());
    }
}
