//! In-process vector store
//!
//! Rows live in insertion order behind a lock; queries rank by cosine
//! similarity. Used for local runs without a Chroma account and in tests.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use super::embedding::EmbeddingProvider;
use super::vector_store::{
    validate_batch, validate_query, RetrievedChunk, VectorCollection, VectorStoreProvider,
};
use crate::error::{Error, Result};
use crate::types::{ChunkMetadata, IndexBatch};

/// Named in-memory collections sharing one embedder
pub struct InMemoryStore {
    embedder: Arc<dyn EmbeddingProvider>,
    collections: Mutex<HashMap<String, Arc<InMemoryCollection>>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            collections: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryStore {
    async fn get_or_create_collection(&self, name: &str) -> Result<Arc<dyn VectorCollection>> {
        let mut collections = self.collections.lock();
        let collection: Arc<dyn VectorCollection> = collections
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating in-memory collection '{}'", name);
                Arc::new(InMemoryCollection::new(name, self.embedder.clone()))
            })
            .clone();
        Ok(collection)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

struct StoredRow {
    id: String,
    text: String,
    metadata: ChunkMetadata,
    embedding: Vec<f32>,
}

/// A single in-memory collection
pub struct InMemoryCollection {
    name: String,
    embedder: Arc<dyn EmbeddingProvider>,
    rows: RwLock<Vec<StoredRow>>,
}

impl InMemoryCollection {
    /// Create an empty collection
    pub fn new(name: impl Into<String>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            name: name.into(),
            embedder,
            rows: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VectorCollection for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add(&self, batch: &IndexBatch) -> Result<()> {
        validate_batch(batch)?;

        let embeddings = self.embedder.embed_batch(&batch.documents).await?;
        if embeddings.len() != batch.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                batch.len(),
                embeddings.len()
            )));
        }

        let mut rows = self.rows.write();
        for (chunk, embedding) in batch.chunks().zip(embeddings) {
            let row = StoredRow {
                id: chunk.id,
                text: chunk.text,
                metadata: chunk.metadata,
                embedding,
            };
            match rows.iter_mut().find(|existing| existing.id == row.id) {
                Some(existing) => *existing = row,
                None => rows.push(row),
            }
        }

        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        validate_query(text)?;

        let query_embedding = self.embedder.embed(text).await?;

        let rows = self.rows.read();
        let mut scored: Vec<(f32, &StoredRow)> = rows
            .iter()
            .map(|row| (cosine_similarity(&query_embedding, &row.embedding), row))
            .collect();
        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(score, row)| RetrievedChunk {
                id: row.id.clone(),
                text: row.text.clone(),
                metadata: Some(row.metadata.clone()),
                distance: Some(1.0 - score),
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.rows.read().len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Cosine similarity, 0.0 when either vector has zero length
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
