//! Ingestion pipeline: chunk extracted text and index it in a collection

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::providers::VectorCollection;
use crate::types::{Chunk, ChunkMetadata, IndexBatch};

use super::chunker::TextChunker;
use super::identifier::chunk_id;

/// Turns extracted text into an indexable batch
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestPipeline {
    chunker: TextChunker,
}

impl IngestPipeline {
    /// Create a pipeline, validating the chunk window
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            chunker: TextChunker::from_config(config)?,
        })
    }

    /// Chunk the text and assign ids and metadata
    pub fn prepare(&self, file_name: &str, text: &str) -> IndexBatch {
        let texts = self.chunker.chunk(text);
        let total_chunks = texts.len();

        texts
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| Chunk {
                id: chunk_id(file_name, chunk_index),
                text,
                metadata: ChunkMetadata {
                    file_name: file_name.to_string(),
                    chunk_index,
                    total_chunks,
                },
            })
            .collect()
    }

    /// Chunk the text and add every chunk to the collection in one call
    ///
    /// Returns the number of chunks added. Chunks left over from an earlier,
    /// longer upload of the same file are not removed.
    pub async fn index_document(
        &self,
        collection: &dyn VectorCollection,
        file_name: &str,
        text: &str,
    ) -> Result<usize> {
        let batch = self.prepare(file_name, text);
        let count = batch.len();

        collection.add(&batch).await?;

        tracing::info!(
            "Indexed '{}' into '{}': {} chunks",
            file_name,
            collection.name(),
            count
        );

        Ok(count)
    }
}
