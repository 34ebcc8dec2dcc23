//! Application state for the RAG server

use std::sync::Arc;

use crate::config::{RagConfig, VectorBackend};
use crate::error::Result;
use crate::ingestion::IngestPipeline;
use crate::providers::{
    ChromaClient, EmbeddingProvider, GeminiClient, InMemoryStore, LlmProvider, VectorCollection,
    VectorStoreProvider,
};
use crate::retrieval::ChatService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Collection shared by upload and chat
    collection: Arc<dyn VectorCollection>,
    /// Chunking and indexing
    pipeline: IngestPipeline,
    /// Retrieval and generation
    chat: ChatService,
}

impl AppState {
    /// Create new application state
    ///
    /// Opens the configured collection once; every request reuses the handle.
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            "Initializing RAGAI application state (backend: {:?})...",
            config.vector_db.backend
        );

        let gemini = Arc::new(GeminiClient::new(&config.llm)?);
        tracing::info!(
            "Gemini client initialized (generation: {}, embeddings: {})",
            config.llm.generate_model,
            config.llm.embed_model
        );

        let embedder: Arc<dyn EmbeddingProvider> = gemini.clone();
        let store: Box<dyn VectorStoreProvider> = match config.vector_db.backend {
            VectorBackend::Chroma => {
                tracing::info!("Using Chroma at {}", config.vector_db.chroma.base_url);
                Box::new(ChromaClient::new(&config.vector_db.chroma, embedder))
            }
            VectorBackend::Memory => {
                tracing::warn!("Using in-memory vector store, indexed chunks are lost on restart");
                Box::new(InMemoryStore::new(embedder))
            }
        };

        let collection = store
            .get_or_create_collection(&config.vector_db.collection_name)
            .await?;
        tracing::info!(
            "Collection '{}' ready via {} provider",
            collection.name(),
            store.name()
        );

        Self::from_parts(config, collection, gemini)
    }

    /// Assemble state from already-built providers
    pub fn from_parts(
        config: RagConfig,
        collection: Arc<dyn VectorCollection>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let pipeline = IngestPipeline::new(&config.chunking)?;
        let chat = ChatService::new(collection.clone(), llm, config.retrieval);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                collection,
                pipeline,
                chat,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the shared collection
    pub fn collection(&self) -> &Arc<dyn VectorCollection> {
        &self.inner.collection
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Get the chat service
    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }

    /// Check if the vector store answers
    pub async fn is_ready(&self) -> bool {
        match self.inner.collection.health_check().await {
            Ok(ready) => ready,
            Err(e) => {
                tracing::warn!("Readiness check failed: {}", e);
                false
            }
        }
    }
}
