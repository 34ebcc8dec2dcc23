//! Chat orchestration: retrieve, build context, generate

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{LlmProvider, VectorCollection};
use crate::types::{ChatResponse, Source};

/// Answers questions from the chunks in one collection
#[derive(Clone)]
pub struct ChatService {
    collection: Arc<dyn VectorCollection>,
    llm: Arc<dyn LlmProvider>,
    config: RetrievalConfig,
}

impl ChatService {
    /// Create a new chat service
    pub fn new(
        collection: Arc<dyn VectorCollection>,
        llm: Arc<dyn LlmProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            collection,
            llm,
            config,
        }
    }

    /// Answer a validated, non-blank message
    ///
    /// When retrieval yields no context the generator is not called and the
    /// fixed "no documents" reply is returned.
    pub async fn answer(&self, message: &str) -> Result<ChatResponse> {
        let results = self.collection.query(message, self.config.top_k).await?;
        let context = PromptBuilder::build_context(&results);

        if context.is_empty() {
            tracing::info!("No context retrieved for chat message, returning fallback");
            return Ok(ChatResponse::no_documents());
        }

        tracing::debug!(
            "Retrieved {} chunks ({} chars of context) from '{}'",
            results.len(),
            context.len(),
            self.collection.name()
        );

        let response = self.llm.generate_answer(message, &context).await?;

        let sources = results
            .iter()
            .take(self.config.max_sources)
            .filter_map(|result| result.metadata.as_ref().map(Source::from))
            .collect();

        Ok(ChatResponse {
            response,
            context,
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ingestion::IngestPipeline;
    use crate::providers::llm::MockLlmProvider;
    use crate::providers::memory::{tests::KeywordEmbedder, InMemoryStore};
    use crate::providers::VectorStoreProvider;
    use crate::types::response::NO_DOCUMENTS_MESSAGE;
    use mockall::predicate::{always, eq};

    async fn empty_collection() -> Arc<dyn VectorCollection> {
        InMemoryStore::new(Arc::new(KeywordEmbedder))
            .get_or_create_collection("RAGAI_v2")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_collection_returns_fallback_without_generating() {
        let mut llm = MockLlmProvider::new();
        llm.expect_generate_answer().times(0);

        let service = ChatService::new(
            empty_collection().await,
            Arc::new(llm),
            RetrievalConfig::default(),
        );
        let response = service.answer("what is in my files?").await.unwrap();

        assert_eq!(response.response, NO_DOCUMENTS_MESSAGE);
        assert!(response.context.is_empty());
        assert!(response.sources.is_empty());
    }

    #[tokio::test]
    async fn test_answer_uses_retrieved_context_and_caps_sources() {
        let collection = empty_collection().await;
        for (name, text) in [
            ("a.txt", "alpha facts"),
            ("b.txt", "beta facts"),
            ("c.txt", "gamma facts"),
            ("d.txt", "delta facts"),
        ] {
            IngestPipeline::default()
                .index_document(collection.as_ref(), name, text)
                .await
                .unwrap();
        }

        let mut llm = MockLlmProvider::new();
        llm.expect_generate_answer()
            .with(eq("tell me facts"), always())
            .times(1)
            .returning(|_, context| {
                assert_eq!(context.matches("\n\n---\n\n").count(), 3);
                Ok("Four facts.".to_string())
            });

        let service = ChatService::new(collection, Arc::new(llm), RetrievalConfig::default());
        let response = service.answer("tell me facts").await.unwrap();

        assert_eq!(response.response, "Four facts.");
        assert!(response.context.contains("alpha facts"));
        assert!(response.context.contains("delta facts"));
        assert_eq!(response.sources.len(), 3);
        assert!(response.sources.iter().all(|s| s.chunk_index == 0));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let collection = empty_collection().await;
        IngestPipeline::default()
            .index_document(collection.as_ref(), "a.txt", "some text")
            .await
            .unwrap();

        let mut llm = MockLlmProvider::new();
        llm.expect_generate_answer()
            .returning(|_, _| Err(Error::llm("quota exceeded")));

        let service = ChatService::new(collection, Arc::new(llm), RetrievalConfig::default());
        let err = service.answer("some question").await.unwrap_err();
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("quota exceeded"));
    }
}
