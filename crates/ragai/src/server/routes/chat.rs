//! Chat endpoint

use axum::{body::Bytes, extract::State, Json};
use std::time::Instant;

use super::ApiError;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

const CHAT_FAILED: &str = "Failed to process message";

/// POST /api/chat - Answer a question from the indexed documents
///
/// The body is read raw so malformed JSON gets the same 400 as a missing
/// message.
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    let start = Instant::now();

    let request = ChatRequest::from_slice(&body).map_err(|e| ApiError::from_error(CHAT_FAILED, e))?;

    tracing::info!("Chat message received ({} chars)", request.message.chars().count());
    tracing::debug!("Chat: \"{}\"", request.message);

    let response = state
        .chat()
        .answer(&request.message)
        .await
        .map_err(|e| ApiError::from_error(CHAT_FAILED, e))?;

    tracing::info!(
        "Answered in {}ms with {} sources",
        start.elapsed().as_millis(),
        response.sources.len()
    );

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{router, send};
    use crate::error::Error;
    use crate::providers::llm::MockLlmProvider;
    use crate::types::response::NO_DOCUMENTS_MESSAGE;
    use axum::body::Body;
    use axum::http::Request;

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_corpus_returns_fallback() {
        let mut llm = MockLlmProvider::new();
        llm.expect_generate_answer().times(0);
        let (router, _) = router(llm).await;

        let (status, body) = send(router, chat_request(r#"{"message": "hello?"}"#)).await;

        assert_eq!(status, 200);
        assert_eq!(body["response"], NO_DOCUMENTS_MESSAGE);
        assert_eq!(body["context"], "");
        assert_eq!(body["sources"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_invalid_messages_are_rejected() {
        for raw in [r#"{}"#, r#"{"message": 7}"#, "not json", r#"{"message": "  "}"#] {
            let (router, _) = router(MockLlmProvider::new()).await;
            let (status, body) = send(router, chat_request(raw)).await;
            assert_eq!(status, 400, "body: {}", raw);
            assert_eq!(body["error"], "Invalid message");
        }
    }

    #[tokio::test]
    async fn test_answer_with_sources() {
        let mut llm = MockLlmProvider::new();
        llm.expect_generate_answer()
            .times(1)
            .returning(|_, _| Ok("The warranty lasts two years.".to_string()));
        let (router, state) = router(llm).await;

        state
            .pipeline()
            .index_document(
                state.collection().as_ref(),
                "warranty.txt",
                "The warranty lasts two years from purchase.",
            )
            .await
            .unwrap();

        let (status, body) =
            send(router, chat_request(r#"{"message": "How long is the warranty?"}"#)).await;

        assert_eq!(status, 200);
        assert_eq!(body["response"], "The warranty lasts two years.");
        assert_eq!(body["context"], "The warranty lasts two years from purchase.");
        assert_eq!(
            body["sources"],
            serde_json::json!([{"fileName": "warranty.txt", "chunkIndex": 0}])
        );
    }

    #[tokio::test]
    async fn test_generator_failure_is_server_error() {
        let mut llm = MockLlmProvider::new();
        llm.expect_generate_answer()
            .returning(|_, _| Err(Error::llm("model overloaded")));
        let (router, state) = router(llm).await;

        state
            .pipeline()
            .index_document(state.collection().as_ref(), "a.txt", "some indexed text")
            .await
            .unwrap();

        let (status, body) = send(router, chat_request(r#"{"message": "question"}"#)).await;

        assert_eq!(status, 500);
        assert_eq!(body["error"], "Failed to process message");
        assert_eq!(body["details"], "LLM error: model overloaded");
    }
}
