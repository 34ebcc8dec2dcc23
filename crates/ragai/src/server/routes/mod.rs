//! API routes for the RAG server

pub mod chat;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::error::Error;
use crate::server::state::AppState;
use crate::types::ErrorBody;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload - with larger body limit for file uploads
        .route(
            "/upload",
            post(upload::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/chat", post(chat::chat))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "name": "ragai",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document chat: upload files, ask questions answered from their content",
        "collection": state.collection().name(),
        "backend": config.vector_db.backend,
        "models": {
            "generation": config.llm.generate_model,
            "embedding": config.llm.embed_model
        },
        "chunking": config.chunking,
        "endpoints": {
            "POST /api/upload": "Upload a document (multipart field \"file\")",
            "POST /api/chat": "Ask a question ({\"message\": \"...\"})",
            "GET /api/info": "Service information",
            "GET /health": "Liveness check",
            "GET /ready": "Vector store readiness check"
        }
    }))
}

/// Error response: status plus `{"error", "details"}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Client error with a bare message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.into(),
                details: None,
            },
        }
    }

    /// Map a handler failure to a response
    ///
    /// Client errors keep their own message. Everything else becomes a 500
    /// with `failure` as the error and the cause as details.
    pub fn from_error(failure: &str, err: Error) -> Self {
        if err.is_client_error() {
            tracing::warn!("{}: {}", failure, err);
            return Self::bad_request(err.to_string());
        }

        tracing::error!("{}: {}", failure, err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: failure.to_string(),
                details: Some(err.to_string()),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
