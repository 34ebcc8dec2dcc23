//! Document upload endpoint

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use super::ApiError;
use crate::error::{Error, Result};
use crate::ingestion::{ExtractedText, FileParser};
use crate::server::state::AppState;
use crate::types::{ErrorBody, FileType, UploadResponse};

/// Multipart field carrying the document
const FILE_FIELD: &str = "file";

const UPLOAD_FAILED: &str = "Failed to process document";

/// POST /api/upload - Extract, chunk and index one document
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> std::result::Result<Json<UploadResponse>, ApiError> {
    let start = Instant::now();

    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(e)),
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("file_{}.bin", Uuid::new_v4()));

        let data = field.bytes().await.map_err(multipart_error)?;

        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(ApiError::bad_request("No file provided"));
    };

    tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());

    let extracted = extract(filename.clone(), data.to_vec())
        .await
        .map_err(|e| ApiError::from_error(UPLOAD_FAILED, e))?;

    if extracted.is_blank() {
        tracing::warn!("No text content found in '{}'", filename);
        return Err(ApiError::bad_request("No text content found in document"));
    }

    let chunks_added = state
        .pipeline()
        .index_document(state.collection().as_ref(), &filename, &extracted.content)
        .await
        .map_err(|e| ApiError::from_error(UPLOAD_FAILED, e))?;

    tracing::info!(
        "Uploaded '{}' ({}): {} chunks in {}ms",
        filename,
        extracted.file_type.display_name(),
        chunks_added,
        start.elapsed().as_millis()
    );

    Ok(Json(UploadResponse::new(filename, chunks_added)))
}

/// Body read failures keep axum's status (413 past the upload limit)
fn multipart_error(e: MultipartError) -> ApiError {
    tracing::error!("Failed to read multipart body: {}", e);
    ApiError {
        status: e.status(),
        body: ErrorBody {
            error: UPLOAD_FAILED.to_string(),
            details: Some(e.body_text()),
        },
    }
}

/// Run extraction on the blocking pool
///
/// A panicking parser surfaces as an extraction error for the file's format.
async fn extract(filename: String, data: Vec<u8>) -> Result<ExtractedText> {
    let format = FileType::from_filename(&filename).display_name();
    tokio::task::spawn_blocking(move || FileParser::extract(&filename, &data))
        .await
        .map_err(|e| Error::extraction(format, format!("Extraction task failed: {}", e)))?
}
