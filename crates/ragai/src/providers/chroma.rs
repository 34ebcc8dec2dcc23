//! Chroma vector store over the v2 REST API
//!
//! Works against Chroma Cloud (`x-chroma-token` auth) or a self-hosted server.
//! Embeddings are computed client-side by the configured embedder.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::embedding::EmbeddingProvider;
use super::vector_store::{
    validate_batch, validate_query, RetrievedChunk, VectorCollection, VectorStoreProvider,
};
use crate::config::ChromaConfig;
use crate::error::{Error, Result};
use crate::types::{ChunkMetadata, IndexBatch};

/// Authenticated HTTP access shared by the client and its collections
#[derive(Clone)]
struct ChromaHttp {
    client: reqwest::Client,
    api_key: String,
}

impl ChromaHttp {
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.request(method, url);
        if self.api_key.is_empty() {
            request
        } else {
            request.header("x-chroma-token", &self.api_key)
        }
    }

    /// Send a request and decode the JSON body, mapping failures to `VectorDb`
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("Chroma {} request failed: {}", operation, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_db(format!(
                "Chroma {} failed ({}): {}",
                operation, status, body
            )));
        }

        response.json().await.map_err(|e| {
            Error::vector_db(format!("Failed to parse Chroma {} response: {}", operation, e))
        })
    }
}

/// Chroma client scoped to one tenant and database
pub struct ChromaClient {
    http: ChromaHttp,
    base_url: String,
    tenant: String,
    database: String,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl ChromaClient {
    /// Create a new Chroma client
    pub fn new(config: &ChromaConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            http: ChromaHttp {
                client: reqwest::Client::new(),
                api_key: config.api_key.clone(),
            },
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tenant: config.tenant.clone(),
            database: config.database.clone(),
            embedder,
        }
    }

    fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.base_url, self.tenant, self.database
        )
    }
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionModel {
    id: String,
    name: String,
}

#[async_trait]
impl VectorStoreProvider for ChromaClient {
    async fn get_or_create_collection(&self, name: &str) -> Result<Arc<dyn VectorCollection>> {
        let request = self
            .http
            .request(reqwest::Method::POST, &self.collections_url())
            .json(&CreateCollectionRequest {
                name,
                get_or_create: true,
            });
        let model: CollectionModel = self.http.send(request, "get_or_create_collection").await?;

        tracing::info!("Using Chroma collection '{}' ({})", model.name, model.id);

        let collection: Arc<dyn VectorCollection> = Arc::new(ChromaCollection {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            url: format!("{}/{}", self.collections_url(), model.id),
            name: model.name,
            embedder: self.embedder.clone(),
        });
        Ok(collection)
    }

    fn name(&self) -> &str {
        "chroma"
    }
}

/// Handle to one Chroma collection
pub struct ChromaCollection {
    http: ChromaHttp,
    base_url: String,
    /// Collection URL including its id
    url: String,
    name: String,
    embedder: Arc<dyn EmbeddingProvider>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    ids: &'a [String],
    embeddings: Vec<Vec<f32>>,
    documents: &'a [String],
    metadatas: &'a [ChunkMetadata],
}

#[derive(Serialize)]
struct QueryRequest {
    query_embeddings: Vec<Vec<f32>>,
    n_results: usize,
    include: [&'static str; 3],
}

/// Column-oriented query result, one row per query embedding
#[derive(Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<serde_json::Value>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
}

impl QueryResponse {
    /// Flatten the first query row into retrieved chunks
    fn into_chunks(self) -> Vec<RetrievedChunk> {
        let ids = self.ids.into_iter().next().unwrap_or_default();
        let mut documents = first_row(self.documents).into_iter();
        let mut metadatas = first_row(self.metadatas).into_iter();
        let mut distances = first_row(self.distances).into_iter();

        ids.into_iter()
            .map(|id| RetrievedChunk {
                id,
                text: documents.next().flatten().unwrap_or_default(),
                metadata: metadatas
                    .next()
                    .flatten()
                    .and_then(|value| serde_json::from_value(value).ok()),
                distance: distances.next().flatten(),
            })
            .collect()
    }
}

fn first_row<T>(columns: Option<Vec<Vec<Option<T>>>>) -> Vec<Option<T>> {
    columns
        .and_then(|rows| rows.into_iter().next())
        .unwrap_or_default()
}

#[async_trait]
impl VectorCollection for ChromaCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add(&self, batch: &IndexBatch) -> Result<()> {
        validate_batch(batch)?;

        let embeddings = self.embedder.embed_batch(&batch.documents).await?;
        let request = self
            .http
            .request(reqwest::Method::POST, &format!("{}/upsert", self.url))
            .json(&UpsertRequest {
                ids: &batch.ids,
                embeddings,
                documents: &batch.documents,
                metadatas: &batch.metadatas,
            });

        // Upsert answers with an empty JSON object
        let _: serde_json::Value = self.http.send(request, "upsert").await?;

        tracing::debug!("Upserted {} records into '{}'", batch.len(), self.name);
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        validate_query(text)?;

        let embedding = self.embedder.embed(text).await?;
        let request = self
            .http
            .request(reqwest::Method::POST, &format!("{}/query", self.url))
            .json(&QueryRequest {
                query_embeddings: vec![embedding],
                n_results: top_k,
                include: ["documents", "metadatas", "distances"],
            });

        let response: QueryResponse = self.http.send(request, "query").await?;
        Ok(response.into_chunks())
    }

    async fn count(&self) -> Result<usize> {
        let request = self
            .http
            .request(reqwest::Method::GET, &format!("{}/count", self.url));
        self.http.send(request, "count").await
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .http
            .request(reqwest::Method::GET, &format!("{}/api/v2/heartbeat", self.base_url))
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}
