//! Gemini client for answer generation and embeddings
//!
//! Talks to the Generative Language REST API with an API key.

use async_trait::async_trait;
use std::time::Duration;

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

/// Gemini client for `generateContent` and `embedContent`
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    generate_model: String,
    embed_model: String,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            generate_model: config.generate_model.clone(),
            embed_model: config.embed_model.clone(),
        })
    }

    /// Get the API endpoint URL for a model method
    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }
}

#[derive(serde::Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(serde::Serialize)]
struct EmbedRequest {
    model: String,
    content: Content,
}

#[derive(serde::Deserialize)]
struct EmbedResponse {
    embedding: ContentEmbedding,
}

#[derive(serde::Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: PromptBuilder::build_rag_prompt(question, context),
                }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint(&self.generate_model, "generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse Gemini response: {}", e)))?;

        // Text parts of the first candidate, concatenated
        let text: String = gen_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::llm("No text in Gemini response"));
        }

        tracing::debug!("Gemini answered with {} chars", text.len());
        Ok(text)
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .http
            .get(format!("{}/models/{}", self.base_url, self.generate_model))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.generate_model
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: format!("models/{}", self.embed_model),
            content: Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .http
            .post(self.endpoint(&self.embed_model, "embedContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Gemini embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Gemini embedding failed ({}): {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        if embed_response.embedding.values.is_empty() {
            return Err(Error::embedding("Gemini returned an empty embedding"));
        }

        Ok(embed_response.embedding.values)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
