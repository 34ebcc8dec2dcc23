//! Configuration for the RAGAI service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Collection shared by the upload and chat endpoints
pub const DEFAULT_COLLECTION: &str = "RAGAI_v2";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Gemini configuration (generation and embeddings)
    #[serde(default)]
    pub llm: LlmConfig,
    /// Vector database configuration
    #[serde(default)]
    pub vector_db: VectorDbConfig,
}

impl RagConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Override secrets and addresses from the environment
    ///
    /// The lookup is injected so tests do not touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(key) = lookup("CHROMA_API_KEY") {
            self.vector_db.chroma.api_key = key;
        }
        if let Some(tenant) = lookup("CHROMA_TENANT") {
            self.vector_db.chroma.tenant = tenant;
        }
        if let Some(database) = lookup("CHROMA_DATABASE") {
            self.vector_db.chroma.database = database;
        }
        if let Some(url) = lookup("CHROMA_URL") {
            self.vector_db.chroma.base_url = url;
        }
        if let Some(host) = lookup("RAGAI_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RAGAI_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid RAGAI_PORT value: {}", port),
            }
        }
    }

    /// Check that the configuration can start a server
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".to_string()));
        }

        if self.llm.api_key.trim().is_empty() {
            return Err(Error::Config(
                "Gemini API key is missing (set GEMINI_API_KEY or llm.api_key)".to_string(),
            ));
        }

        if self.vector_db.backend == VectorBackend::Chroma {
            let chroma = &self.vector_db.chroma;
            for (name, value) in [
                ("CHROMA_API_KEY", &chroma.api_key),
                ("CHROMA_TENANT", &chroma.tenant),
                ("CHROMA_DATABASE", &chroma.database),
            ] {
                if value.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "Chroma backend selected but {} is not set",
                        name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive windows
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Reject windows that would stall or move the cursor backwards
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidChunking {
                chunk_size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks requested from the store per chat message
    pub top_k: usize,
    /// Sources echoed back in the chat response
    pub max_sources: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_sources: 3,
        }
    }
}

/// Gemini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Generative Language API base URL
    pub base_url: String,
    /// API key (usually from GEMINI_API_KEY)
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Generation model name
    pub generate_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Request timeout in seconds (none: transport default)
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            generate_model: "gemini-2.5-flash".to_string(),
            embed_model: "gemini-embedding-001".to_string(),
            timeout_secs: None,
        }
    }
}

/// Vector database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Which store backs the collection
    pub backend: VectorBackend,
    /// Collection shared by all uploads
    pub collection_name: String,
    /// Chroma connection settings (required when backend = chroma)
    pub chroma: ChromaConfig,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::default(),
            collection_name: DEFAULT_COLLECTION.to_string(),
            chroma: ChromaConfig::default(),
        }
    }
}

/// Backend provider selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    /// Chroma Cloud (or a self-hosted Chroma server)
    #[default]
    Chroma,
    /// Process-local store, lost on restart
    Memory,
}

/// Chroma connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaConfig {
    /// Chroma API base URL
    pub base_url: String,
    /// API token sent as `x-chroma-token`
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Tenant ID
    pub tenant: String,
    /// Database name
    pub database: String,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.trychroma.com".to_string(),
            api_key: String::new(),
            tenant: String::new(),
            database: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.max_sources, 3);
        assert_eq!(config.vector_db.collection_name, "RAGAI_v2");
        assert_eq!(config.vector_db.backend, VectorBackend::Chroma);
        assert_eq!(config.llm.generate_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_chunking_validation() {
        assert!(ChunkingConfig::default().validate().is_ok());

        let stalled = ChunkingConfig { chunk_size: 100, chunk_overlap: 100 };
        assert!(matches!(
            stalled.validate(),
            Err(Error::InvalidChunking { chunk_size: 100, overlap: 100 })
        ));

        let empty = ChunkingConfig { chunk_size: 0, chunk_overlap: 0 };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RagConfig::default();
        config.apply_env(env(&[
            ("GEMINI_API_KEY", "gem-key"),
            ("CHROMA_API_KEY", "chroma-key"),
            ("CHROMA_TENANT", "tenant-1"),
            ("CHROMA_DATABASE", "docs"),
            ("RAGAI_PORT", "8081"),
        ]));

        assert_eq!(config.llm.api_key, "gem-key");
        assert_eq!(config.vector_db.chroma.api_key, "chroma-key");
        assert_eq!(config.vector_db.chroma.tenant, "tenant-1");
        assert_eq!(config.vector_db.chroma.database, "docs");
        assert_eq!(config.server.port, 8081);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = RagConfig::default();
        config.apply_env(env(&[("RAGAI_PORT", "not-a-port")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_chroma_backend_requires_credentials() {
        let mut config = RagConfig::default();
        config.apply_env(env(&[("GEMINI_API_KEY", "gem-key")]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("CHROMA_API_KEY"));

        config.vector_db.backend = VectorBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_gemini_key() {
        let mut config = RagConfig::default();
        config.vector_db.backend = VectorBackend::Memory;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[chunking]
chunk_size = 500

[vector_db]
backend = "memory"
"#
        )
        .unwrap();

        let config = RagConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.vector_db.backend, VectorBackend::Memory);
        assert_eq!(config.vector_db.collection_name, "RAGAI_v2");
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            RagConfig::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }
}
