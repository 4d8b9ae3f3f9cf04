use serde::{Deserialize, Serialize};

use super::record::OutputFormat;
use crate::error::ConfigError;

pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 1536;
pub const DEFAULT_INDEX_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_INDEX_NAME: &str = "textvec";
pub const DEFAULT_CHUNK_SEPARATOR: &str = "-- --------------------------------------------";

/// Environment variable holding the embedding provider credential.
pub const EMBEDDING_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the vector index credential.
pub const INDEX_API_KEY_VAR: &str = "PINECONE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

impl Config {
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("textvec").join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()
            .ok_or_else(|| ConfigError::PathError("could not determine config directory".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_url")]
    pub api_url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_dimension")]
    pub dimension: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    /// Resolve the provider credential from the environment.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(EMBEDDING_API_KEY_VAR)
            .map_err(|_| ConfigError::MissingCredential(EMBEDDING_API_KEY_VAR))
    }
}

fn default_embedding_url() -> String {
    DEFAULT_EMBEDDING_URL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_dimension() -> u32 {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_timeout() -> u64 {
    120
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: default_embedding_url(),
            model: default_embedding_model(),
            dimension: default_dimension(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub api_url: String,

    #[serde(default = "default_index_name")]
    pub name: String,

    #[serde(default = "default_metric")]
    pub metric: String,

    #[serde(default = "default_cloud")]
    pub cloud: String,

    #[serde(default = "default_region")]
    pub region: String,
}

impl IndexConfig {
    /// Resolve the index service credential from the environment.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(INDEX_API_KEY_VAR)
            .map_err(|_| ConfigError::MissingCredential(INDEX_API_KEY_VAR))
    }
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}

fn default_index_name() -> String {
    DEFAULT_INDEX_NAME.to_string()
}

fn default_metric() -> String {
    "cosine".to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            api_url: default_index_url(),
            name: default_index_name(),
            metric: default_metric(),
            cloud: default_cloud(),
            region: default_region(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_chunk_separator")]
    pub chunk_separator: String,

    /// Accepted for compatibility with the original tool; the splitter
    /// does not consult it. Boundaries come from the separator alone.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    /// Accepted for compatibility with the original tool; unused, see
    /// `chunk_size`.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: u32,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_chunk_separator() -> String {
    DEFAULT_CHUNK_SEPARATOR.to_string()
}

fn default_chunk_size() -> u32 {
    1000
}

fn default_chunk_overlap() -> u32 {
    100
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_separator: default_chunk_separator(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            max_file_size: default_max_file_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_top_k")]
    pub default_top_k: u32,

    #[serde(default = "default_true")]
    pub include_metadata: bool,

    #[serde(default = "default_true")]
    pub include_values: bool,

    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_top_k() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            include_metadata: default_true(),
            include_values: default_true(),
            default_format: OutputFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.embedding.api_url, DEFAULT_EMBEDDING_URL);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.embedding.dimension, DEFAULT_EMBEDDING_DIMENSION);
        assert_eq!(config.index.api_url, DEFAULT_INDEX_URL);
        assert_eq!(config.index.name, DEFAULT_INDEX_NAME);
        assert_eq!(config.index.metric, "cosine");
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(path.is_some());
    }

    #[test]
    fn test_ingest_config_default() {
        let config = IngestConfig::default();
        assert_eq!(config.chunk_separator, DEFAULT_CHUNK_SEPARATOR);
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 100);
        assert!(config.max_file_size > 0);
    }

    #[test]
    fn test_query_config_default() {
        let config = QueryConfig::default();
        assert_eq!(config.default_top_k, 10);
        assert!(config.include_metadata);
        assert!(config.include_values);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [index]
            name = "my-index"
            "#,
        )
        .unwrap();
        assert_eq!(config.index.name, "my-index");
        assert_eq!(config.index.metric, "cosine");
        assert_eq!(config.embedding.dimension, DEFAULT_EMBEDDING_DIMENSION);
    }
}
