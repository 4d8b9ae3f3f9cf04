mod config;
mod document;
mod record;

pub use config::{
    Config, DEFAULT_CHUNK_SEPARATOR, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_EMBEDDING_URL, DEFAULT_INDEX_NAME, DEFAULT_INDEX_URL, EMBEDDING_API_KEY_VAR,
    EmbeddingConfig, INDEX_API_KEY_VAR, IndexConfig, IngestConfig, QueryConfig,
};
pub use document::{Chunk, Document, Embedding};
pub use record::{IndexRecord, OutputFormat, QueryMatch, QueryRequest, QueryResults, RecordMetadata};
