mod chunker;
mod embedding;
mod pipeline;
mod vector_store;

pub use chunker::SeparatorChunker;
pub use embedding::{EmbeddingProvider, OpenAiEmbeddingClient};
pub use pipeline::{IngestReport, Pipeline};
pub use vector_store::{IndexSpec, IndexStats, ServerlessIndexClient, VectorIndexProvider};
