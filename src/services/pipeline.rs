//! Ingestion and query orchestration.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{IngestError, SearchError};
use crate::models::{Embedding, IndexRecord, QueryMatch, QueryRequest, RecordMetadata};
use crate::services::chunker::SeparatorChunker;
use crate::services::embedding::EmbeddingProvider;
use crate::services::vector_store::{IndexSpec, VectorIndexProvider};
use crate::sources::DocumentReader;

/// Counters for one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub files_read: u64,
    pub files_skipped: u64,
    pub chunks_embedded: u64,
    pub records_upserted: u64,
    pub duration_ms: u64,
}

/// Orchestrates ensure-index, read, chunk, embed, and upsert.
///
/// Every step is strictly sequential: chunks are embedded in
/// document-then-sequence order and the single upsert batch preserves
/// that order in its generated ids. A failure at any step aborts the
/// run; already-committed upserts are not rolled back. Two concurrent
/// runs against the same index race on the positional id scheme, which
/// is not handled here.
pub struct Pipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    reader: DocumentReader,
    chunker: SeparatorChunker,
    spec: IndexSpec,
}

impl Pipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        reader: DocumentReader,
        chunker: SeparatorChunker,
        spec: IndexSpec,
    ) -> Self {
        Self {
            embedder,
            index,
            reader,
            chunker,
            spec,
        }
    }

    /// Ingest every `.txt` document under `directory` into the index.
    pub async fn run(&self, directory: &Path) -> Result<IngestReport, IngestError> {
        let start = Instant::now();

        self.index.ensure_index(&self.spec).await?;

        let outcome = self.reader.read_all(directory)?;
        let files_read = outcome.documents.len() as u64;
        let files_skipped = outcome.files_skipped;

        let mut embeddings = Vec::new();
        for document in &outcome.documents {
            for chunk in self.chunker.split(document) {
                let vector = self.embedder.embed(&chunk.text).await?;
                embeddings.push(Embedding { chunk, vector });
            }
        }

        let records: Vec<IndexRecord> = embeddings
            .into_iter()
            .enumerate()
            .map(|(i, embedding)| IndexRecord {
                id: IndexRecord::run_id(i),
                values: embedding.vector,
                metadata: RecordMetadata {
                    text: embedding.chunk.text,
                },
            })
            .collect();

        let chunks_embedded = records.len() as u64;
        let records_upserted = self.index.upsert(records).await?;

        Ok(IngestReport {
            files_read,
            files_skipped,
            chunks_embedded,
            records_upserted,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Embed `text` and run a top-K similarity query against the index.
    pub async fn query_by_text(
        &self,
        text: &str,
        top_k: u32,
        include_metadata: bool,
        include_values: bool,
    ) -> Result<Vec<QueryMatch>, SearchError> {
        if text.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query text is empty".into()));
        }

        self.index.ensure_index(&self.spec).await?;

        let vector = self.embedder.embed(text).await?;
        let matches = self
            .index
            .query(QueryRequest {
                vector,
                top_k,
                include_metadata,
                include_values,
            })
            .await?;

        Ok(matches)
    }
}
