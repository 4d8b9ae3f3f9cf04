//! Vector index abstraction and the serverless HTTP backend.
//!
//! The index service has two planes: a control plane for listing and
//! creating indexes, and a per-index data plane (resolved as a host name
//! at ensure time) for upserts, queries, and stats.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::error::{ConfigError, VectorStoreError};
use crate::models::{IndexConfig, IndexRecord, QueryMatch, QueryRequest};

/// Placement and geometry of a vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    pub name: String,
    pub dimension: u32,
    pub metric: String,
    pub cloud: String,
    pub region: String,
}

impl IndexSpec {
    pub fn new(index: &IndexConfig, dimension: u32) -> Self {
        Self {
            name: index.name.clone(),
            dimension,
            metric: index.metric.clone(),
            cloud: index.cloud.clone(),
            region: index.region.clone(),
        }
    }
}

/// Aggregate counts for an index, as reported by the service.
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub total_vector_count: u64,
    pub dimension: u32,
}

/// Abstract operations against a similarity-searchable vector index.
///
/// Backends must be idempotent on `ensure_index`: calling it twice with
/// the same spec never creates a second index and never fails on the
/// already-exists path.
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Make sure the named index exists with the given spec and resolve
    /// its data plane. No mutating call when the index already exists.
    async fn ensure_index(&self, spec: &IndexSpec) -> Result<(), VectorStoreError>;

    /// Submit all records in one call. Returns the upserted count.
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<u64, VectorStoreError>;

    /// Nearest-neighbor search; matches come back in provider rank order.
    async fn query(&self, request: QueryRequest) -> Result<Vec<QueryMatch>, VectorStoreError>;

    /// Stats for the index, or `None` when it does not exist yet.
    async fn stats(&self) -> Result<Option<IndexStats>, VectorStoreError>;

    fn index_name(&self) -> &str;
}

// Control plane wire shapes.

#[derive(Debug, Deserialize)]
struct ListIndexesResponse {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    name: String,
    dimension: u32,
    #[allow(dead_code)]
    metric: Option<String>,
    host: String,
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: u32,
    metric: &'a str,
    spec: CreateIndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct CreateIndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

// Data plane wire shapes.

#[derive(Debug, Serialize)]
struct UpsertRequest {
    vectors: Vec<IndexRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: u64,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    total_vector_count: u64,
    #[serde(default)]
    dimension: u32,
}

/// HTTP client for a Pinecone-style serverless vector index.
pub struct ServerlessIndexClient {
    client: Client,
    control_url: String,
    api_key: String,
    index: String,
    host: OnceCell<String>,
}

impl ServerlessIndexClient {
    pub fn new(config: &IndexConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        let client = Client::builder()
            .build()
            .map_err(|e| ConfigError::ValidationError(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            control_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            index: config.name.clone(),
            host: OnceCell::new(),
        })
    }

    async fn list_indexes(&self) -> Result<Vec<IndexDescription>, VectorStoreError> {
        let url = format!("{}/indexes", self.control_url);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::InvalidResponse(format!(
                "list indexes returned status {status}: {body}"
            )));
        }

        let listed: ListIndexesResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))?;

        Ok(listed.indexes)
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<IndexDescription, VectorStoreError> {
        let url = format!("{}/indexes", self.control_url);
        let request = CreateIndexRequest {
            name: &spec.name,
            dimension: spec.dimension,
            metric: &spec.metric,
            spec: CreateIndexSpec {
                serverless: ServerlessSpec {
                    cloud: &spec.cloud,
                    region: &spec.region,
                },
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::IndexCreationError(format!(
                "status {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))
    }

    fn data_url(&self, endpoint: &str) -> Result<String, VectorStoreError> {
        let host = self
            .host
            .get()
            .ok_or_else(|| VectorStoreError::IndexNotReady(self.index.clone()))?;
        Ok(format!("https://{host}/{endpoint}"))
    }
}

/// An existing index with the wrong dimension would only surface as an
/// opaque upsert rejection; call this out up front.
fn dimension_mismatch(found: &IndexDescription, spec: &IndexSpec) -> Option<String> {
    (found.dimension != spec.dimension).then(|| {
        format!(
            "index {} has dimension {}, but {} is configured",
            found.name, found.dimension, spec.dimension
        )
    })
}

#[async_trait]
impl VectorIndexProvider for ServerlessIndexClient {
    async fn ensure_index(&self, spec: &IndexSpec) -> Result<(), VectorStoreError> {
        if self.host.get().is_some() {
            return Ok(());
        }

        let existing = self.list_indexes().await?;
        let description = match existing.into_iter().find(|d| d.name == spec.name) {
            Some(found) => {
                if let Some(warning) = dimension_mismatch(&found, spec) {
                    eprintln!("Warning: {warning}");
                }
                found
            }
            None => self.create_index(spec).await?,
        };

        let _ = self.host.set(description.host);
        Ok(())
    }

    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<u64, VectorStoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let url = self.data_url("vectors/upsert")?;
        let request = UpsertRequest { vectors: records };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::UpsertError(format!(
                "status {status}: {body}"
            )));
        }

        let upserted: UpsertResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))?;

        Ok(upserted.upserted_count)
    }

    async fn query(&self, request: QueryRequest) -> Result<Vec<QueryMatch>, VectorStoreError> {
        let url = self.data_url("query")?;

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::QueryError(format!(
                "status {status}: {body}"
            )));
        }

        let query_response: QueryResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))?;

        Ok(query_response.matches)
    }

    async fn stats(&self) -> Result<Option<IndexStats>, VectorStoreError> {
        if self.host.get().is_none() {
            let existing = self.list_indexes().await?;
            match existing.into_iter().find(|d| d.name == self.index) {
                Some(found) => {
                    let _ = self.host.set(found.host);
                }
                None => return Ok(None),
            }
        }

        let url = self.data_url("describe_index_stats")?;
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::QueryError(format!(
                "status {status}: {body}"
            )));
        }

        let stats: StatsResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))?;

        Ok(Some(IndexStats {
            total_vector_count: stats.total_vector_count,
            dimension: stats.dimension,
        }))
    }

    fn index_name(&self) -> &str {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordMetadata;

    #[test]
    fn test_create_index_request_shape() {
        let spec = IndexSpec {
            name: "textvec".into(),
            dimension: 1536,
            metric: "cosine".into(),
            cloud: "aws".into(),
            region: "us-east-1".into(),
        };
        let request = CreateIndexRequest {
            name: &spec.name,
            dimension: spec.dimension,
            metric: &spec.metric,
            spec: CreateIndexSpec {
                serverless: ServerlessSpec {
                    cloud: &spec.cloud,
                    region: &spec.region,
                },
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["name"], "textvec");
        assert_eq!(json["dimension"], 1536);
        assert_eq!(json["metric"], "cosine");
        assert_eq!(json["spec"]["serverless"]["cloud"], "aws");
        assert_eq!(json["spec"]["serverless"]["region"], "us-east-1");
    }

    #[test]
    fn test_upsert_request_shape() {
        let request = UpsertRequest {
            vectors: vec![IndexRecord {
                id: "embedding_0".into(),
                values: vec![0.5, 0.5],
                metadata: RecordMetadata {
                    text: "Hello world".into(),
                },
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["vectors"][0]["id"], "embedding_0");
        assert_eq!(json["vectors"][0]["metadata"]["text"], "Hello world");
    }

    #[test]
    fn test_list_indexes_response_shape() {
        let body = r#"{"indexes": [{"name": "textvec", "dimension": 1536, "metric": "cosine", "host": "textvec-abc.svc.example.io"}]}"#;
        let listed: ListIndexesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(listed.indexes.len(), 1);
        assert_eq!(listed.indexes[0].name, "textvec");
        assert_eq!(listed.indexes[0].host, "textvec-abc.svc.example.io");
    }

    #[test]
    fn test_query_response_shape() {
        let body = r#"{"matches": [{"id": "embedding_1", "score": 0.87, "metadata": {"text": "Hello"}}], "namespace": ""}"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.matches.len(), 1);
        assert_eq!(parsed.matches[0].id, "embedding_1");
        assert_eq!(
            parsed.matches[0].metadata.as_ref().unwrap().text,
            "Hello"
        );
    }

    #[test]
    fn test_dimension_mismatch_warning() {
        let spec = IndexSpec {
            name: "textvec".into(),
            dimension: 1536,
            metric: "cosine".into(),
            cloud: "aws".into(),
            region: "us-east-1".into(),
        };
        let found = IndexDescription {
            name: "textvec".into(),
            dimension: 768,
            metric: Some("cosine".into()),
            host: "textvec-abc.svc.example.io".into(),
        };

        let warning = dimension_mismatch(&found, &spec).unwrap();
        assert!(warning.contains("768"));
        assert!(warning.contains("1536"));

        let matching = IndexDescription {
            dimension: 1536,
            ..found
        };
        assert!(dimension_mismatch(&matching, &spec).is_none());
    }

    #[test]
    fn test_stats_response_shape() {
        let body = r#"{"totalVectorCount": 42, "dimension": 1536}"#;
        let parsed: StatsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.total_vector_count, 42);
        assert_eq!(parsed.dimension, 1536);
    }
}
