//! Status command implementation.

use anyhow::Result;

use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{Config, OutputFormat};
use crate::services::{ServerlessIndexClient, VectorIndexProvider};

pub async fn handle_status(format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let (index_reachable, index_exists, total_vectors) =
        match ServerlessIndexClient::new(&config.index) {
            Ok(client) => match client.stats().await {
                Ok(Some(stats)) => (true, true, stats.total_vector_count),
                Ok(None) => (true, false, 0),
                Err(_) => (false, false, 0),
            },
            Err(_) => (false, false, 0),
        };

    let status = StatusInfo {
        embedding_url: config.embedding.api_url.clone(),
        embedding_model: config.embedding.model.clone(),
        dimension: config.embedding.dimension,
        index_name: config.index.name.clone(),
        metric: config.index.metric.clone(),
        index_exists,
        index_reachable,
        total_vectors,
    };

    print!("{}", formatter.format_status(&status));

    if !index_reachable {
        eprintln!();
        eprintln!("Warning: vector index service not reachable.");
        eprintln!(
            "Hint: check {} and the {} environment variable.",
            config.index.api_url,
            crate::models::INDEX_API_KEY_VAR
        );
    } else if !index_exists {
        eprintln!();
        eprintln!(
            "Hint: index '{}' does not exist yet. It is created on first ingest.",
            config.index.name
        );
    }

    Ok(())
}
