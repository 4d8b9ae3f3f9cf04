//! Query command implementation.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat, QueryResults};
use crate::services::{
    IndexSpec, OpenAiEmbeddingClient, Pipeline, SeparatorChunker, ServerlessIndexClient,
};
use crate::sources::DocumentReader;

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(required = true, help = "Query text")]
    pub text: String,

    #[arg(long, short = 'k', help = "Maximum number of matches to return")]
    pub top_k: Option<u32>,

    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Include stored vectors in the response (overrides config)"
    )]
    pub include_values: Option<bool>,
}

pub async fn handle_query(args: QueryArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let text = args.text.trim();
    if text.is_empty() {
        anyhow::bail!("query text cannot be empty");
    }

    let config = Config::load()?;
    let formatter = get_formatter(format);
    let start_time = Instant::now();

    let top_k = args.top_k.unwrap_or(config.query.default_top_k);
    if top_k == 0 {
        anyhow::bail!("top-k must be at least 1");
    }

    let include_values = args.include_values.unwrap_or(config.query.include_values);

    if verbose {
        eprintln!("Query: \"{text}\"");
        eprintln!("  Top-K: {top_k}");
        eprintln!("  Index: {}", config.index.name);
    }

    let embedder = Arc::new(
        OpenAiEmbeddingClient::new(&config.embedding)
            .context("failed to create embedding client")?,
    );
    let index = Arc::new(
        ServerlessIndexClient::new(&config.index)
            .context("failed to create vector index client")?,
    );
    let spec = IndexSpec::new(&config.index, config.embedding.dimension);

    let pipeline = Pipeline::new(
        embedder,
        index,
        DocumentReader::new(config.ingest.max_file_size),
        SeparatorChunker::new(&config.ingest),
        spec,
    );

    let matches = pipeline
        .query_by_text(text, top_k, config.query.include_metadata, include_values)
        .await
        .context("query failed")?;

    let duration_ms = start_time.elapsed().as_millis() as u64;
    let results = QueryResults::new(text.to_string(), matches, duration_ms);

    print!("{}", formatter.format_query_results(&results));

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn parse_query(argv: &[&str]) -> super::QueryArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Query(args) => args,
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_include_values_flag_states() {
        let args = parse_query(&["textvec", "query", "hello"]);
        assert_eq!(args.include_values, None);

        let args = parse_query(&["textvec", "query", "hello", "--include-values"]);
        assert_eq!(args.include_values, Some(true));

        let args = parse_query(&["textvec", "query", "hello", "--include-values", "false"]);
        assert_eq!(args.include_values, Some(false));
    }
}
