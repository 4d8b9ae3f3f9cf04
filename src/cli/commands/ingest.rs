//! Ingest command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::{
    IndexSpec, OpenAiEmbeddingClient, Pipeline, SeparatorChunker, ServerlessIndexClient,
};
use crate::sources::DocumentReader;

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Directory containing .txt documents to ingest
    #[arg(required = true)]
    pub path: PathBuf,

    /// Override the chunk separator literal
    #[arg(long)]
    pub separator: Option<String>,

    /// List files and chunk counts without embedding or upserting
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle_ingest(args: IngestArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let mut config = Config::load()?;
    let formatter = get_formatter(format);

    if let Some(separator) = args.separator {
        config.ingest.chunk_separator = separator;
    }

    let path = args.path.canonicalize().context("invalid path")?;
    if !path.is_dir() {
        anyhow::bail!("not a directory: {}", path.display());
    }

    let reader = DocumentReader::new(config.ingest.max_file_size);
    let chunker = SeparatorChunker::new(&config.ingest);

    if args.dry_run {
        let outcome = reader
            .read_all(&path)
            .context("failed to read documents")?;
        let mut total_chunks = 0usize;
        println!(
            "{}",
            formatter.format_message(&format!(
                "Dry run: would ingest {} file(s), {} skipped",
                outcome.documents.len(),
                outcome.files_skipped
            ))
        );
        for document in &outcome.documents {
            let chunks = chunker.split(document).len();
            total_chunks += chunks;
            println!("  {} ({} chunk(s))", document.source_id, chunks);
        }
        println!(
            "{}",
            formatter.format_message(&format!("Total: {} chunk(s)", total_chunks))
        );
        return Ok(());
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

    if verbose {
        eprintln!("Directory: {}", path.display());
        eprintln!("Index: {} ({}d, {})", spec.name, spec.dimension, spec.metric);
        eprintln!("Model: {}", embedder.model());
    }

    let pipeline = Pipeline::new(embedder, index, reader, chunker, spec);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Embedding and upserting chunks...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = pipeline.run(&path).await;
    pb.finish_and_clear();

    let report = report.context("ingest failed")?;
    print!("{}", formatter.format_ingest_report(&report));

    Ok(())
}
