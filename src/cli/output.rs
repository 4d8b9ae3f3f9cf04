use std::fmt::Write as FmtWrite;

use crate::models::{OutputFormat, QueryResults};
use crate::services::IngestReport;

pub trait Formatter {
    fn format_query_results(&self, results: &QueryResults) -> String;
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_ingest_report(&self, report: &IngestReport) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub embedding_url: String,
    pub embedding_model: String,
    pub dimension: u32,
    pub index_name: String,
    pub metric: String,
    pub index_exists: bool,
    pub index_reachable: bool,
    pub total_vectors: u64,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_query_results(&self, results: &QueryResults) -> String {
        if results.is_empty() {
            return format!("No results found for: {}\n", results.query);
        }

        let mut output = String::new();
        writeln!(output, "Query results for: \"{}\"", results.query).unwrap();
        writeln!(
            output,
            "Found {} matches in {}ms\n",
            results.len(),
            results.duration_ms
        )
        .unwrap();

        for (i, m) in results.matches.iter().enumerate() {
            writeln!(output, "{}. [Score: {:.3}] {}", i + 1, m.score, m.id).unwrap();
            if let Some(ref metadata) = m.metadata {
                let preview: String = metadata.text.chars().take(200).collect();
                let preview = if metadata.text.chars().count() > 200 {
                    format!("{}...", preview)
                } else {
                    preview
                };
                for line in preview.lines() {
                    writeln!(output, "   {}", line).unwrap();
                }
            }
            writeln!(output).unwrap();
        }

        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();
        writeln!(output, "Embedding:     {}", status.embedding_url).unwrap();
        writeln!(output, "  Model:       {}", status.embedding_model).unwrap();
        writeln!(output, "  Dimension:   {}", status.dimension).unwrap();
        writeln!(output).unwrap();

        let index_status = if !status.index_reachable {
            "[UNREACHABLE]"
        } else if status.index_exists {
            "[READY]"
        } else {
            "[MISSING]"
        };
        writeln!(output, "Vector Index:  {} {}", status.index_name, index_status).unwrap();
        if status.index_exists {
            writeln!(output, "  Metric:      {}", status.metric).unwrap();
            writeln!(output, "  Vectors:     {}", status.total_vectors).unwrap();
        }

        output
    }

    fn format_ingest_report(&self, report: &IngestReport) -> String {
        let mut output = String::new();
        writeln!(output, "Ingest complete").unwrap();
        writeln!(output, "  Files read:      {}", report.files_read).unwrap();
        writeln!(output, "  Files skipped:   {}", report.files_skipped).unwrap();
        writeln!(output, "  Chunks embedded: {}", report.chunks_embedded).unwrap();
        writeln!(output, "  Records stored:  {}", report.records_upserted).unwrap();
        writeln!(output, "  Duration:        {}ms", report.duration_ms).unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_query_results(&self, results: &QueryResults) -> String {
        serde_json::to_string_pretty(results).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let value = serde_json::json!({
            "embedding": {
                "url": status.embedding_url,
                "model": status.embedding_model,
                "dimension": status.dimension,
            },
            "index": {
                "name": status.index_name,
                "metric": status.metric,
                "exists": status.index_exists,
                "reachable": status.index_reachable,
                "total_vectors": status.total_vectors,
            },
        });
        serde_json::to_string_pretty(&value).unwrap_or_default()
    }

    fn format_ingest_report(&self, report: &IngestReport) -> String {
        let value = serde_json::json!({
            "files_read": report.files_read,
            "files_skipped": report.files_skipped,
            "chunks_embedded": report.chunks_embedded,
            "records_upserted": report.records_upserted,
            "duration_ms": report.duration_ms,
        });
        serde_json::to_string_pretty(&value).unwrap_or_default()
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({ "message": message }).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({ "error": error }).to_string()
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_query_results(&self, results: &QueryResults) -> String {
        if results.is_empty() {
            return format!("No results found for: `{}`\n", results.query);
        }

        let mut output = String::new();
        writeln!(output, "## Query results for `{}`\n", results.query).unwrap();

        for (i, m) in results.matches.iter().enumerate() {
            writeln!(output, "### {}. `{}` (score {:.3})\n", i + 1, m.id, m.score).unwrap();
            if let Some(ref metadata) = m.metadata {
                writeln!(output, "> {}\n", metadata.text.replace('\n', "\n> ")).unwrap();
            }
        }

        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "## Status\n").unwrap();
        writeln!(output, "| Component | Value |").unwrap();
        writeln!(output, "|-----------|-------|").unwrap();
        writeln!(output, "| Embedding model | {} |", status.embedding_model).unwrap();
        writeln!(output, "| Dimension | {} |", status.dimension).unwrap();
        writeln!(output, "| Index | {} |", status.index_name).unwrap();
        writeln!(output, "| Metric | {} |", status.metric).unwrap();
        writeln!(output, "| Exists | {} |", status.index_exists).unwrap();
        writeln!(output, "| Vectors | {} |", status.total_vectors).unwrap();
        output
    }

    fn format_ingest_report(&self, report: &IngestReport) -> String {
        let mut output = String::new();
        writeln!(output, "## Ingest complete\n").unwrap();
        writeln!(output, "- Files read: {}", report.files_read).unwrap();
        writeln!(output, "- Files skipped: {}", report.files_skipped).unwrap();
        writeln!(output, "- Chunks embedded: {}", report.chunks_embedded).unwrap();
        writeln!(output, "- Records stored: {}", report.records_upserted).unwrap();
        writeln!(output, "- Duration: {}ms", report.duration_ms).unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("**Error:** {}", error)
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QueryMatch, RecordMetadata};

    fn sample_results() -> QueryResults {
        QueryResults::new(
            "hello".to_string(),
            vec![QueryMatch {
                id: "embedding_0".to_string(),
                score: 0.91,
                values: None,
                metadata: Some(RecordMetadata {
                    text: "Hello world".to_string(),
                }),
            }],
            12,
        )
    }

    #[test]
    fn test_text_formatter_includes_score_and_preview() {
        let output = TextFormatter.format_query_results(&sample_results());
        assert!(output.contains("[Score: 0.910]"));
        assert!(output.contains("Hello world"));
    }

    #[test]
    fn test_text_formatter_empty_results() {
        let results = QueryResults::new("nothing".to_string(), vec![], 3);
        let output = TextFormatter.format_query_results(&results);
        assert!(output.contains("No results found"));
    }

    #[test]
    fn test_json_formatter_is_valid_json() {
        let output = JsonFormatter.format_query_results(&sample_results());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["matches"][0]["id"], "embedding_0");
    }

    #[test]
    fn test_text_formatter_ingest_report_shows_skips() {
        let report = IngestReport {
            files_read: 3,
            files_skipped: 2,
            chunks_embedded: 5,
            records_upserted: 5,
            duration_ms: 7,
        };
        let output = TextFormatter.format_ingest_report(&report);
        assert!(output.contains("Files read:      3"));
        assert!(output.contains("Files skipped:   2"));
    }

    #[test]
    fn test_markdown_formatter_quotes_content() {
        let output = MarkdownFormatter.format_query_results(&sample_results());
        assert!(output.contains("### 1. `embedding_0`"));
        assert!(output.contains("> Hello world"));
    }
}
