use serde::{Deserialize, Serialize};

/// One source file's worth of text, created by the document reader and
/// discarded after chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// File name the text came from.
    pub source_id: String,
    pub text: String,
}

impl Document {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
        }
    }
}

/// A delimiter-bounded, trimmed, non-empty span of a document's text.
/// The unit of embedding and storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub parent_source_id: String,
    /// Position within the parent document, assigned in split order from 0.
    pub sequence_index: u32,
    pub text: String,
}

/// A chunk paired with its vector. Invariant: the vector has exactly the
/// provider's configured number of components.
#[derive(Debug, Clone)]
pub struct Embedding {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("notes.txt", "some text");
        assert_eq!(doc.source_id, "notes.txt");
        assert_eq!(doc.text, "some text");
    }
}
