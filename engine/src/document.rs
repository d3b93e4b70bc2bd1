use crate::DocId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Assigned at ingestion, survives filtering.
    pub id: DocId,
    pub title: String,
    pub author: String,
    pub date: String,
    pub url: String,
    pub text: String,
}

impl Document {
    /// First `max_chars` characters of the text.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, by {}", self.title, self.author)
    }
}

/// Ingestion record as produced by the feed fetcher. Every field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDocument {
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
}

/// Ordered document collection. Row `i` of every matrix built from it is `docs()[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    docs: Vec<Document>,
    next_id: DocId,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    /// Append a raw record, assigning it the next stable id. A missing text is
    /// indexed as an empty document.
    pub fn ingest(&mut self, raw: RawDocument) -> DocId {
        let id = self.next_id;
        self.next_id += 1;
        let text = raw.text.unwrap_or_else(|| {
            tracing::warn!(doc_id = id, "document has no text, indexing it as empty");
            String::new()
        });
        self.docs.push(Document {
            id,
            title: raw.title.unwrap_or_default(),
            author: raw.author.unwrap_or_default(),
            date: raw.date.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            text,
        });
        id
    }

    /// Keep only documents whose text is strictly longer than `min_chars` characters.
    pub fn filter_long_texts(&self, min_chars: usize) -> Corpus {
        let docs: Vec<Document> = self.docs.iter().filter(|d| d.char_len() > min_chars).cloned().collect();
        tracing::debug!(kept = docs.len(), dropped = self.docs.len() - docs.len(), min_chars, "filtered corpus");
        Corpus { docs, next_id: self.next_id }
    }

    pub fn docs(&self) -> &[Document] { &self.docs }

    pub fn get(&self, row: usize) -> Option<&Document> { self.docs.get(row) }

    pub fn by_id(&self, id: DocId) -> Option<&Document> {
        self.docs.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

impl FromIterator<RawDocument> for Corpus {
    fn from_iter<I: IntoIterator<Item = RawDocument>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for raw in iter {
            corpus.ingest(raw);
        }
        corpus
    }
}
