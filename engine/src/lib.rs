//! TF-IDF indexing and cosine-similarity retrieval over a small document corpus.

pub mod authors;
pub mod document;
pub mod error;
pub mod export;
pub mod index;
pub mod matrix;
pub mod persist;
pub mod query;
pub mod stats;
pub mod tfidf;
pub mod tokenizer;
pub mod vocabulary;

pub use document::{Corpus, Document, RawDocument};
pub use error::EngineError;
pub use index::{DocId, Engine, TermId};
pub use matrix::{SparseMatrix, TfIdfMatrix, TfMatrix};
pub use query::{Hit, SortKey, DEFAULT_TOP_N};
pub use stats::{compute_statistics, CorpusStats};
pub use vocabulary::Vocabulary;
