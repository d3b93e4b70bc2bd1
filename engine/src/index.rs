use crate::error::EngineError;
use crate::matrix::{SparseMatrix, TfIdfMatrix, TfMatrix};
use crate::query::{rank, Hit, QueryVector};
use crate::tfidf::{transform, IdfVector};
use crate::vocabulary::Vocabulary;
use crate::Corpus;

pub type TermId = u32;
pub type DocId = u32;

/// Weighted matrix plus what `search` needs alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Weighted {
    pub idf: IdfVector,
    pub tfidf: TfIdfMatrix,
    pub row_norms: Vec<f64>,
}

/// Artifacts of one build pass. `weighted` is `None` until `build_tf_idf` runs.
#[derive(Debug, Clone, PartialEq)]
struct Built {
    vocab: Vocabulary,
    tf: TfMatrix,
    weighted: Option<Weighted>,
}

fn index_terms(corpus: &Corpus) -> (Vocabulary, TfMatrix) {
    let (vocab, per_doc) = Vocabulary::build(corpus.docs());
    let tf: TfMatrix = SparseMatrix::from_rows(vocab.len(), per_doc);
    tracing::info!(num_docs = tf.n_rows(), num_terms = tf.n_cols(), nnz = tf.nnz(), "tf matrix built");
    (vocab, tf)
}

fn weigh(tf: &TfMatrix) -> Weighted {
    let idf = IdfVector::fit(tf);
    let tfidf = transform(tf, &idf);
    let row_norms = tfidf.rows().map(|row| row.norm()).collect();
    tracing::debug!(num_docs = tfidf.n_rows(), num_terms = tfidf.n_cols(), "tf-idf matrix built");
    Weighted { idf, tfidf, row_norms }
}

/// Owns a corpus and the artifacts derived from it. Each build step is computed in full
/// before it replaces the previous state, so `search` never sees a partial pipeline.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    corpus: Corpus,
    built: Option<Built>,
}

impl Engine {
    pub fn new() -> Self { Self::default() }

    /// Take ownership of `corpus`, build its vocabulary and TF matrix. Drops any TF-IDF
    /// matrix built for a previous corpus.
    pub fn build_vocabulary_and_tf(&mut self, corpus: Corpus) -> &TfMatrix {
        let (vocab, tf) = index_terms(&corpus);
        self.corpus = corpus;
        &self.built.insert(Built { vocab, tf, weighted: None }).tf
    }

    /// Weight the current TF matrix by smoothed IDF. Rebuilding on a ready engine
    /// recomputes from the same TF matrix.
    pub fn build_tf_idf(&mut self) -> Result<&TfIdfMatrix, EngineError> {
        let built = self.built.as_mut().ok_or(EngineError::InvalidState {
            operation: "build_tf_idf",
            requires: "build_vocabulary_and_tf",
        })?;
        let weighted = weigh(&built.tf);
        Ok(&built.weighted.insert(weighted).tfidf)
    }

    /// Both build steps for `corpus`.
    pub fn build(corpus: Corpus) -> Self {
        let (vocab, tf) = index_terms(&corpus);
        let weighted = weigh(&tf);
        Engine { corpus, built: Some(Built { vocab, tf, weighted: Some(weighted) }) }
    }

    /// Rank documents against `query` by cosine similarity on TF-IDF rows.
    pub fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit<'_>>, EngineError> {
        let (vocab, weighted) = match &self.built {
            Some(Built { vocab, weighted: Some(weighted), .. }) => (vocab, weighted),
            _ => return Err(EngineError::InvalidState { operation: "search", requires: "build_tf_idf" }),
        };
        let q = QueryVector::from_text(query, vocab);
        let ranked = rank(&q, &weighted.tfidf, &weighted.row_norms, top_n);
        tracing::debug!(query, hits = ranked.len(), "search");
        Ok(ranked
            .into_iter()
            .filter_map(|(row, score)| self.corpus.get(row).map(|doc| Hit { doc, score }))
            .collect())
    }

    pub fn corpus(&self) -> &Corpus { &self.corpus }

    pub fn is_ready(&self) -> bool { self.weighted().is_some() }

    pub fn vocabulary(&self) -> Option<&Vocabulary> { self.built.as_ref().map(|b| &b.vocab) }

    pub fn tf(&self) -> Option<&TfMatrix> { self.built.as_ref().map(|b| &b.tf) }

    pub fn tfidf(&self) -> Option<&TfIdfMatrix> { self.weighted().map(|w| &w.tfidf) }

    pub fn idf(&self) -> Option<&IdfVector> { self.weighted().map(|w| &w.idf) }

    fn weighted(&self) -> Option<&Weighted> { self.built.as_ref().and_then(|b| b.weighted.as_ref()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawDocument;

    fn corpus(texts: &[&str]) -> Corpus {
        texts.iter().map(|t| RawDocument { text: Some(t.to_string()), ..Default::default() }).collect()
    }

    #[test]
    fn search_before_build_is_invalid_state() {
        let mut e = Engine::new();
        assert!(matches!(e.search("x", 5), Err(EngineError::InvalidState { operation: "search", .. })));
        assert!(matches!(e.build_tf_idf(), Err(EngineError::InvalidState { operation: "build_tf_idf", .. })));
        e.build_vocabulary_and_tf(corpus(&["x"]));
        assert!(e.search("x", 5).is_err());
        e.build_tf_idf().unwrap();
        assert_eq!(e.search("x", 5).unwrap().len(), 1);
    }

    #[test]
    fn rebuilding_tf_invalidates_tfidf() {
        let mut e = Engine::build(corpus(&["a b"]));
        assert!(e.is_ready());
        e.build_vocabulary_and_tf(corpus(&["c"]));
        assert!(!e.is_ready());
        assert!(e.tfidf().is_none());
        assert_eq!(e.vocabulary().map(Vocabulary::len), Some(1));
    }

    #[test]
    fn build_tf_idf_twice_is_stable() {
        let mut e = Engine::new();
        e.build_vocabulary_and_tf(corpus(&["a b a", "b c"]));
        let first = e.build_tf_idf().unwrap().clone();
        let second = e.build_tf_idf().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_corpus_builds_and_searches_to_nothing() {
        let e = Engine::build(Corpus::new());
        assert_eq!(e.tf().map(|m| m.shape()), Some((0, 0)));
        assert_eq!(e.tfidf().map(|m| m.shape()), Some((0, 0)));
        assert!(e.search("anything", 5).unwrap().is_empty());
    }

    #[test]
    fn one_shot_build_matches_stepwise_build() {
        let texts = ["rust is fast", "rust and go", "go"];
        let direct = Engine::build(corpus(&texts));
        let mut stepwise = Engine::new();
        stepwise.build_vocabulary_and_tf(corpus(&texts));
        stepwise.build_tf_idf().unwrap();
        assert!(direct.is_ready());
        assert_eq!(direct.tf(), stepwise.tf());
        assert_eq!(direct.tfidf(), stepwise.tfidf());
        assert_eq!(direct.idf(), stepwise.idf());
    }
}
