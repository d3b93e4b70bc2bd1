use crate::tokenizer::count_terms;
use crate::{Document, TermId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-document `(term, count)` pairs recorded while building the vocabulary.
pub type TermCounts = Vec<(TermId, u32)>;

/// Token to column index mapping. A term's id is its insertion position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexMap<String, TermId>,
}

impl Vocabulary {
    /// Single pass over `docs` in order, assigning ids to unseen tokens.
    pub fn build(docs: &[Document]) -> (Vocabulary, Vec<TermCounts>) {
        let mut terms: IndexMap<String, TermId> = IndexMap::new();
        let mut per_doc: Vec<TermCounts> = Vec::with_capacity(docs.len());
        for doc in docs {
            let counts = count_terms(&doc.text);
            let mut row = Vec::with_capacity(counts.len());
            for (term, freq) in counts {
                let next = terms.len() as TermId;
                let tid = *terms.entry(term).or_insert(next);
                row.push((tid, freq));
            }
            per_doc.push(row);
        }
        tracing::debug!(num_docs = docs.len(), num_terms = terms.len(), "vocabulary built");
        (Vocabulary { terms }, per_doc)
    }

    pub fn get(&self, term: &str) -> Option<TermId> { self.terms.get(term).copied() }

    pub fn contains(&self, term: &str) -> bool { self.terms.contains_key(term) }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get_index(id as usize).map(|(t, _)| t.as_str())
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Terms in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TermId)> {
        self.terms.iter().map(|(t, id)| (t.as_str(), *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: u32, text: &str) -> Document {
        Document {
            id,
            title: String::new(),
            author: String::new(),
            date: String::new(),
            url: String::new(),
            text: text.into(),
        }
    }

    #[test]
    fn assigns_ids_in_first_seen_order() {
        let docs = vec![doc(0, "covid vaccine covid"), doc(1, "Vaccine trial")];
        let (vocab, counts) = Vocabulary::build(&docs);
        let terms: Vec<(&str, TermId)> = vocab.iter().collect();
        assert_eq!(terms, vec![("covid", 0), ("vaccine", 1), ("trial", 2)]);
        assert_eq!(counts[0], vec![(0, 2), (1, 1)]);
        assert_eq!(counts[1], vec![(1, 1), (2, 1)]);
        assert_eq!(vocab.term(2), Some("trial"));
        assert_eq!(vocab.get("missing"), None);
    }

    #[test]
    fn empty_documents_produce_empty_rows() {
        let (vocab, counts) = Vocabulary::build(&[doc(0, ""), doc(1, "... !!")]);
        assert!(vocab.is_empty());
        assert_eq!(counts, vec![vec![], vec![]]);
    }
}
