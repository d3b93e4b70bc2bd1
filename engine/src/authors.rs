use crate::{DocId, Document};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorEntry {
    pub name: String,
    pub documents: Vec<DocId>,
}

impl AuthorEntry {
    pub fn count(&self) -> usize { self.documents.len() }
}

/// Documents grouped by their author string, in order of first appearance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthorIndex {
    authors: IndexMap<String, AuthorEntry>,
}

impl AuthorIndex {
    pub fn from_docs(docs: &[Document]) -> Self {
        let mut authors: IndexMap<String, AuthorEntry> = IndexMap::new();
        for doc in docs {
            authors
                .entry(doc.author.clone())
                .or_insert_with(|| AuthorEntry { name: doc.author.clone(), documents: Vec::new() })
                .documents
                .push(doc.id);
        }
        Self { authors }
    }

    pub fn get(&self, name: &str) -> Option<&AuthorEntry> { self.authors.get(name) }

    pub fn iter(&self) -> impl Iterator<Item = &AuthorEntry> { self.authors.values() }

    pub fn len(&self) -> usize { self.authors.len() }

    pub fn is_empty(&self) -> bool { self.authors.is_empty() }
}
