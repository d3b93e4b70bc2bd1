use engine::authors::AuthorIndex;
use engine::export::EXCERPT_CHARS;
use engine::{CorpusStats, Hit};
use std::fmt::Write;

pub fn format_stats(stats: &CorpusStats) -> String {
    format!(
        "Corpus length: {}\nMean sentences per document: {:.2}\nMean words per document: {:.2}\nTotal words in corpus: {}\n",
        stats.count, stats.mean_sentences, stats.mean_words, stats.total_words
    )
}

pub fn format_results(hits: &[Hit<'_>]) -> String {
    if hits.is_empty() {
        return "No results found for your query.\n".to_string();
    }
    let mut out = String::from("\nTop results for your query:\n");
    for (i, hit) in hits.iter().enumerate() {
        let doc = hit.doc;
        let excerpt = doc.excerpt(EXCERPT_CHARS);
        let ellipsis = if excerpt.len() < doc.text.len() { "..." } else { "" };
        let _ = write!(
            out,
            "\n{}. {} (Score: {:.4})\n   Author: {}\n   Date: {}\n   Excerpt: {}{}\n",
            i + 1,
            doc.title,
            hit.score,
            doc.author,
            doc.date,
            excerpt,
            ellipsis
        );
    }
    out
}

pub fn format_authors(index: &AuthorIndex) -> String {
    let mut out = String::new();
    for author in index.iter() {
        let _ = writeln!(out, "Author: {}\t# documents: {}", author.name, author.count());
    }
    out
}
