use crate::FeedDocument;
use anyhow::{anyhow, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

const API: &str = "http://export.arxiv.org/api/query";

/// The `<author>` elements of one Atom entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorField {
    Missing,
    Single(String),
    Multiple(Vec<String>),
}

impl AuthorField {
    pub fn from_names(mut names: Vec<String>) -> Self {
        match names.len() {
            0 => AuthorField::Missing,
            1 => AuthorField::Single(names.remove(0)),
            _ => AuthorField::Multiple(names),
        }
    }

    pub fn display(&self) -> String {
        match self {
            AuthorField::Missing => "Unknown".to_string(),
            AuthorField::Single(name) => name.clone(),
            AuthorField::Multiple(names) => names.join(", "),
        }
    }
}

struct Selectors {
    entry: Selector,
    title: Selector,
    summary: Selector,
    author_name: Selector,
    published: Selector,
    id: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        let parse = |s: &str| Selector::parse(s).map_err(|e| anyhow!("invalid selector {s}: {e}"));
        Ok(Self {
            entry: parse("entry")?,
            title: parse("title")?,
            summary: parse("summary")?,
            author_name: parse("author > name")?,
            published: parse("published")?,
            id: parse("id")?,
        })
    }
}

pub async fn fetch(client: &Client, query: &str, max_results: usize) -> Result<Vec<FeedDocument>> {
    let body = client
        .get(API)
        .query(&[
            ("search_query", format!("all:{query}")),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let docs = parse_feed(&body)?;
    tracing::info!(query, count = docs.len(), "fetched arxiv entries");
    Ok(docs)
}

fn first_text(el: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel).next().map(|n| n.text().collect::<String>())
}

/// Parse an Atom feed into documents, one per `<entry>`.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedDocument>> {
    let sel = Selectors::new()?;
    let doc = Html::parse_document(xml);
    let mut out = Vec::new();
    for entry in doc.select(&sel.entry) {
        let title = first_text(&entry, &sel.title).unwrap_or_default();
        let summary = first_text(&entry, &sel.summary).unwrap_or_default();
        let names = entry
            .select(&sel.author_name)
            .map(|n| n.text().collect::<String>().trim().to_string())
            .collect();
        let authors = AuthorField::from_names(names);
        out.push(FeedDocument {
            text: format!("{title}. {summary}").replace('\n', " "),
            title,
            author: authors.display(),
            date: first_text(&entry, &sel.published).unwrap_or_else(|| "Unknown".to_string()),
            url: first_text(&entry, &sel.id).map(|s| s.trim().to_string()).unwrap_or_default(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <link href="http://arxiv.org/api/query" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=all:covid</title>
  <id>http://arxiv.org/api/abc</id>
  <entry>
    <id>http://arxiv.org/abs/2001.00001v1</id>
    <published>2020-03-01T00:00:00Z</published>
    <title>Modelling COVID
  spread</title>
    <summary>We model the spread &amp; decline.</summary>
    <author>
      <name>Ada Lovelace</name>
    </author>
    <author>
      <name>Alan Turing</name>
    </author>
    <link href="http://arxiv.org/abs/2001.00001v1" rel="alternate" type="text/html"/>
    <category term="q-bio.PE" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2001.00002v1</id>
    <title>Vaccine trial</title>
    <summary>Results.</summary>
    <author>
      <name>Grace Hopper</name>
    </author>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2001.00003v1</id>
    <title>Anonymous</title>
    <summary>No authors.</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_entries_and_author_variants() {
        let docs = parse_feed(FEED).unwrap();
        assert_eq!(docs.len(), 3);

        assert_eq!(docs[0].title, "Modelling COVID\n  spread");
        assert_eq!(docs[0].text, "Modelling COVID   spread. We model the spread & decline.");
        assert_eq!(docs[0].author, "Ada Lovelace, Alan Turing");
        assert_eq!(docs[0].date, "2020-03-01T00:00:00Z");
        assert_eq!(docs[0].url, "http://arxiv.org/abs/2001.00001v1");

        assert_eq!(docs[1].author, "Grace Hopper");
        assert_eq!(docs[1].date, "Unknown");
        assert_eq!(docs[2].author, "Unknown");
    }

    #[test]
    fn author_field_variants() {
        assert_eq!(AuthorField::from_names(vec![]), AuthorField::Missing);
        assert_eq!(AuthorField::from_names(vec!["a".into()]).display(), "a");
        assert_eq!(AuthorField::from_names(vec!["a".into(), "b".into()]).display(), "a, b");
    }
}
