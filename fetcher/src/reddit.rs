use crate::FeedDocument;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use time::macros::format_description;
use time::OffsetDateTime;

const BASE: &str = "https://www.reddit.com";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    author: Option<String>,
    created_utc: f64,
    #[serde(default)]
    permalink: String,
}

/// Hot posts of `subreddit`, one document per post title.
pub async fn fetch(client: &Client, subreddit: &str, limit: usize) -> Result<Vec<FeedDocument>> {
    let url = format!("{BASE}/r/{subreddit}/hot.json");
    let body = client
        .get(&url)
        .query(&[("limit", limit.to_string())])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let docs = parse_listing(&body).with_context(|| format!("parsing listing from {url}"))?;
    tracing::info!(subreddit, count = docs.len(), "fetched reddit posts");
    Ok(docs)
}

pub fn parse_listing(json: &str) -> Result<Vec<FeedDocument>> {
    let listing: Listing = serde_json::from_str(json)?;
    listing.data.children.into_iter().map(|c| to_document(c.data)).collect()
}

fn to_document(post: Post) -> Result<FeedDocument> {
    let created = OffsetDateTime::from_unix_timestamp(post.created_utc as i64)?;
    let date = created.format(format_description!("[year]-[month]-[day]"))?;
    let url = if post.permalink.is_empty() { String::new() } else { format!("{BASE}{}", post.permalink) };
    Ok(FeedDocument {
        text: post.title.replace('\n', " "),
        title: post.title,
        author: post.author.unwrap_or_else(|| "[deleted]".to_string()),
        date,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hot_listing() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": "t3_x",
                "children": [
                    {"kind": "t3", "data": {"title": "Nasal vaccine\nprevents spread", "author": "rednoise",
                        "created_utc": 1723334400.0, "permalink": "/r/Coronavirus/comments/abc/nasal/", "score": 10}},
                    {"kind": "t3", "data": {"title": "Deleted post", "author": null, "created_utc": 0.0}}
                ]
            }
        }"#;
        let docs = parse_listing(json).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "Nasal vaccine\nprevents spread");
        assert_eq!(docs[0].text, "Nasal vaccine prevents spread");
        assert_eq!(docs[0].date, "2024-08-11");
        assert_eq!(docs[0].url, "https://www.reddit.com/r/Coronavirus/comments/abc/nasal/");
        assert_eq!(docs[1].author, "[deleted]");
        assert_eq!(docs[1].date, "1970-01-01");
        assert_eq!(docs[1].url, "");
    }
}
