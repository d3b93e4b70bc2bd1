mod arxiv;
mod reddit;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fetcher")]
#[command(about = "Fetch a subreddit's hot posts and an arXiv query into a JSONL corpus")]
struct Cli {
    /// Output JSONL file path
    #[arg(long, default_value = "./data/corpus.jsonl")]
    output: String,
    /// Subreddit to read hot posts from
    #[arg(long, default_value = "Coronavirus")]
    subreddit: String,
    /// Maximum number of Reddit posts
    #[arg(long, default_value_t = 100)]
    reddit_limit: usize,
    /// arXiv search terms (matched against all fields)
    #[arg(long, default_value = "covid")]
    arxiv_query: String,
    /// Maximum number of arXiv entries
    #[arg(long, default_value_t = 100)]
    arxiv_max: usize,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent string sent to both feeds
    #[arg(long, default_value = "corpus-search-fetcher/0.1")]
    user_agent: String,
    /// Skip the Reddit feed
    #[arg(long, default_value_t = false)]
    no_reddit: bool,
    /// Skip the arXiv feed
    #[arg(long, default_value_t = false)]
    no_arxiv: bool,
}

/// One line of the JSONL interchange file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedDocument {
    pub title: String,
    pub author: String,
    pub date: String,
    pub url: String,
    pub text: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    if let Some(dir) = std::path::Path::new(&args.output).parent() {
        fs::create_dir_all(dir).ok();
    }

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let (reddit_docs, arxiv_docs) = tokio::join!(
        async {
            if args.no_reddit { return Ok(Vec::new()); }
            reddit::fetch(&client, &args.subreddit, args.reddit_limit).await.context("reddit feed")
        },
        async {
            if args.no_arxiv { return Ok(Vec::new()); }
            arxiv::fetch(&client, &args.arxiv_query, args.arxiv_max).await.context("arxiv feed")
        },
    );
    let (reddit_docs, arxiv_docs): (Vec<FeedDocument>, Vec<FeedDocument>) = (reddit_docs?, arxiv_docs?);

    let mut out = BufWriter::new(File::create(&args.output)?);
    // Reddit first, then arXiv: this order becomes the corpus order.
    for doc in reddit_docs.iter().chain(arxiv_docs.iter()) {
        serde_json::to_writer(&mut out, doc)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    tracing::info!(
        reddit = reddit_docs.len(),
        arxiv = arxiv_docs.len(),
        output = %args.output,
        "corpus written"
    );
    Ok(())
}
