mod ingest;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::authors::AuthorIndex;
use engine::export::write_csv;
use engine::persist::{load_store, save_corpus, save_meta, MetaFile, StorePaths, STORE_VERSION};
use engine::query::sort_hits;
use engine::{compute_statistics, Engine, SortKey, DEFAULT_TOP_N};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build, inspect and search a TF-IDF corpus store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest JSON/JSONL documents (file or directory) into a corpus store
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output store directory
        #[arg(long, default_value = "./store")]
        output: String,
        /// Keep only documents whose text is longer than this many characters
        #[arg(long)]
        min_length: Option<usize>,
    },
    /// Print corpus statistics
    Stats {
        #[arg(long, default_value = "./store")]
        store: String,
    },
    /// Rank documents against a free-text query
    Search {
        #[arg(long, default_value = "./store")]
        store: String,
        /// Query text
        #[arg(long)]
        query: String,
        /// Number of results
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
        /// Result order: score, date or author
        #[arg(long, default_value = "score")]
        sort: SortKey,
        /// Also write the results to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// List authors and how many documents each contributed
    Authors {
        #[arg(long, default_value = "./store")]
        store: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, min_length } => build_store(&input, &output, min_length),
        Commands::Stats { store } => {
            let (corpus, _) = load_store(&StorePaths::new(&store))?;
            print!("{}", render::format_stats(&compute_statistics(corpus.docs())));
            Ok(())
        }
        Commands::Search { store, query, top, sort, csv } => search(&store, &query, top, sort, csv.as_deref()),
        Commands::Authors { store } => {
            let (corpus, _) = load_store(&StorePaths::new(&store))?;
            print!("{}", render::format_authors(&AuthorIndex::from_docs(corpus.docs())));
            Ok(())
        }
    }
}

fn build_store(input: &str, output: &str, min_length: Option<usize>) -> Result<()> {
    let mut corpus = ingest::load_inputs(Path::new(input))?;
    tracing::info!(num_docs = corpus.len(), "ingested documents");
    if let Some(min) = min_length {
        corpus = corpus.filter_long_texts(min);
        tracing::info!(num_docs = corpus.len(), min_length = min, "applied length filter");
    }

    let paths = StorePaths::new(output);
    save_corpus(&paths, &corpus)?;
    let meta = MetaFile {
        num_docs: corpus.len() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: STORE_VERSION,
        min_text_length: min_length,
    };
    save_meta(&paths, &meta)?;

    print!("{}", render::format_stats(&compute_statistics(corpus.docs())));
    tracing::info!(output, "store build complete");
    Ok(())
}

fn search(store: &str, query: &str, top: usize, sort: SortKey, csv: Option<&str>) -> Result<()> {
    let (corpus, _) = load_store(&StorePaths::new(store))?;
    let engine = Engine::build(corpus);
    let mut hits = engine.search(query, top)?;
    sort_hits(&mut hits, sort);
    print!("{}", render::format_results(&hits));
    if let Some(path) = csv {
        write_csv(BufWriter::new(File::create(path)?), &hits)?;
        tracing::info!(path, rows = hits.len(), "results exported");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn build_store_filters_short_texts_and_records_threshold() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("docs.jsonl");
        fs::write(
            &input,
            "{\"title\":\"short\",\"text\":\"tiny\"}\n\
             {\"title\":\"long\",\"text\":\"a text well past the cutoff\"}\n\
             {\"title\":\"edge\",\"text\":\"ten chars!\"}\n\
             {\"title\":\"longer\",\"text\":\"another text that clears it\"}\n",
        )
        .unwrap();
        let output = dir.path().join("store");

        build_store(input.to_str().unwrap(), output.to_str().unwrap(), Some(10)).unwrap();

        let (corpus, meta) = load_store(&StorePaths::new(&output)).unwrap();
        let ids: Vec<u32> = corpus.docs().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(meta.num_docs, 2);
        assert_eq!(meta.min_text_length, Some(10));
        assert_eq!(meta.version, STORE_VERSION);
        assert!(!meta.created_at.is_empty());
    }

    #[test]
    fn build_store_without_threshold_keeps_everything() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("docs.jsonl");
        fs::write(&input, "{\"text\":\"a\"}\n{\"text\":\"b\"}\n").unwrap();
        let output = dir.path().join("store");

        build_store(input.to_str().unwrap(), output.to_str().unwrap(), None).unwrap();

        let (corpus, meta) = load_store(&StorePaths::new(&output)).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(meta.min_text_length, None);
    }
}
