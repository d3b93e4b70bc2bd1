use crate::Corpus;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
    /// Length filter applied before saving, if any.
    pub min_text_length: Option<usize>,
}

pub struct StorePaths {
    pub root: PathBuf,
}

impl StorePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn corpus(&self) -> PathBuf { self.root.join("corpus.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn save_corpus(paths: &StorePaths, corpus: &Corpus) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.corpus())
        .with_context(|| format!("creating {}", paths.corpus().display()))?;
    let bytes = bincode::serialize(corpus)?;
    f.write_all(&bytes)?;
    tracing::debug!(num_docs = corpus.len(), bytes = bytes.len(), "corpus saved");
    Ok(())
}

pub fn load_corpus(paths: &StorePaths) -> Result<Corpus> {
    let mut f = File::open(paths.corpus())
        .with_context(|| format!("opening {}", paths.corpus().display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let corpus = bincode::deserialize(&buf)?;
    Ok(corpus)
}

pub fn save_meta(paths: &StorePaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &StorePaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())
        .with_context(|| format!("opening {}", paths.meta().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Load the corpus and its metadata, checking that they agree.
pub fn load_store(paths: &StorePaths) -> Result<(Corpus, MetaFile)> {
    let meta = load_meta(paths)?;
    if meta.version != STORE_VERSION {
        anyhow::bail!("unsupported store version {} (expected {})", meta.version, STORE_VERSION);
    }
    let corpus = load_corpus(paths)?;
    if corpus.len() != meta.num_docs as usize {
        anyhow::bail!("meta.json lists {} documents but corpus.bin holds {}", meta.num_docs, corpus.len());
    }
    Ok((corpus, meta))
}
