use anyhow::{Context, Result};
use engine::{Corpus, RawDocument};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `.json`/`.jsonl` files under `input` (or `input` itself), sorted for a stable corpus order.
pub fn collect_input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

/// Read every input file into one corpus, in file order then record order.
pub fn load_inputs(input: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    let files = collect_input_files(input);
    if files.is_empty() {
        anyhow::bail!("no .json or .jsonl input found at {}", input.display());
    }
    for file in files {
        let before = corpus.len();
        let read = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut corpus)
        } else {
            read_json(&file, &mut corpus)
        };
        read.with_context(|| format!("reading {}", file.display()))?;
        tracing::debug!(file = %file.display(), docs = corpus.len() - before, "ingested file");
    }
    Ok(corpus)
}

fn read_jsonl(file: &Path, corpus: &mut Corpus) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: RawDocument = serde_json::from_str(&line)?;
        corpus.ingest(doc);
    }
    Ok(())
}

fn read_json(file: &Path, corpus: &mut Corpus) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: RawDocument = serde_json::from_value(v)?;
                corpus.ingest(doc);
            }
        }
        serde_json::Value::Object(_) => {
            let doc: RawDocument = serde_json::from_value(json)?;
            corpus.ingest(doc);
        }
        _ => tracing::warn!(file = %file.display(), "ignoring json that is neither an object nor an array"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_jsonl_and_json_in_file_order() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"title\":\"r1\",\"author\":\"u\",\"text\":\"first post\"}\n\n{\"title\":\"r2\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"title":"x1","text":"paper one"},{"title":"x2","text":"paper two"}]"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let corpus = load_inputs(dir.path()).unwrap();
        let titles: Vec<&str> = corpus.docs().iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["r1", "r2", "x1", "x2"]);
        assert_eq!(corpus.docs()[1].text, "");
        assert_eq!(corpus.docs()[3].id, 3);
    }

    #[test]
    fn single_object_json() {
        let dir = tempdir().unwrap();
        let f = dir.path().join("one.json");
        fs::write(&f, r#"{"title":"solo","text":"only doc"}"#).unwrap();
        assert_eq!(load_inputs(&f).unwrap().len(), 1);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_inputs(dir.path()).is_err());
    }
}
