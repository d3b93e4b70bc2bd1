use crate::query::Hit;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

pub const EXCERPT_CHARS: usize = 200;

pub const CSV_HEADER: [&str; 5] = ["Title", "Author", "Date", "Score", "Excerpt"];

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    author: &'a str,
    date: &'a str,
    score: f64,
    excerpt: &'a str,
}

/// Write hits as CSV in the order given. The header row is written even when `hits` is empty.
pub fn write_csv<W: Write>(writer: W, hits: &[Hit<'_>]) -> Result<()> {
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    w.write_record(CSV_HEADER)?;
    for hit in hits {
        w.serialize(CsvRow {
            title: &hit.doc.title,
            author: &hit.doc.author,
            date: &hit.doc.date,
            score: hit.score,
            excerpt: hit.doc.excerpt(EXCERPT_CHARS),
        })?;
    }
    w.flush()?;
    Ok(())
}

pub fn to_csv_bytes(hits: &[Hit<'_>]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, hits)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn quotes_fields_with_commas() {
        let doc = Document {
            id: 0,
            title: "Vaccines, boosters".into(),
            author: "cdc".into(),
            date: "2024-08-11".into(),
            url: String::new(),
            text: "short".into(),
        };
        let bytes = to_csv_bytes(&[Hit { doc: &doc, score: 0.5 }]).unwrap();
        let out = String::from_utf8(bytes).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Title,Author,Date,Score,Excerpt"));
        assert_eq!(lines.next(), Some("\"Vaccines, boosters\",cdc,2024-08-11,0.5,short"));
    }

    #[test]
    fn empty_export_still_has_header() {
        let out = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(out, "Title,Author,Date,Score,Excerpt\n");
    }
}
