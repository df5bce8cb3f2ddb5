//! Index construction from extracted records
//!
//! Consumes the extractor's CSV output and accumulates the inverted index,
//! per-document lengths, and document frequencies in one pass.

use crate::index::snapshot::{DocId, IndexSnapshot, StructuredRecord};
use crate::index::tokenizer::tokenize;
use crate::index::IndexError;
use std::collections::HashMap;
use std::path::Path;

/// Reads the extracted-records CSV into memory, in file order
///
/// Every row carries the full header's keys; fields missing from a page are
/// empty strings, never omitted.
pub fn read_records(path: &Path) -> Result<Vec<StructuredRecord>, IndexError> {
    if !path.exists() {
        return Err(IndexError::DataNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: StructuredRecord = result?;
        records.push(record);
    }
    Ok(records)
}

/// Builds a complete snapshot from structured records
///
/// Doc ids are assigned by input order starting at 0. For each indexable
/// field that is present and non-empty, its tokens are accumulated into the
/// document's term counts; document length is the total count over all
/// fields, and a term's document frequency increments once per document
/// containing it.
pub fn build(records: &[StructuredRecord], indexable_fields: &[String]) -> IndexSnapshot {
    let mut inverted_index: HashMap<String, HashMap<DocId, u32>> = HashMap::new();
    let mut doc_metadata: HashMap<DocId, StructuredRecord> = HashMap::new();
    let mut term_doc_freq: HashMap<String, u32> = HashMap::new();
    let mut doc_lengths: HashMap<DocId, u32> = HashMap::new();

    for (doc_id, record) in (0u32..).zip(records.iter()) {
        let mut doc_terms: HashMap<String, u32> = HashMap::new();

        for field in indexable_fields {
            let Some(value) = record.get(field) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            for token in tokenize(value) {
                *doc_terms.entry(token).or_insert(0) += 1;
            }
        }

        let length: u32 = doc_terms.values().sum();
        doc_lengths.insert(doc_id, length);

        for (term, freq) in doc_terms {
            *term_doc_freq.entry(term.clone()).or_insert(0) += 1;
            inverted_index.entry(term).or_default().insert(doc_id, freq);
        }

        doc_metadata.insert(doc_id, record.clone());

        if (doc_id + 1) % 100 == 0 {
            tracing::debug!("Indexed {} documents...", doc_id + 1);
        }
    }

    let total_docs = records.len() as u32;
    tracing::info!(
        "Index build complete: {} documents, {} unique terms",
        total_docs,
        inverted_index.len()
    );

    IndexSnapshot {
        inverted_index,
        doc_metadata,
        term_doc_freq,
        doc_lengths,
        total_docs,
        indexed_fields: indexable_fields.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(fields: &[(&str, &str)]) -> StructuredRecord {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_assigns_doc_ids_in_order() {
        let records = vec![
            record(&[("name", "Alhambra"), ("url", "https://x.com/a")]),
            record(&[("name", "Petra"), ("url", "https://x.com/b")]),
        ];
        let snapshot = build(&records, &fields(&["name"]));

        assert_eq!(snapshot.total_docs, 2);
        assert_eq!(snapshot.doc_metadata[&0]["name"], "Alhambra");
        assert_eq!(snapshot.doc_metadata[&1]["name"], "Petra");
    }

    #[test]
    fn test_term_frequencies_and_lengths() {
        let records = vec![record(&[
            ("name", "temple garden"),
            ("description", "the temple stands"),
        ])];
        let snapshot = build(&records, &fields(&["name", "description"]));

        // "temple" twice across two fields, "the" dropped by length filter
        assert_eq!(snapshot.inverted_index["temple"][&0], 2);
        assert_eq!(snapshot.inverted_index["garden"][&0], 1);
        assert_eq!(snapshot.inverted_index["stands"][&0], 1);
        assert_eq!(snapshot.doc_lengths[&0], 4);
    }

    #[test]
    fn test_df_counts_documents_not_occurrences() {
        let records = vec![
            record(&[("name", "temple temple temple")]),
            record(&[("name", "temple")]),
            record(&[("name", "garden")]),
        ];
        let snapshot = build(&records, &fields(&["name"]));

        assert_eq!(snapshot.term_doc_freq["temple"], 2);
        assert_eq!(snapshot.term_doc_freq["garden"], 1);
    }

    #[test]
    fn test_unindexed_fields_ignored() {
        let records = vec![record(&[("name", "temple"), ("votes", "12345")])];
        let snapshot = build(&records, &fields(&["name"]));

        assert!(!snapshot.inverted_index.contains_key("12345"));
        // but the metadata keeps every field
        assert_eq!(snapshot.doc_metadata[&0]["votes"], "12345");
    }

    #[test]
    fn test_empty_fields_and_empty_corpus() {
        let records = vec![record(&[("name", ""), ("description", "")])];
        let snapshot = build(&records, &fields(&["name", "description"]));
        assert_eq!(snapshot.total_docs, 1);
        assert_eq!(snapshot.doc_lengths[&0], 0);
        assert!(snapshot.inverted_index.is_empty());

        let empty = build(&[], &fields(&["name"]));
        assert_eq!(empty.total_docs, 0);
    }

    #[test]
    fn test_read_records_missing_file() {
        let err = read_records(Path::new("/nonexistent/extracted.csv")).unwrap_err();
        assert!(matches!(err, IndexError::DataNotFound(_)));
    }

    #[test]
    fn test_read_records_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "url,name,description").unwrap();
        writeln!(file, "https://x.com/a,Alhambra,Moorish palace").unwrap();
        writeln!(file, "https://x.com/b,Petra,").unwrap();
        file.flush().unwrap();

        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Alhambra");
        // absent values come back as empty strings, not missing keys
        assert_eq!(records[1]["description"], "");
    }
}
