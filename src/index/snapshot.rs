//! In-memory index snapshot and TF-IDF scoring
//!
//! A snapshot is immutable once built or loaded; a rebuild replaces it
//! wholesale, so searchers never observe a half-built index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Document identifier, assigned 0-based in record read order
pub type DocId = u32;

/// One extracted record: field name to string value, absent fields empty
pub type StructuredRecord = HashMap<String, String>;

/// Which IDF formula to score with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IdfMethod {
    /// `ln(N / df)`; a term present in every document scores zero
    #[default]
    Classic,
    /// `ln((N + 1) / (df + 1)) + 1`; well-defined even for unseen terms
    Smooth,
}

impl fmt::Display for IdfMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdfMethod::Classic => write!(f, "classic"),
            IdfMethod::Smooth => write!(f, "smooth"),
        }
    }
}

/// Human-readable statistics artifact, persisted as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_docs: u32,
    pub total_unique_terms: usize,
    pub doc_lengths: HashMap<DocId, u32>,
    pub indexed_fields: Vec<String>,
}

/// The complete built index
///
/// Zero-valued entries are never stored: a term absent from a document's
/// postings has an implied frequency of 0, and a term absent from
/// `term_doc_freq` has an implied df of 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// term -> (doc id -> term frequency in that document)
    pub inverted_index: HashMap<String, HashMap<DocId, u32>>,

    /// doc id -> extracted record fields
    pub doc_metadata: HashMap<DocId, StructuredRecord>,

    /// term -> number of distinct documents containing it
    pub term_doc_freq: HashMap<String, u32>,

    /// doc id -> total indexed-term occurrences across all fields
    pub doc_lengths: HashMap<DocId, u32>,

    pub total_docs: u32,

    /// Fields whose text was tokenized into the index
    pub indexed_fields: Vec<String>,
}

impl IndexSnapshot {
    /// Term frequency: occurrences of `term` in the document divided by the
    /// document's length; 0 for unknown or zero-length documents
    pub fn tf(&self, term: &str, doc_id: DocId) -> f64 {
        let length = match self.doc_lengths.get(&doc_id) {
            Some(&len) if len > 0 => len,
            _ => return 0.0,
        };
        let freq = self
            .inverted_index
            .get(term)
            .and_then(|postings| postings.get(&doc_id))
            .copied()
            .unwrap_or(0);
        f64::from(freq) / f64::from(length)
    }

    /// Classic IDF: `ln(N / df)`, 0 when the term is unseen
    pub fn idf_classic(&self, term: &str) -> f64 {
        let df = self.term_doc_freq.get(term).copied().unwrap_or(0);
        if df == 0 {
            return 0.0;
        }
        (f64::from(self.total_docs) / f64::from(df)).ln()
    }

    /// Smooth IDF: `ln((N + 1) / (df + 1)) + 1`
    pub fn idf_smooth(&self, term: &str) -> f64 {
        let df = self.term_doc_freq.get(term).copied().unwrap_or(0);
        (f64::from(self.total_docs + 1) / f64::from(df + 1)).ln() + 1.0
    }

    pub fn idf(&self, term: &str, method: IdfMethod) -> f64 {
        match method {
            IdfMethod::Classic => self.idf_classic(term),
            IdfMethod::Smooth => self.idf_smooth(term),
        }
    }

    /// TF-IDF score of `term` in `doc_id` under the chosen method
    pub fn tfidf(&self, term: &str, doc_id: DocId, method: IdfMethod) -> f64 {
        self.tf(term, doc_id) * self.idf(term, method)
    }

    /// Number of distinct terms in the index
    pub fn vocabulary_size(&self) -> usize {
        self.inverted_index.len()
    }

    /// Builds the human-readable statistics artifact
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_docs: self.total_docs,
            total_unique_terms: self.vocabulary_size(),
            doc_lengths: self.doc_lengths.clone(),
            indexed_fields: self.indexed_fields.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two documents: doc 0 has "temple" twice out of 10 terms, doc 1 once
    /// out of 5 terms; "garden" appears only in doc 0.
    fn two_doc_snapshot() -> IndexSnapshot {
        let mut inverted_index: HashMap<String, HashMap<DocId, u32>> = HashMap::new();
        inverted_index.insert("temple".to_string(), HashMap::from([(0, 2), (1, 1)]));
        inverted_index.insert("garden".to_string(), HashMap::from([(0, 1)]));

        IndexSnapshot {
            inverted_index,
            doc_metadata: HashMap::from([(0, HashMap::new()), (1, HashMap::new())]),
            term_doc_freq: HashMap::from([("temple".to_string(), 2), ("garden".to_string(), 1)]),
            doc_lengths: HashMap::from([(0, 10), (1, 5)]),
            total_docs: 2,
            indexed_fields: vec!["description".to_string()],
        }
    }

    #[test]
    fn test_tf() {
        let snapshot = two_doc_snapshot();
        assert_eq!(snapshot.tf("temple", 0), 0.2);
        assert_eq!(snapshot.tf("temple", 1), 0.2);
        assert_eq!(snapshot.tf("garden", 1), 0.0);
    }

    #[test]
    fn test_tf_unknown_doc_is_zero() {
        let snapshot = two_doc_snapshot();
        assert_eq!(snapshot.tf("temple", 99), 0.0);
    }

    #[test]
    fn test_tf_zero_length_doc() {
        let mut snapshot = two_doc_snapshot();
        snapshot.doc_lengths.insert(2, 0);
        assert_eq!(snapshot.tf("temple", 2), 0.0);
    }

    #[test]
    fn test_idf_classic_ubiquitous_term_is_zero() {
        let snapshot = two_doc_snapshot();
        // df == total_docs, so ln(2/2) == 0 and tfidf collapses to 0
        assert_eq!(snapshot.idf_classic("temple"), 0.0);
        assert_eq!(snapshot.tfidf("temple", 0, IdfMethod::Classic), 0.0);
        assert_eq!(snapshot.tfidf("temple", 1, IdfMethod::Classic), 0.0);
    }

    #[test]
    fn test_idf_classic_rare_term() {
        let snapshot = two_doc_snapshot();
        assert!((snapshot.idf_classic("garden") - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_idf_classic_unseen_term_is_zero() {
        let snapshot = two_doc_snapshot();
        assert_eq!(snapshot.idf_classic("nowhere"), 0.0);
    }

    #[test]
    fn test_idf_smooth_nonzero_for_ubiquitous_term() {
        let snapshot = two_doc_snapshot();
        let expected = (3.0_f64 / 3.0).ln() + 1.0;
        assert!((snapshot.idf_smooth("temple") - expected).abs() < 1e-12);
        assert!(snapshot.tfidf("temple", 0, IdfMethod::Smooth) > 0.0);
    }

    #[test]
    fn test_idf_smooth_defined_for_unseen_term() {
        let snapshot = two_doc_snapshot();
        let expected = (3.0_f64 / 1.0).ln() + 1.0;
        assert!((snapshot.idf_smooth("nowhere") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_tfidf_product() {
        let snapshot = two_doc_snapshot();
        let expected = 0.1 * 2.0_f64.ln();
        let got = snapshot.tfidf("garden", 0, IdfMethod::Classic);
        assert!((got - expected).abs() < 1e-12);
    }
}
