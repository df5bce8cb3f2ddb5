//! Search module: ranked retrieval over a built index
//!
//! A [`Searcher`] wraps one immutable [`IndexSnapshot`] for a session.
//! Queries are tokenized with the indexer's tokenizer, scored with TF-IDF
//! under either IDF formula, and ranked descending by score with ties broken
//! by ascending doc id (first-indexed wins).

use crate::index::{tokenize, DocId, IdfMethod, IndexSnapshot, StructuredRecord};
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

/// Size of the candidate pool scanned by filtered search
const FILTER_POOL_SIZE: usize = 1000;

/// Search-specific errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Index has no documents; build or load an index first")]
    EmptyIndex,
}

/// One ranked result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub metadata: StructuredRecord,
}

/// Side-by-side rankings from both IDF formulas, never merged
#[derive(Debug, Clone)]
pub struct IdfComparison {
    pub classic: Vec<SearchHit>,
    pub smooth: Vec<SearchHit>,
}

/// Diagnostics for a single index term
#[derive(Debug, Clone, PartialEq)]
pub enum TermStatistics {
    /// The input produced no usable term after normalization
    Invalid,
    /// The normalized term does not occur in the index
    NotFound { term: String },
    Found(TermReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermReport {
    pub term: String,
    /// Distinct documents containing the term
    pub document_frequency: u32,
    /// Sum of the term's postings across all documents
    pub total_occurrences: u64,
    pub idf_classic: f64,
    pub idf_smooth: f64,
    /// Share of the corpus containing the term, in percent
    pub percentage_of_docs: f64,
}

/// Ranked retrieval over one immutable snapshot
#[derive(Debug)]
pub struct Searcher {
    snapshot: IndexSnapshot,
}

impl Searcher {
    /// Wraps a snapshot; an empty index is a construction error
    pub fn new(snapshot: IndexSnapshot) -> Result<Self, SearchError> {
        if snapshot.total_docs == 0 {
            return Err(SearchError::EmptyIndex);
        }
        tracing::info!(
            "Searcher initialized with {} documents",
            snapshot.total_docs
        );
        Ok(Self { snapshot })
    }

    pub fn snapshot(&self) -> &IndexSnapshot {
        &self.snapshot
    }

    /// Scores and ranks documents for a query
    ///
    /// Every query term found in the index contributes its TF-IDF score to
    /// each document in its postings; absent terms contribute nothing.
    /// Returns at most `top_k` hits. An empty tokenized query yields an
    /// empty result.
    pub fn search(&self, query: &str, method: IdfMethod, top_k: usize) -> Vec<SearchHit> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            tracing::info!("No valid search terms found in query");
            return Vec::new();
        }

        tracing::debug!("Searching for {:?} using {} IDF", query_terms, method);

        let mut doc_scores: HashMap<DocId, f64> = HashMap::new();
        for term in &query_terms {
            let Some(postings) = self.snapshot.inverted_index.get(term.as_str()) else {
                tracing::info!("Term '{}' not found in index", term);
                continue;
            };
            for &doc_id in postings.keys() {
                *doc_scores.entry(doc_id).or_insert(0.0) +=
                    self.snapshot.tfidf(term, doc_id, method);
            }
        }

        let mut ranked: Vec<(DocId, f64)> = doc_scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(top_k);

        ranked
            .into_iter()
            .map(|(doc_id, score)| SearchHit {
                doc_id,
                score,
                metadata: self
                    .snapshot
                    .doc_metadata
                    .get(&doc_id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Runs the query once under each IDF formula for direct comparison
    pub fn compare_idf_methods(&self, query: &str, top_k: usize) -> IdfComparison {
        IdfComparison {
            classic: self.search(query, IdfMethod::Classic, top_k),
            smooth: self.search(query, IdfMethod::Smooth, top_k),
        }
    }

    /// Ranked search restricted by metadata filters
    ///
    /// Takes an oversized candidate pool by score, then scans it in rank
    /// order keeping documents whose metadata satisfies every filter via
    /// case-insensitive substring match. Order is inherited from the base
    /// ranking; filtering never re-ranks.
    pub fn search_with_filter(
        &self,
        query: &str,
        filters: &HashMap<String, String>,
        method: IdfMethod,
        top_k: usize,
    ) -> Vec<SearchHit> {
        let pool = self.search(query, method, FILTER_POOL_SIZE);

        let mut kept = Vec::new();
        for hit in pool {
            if matches_filters(&hit.metadata, filters) {
                kept.push(hit);
                if kept.len() >= top_k {
                    break;
                }
            }
        }

        tracing::debug!("Filters {:?} kept {} results", filters, kept.len());
        kept
    }

    /// Reports index diagnostics for a single term
    ///
    /// The input is normalized through the tokenizer; only the first
    /// resulting token is used.
    pub fn term_statistics(&self, term: &str) -> TermStatistics {
        let normalized = tokenize(term);
        let Some(term) = normalized.into_iter().next() else {
            return TermStatistics::Invalid;
        };

        let Some(postings) = self.snapshot.inverted_index.get(term.as_str()) else {
            return TermStatistics::NotFound { term };
        };

        let document_frequency = self
            .snapshot
            .term_doc_freq
            .get(term.as_str())
            .copied()
            .unwrap_or(0);
        let total_occurrences: u64 = postings.values().map(|&f| u64::from(f)).sum();

        TermStatistics::Found(TermReport {
            idf_classic: self.snapshot.idf_classic(&term),
            idf_smooth: self.snapshot.idf_smooth(&term),
            percentage_of_docs: f64::from(document_frequency)
                / f64::from(self.snapshot.total_docs)
                * 100.0,
            term,
            document_frequency,
            total_occurrences,
        })
    }
}

/// True if every filter value occurs case-insensitively in the
/// corresponding metadata field
fn matches_filters(metadata: &StructuredRecord, filters: &HashMap<String, String>) -> bool {
    filters.iter().all(|(field, value)| {
        metadata
            .get(field)
            .map(|actual| actual.to_lowercase().contains(&value.to_lowercase()))
            .unwrap_or(false)
    })
}
