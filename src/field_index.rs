//! A named bundle of token indexes, one per corpus field.
//!
//! Fields are ordered, uniquely named, and each carries a weight in `(0, 1]`.
//! A query scores against every field independently and the results combine
//! with [`Score::max`]: a document scores as well as its best-matching field
//! and is never double-counted for matching several.

use crate::score::Score;
use crate::text::Analyzer;
use crate::token_index::TokenIndex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Configuration for one indexed field: its corpus name and its weight.
///
/// Weights express how much a match in the field is worth relative to a
/// match in the package name. They do not need to sum to anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub weight: f64,
}

impl FieldSpec {
    pub fn new(name: &str, weight: f64) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            weight,
        }
    }

    /// The default field layout for a package-registry corpus.
    ///
    /// | field | weight |
    /// |---|---|
    /// | `name` | 1.00 |
    /// | `description` | 0.90 |
    /// | `api_symbols` | 0.80 |
    /// | `readme` | 0.75 |
    pub fn package_defaults() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", 1.0),
            FieldSpec::new("description", 0.90),
            FieldSpec::new("api_symbols", 0.80),
            FieldSpec::new("readme", 0.75),
        ]
    }
}

/// One field: its spec plus its token index.
#[derive(Debug)]
struct Field {
    name: String,
    weight: f64,
    index: TokenIndex,
}

impl Field {
    fn add_documents(&mut self, documents: &[(&str, &HashMap<String, String>)]) {
        for (doc_id, fields) in documents {
            let text = fields.get(&self.name).map(String::as_str).unwrap_or("");
            self.index.add(doc_id, text);
        }
    }
}

/// The field-collection index: every searchable field of the corpus.
#[derive(Debug, Default)]
pub struct FieldIndex {
    fields: Vec<Field>,
}

impl FieldIndex {
    /// Build an empty index with the given field layout.
    ///
    /// Field names must be unique and weights must lie in `(0, 1]`; both are
    /// configuration bugs rather than runtime conditions, so they are checked
    /// with debug assertions only.
    pub fn new(specs: Vec<FieldSpec>) -> FieldIndex {
        FieldIndex::with_analyzer(specs, Analyzer::default())
    }

    pub fn with_analyzer(specs: Vec<FieldSpec>, analyzer: Analyzer) -> FieldIndex {
        debug_assert!(
            specs
                .iter()
                .map(|s| s.name.as_str())
                .collect::<HashSet<_>>()
                .len()
                == specs.len(),
            "field names must be unique"
        );
        debug_assert!(
            specs.iter().all(|s| s.weight > 0.0 && s.weight <= 1.0),
            "field weights must be in (0, 1]"
        );
        let fields = specs
            .into_iter()
            .map(|spec| Field {
                name: spec.name,
                weight: spec.weight,
                index: TokenIndex::with_analyzer(analyzer),
            })
            .collect();
        FieldIndex { fields }
    }

    /// The configured field names, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Total distinct tokens across all fields.
    pub fn token_count(&self) -> usize {
        self.fields.iter().map(|f| f.index.token_count()).sum()
    }

    /// Index one document. A field absent from `fields` is cleared.
    pub fn add(&mut self, doc_id: &str, fields: &HashMap<String, String>) {
        for field in &mut self.fields {
            let text = fields.get(&field.name).map(String::as_str).unwrap_or("");
            field.index.add(doc_id, text);
        }
    }

    /// Remove one document from every field.
    pub fn remove(&mut self, doc_id: &str) {
        for field in &mut self.fields {
            field.index.remove(doc_id);
        }
    }

    /// Bulk-index a corpus snapshot, one task per field.
    ///
    /// The fields are independent indexes, so with the `parallel` feature
    /// each is built on its own rayon task; without it the loop runs
    /// sequentially with identical results.
    pub fn add_documents(&mut self, documents: &[(&str, &HashMap<String, String>)]) {
        #[cfg(feature = "parallel")]
        self.fields
            .par_iter_mut()
            .for_each(|field| field.add_documents(documents));

        #[cfg(not(feature = "parallel"))]
        for field in &mut self.fields {
            field.add_documents(documents);
        }
    }

    /// Score `words` against every field and keep each document's best
    /// weighted field score.
    pub fn search(&self, words: &[String], restrict_to: Option<&HashSet<String>>) -> Score {
        Score::max(
            self.fields
                .iter()
                .map(|field| field.index.search_words(words, field.weight, restrict_to))
                .collect::<Vec<_>>(),
        )
    }
}
