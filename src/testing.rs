//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixture builders so the `tests/` suites and the
//! benches reuse one way of constructing corpora instead of growing
//! divergent copies.

#![doc(hidden)]

use crate::error::SearchError;
use crate::service::{CorpusProvider, CorpusSnapshot, DocumentEntry};
use std::collections::HashMap;

/// Build a [`DocumentEntry`] from literal field, tag, and ordering slices.
pub fn corpus_entry(
    fields: &[(&str, &str)],
    tags: &[&str],
    ordering: &[(&str, f64)],
) -> DocumentEntry {
    DocumentEntry {
        fields: fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ordering_fields: ordering.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

/// A corpus provider serving one fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    snapshot: CorpusSnapshot,
}

impl StaticCorpus {
    pub fn new(snapshot: CorpusSnapshot) -> StaticCorpus {
        StaticCorpus { snapshot }
    }

    pub fn from_entries<'a, I>(entries: I) -> StaticCorpus
    where
        I: IntoIterator<Item = (&'a str, DocumentEntry)>,
    {
        let documents: HashMap<String, DocumentEntry> = entries
            .into_iter()
            .map(|(id, entry)| (id.to_string(), entry))
            .collect();
        StaticCorpus {
            snapshot: CorpusSnapshot { documents },
        }
    }
}

impl CorpusProvider for StaticCorpus {
    fn snapshot(&self) -> Result<CorpusSnapshot, SearchError> {
        Ok(self.snapshot.clone())
    }
}

/// A corpus provider that always fails, for exercising rebuild fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCorpus;

impl CorpusProvider for FailingCorpus {
    fn snapshot(&self) -> Result<CorpusSnapshot, SearchError> {
        Err(SearchError::CorpusUnavailable {
            reason: "static failure fixture".to_string(),
        })
    }
}
