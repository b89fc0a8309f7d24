//! The search service: corpus in, ranked document ids out.
//!
//! A service is one immutable snapshot of the corpus turned into a
//! field-collection index plus per-document tag sets and ordering fields.
//! Executing a query is a fixed pipeline:
//!
//! 1. **Filter**: the tag predicate selects the candidate id set.
//! 2. **Score**: the field-collection index scores the query words,
//!    restricted to the candidates.
//! 3. **Prune**: scores below 1% of the best hit are noise and are dropped.
//! 4. **Order**: by score for relevance, by a corpus ordering field
//!    otherwise, ties broken by document id.
//! 5. **Paginate**: slice by offset and limit; the pre-slice count is the
//!    reported hit total.
//!
//! Rebuilds construct a fresh service and swap it into the [`IndexRegistry`]
//! slot, so concurrent readers always observe a whole snapshot and never a
//! half-updated index.

use crate::error::SearchError;
use crate::field_index::{FieldIndex, FieldSpec};
use crate::form::ServiceQuery;
use crate::query::parse_query;
use crate::text::split_for_indexing;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Scores below this fraction of the best hit are discarded.
const PRUNE_FRACTION: f64 = 0.01;

/// Registry slot used when the deployment has a single corpus.
pub const DEFAULT_SLOT: &str = "default";

/// The capability the search core consumes: a snapshot of the current
/// corpus. This is the only I/O surface of the core and the only place a
/// search request can fail.
pub trait CorpusProvider: Send + Sync {
    fn snapshot(&self) -> Result<CorpusSnapshot, SearchError>;
}

/// One document as delivered by the corpus provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Field name to field text, e.g. `name`, `description`, `readme`.
    pub fields: HashMap<String, String>,
    /// The document's tag set, e.g. `sdk:dart`, `license:mit`.
    pub tags: HashSet<String>,
    /// Numeric ordering fields, e.g. `updated`, `popularity`, `likes`.
    pub ordering_fields: HashMap<String, f64>,
}

/// The complete corpus at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    pub documents: HashMap<String, DocumentEntry>,
}

/// One page of ranked results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultPage {
    /// Matching documents before pagination.
    pub total_hits: usize,
    /// The ids of this page, best first.
    pub ids: Vec<String>,
}

/// Non-text document data kept beside the index for filtering and ordering.
#[derive(Debug, Clone)]
struct DocumentMeta {
    tags: HashSet<String>,
    ordering_fields: HashMap<String, f64>,
}

/// An immutable, fully built search service over one corpus snapshot.
#[derive(Debug)]
pub struct SearchService {
    index: FieldIndex,
    documents: HashMap<String, DocumentMeta>,
}

impl SearchService {
    /// Pull a snapshot from the provider and index it.
    pub fn build(
        provider: &dyn CorpusProvider,
        specs: Vec<FieldSpec>,
    ) -> Result<SearchService, SearchError> {
        let snapshot = provider.snapshot()?;
        Ok(SearchService::from_snapshot(snapshot, specs))
    }

    /// Index an already fetched snapshot.
    pub fn from_snapshot(snapshot: CorpusSnapshot, specs: Vec<FieldSpec>) -> SearchService {
        let mut index = FieldIndex::new(specs);
        let rows: Vec<(&str, &HashMap<String, String>)> = snapshot
            .documents
            .iter()
            .map(|(id, entry)| (id.as_str(), &entry.fields))
            .collect();
        index.add_documents(&rows);
        drop(rows);

        let documents: HashMap<String, DocumentMeta> = snapshot
            .documents
            .into_iter()
            .map(|(id, entry)| {
                (
                    id,
                    DocumentMeta {
                        tags: entry.tags,
                        ordering_fields: entry.ordering_fields,
                    },
                )
            })
            .collect();

        tracing::info!(
            documents = documents.len(),
            tokens = index.token_count(),
            "search index built"
        );
        SearchService { index, documents }
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Execute one wire query against this snapshot.
    ///
    /// A query whose text parses to zero words skips the score phase
    /// entirely: under relevance ordering there is nothing to rank by and the
    /// result is empty, while an explicit ordering returns every
    /// tag-matching document sorted by its ordering field.
    pub fn search(&self, query: &ServiceQuery) -> Result<SearchResultPage, SearchError> {
        if query.limit < 1 {
            return Err(SearchError::invalid_parameter("limit", "must be at least 1"));
        }

        let parsed = parse_query(&query.query);
        let mut predicate = parsed.predicate.clone();
        predicate.extend_from_literals(query.tags.iter().map(String::as_str));

        let candidates: HashSet<String> = self
            .documents
            .iter()
            .filter(|(_, meta)| predicate.matches(&meta.tags))
            .map(|(id, _)| id.clone())
            .collect();
        if candidates.is_empty() {
            return Ok(SearchResultPage::default());
        }

        let words = split_for_indexing(&parsed.text);
        let (total_hits, ranked) = if words.is_empty() {
            match query.order.ordering_field() {
                None => return Ok(SearchResultPage::default()),
                Some(field) => {
                    let ranked = self.rank_by_ordering(candidates.iter().cloned(), field);
                    (ranked.len(), ranked)
                }
            }
        } else {
            let score = self
                .index
                .search(&words, Some(&candidates))
                .remove_low_values(Some(PRUNE_FRACTION), None);
            let total = score.len();
            let ranked = match query.order.ordering_field() {
                None => score
                    .top(total, None)
                    .into_iter()
                    .map(|(id, _)| id)
                    .collect(),
                Some(field) => {
                    self.rank_by_ordering(score.keys().map(str::to_string), field)
                }
            };
            (total, ranked)
        };

        let ids: Vec<String> = ranked
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();
        tracing::debug!(
            total_hits,
            returned = ids.len(),
            order = query.order.as_str(),
            "query executed"
        );
        Ok(SearchResultPage { total_hits, ids })
    }

    /// Sort ids by an ordering field, highest first, ties by id ascending.
    /// Documents without the field sort as 0.
    fn rank_by_ordering(&self, ids: impl Iterator<Item = String>, field: &str) -> Vec<String> {
        let mut rows: Vec<(String, f64)> = ids
            .map(|id| {
                let value = self
                    .documents
                    .get(&id)
                    .and_then(|meta| meta.ordering_fields.get(field))
                    .copied()
                    .unwrap_or(0.0);
                (id, value)
            })
            .collect();
        rows.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        rows.into_iter().map(|(id, _)| id).collect()
    }
}

/// Named slots holding the live search services.
///
/// The registry is the one piece of shared state in the core. It is an
/// explicit handle threaded through request handling; readers clone the
/// `Arc` out of the slot and keep using their snapshot even while a rebuild
/// swaps a fresh one in.
#[derive(Debug, Default)]
pub struct IndexRegistry {
    slots: RwLock<HashMap<String, Arc<SearchService>>>,
}

impl IndexRegistry {
    pub fn new() -> IndexRegistry {
        IndexRegistry::default()
    }

    /// Put a service into a slot, replacing any previous occupant.
    pub fn register(&self, slot: &str, service: SearchService) {
        self.slots
            .write()
            .insert(slot.to_string(), Arc::new(service));
    }

    /// The current service in a slot, if any.
    pub fn get(&self, slot: &str) -> Option<Arc<SearchService>> {
        self.slots.read().get(slot).cloned()
    }

    /// Build a fresh service from the provider and swap it into the slot.
    /// On provider failure the previous service stays in place.
    pub fn rebuild(
        &self,
        slot: &str,
        provider: &dyn CorpusProvider,
        specs: Vec<FieldSpec>,
    ) -> Result<(), SearchError> {
        match SearchService::build(provider, specs) {
            Ok(service) => {
                self.register(slot, service);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(slot, %error, "index rebuild failed; keeping previous snapshot");
                Err(error)
            }
        }
    }
}
