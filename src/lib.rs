//! In-memory search core for a package-registry website.
//!
//! This crate turns a user-typed query string into a ranked list of package
//! ids. It owns the text analysis, the weighted inverted indexes, the tag
//! predicate language, and the bidirectional mapping between URL parameters
//! and the backend wire request. Everything around it (HTTP, datastore,
//! object storage, jobs) is a collaborator behind the [`CorpusProvider`]
//! capability.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌─────────────┐
//! │ form.rs  │────▶│ query.rs  │     │ service.rs  │
//! │ (URL <-> │     │ (text +   │────▶│ (filter,    │
//! │  form)   │     │  tags)    │     │  rank, page)│
//! └──────────┘     └───────────┘     └──────┬──────┘
//!                                           │
//!                  ┌────────────────────────┼──────────────┐
//!                  ▼                        ▼              ▼
//!          ┌───────────────┐     ┌────────────────┐   ┌─────────┐
//!          │ field_index.rs│────▶│ token_index.rs │──▶│ text.rs │
//!          │ (best field)  │     │ (postings)     │   │(tokens) │
//!          └───────────────┘     └───────┬────────┘   └─────────┘
//!                                        ▼
//!                                  ┌──────────┐
//!                                  │ score.rs │
//!                                  │ (combine)│
//!                                  └──────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use std::collections::HashMap;
//! use talpa::testing::{corpus_entry, StaticCorpus};
//! use talpa::{FieldSpec, SearchContext, SearchForm, SearchService};
//!
//! let corpus = StaticCorpus::from_entries([
//!     ("shelf", corpus_entry(&[("name", "shelf"), ("description", "web middleware")], &[], &[])),
//! ]);
//! let service = SearchService::build(&corpus, FieldSpec::package_defaults()).unwrap();
//!
//! let params: HashMap<String, String> = [("q".to_string(), "web".to_string())].into();
//! let form = SearchForm::parse(SearchContext::Regular, &params).unwrap();
//! let page = service.search(&form.to_service_query()).unwrap();
//! assert_eq!(page.ids, vec!["shelf".to_string()]);
//! ```

// Module declarations
mod error;
mod field_index;
mod form;
mod query;
mod score;
mod service;
mod tags;
pub mod testing;
mod text;
mod token_index;

// Re-exports for public API
pub use error::SearchError;
pub use field_index::{FieldIndex, FieldSpec};
pub use form::{SearchContext, SearchForm, ServiceQuery};
pub use query::{parse_query, ParsedQuery, QueryModifiers, SearchOrder, DEFAULT_PAGE_SIZE};
pub use score::Score;
pub use service::{
    CorpusProvider, CorpusSnapshot, DocumentEntry, IndexRegistry, SearchResultPage,
    SearchService, DEFAULT_SLOT,
};
pub use tags::{is_tag_literal, TagPredicate};
pub use text::{
    split_for_indexing, tokenize, Analyzer, TokenWeights, MIN_TOKEN_LENGTH, SPLIT_THRESHOLD,
};
pub use token_index::{TokenIndex, TokenMatch};
