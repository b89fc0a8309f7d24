//! The search form: URL parameters in, canonical links and wire requests out.
//!
//! A form wraps one parsed query plus its UI context and pagination state.
//! The same form serves three consumers: the HTTP layer parses one from URL
//! parameters, templates render filter chips and pagination links from it,
//! and the backend receives its [`ServiceQuery`] translation.
//!
//! # Recognized URL parameters
//!
//! | key | effect |
//! |---|---|
//! | `q` | raw query string, parsed into text and tags |
//! | `page` | 1-based page index; 1 is elided from generated links |
//! | `sort` | ordering name; unknown values are ignored |
//!
//! # Canonical links
//!
//! Links are rebuilt from the canonical form rather than echoed: spaces in
//! `q` become `+`, `:` becomes `%3A`, parameters appear in the fixed order
//! `q, page, sort`, and defaults (page 1, relevance) are omitted. Parsing a
//! generated link yields an equivalent form.
//!
//! ```text
//! q = "web framework", page 1   ->  /packages?q=web+framework
//! q = "web framework", page 2   ->  /packages?q=web+framework&page=2
//! q = "sdk:dart some framework" ->  /packages?q=sdk%3Adart+some+framework
//! ```

use crate::error::SearchError;
use crate::query::{parse_query, ParsedQuery, SearchOrder, DEFAULT_PAGE_SIZE};
use crate::tags::MODERATION_FLAGS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Path of the search page; every generated link starts with it.
const SEARCH_PATH: &str = "/packages";

/// Where the search UI is being rendered.
///
/// The regular listing carries no implicit filter. Scoped contexts inject a
/// required tag into the service request without it ever appearing in the
/// user-visible query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchContext {
    #[default]
    Regular,
    /// Listing restricted to one publisher.
    Publisher(String),
    /// Listing restricted to one SDK.
    Sdk(String),
}

impl SearchContext {
    /// Tags this context adds to every service request.
    fn context_tags(&self) -> Vec<String> {
        match self {
            SearchContext::Regular => Vec::new(),
            SearchContext::Publisher(publisher) => vec![format!("publisher:{publisher}")],
            SearchContext::Sdk(sdk) => vec![format!("sdk:{sdk}")],
        }
    }
}

/// A user-facing search request: parsed query, context, pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    context: SearchContext,
    parsed: ParsedQuery,
    current_page: usize,
    page_size: usize,
}

impl SearchForm {
    /// Build a form for the regular context, parsing `query` internally.
    pub fn new(query: &str, current_page: Option<usize>) -> SearchForm {
        let page = current_page.unwrap_or(1);
        debug_assert!(page >= 1, "pages are 1-based");
        SearchForm {
            context: SearchContext::Regular,
            parsed: parse_query(query),
            current_page: page.max(1),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Build a form from URL parameters.
    ///
    /// Missing `q` means an empty query and missing `page` means page 1; a
    /// `page` that is not a positive integer is an input error. Unknown
    /// `sort` names are ignored.
    pub fn parse(
        context: SearchContext,
        params: &HashMap<String, String>,
    ) -> Result<SearchForm, SearchError> {
        let mut parsed = parse_query(params.get("q").map(String::as_str).unwrap_or(""));

        let current_page = match params.get("page") {
            None => 1,
            Some(raw) => match raw.parse::<usize>() {
                Ok(page) if page >= 1 => page,
                _ => {
                    return Err(SearchError::invalid_parameter(
                        "page",
                        "must be a positive integer",
                    ))
                }
            },
        };

        if let Some(order) = params.get("sort").and_then(|name| SearchOrder::parse(name)) {
            parsed.order = order;
        }

        Ok(SearchForm {
            context,
            parsed,
            current_page,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn context(&self) -> &SearchContext {
        &self.context
    }

    pub fn parsed_query(&self) -> &ParsedQuery {
        &self.parsed
    }

    pub fn order(&self) -> SearchOrder {
        self.parsed.order
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether the form carries any text or tags at all.
    pub fn has_query(&self) -> bool {
        !self.parsed.text.is_empty() || !self.parsed.tag_literals.is_empty()
    }

    /// Tags rendered as active filter chips.
    pub fn required_tags(&self) -> &[String] {
        self.parsed.predicate.required_tags()
    }

    /// The canonical query string: tag literals first, then free text.
    pub fn query_text(&self) -> String {
        self.parsed.to_query_text()
    }

    /// A copy with `tag` toggled in or out of the query, back on page 1.
    ///
    /// Toggling rewrites the query string canonically and re-parses it, so
    /// modifier flags and the predicate always agree with the literals.
    pub fn toggle_required_tag(&self, tag: &str) -> SearchForm {
        let mut literals = self.parsed.tag_literals.clone();
        if literals.iter().any(|t| t == tag) {
            literals.retain(|t| t != tag);
        } else {
            literals.push(tag.to_string());
        }

        let mut raw_parts = literals;
        if !self.parsed.text.is_empty() {
            raw_parts.push(self.parsed.text.clone());
        }
        let mut parsed = parse_query(&raw_parts.join(" "));
        parsed.order = self.parsed.order;

        SearchForm {
            context: self.context.clone(),
            parsed,
            current_page: 1,
            page_size: self.page_size,
        }
    }

    /// Rebuild the canonical URL for this form, optionally for another page.
    pub fn to_search_link(&self, page: Option<usize>) -> String {
        let page = page.unwrap_or(self.current_page);
        let mut params: Vec<(&str, String)> = Vec::new();

        let query = self.query_text();
        if !query.is_empty() {
            params.push(("q", encode_query_value(&query)));
        }
        if page > 1 {
            params.push(("page", page.to_string()));
        }
        if !self.parsed.order.is_relevance() {
            params.push(("sort", self.parsed.order.as_str().to_string()));
        }

        if params.is_empty() {
            return SEARCH_PATH.to_string();
        }
        let joined: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{SEARCH_PATH}?{}", joined.join("&"))
    }

    /// Translate the form into the backend wire request.
    ///
    /// The query string travels whole; the structured tag list carries only
    /// what the query string cannot express: context tags, then the
    /// negations of moderation flags the query left hidden, in the fixed
    /// order discontinued, unlisted, legacy.
    pub fn to_service_query(&self) -> ServiceQuery {
        let mut tags = self.context.context_tags();
        for flag in MODERATION_FLAGS {
            if !self.parsed.modifiers.includes(flag) {
                tags.push(format!("-is:{flag}"));
            }
        }

        ServiceQuery {
            query: self.query_text(),
            tags,
            offset: (self.current_page - 1) * self.page_size,
            limit: self.page_size,
            order: self.parsed.order,
        }
    }
}

/// The wire request consumed by the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceQuery {
    /// Full query string, text and tag literals.
    #[serde(rename = "q")]
    pub query: String,
    /// Prefixed tag literals: bare or `+` requires, `-` forbids.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub offset: usize,
    pub limit: usize,
    #[serde(default, skip_serializing_if = "SearchOrder::is_relevance")]
    #[serde(rename = "sort")]
    pub order: SearchOrder,
}

impl ServiceQuery {
    /// Flatten into URI parameters, `tags` repeated per literal. Values are
    /// the raw strings; transport-level encoding is the HTTP client's job.
    pub fn to_uri_query_parameters(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if !self.query.is_empty() {
            params.push(("q".to_string(), self.query.clone()));
        }
        for tag in &self.tags {
            params.push(("tags".to_string(), tag.clone()));
        }
        params.push(("offset".to_string(), self.offset.to_string()));
        params.push(("limit".to_string(), self.limit.to_string()));
        if !self.order.is_relevance() {
            params.push(("sort".to_string(), self.order.as_str().to_string()));
        }
        params
    }
}

/// Encode a `q` value for a canonical link: space becomes `+`, unreserved
/// characters pass through, everything else (including `:`) is
/// percent-encoded.
fn encode_query_value(raw: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(raw.len());
    for &byte in raw.as_bytes() {
        match byte {
            b' ' => out.push('+'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0F) as usize] as char);
            }
        }
    }
    out
}
