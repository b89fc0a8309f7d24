//! The query language: free text mixed with tag literals.
//!
//! Parsing is total. Any input produces a [`ParsedQuery`]; empty input
//! produces empty text and a default predicate. A token is a tag literal iff
//! it matches the exact `scope:value` shape of [`crate::tags::is_tag_literal`];
//! everything else is free text, reassembled in input order. Double-quoted
//! runs survive as a single free-text token.

use crate::tags::{split_tag, TagPredicate, MODERATION_FLAGS, SHOW_ALL_VALUE};
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Result orderings. [`SearchOrder::Relevance`] is the unnamed default and
/// never appears in generated URLs; the rest sort by a corpus-provided
/// ordering field of the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    #[default]
    Relevance,
    Top,
    Updated,
    Created,
    Popularity,
    Likes,
    Points,
}

impl SearchOrder {
    /// Parse an ordering name. Unknown names yield `None` so callers can
    /// ignore them, per the URL contract.
    pub fn parse(name: &str) -> Option<SearchOrder> {
        match name {
            "top" => Some(SearchOrder::Top),
            "updated" => Some(SearchOrder::Updated),
            "created" => Some(SearchOrder::Created),
            "popularity" => Some(SearchOrder::Popularity),
            "likes" => Some(SearchOrder::Likes),
            "points" => Some(SearchOrder::Points),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "relevance",
            SearchOrder::Top => "top",
            SearchOrder::Updated => "updated",
            SearchOrder::Created => "created",
            SearchOrder::Popularity => "popularity",
            SearchOrder::Likes => "likes",
            SearchOrder::Points => "points",
        }
    }

    pub fn is_relevance(&self) -> bool {
        matches!(self, SearchOrder::Relevance)
    }

    /// The corpus ordering field backing this ordering, or `None` for
    /// relevance, which is computed from text scores instead.
    pub fn ordering_field(&self) -> Option<&'static str> {
        match self {
            SearchOrder::Relevance => None,
            other => Some(other.as_str()),
        }
    }
}

/// Moderation-flag visibility requested by the query.
///
/// Each flag defaults to hidden; `is:X`, `show:X`, and `show:hidden` lift
/// the defaults as described in [`crate::tags`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryModifiers {
    pub include_discontinued: bool,
    pub include_unlisted: bool,
    pub include_legacy: bool,
}

impl QueryModifiers {
    fn set(&mut self, flag: &str) {
        match flag {
            "discontinued" => self.include_discontinued = true,
            "unlisted" => self.include_unlisted = true,
            "legacy" => self.include_legacy = true,
            _ => {}
        }
    }

    pub fn includes(&self, flag: &str) -> bool {
        match flag {
            "discontinued" => self.include_discontinued,
            "unlisted" => self.include_unlisted,
            "legacy" => self.include_legacy,
            _ => false,
        }
    }
}

/// The normalized form of a user query.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// Free-text tokens joined by single spaces, input order preserved.
    pub text: String,
    /// Tag literals exactly as typed, input order preserved. This is the
    /// sequence link generation rebuilds the query string from.
    pub tag_literals: Vec<String>,
    /// The predicate those literals denote. `show:` literals set modifiers
    /// but never become required tags.
    pub predicate: TagPredicate,
    pub order: SearchOrder,
    pub offset: usize,
    pub limit: usize,
    pub modifiers: QueryModifiers,
}

impl Default for ParsedQuery {
    fn default() -> ParsedQuery {
        ParsedQuery {
            text: String::new(),
            tag_literals: Vec::new(),
            predicate: TagPredicate::new(),
            order: SearchOrder::Relevance,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
            modifiers: QueryModifiers::default(),
        }
    }
}

impl ParsedQuery {
    /// Rebuild the canonical query string: tag literals first, then the free
    /// text, space-joined.
    pub fn to_query_text(&self) -> String {
        let mut parts: Vec<&str> = self.tag_literals.iter().map(String::as_str).collect();
        if !self.text.is_empty() {
            parts.push(&self.text);
        }
        parts.join(" ")
    }
}

/// Parse a raw query string. Never fails.
pub fn parse_query(raw: &str) -> ParsedQuery {
    let mut query = ParsedQuery::default();
    let mut text_parts: Vec<String> = Vec::new();

    for token in split_query_tokens(raw) {
        let Some((scope, value)) = split_tag(&token) else {
            text_parts.push(token);
            continue;
        };
        match scope {
            "show" if value == SHOW_ALL_VALUE => {
                for flag in MODERATION_FLAGS {
                    query.modifiers.set(flag);
                }
                query.tag_literals.push(token);
            }
            "show" if MODERATION_FLAGS.contains(&value) => {
                query.modifiers.set(value);
                query.tag_literals.push(token);
            }
            "is" if MODERATION_FLAGS.contains(&value) => {
                query.modifiers.set(value);
                query.predicate.require(&token);
                query.tag_literals.push(token);
            }
            _ => {
                query.predicate.require(&token);
                query.tag_literals.push(token);
            }
        }
    }

    query.text = text_parts.join(" ");
    query
}

/// Split on unquoted whitespace. A double-quoted run is one token, quotes
/// included, so it round-trips through link generation unchanged.
fn split_query_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in raw.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
            current.push(c);
        } else if c.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
