//! Scoped tag literals and the conjunctive predicate built from them.
//!
//! A tag is a `scope:value` string (`sdk:flutter`, `is:discontinued`,
//! `license:gpl`). A [`TagPredicate`] holds required and forbidden tags and
//! matches a document iff every required tag is present and no forbidden tag
//! is. Unknown scopes are carried verbatim; a document simply lacks the tag
//! and does not match, which is the behavior experimental filters rely on.
//!
//! Three moderation flags are special: `is:discontinued`, `is:unlisted`, and
//! `is:legacy` are forbidden by default at query time. Writing `is:X` in a
//! query lifts the default and requires the tag; `show:X` only lifts the
//! default; `show:hidden` lifts all three at once. That defaulting happens in
//! the query layer, never inside the predicate itself.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Values of the `is:` flags that are forbidden unless a query mentions
/// them, in the fixed order they appear on the wire.
pub(crate) const MODERATION_FLAGS: [&str; 3] = ["discontinued", "unlisted", "legacy"];

/// The `show:` value that lifts every moderation flag at once.
pub(crate) const SHOW_ALL_VALUE: &str = "hidden";

/// Check whether `token` has the exact shape of a tag literal:
/// a lowercase ASCII scope, a colon, and a `[a-zA-Z0-9_.-]+` value.
pub fn is_tag_literal(token: &str) -> bool {
    split_tag(token).is_some()
}

/// Split a tag literal into `(scope, value)`, or `None` when the token is
/// free text.
pub(crate) fn split_tag(token: &str) -> Option<(&str, &str)> {
    let (scope, value) = token.split_once(':')?;
    let scope_ok = !scope.is_empty() && scope.bytes().all(|b| b.is_ascii_lowercase());
    let value_ok = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'-');
    (scope_ok && value_ok).then_some((scope, value))
}

/// A conjunctive filter: required tags must all be present on a document,
/// forbidden tags must all be absent.
///
/// Both sides preserve insertion order, which keeps generated URLs and wire
/// requests deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPredicate {
    required: Vec<String>,
    forbidden: Vec<String>,
}

impl TagPredicate {
    pub fn new() -> TagPredicate {
        TagPredicate::default()
    }

    /// Build a predicate from prefixed literals: `-tag` forbids, `+tag` or a
    /// bare `tag` requires.
    pub fn from_literals<'a, I>(literals: I) -> TagPredicate
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut predicate = TagPredicate::new();
        predicate.extend_from_literals(literals);
        predicate
    }

    /// Fold more prefixed literals into this predicate.
    pub fn extend_from_literals<'a, I>(&mut self, literals: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for literal in literals {
            if let Some(tag) = literal.strip_prefix('-') {
                self.forbid(tag);
            } else {
                self.require(literal.strip_prefix('+').unwrap_or(literal));
            }
        }
    }

    /// Add a required tag. Duplicates are ignored.
    pub fn require(&mut self, tag: &str) {
        if !self.required.iter().any(|t| t == tag) {
            self.required.push(tag.to_string());
        }
    }

    /// Add a forbidden tag. Duplicates are ignored.
    pub fn forbid(&mut self, tag: &str) {
        if !self.forbidden.iter().any(|t| t == tag) {
            self.forbidden.push(tag.to_string());
        }
    }

    pub fn is_required(&self, tag: &str) -> bool {
        self.required.iter().any(|t| t == tag)
    }

    pub fn required_tags(&self) -> &[String] {
        &self.required
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.forbidden.is_empty()
    }

    /// Does a document with `doc_tags` satisfy this predicate?
    pub fn matches(&self, doc_tags: &HashSet<String>) -> bool {
        self.required.iter().all(|tag| doc_tags.contains(tag))
            && !self.forbidden.iter().any(|tag| doc_tags.contains(tag))
    }

    /// A copy with `tag` flipped in or out of the required set.
    pub fn toggle_required(&self, tag: &str) -> TagPredicate {
        let mut toggled = self.clone();
        if toggled.is_required(tag) {
            toggled.required.retain(|t| t != tag);
        } else {
            toggled.require(tag);
        }
        toggled
    }

    /// The literals as they appear in URL query strings: required tags
    /// verbatim, forbidden tags with a `-` prefix, insertion order kept.
    pub fn to_query_parameters(&self) -> Vec<String> {
        self.required
            .iter()
            .cloned()
            .chain(self.forbidden.iter().map(|tag| format!("-{tag}")))
            .collect()
    }
}
