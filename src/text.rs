// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text analysis: turning raw field strings into weighted tokens.
//!
//! The analyzer is deliberately small. It lowercases, treats every run of
//! non-alphanumeric characters as a separator, and then derives extra tokens
//! from each word: prefixes (so "frame" finds "framework") and camel-case or
//! digit segments (so "webSocket" finds "socket"). Derived tokens carry a
//! reduced weight of `k/L` where `k` is the token length and `L` the word
//! length, so a partial match can never outrank an exact one.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **TOKEN_SHAPE**: every emitted token is non-empty, lowercase, and at
//!    least [`MIN_TOKEN_LENGTH`] characters long
//! 2. **WEIGHT_RANGE**: every weight is in `(0, 1]`; the full word is 1.0
//! 3. **MAX_COMBINE**: duplicate tokens keep the highest weight seen
//!
//! Case and digit boundaries are detected on the raw word before lowercasing,
//! because lowercasing erases them. The emitted tokens are lowercase either
//! way, so the two orderings are observationally identical for the caller.

use std::collections::HashMap;

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// A finite mapping from token to weight in `(0, 1]`.
pub type TokenWeights = HashMap<String, f64>;

/// Tokens shorter than this are dropped entirely.
pub const MIN_TOKEN_LENGTH: usize = 2;

/// Words at least this long get prefix and segment tokens even when the
/// caller did not ask for split tokenization.
pub const SPLIT_THRESHOLD: usize = 4;

/// The analyzer capability: the two functions an index needs from the text
/// layer. Kept as plain function pointers so an index stays `Copy`-cheap to
/// configure and trivially `Send + Sync`.
#[derive(Clone, Copy)]
pub struct Analyzer {
    /// Produce the token-weight map for a field string.
    pub tokenize: fn(&str, bool) -> TokenWeights,
    /// Produce the ordered list of query words for a query string.
    pub split_for_indexing: fn(&str) -> Vec<String>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer {
            tokenize,
            split_for_indexing,
        }
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Analyzer")
    }
}

/// Fold diacritics so ASCII queries match accented text.
///
/// NFD-decompose, then drop combining marks. Case is preserved here; the
/// boundary scan below still needs it.
#[cfg(feature = "unicode-normalization")]
fn fold_diacritics(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Lightweight fallback without the unicode-normalization dependency.
/// Assumes input is ASCII or pre-normalized.
#[cfg(not(feature = "unicode-normalization"))]
fn fold_diacritics(value: &str) -> String {
    value.to_string()
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{0C00}'..='\u{0C7F}' |  // Telugu (some combining marks)
        '\u{0900}'..='\u{097F}' |  // Devanagari (some combining marks)
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Split a string into the ordered list of words used as query terms.
///
/// Every run of non-alphanumeric characters is a separator; words shorter
/// than [`MIN_TOKEN_LENGTH`] are dropped. Case is preserved so that
/// [`tokenize`] can still see camel-case boundaries.
pub fn split_for_indexing(text: &str) -> Vec<String> {
    let folded = fold_diacritics(text);
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_TOKEN_LENGTH)
        .map(str::to_string)
        .collect()
}

/// Produce the token-weight map for a string.
///
/// # Algorithm
///
/// 1. Fold diacritics and split into words at non-alphanumeric runs.
/// 2. For each word of length `L` (at least [`MIN_TOKEN_LENGTH`]):
///    - emit the lowercased full word with weight 1.0
///    - if `split` is set or `L >=` [`SPLIT_THRESHOLD`], also emit
///      - every proper prefix of length `k >= 2` with weight `k/L`
///      - every case/digit segment of length `k >= 2` with weight `k/L`
/// 3. Duplicate tokens combine by max.
///
/// Empty input yields an empty map. The `split` flag is used on the query
/// side, where even short words should match stored prefixes and segments.
pub fn tokenize(text: &str, split: bool) -> TokenWeights {
    let mut tokens = TokenWeights::new();
    if text.is_empty() {
        return tokens;
    }

    for word in split_for_indexing(text) {
        let word_len = word.chars().count();
        let lowered = word.to_lowercase();
        upsert_max(&mut tokens, lowered.clone(), 1.0);

        if !split && word_len < SPLIT_THRESHOLD {
            continue;
        }

        let chars: Vec<char> = lowered.chars().collect();
        for k in MIN_TOKEN_LENGTH..word_len {
            let prefix: String = chars[..k].iter().collect();
            upsert_max(&mut tokens, prefix, k as f64 / word_len as f64);
        }

        for segment in split_segments(&word) {
            let segment_len = segment.chars().count();
            if segment_len >= MIN_TOKEN_LENGTH && segment_len < word_len {
                upsert_max(
                    &mut tokens,
                    segment.to_lowercase(),
                    segment_len as f64 / word_len as f64,
                );
            }
        }
    }

    tokens
}

/// Insert `token` keeping the highest weight seen so far.
fn upsert_max(tokens: &mut TokenWeights, token: String, weight: f64) {
    tokens
        .entry(token)
        .and_modify(|existing| *existing = existing.max(weight))
        .or_insert(weight);
}

/// Split a word at lower-to-upper case transitions and letter/digit
/// transitions: "webSocket2x" becomes ["web", "Socket", "2", "x"].
fn split_segments(word: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in word.chars() {
        if let Some(p) = prev {
            let case_boundary = c.is_uppercase() && !p.is_uppercase();
            let digit_boundary = c.is_ascii_digit() != p.is_ascii_digit();
            if (case_boundary || digit_boundary) && !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}
