//! One inverted index: token to weighted postings, per field.
//!
//! Every field of the corpus gets its own `TokenIndex`. The index stores,
//! for each token, the documents containing it and the weight the analyzer
//! assigned at indexing time. Two bookkeeping maps ride along:
//!
//! - a text-hash registry (crc32 of the text plus distinct-token count) so
//!   re-adding unchanged text is a no-op
//! - a document-size proxy `1 + ln(1 + T) / 100` over the distinct-token
//!   count `T`, the denominator that mildly penalizes long documents
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **NO_EMPTY_POSTINGS**: every token in the index has at least one
//!    posting; removals delete emptied posting lists
//! 2. **WEIGHT_MAX_COMBINE**: re-adding a document combines same-token
//!    weights by max
//! 3. **BOOKKEEPING_ALIGNED**: a document appears in `doc_sizes` iff it
//!    appears in `text_hashes` iff it has at least one posting
//! 4. **IDEMPOTENT_ADD**: adding the same `(doc_id, text)` twice leaves the
//!    index observationally unchanged

use crate::score::Score;
use crate::text::{Analyzer, TokenWeights};
use std::collections::{HashMap, HashSet};

/// Query-side weight below which a matched token is discarded, as a fraction
/// of the best matched token's weight.
const TOKEN_MATCH_RETENTION: f64 = 0.7;

/// Fingerprint of the text a document was last indexed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextHash {
    crc: u32,
    token_count: usize,
}

impl TextHash {
    fn of(text: &str, tokens: &TokenWeights) -> TextHash {
        TextHash {
            crc: crc32fast::hash(text.as_bytes()),
            token_count: tokens.len(),
        }
    }
}

/// The tokens of one query word that are present in the index, with their
/// query-side weights.
#[derive(Debug, Clone, Default)]
pub struct TokenMatch {
    weights: TokenWeights,
}

impl TokenMatch {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Matched tokens with their query-side weights, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(token, w)| (token.as_str(), *w))
    }

    fn merge_max(&mut self, token: &str, weight: f64) {
        self.weights
            .entry(token.to_string())
            .and_modify(|existing| *existing = existing.max(weight))
            .or_insert(weight);
    }
}

/// An inverted index over one text field.
#[derive(Debug, Default)]
pub struct TokenIndex {
    analyzer: Analyzer,
    /// token -> (doc id -> weight)
    inverse: HashMap<String, HashMap<String, f64>>,
    /// doc id -> size proxy, `1 + ln(1 + distinct tokens) / 100`
    doc_sizes: HashMap<String, f64>,
    /// doc id -> fingerprint of the last indexed text
    text_hashes: HashMap<String, TextHash>,
}

impl TokenIndex {
    pub fn new() -> TokenIndex {
        TokenIndex::default()
    }

    pub fn with_analyzer(analyzer: Analyzer) -> TokenIndex {
        TokenIndex {
            analyzer,
            ..TokenIndex::default()
        }
    }

    /// Number of distinct tokens in the index.
    pub fn token_count(&self) -> usize {
        self.inverse.len()
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.doc_sizes.len()
    }

    /// Index `text` under `doc_id`, replacing whatever was there before.
    ///
    /// Empty text removes the document. Unchanged text (same crc and token
    /// count) is a no-op, which makes periodic corpus refreshes cheap.
    pub fn add(&mut self, doc_id: &str, text: &str) {
        let tokens = (self.analyzer.tokenize)(text, false);
        if tokens.is_empty() {
            self.remove(doc_id);
            return;
        }

        let hash = TextHash::of(text, &tokens);
        if self.text_hashes.get(doc_id) == Some(&hash) {
            return;
        }
        self.remove(doc_id);

        for (token, weight) in &tokens {
            self.inverse
                .entry(token.clone())
                .or_default()
                .entry(doc_id.to_string())
                .and_modify(|existing| *existing = existing.max(*weight))
                .or_insert(*weight);
        }
        self.doc_sizes.insert(
            doc_id.to_string(),
            1.0 + ((1 + tokens.len()) as f64).ln() / 100.0,
        );
        self.text_hashes.insert(doc_id.to_string(), hash);
    }

    /// Purge `doc_id` from every posting list. Emptied lists are deleted.
    pub fn remove(&mut self, doc_id: &str) {
        self.inverse.retain(|_, postings| {
            postings.remove(doc_id);
            !postings.is_empty()
        });
        self.doc_sizes.remove(doc_id);
        self.text_hashes.remove(doc_id);
    }

    /// Match the query words of `text` against the tokens of this index.
    ///
    /// Each word is tokenized with splitting forced, restricted to tokens the
    /// index actually contains, and pruned to those within
    /// [`TOKEN_MATCH_RETENTION`] of the best query-side weight. A word with
    /// no matching token at all empties the whole match: this field cannot
    /// satisfy the query.
    pub fn lookup_tokens(&self, text: &str) -> TokenMatch {
        let mut result = TokenMatch::default();
        for word in (self.analyzer.split_for_indexing)(text) {
            let tokens = (self.analyzer.tokenize)(&word, true);
            let present: Vec<(&String, f64)> = tokens
                .iter()
                .filter(|(token, _)| self.inverse.contains_key(*token))
                .map(|(token, weight)| (token, *weight))
                .collect();
            if present.is_empty() {
                return TokenMatch::default();
            }
            let best = present.iter().map(|(_, w)| *w).fold(0.0, f64::max);
            for (token, weight) in present {
                if weight >= TOKEN_MATCH_RETENTION * best {
                    result.merge_max(token, weight);
                }
            }
        }
        result
    }

    /// Score all documents for `text` at weight 1.0.
    pub fn search(&self, text: &str) -> Score {
        let words = (self.analyzer.split_for_indexing)(text);
        self.search_words(&words, 1.0, None)
    }

    /// Score documents matching every word of `words`.
    ///
    /// Each word is free to match any token it hits, but the per-word maps
    /// combine by [`Score::multiply`], so only documents relevant to every
    /// word survive. An empty `restrict_to` set short-circuits to empty.
    pub fn search_words(
        &self,
        words: &[String],
        weight: f64,
        restrict_to: Option<&HashSet<String>>,
    ) -> Score {
        if restrict_to.is_some_and(HashSet::is_empty) {
            return Score::new();
        }
        let word_count = words.len();
        Score::multiply(
            words
                .iter()
                .map(|word| {
                    self.score_docs(&self.lookup_tokens(word), weight, word_count, restrict_to)
                })
                .collect::<Vec<_>>(),
        )
    }

    /// Turn a token match into per-document scores.
    ///
    /// A document takes the best `query_weight * doc_weight` over the matched
    /// tokens, then gets divided by its size proxy raised to `1/word_count`.
    /// The exponent spreads the length penalty across the multiplicative
    /// combination, so a long document is penalized once per query rather
    /// than once per word.
    fn score_docs(
        &self,
        token_match: &TokenMatch,
        weight: f64,
        word_count: usize,
        restrict_to: Option<&HashSet<String>>,
    ) -> Score {
        let mut result: HashMap<String, f64> = HashMap::new();
        for (token, query_weight) in token_match.iter() {
            let Some(postings) = self.inverse.get(token) else {
                continue;
            };
            for (doc_id, doc_weight) in postings {
                if restrict_to.is_some_and(|allowed| !allowed.contains(doc_id)) {
                    continue;
                }
                let value = query_weight * doc_weight;
                result
                    .entry(doc_id.clone())
                    .and_modify(|existing| *existing = existing.max(value))
                    .or_insert(value);
            }
        }

        let exponent = 1.0 / word_count.max(1) as f64;
        for (doc_id, value) in result.iter_mut() {
            let size = self.doc_sizes.get(doc_id).copied().unwrap_or(1.0);
            *value = weight * *value / size.powf(exponent);
        }
        Score::from_map(result)
    }

    /// Debug-only structural check. Verifies the module invariants hold.
    #[cfg(any(debug_assertions, test))]
    pub fn check_well_formed(&self) -> bool {
        for postings in self.inverse.values() {
            if postings.is_empty() {
                return false;
            }
            for (doc_id, weight) in postings {
                if !weight.is_finite() || *weight <= 0.0 || *weight > 1.0 {
                    return false;
                }
                if !self.doc_sizes.contains_key(doc_id) || !self.text_hashes.contains_key(doc_id)
                {
                    return false;
                }
            }
        }
        self.doc_sizes.len() == self.text_hashes.len()
    }
}
