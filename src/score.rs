// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sparse document scores and the operators that combine them.
//!
//! A [`Score`] maps document ids to non-negative values. A missing key means
//! 0.0, so the map only ever stores documents that actually matched
//! something. Two composition operators cover every ranking need of the
//! search core:
//!
//! - [`Score::multiply`]: key-wise product over the intersection. A document
//!   must be present in every input; used to require that every query word
//!   matches.
//! - [`Score::max`]: key-wise maximum over the union. A document scores as
//!   well as its best input; used to pick the best-matching field.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **NO_NAN**: no stored value is NaN
//! 2. **NON_NEGATIVE**: every stored value is `>= 0.0`
//! 3. **PURE**: every operation returns a new map; inputs are never mutated
//!
//! The invariants are checked with `debug_assert!` at every construction
//! site, so violations fail fast in development and cost nothing in release
//! builds.

use std::collections::{HashMap, HashSet};

/// A sparse mapping from document id to a non-negative score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    values: HashMap<String, f64>,
}

impl Score {
    /// An empty score map.
    pub fn new() -> Score {
        Score::default()
    }

    /// Wrap an existing map. Values must be non-negative and non-NaN.
    pub fn from_map(values: HashMap<String, f64>) -> Score {
        debug_assert!(
            values.values().all(|v| v.is_finite() && *v >= 0.0),
            "score values must be finite and non-negative"
        );
        Score { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of documents with a non-zero score.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The highest value in the map, or 0.0 when empty.
    pub fn max_value(&self) -> f64 {
        self.values.values().copied().fold(0.0, f64::max)
    }

    /// The score for `key`; missing keys read as 0.0.
    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// All keys, in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Keys satisfying `filter`, in arbitrary order.
    pub fn keys_where<'a, F>(&'a self, filter: F) -> impl Iterator<Item = &'a str>
    where
        F: Fn(&str) -> bool + 'a,
    {
        self.keys().filter(move |key| filter(key))
    }

    /// Keep entries whose value is at least
    /// `max(min_value, fraction * max_value())`.
    ///
    /// At least one of the two thresholds must be given.
    pub fn remove_low_values(&self, fraction: Option<f64>, min_value: Option<f64>) -> Score {
        debug_assert!(
            fraction.is_some() || min_value.is_some(),
            "remove_low_values needs a fraction or a minimum value"
        );
        let floor = min_value
            .unwrap_or(0.0)
            .max(fraction.map_or(0.0, |f| f * self.max_value()));
        let values = self
            .values
            .iter()
            .filter(|(_, v)| **v >= floor)
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        Score { values }
    }

    /// Restrict the map to the keys also present in `keys`.
    pub fn project(&self, keys: &HashSet<String>) -> Score {
        let values = self
            .values
            .iter()
            .filter(|(k, _)| keys.contains(*k))
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        Score { values }
    }

    /// Transform every value key-wise. `f` must return finite, non-negative
    /// values.
    pub fn map_values<F>(&self, f: F) -> Score
    where
        F: Fn(&str, f64) -> f64,
    {
        let values: HashMap<String, f64> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), f(k, *v)))
            .collect();
        Score::from_map(values)
    }

    /// The `n` entries of highest value, sorted by value descending with ties
    /// broken by key ascending. Entries below `min_value` are dropped first.
    pub fn top(&self, n: usize, min_value: Option<f64>) -> Vec<(String, f64)> {
        let floor = min_value.unwrap_or(0.0);
        let mut entries: Vec<(String, f64)> = self
            .values
            .iter()
            .filter(|(_, v)| **v >= floor)
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries.truncate(n);
        entries
    }

    /// Key-wise product restricted to the intersection of all inputs.
    ///
    /// Short-circuits to empty as soon as any intermediate intersection is
    /// empty. `multiply([s])` is `s`.
    pub fn multiply<I>(scores: I) -> Score
    where
        I: IntoIterator<Item = Score>,
    {
        let mut result: Option<Score> = None;
        for score in scores {
            result = Some(match result {
                None => score,
                Some(acc) => {
                    let values: HashMap<String, f64> = acc
                        .values
                        .iter()
                        .filter_map(|(k, v)| {
                            score.values.get(k).map(|other| (k.clone(), v * other))
                        })
                        .collect();
                    Score { values }
                }
            });
            if result.as_ref().is_some_and(Score::is_empty) {
                return Score::new();
            }
        }
        result.unwrap_or_default()
    }

    /// Key-wise maximum over the union of all inputs.
    pub fn max<I>(scores: I) -> Score
    where
        I: IntoIterator<Item = Score>,
    {
        let mut values: HashMap<String, f64> = HashMap::new();
        for score in scores {
            for (key, value) in score.values {
                values
                    .entry(key)
                    .and_modify(|existing| *existing = existing.max(value))
                    .or_insert(value);
            }
        }
        Score { values }
    }
}

impl FromIterator<(String, f64)> for Score {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Score {
        Score::from_map(iter.into_iter().collect())
    }
}
