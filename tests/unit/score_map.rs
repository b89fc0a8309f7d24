//! Concrete checks of the score-map operator laws.

use std::collections::HashSet;
use talpa::Score;

fn score(pairs: &[(&str, f64)]) -> Score {
    Score::from_map(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
}

#[test]
fn multiply_of_singleton_list_is_identity() {
    let s = score(&[("a", 0.4), ("b", 0.9)]);
    assert_eq!(Score::multiply([s.clone()]), s);
}

#[test]
fn multiply_with_empty_input_is_empty() {
    let s = score(&[("a", 0.4)]);
    assert!(Score::multiply([s.clone(), Score::new()]).is_empty());
    assert!(Score::multiply([Score::new(), s]).is_empty());
}

#[test]
fn multiply_is_commutative() {
    let left = score(&[("a", 0.5), ("b", 0.25), ("c", 0.75)]);
    let right = score(&[("b", 0.5), ("c", 0.5), ("d", 0.5)]);
    assert_eq!(
        Score::multiply([left.clone(), right.clone()]),
        Score::multiply([right, left])
    );
}

#[test]
fn max_is_commutative_and_idempotent() {
    let left = score(&[("a", 0.5), ("b", 0.25)]);
    let right = score(&[("b", 0.5), ("c", 0.5)]);
    assert_eq!(
        Score::max([left.clone(), right.clone()]),
        Score::max([right.clone(), left.clone()])
    );
    assert_eq!(Score::max([left.clone(), left.clone()]), left);
}

#[test]
fn remove_low_values_respects_the_fraction_floor() {
    let s = score(&[("a", 1.0), ("b", 0.009), ("c", 0.011)]);
    let kept = s.remove_low_values(Some(0.01), None);
    assert_eq!(kept.get("a"), 1.0);
    assert_eq!(kept.get("b"), 0.0);
    assert_eq!(kept.get("c"), 0.011);
}

#[test]
fn top_bounds_and_dominates() {
    let s = score(&[("a", 0.2), ("b", 0.8), ("c", 0.5), ("d", 0.9)]);
    let top = s.top(2, None);
    assert_eq!(top.len(), 2);
    let lowest_kept = top.last().unwrap().1;
    for omitted in ["a", "c"] {
        assert!(s.get(omitted) <= lowest_kept);
    }
}

#[test]
fn operations_do_not_mutate_inputs() {
    let s = score(&[("a", 0.3), ("b", 0.6)]);
    let snapshot = s.clone();
    let keys: HashSet<String> = ["a".to_string()].into();
    let _ = s.remove_low_values(None, Some(0.5));
    let _ = s.project(&keys);
    let _ = s.map_values(|_, v| v * 2.0);
    let _ = s.top(1, None);
    assert_eq!(s, snapshot);
}

#[test]
fn map_values_is_key_wise() {
    let s = score(&[("a", 0.5), ("bb", 0.5)]);
    let boosted = s.map_values(|key, value| value * key.len() as f64);
    assert_eq!(boosted.get("a"), 0.5);
    assert_eq!(boosted.get("bb"), 1.0);
}
