//! Algebraic laws of the score map under arbitrary inputs.

use proptest::prelude::*;
use talpa::Score;

fn score_strategy() -> impl Strategy<Value = Score> {
    prop::collection::hash_map("[a-e]", 0.0f64..=1.0, 0..6).prop_map(Score::from_map)
}

proptest! {
    #[test]
    fn multiply_singleton_is_identity(s in score_strategy()) {
        prop_assert_eq!(Score::multiply([s.clone()]), s);
    }

    #[test]
    fn multiply_absorbs_empty(s in score_strategy()) {
        prop_assert!(Score::multiply([s, Score::new()]).is_empty());
    }

    #[test]
    fn multiply_commutes(a in score_strategy(), b in score_strategy()) {
        let left = Score::multiply([a.clone(), b.clone()]);
        let right = Score::multiply([b, a]);
        prop_assert_eq!(left.len(), right.len());
        for key in left.keys() {
            prop_assert!((left.get(key) - right.get(key)).abs() < 1e-12);
        }
    }

    #[test]
    fn max_commutes_and_is_idempotent(a in score_strategy(), b in score_strategy()) {
        prop_assert_eq!(Score::max([a.clone(), b.clone()]), Score::max([b.clone(), a.clone()]));
        prop_assert_eq!(Score::max([a.clone(), a.clone()]), a);
    }

    #[test]
    fn pruning_never_keeps_a_value_below_the_floor(
        s in score_strategy(),
        fraction in 0.0f64..=1.0,
    ) {
        let pruned = s.remove_low_values(Some(fraction), None);
        let floor = fraction * s.max_value();
        for key in pruned.keys() {
            prop_assert!(pruned.get(key) >= floor);
        }
    }

    #[test]
    fn top_returns_at_most_n_dominant_entries(s in score_strategy(), n in 0usize..8) {
        let top = s.top(n, None);
        prop_assert!(top.len() <= n);
        if let Some((_, lowest)) = top.last() {
            for key in s.keys() {
                if !top.iter().any(|(k, _)| k == key) {
                    prop_assert!(s.get(key) <= *lowest);
                }
            }
        }
    }

    #[test]
    fn max_value_bounds_every_entry(s in score_strategy()) {
        let max = s.max_value();
        for key in s.keys() {
            prop_assert!(s.get(key) <= max);
        }
    }
}
