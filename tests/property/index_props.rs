//! Index lifecycle invariants over generated corpora.

use proptest::prelude::*;
use talpa::TokenIndex;

fn doc_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{2,8}", 1..6).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn add_then_remove_restores_search_results(
        resident in doc_strategy(),
        visitor in doc_strategy(),
        probe in "[a-z]{2,8}",
    ) {
        let mut index = TokenIndex::new();
        index.add("resident", &resident);
        let tokens_before = index.token_count();
        let probe_before = index.search(&probe);

        index.add("visitor", &visitor);
        index.remove("visitor");

        prop_assert_eq!(index.token_count(), tokens_before);
        prop_assert_eq!(index.document_count(), 1);
        prop_assert_eq!(index.search(&probe), probe_before);
    }

    #[test]
    fn re_add_of_identical_text_is_observably_noop(text in doc_strategy()) {
        let mut index = TokenIndex::new();
        index.add("doc", &text);
        let counts = (index.token_count(), index.document_count());
        let first_word = text.split(' ').next().unwrap_or("").to_string();
        let results = index.search(&first_word);

        index.add("doc", &text);

        prop_assert_eq!((index.token_count(), index.document_count()), counts);
        prop_assert_eq!(index.search(&first_word), results);
    }

    #[test]
    fn every_indexed_word_is_findable(text in doc_strategy()) {
        let mut index = TokenIndex::new();
        index.add("doc", &text);
        for word in text.split(' ') {
            prop_assert!(index.search(word).get("doc") > 0.0, "word {}", word);
        }
    }

    #[test]
    fn word_absent_from_every_document_scores_nothing(
        text in doc_strategy(),
        probe in "[0-9]{4,6}",
    ) {
        // Digit probes cannot collide with the alphabetic corpus.
        let mut index = TokenIndex::new();
        index.add("doc", &text);
        prop_assert!(index
            .search_words(&[probe.clone()], 1.0, None)
            .is_empty());
    }

    #[test]
    fn multi_word_results_are_within_single_word_results(
        text_a in doc_strategy(),
        text_b in doc_strategy(),
    ) {
        let mut index = TokenIndex::new();
        index.add("a", &text_a);
        index.add("b", &text_b);

        let word_a = text_a.split(' ').next().unwrap_or("xx").to_string();
        let word_b = text_b.split(' ').next().unwrap_or("yy").to_string();
        let combined =
            index.search_words(&[word_a.clone(), word_b.clone()], 1.0, None);
        let only_a = index.search_words(&[word_a], 1.0, None);

        for key in combined.keys() {
            prop_assert!(only_a.get(key) > 0.0, "doc {} lost by intersection", key);
        }
    }
}
