//! Round-tripping search forms through generated links.

use super::common::parse_link;
use proptest::prelude::*;
use talpa::{SearchContext, SearchForm, SearchOrder};

fn query_strategy() -> impl Strategy<Value = String> {
    let word = "[a-z]{2,8}";
    let tag = prop::sample::select(vec![
        "sdk:dart",
        "sdk:flutter",
        "license:gpl",
        "license:mit",
        "platform:web",
        "is:discontinued",
        "show:unlisted",
        "show:hidden",
        "runtime:native",
    ]);
    (
        prop::collection::vec(tag.prop_map(str::to_string), 0..3),
        prop::collection::vec(word, 0..4),
    )
        .prop_map(|(tags, words)| {
            tags.into_iter()
                .chain(words)
                .collect::<Vec<_>>()
                .join(" ")
        })
}

fn order_strategy() -> impl Strategy<Value = SearchOrder> {
    prop::sample::select(vec![
        SearchOrder::Relevance,
        SearchOrder::Top,
        SearchOrder::Updated,
        SearchOrder::Created,
        SearchOrder::Popularity,
        SearchOrder::Likes,
        SearchOrder::Points,
    ])
}

proptest! {
    #[test]
    fn parsing_a_generated_link_yields_an_equivalent_form(
        raw in query_strategy(),
        page in 1usize..20,
        order in order_strategy(),
    ) {
        // Build the original form the way the HTTP layer would.
        let mut params = std::collections::HashMap::new();
        if !raw.is_empty() {
            params.insert("q".to_string(), raw.clone());
        }
        params.insert("page".to_string(), page.to_string());
        if !order.is_relevance() {
            params.insert("sort".to_string(), order.as_str().to_string());
        }
        let form = SearchForm::parse(SearchContext::Regular, &params).unwrap();

        let link = form.to_search_link(None);
        let (path, link_params) = parse_link(&link);
        prop_assert_eq!(path, "/packages");

        let reparsed = SearchForm::parse(SearchContext::Regular, &link_params).unwrap();

        prop_assert_eq!(reparsed.query_text(), form.query_text());
        prop_assert_eq!(
            reparsed.parsed_query().predicate.clone(),
            form.parsed_query().predicate.clone()
        );
        prop_assert_eq!(reparsed.order(), form.order());
        prop_assert_eq!(reparsed.current_page(), form.current_page());
    }

    #[test]
    fn generated_links_elide_defaults(raw in query_strategy()) {
        let form = SearchForm::new(&raw, None);
        let link = form.to_search_link(None);
        prop_assert!(!link.contains("page="));
        prop_assert!(!link.contains("sort="));
    }

    #[test]
    fn toggling_twice_restores_the_canonical_form(
        raw in query_strategy(),
        // Tags disjoint from query_strategy, so the toggle always starts
        // from the absent state and removal lands back where it began.
        tag in prop::sample::select(vec!["sdk:web", "license:bsd", "platform:android"]),
    ) {
        let form = SearchForm::new(&raw, None);
        let there_and_back = form
            .toggle_required_tag(tag)
            .toggle_required_tag(tag);
        prop_assert_eq!(there_and_back.query_text(), form.query_text());
    }
}
