//! The whole pipeline against a small fixed corpus.

use super::common::{demo_corpus, demo_service, FailingCorpus};
use talpa::{
    FieldSpec, IndexRegistry, SearchError, SearchForm, SearchOrder, SearchService, DEFAULT_SLOT,
};

fn search(raw: &str) -> talpa::SearchResultPage {
    demo_service()
        .search(&SearchForm::new(raw, None).to_service_query())
        .unwrap()
}

#[test]
fn single_word_reaches_every_field() {
    // "web" appears in descriptions and readmes; "relic" is hidden by the
    // default discontinued filter.
    let page = search("web");
    assert_eq!(page.total_hits, 2);
    assert!(page.ids.contains(&"shelf".to_string()));
    assert!(page.ids.contains(&"angel".to_string()));
}

#[test]
fn name_match_ranks_first_under_relevance() {
    let page = search("shelf");
    assert_eq!(page.ids.first(), Some(&"shelf".to_string()));
}

#[test]
fn multi_word_queries_intersect() {
    let page = search("web middleware");
    assert_eq!(page.ids, vec!["shelf".to_string()]);

    assert_eq!(search("web nonexistentterm").total_hits, 0);
}

#[test]
fn prefix_queries_match_full_words() {
    let page = search("frame");
    assert!(page.ids.contains(&"angel".to_string()));
}

#[test]
fn tag_predicates_filter_before_scoring() {
    let page = search("platform:web web");
    assert_eq!(page.ids, vec!["shelf".to_string()]);

    assert_eq!(search("license:apache web").total_hits, 0);
}

#[test]
fn unknown_scopes_match_nothing() {
    assert_eq!(search("experiment:ranking web").total_hits, 0);
}

#[test]
fn discontinued_is_visible_when_asked_for() {
    let page = search("is:discontinued web");
    assert_eq!(page.ids, vec!["relic".to_string()]);

    // show: reveals without requiring, so everything matching "web" returns.
    let page = search("show:discontinued web");
    assert_eq!(page.total_hits, 3);
}

#[test]
fn explicit_orderings_use_corpus_fields() {
    let mut query = SearchForm::new("web", None).to_service_query();

    query.order = SearchOrder::Updated;
    let by_updated = demo_service().search(&query).unwrap();
    assert_eq!(by_updated.ids, vec!["angel".to_string(), "shelf".to_string()]);

    query.order = SearchOrder::Popularity;
    let by_popularity = demo_service().search(&query).unwrap();
    assert_eq!(
        by_popularity.ids,
        vec!["shelf".to_string(), "angel".to_string()]
    );
}

#[test]
fn tags_only_query_needs_an_explicit_ordering() {
    let mut query = SearchForm::new("sdk:dart", None).to_service_query();
    assert_eq!(demo_service().search(&query).unwrap().total_hits, 0);

    query.order = SearchOrder::Created;
    let page = demo_service().search(&query).unwrap();
    assert_eq!(page.ids, vec!["angel".to_string(), "shelf".to_string()]);
}

#[test]
fn pagination_walks_the_ranking() {
    let mut query = SearchForm::new("web", None).to_service_query();
    query.limit = 1;

    let first = demo_service().search(&query).unwrap();
    query.offset = 1;
    let second = demo_service().search(&query).unwrap();

    assert_eq!(first.total_hits, 2);
    assert_eq!(second.total_hits, 2);
    assert_ne!(first.ids, second.ids);

    query.offset = 10;
    let past_the_end = demo_service().search(&query).unwrap();
    assert!(past_the_end.ids.is_empty());
    assert_eq!(past_the_end.total_hits, 2);
}

#[test]
fn zero_limit_is_rejected() {
    let mut query = SearchForm::new("web", None).to_service_query();
    query.limit = 0;
    let err = demo_service().search(&query).unwrap_err();
    assert!(matches!(err, SearchError::InvalidParameter { .. }));
}

#[test]
fn registry_round_trip() {
    let registry = IndexRegistry::new();
    registry
        .rebuild(DEFAULT_SLOT, &demo_corpus(), FieldSpec::package_defaults())
        .unwrap();

    let service = registry.get(DEFAULT_SLOT).unwrap();
    assert_eq!(service.document_count(), 3);

    // A failed rebuild must leave the previous snapshot serving.
    let result = registry.rebuild(DEFAULT_SLOT, &FailingCorpus, FieldSpec::package_defaults());
    assert!(matches!(result, Err(SearchError::CorpusUnavailable { .. })));
    assert_eq!(registry.get(DEFAULT_SLOT).unwrap().document_count(), 3);
}

#[test]
fn build_propagates_provider_failure() {
    let err = SearchService::build(&FailingCorpus, FieldSpec::package_defaults()).unwrap_err();
    assert!(matches!(err, SearchError::CorpusUnavailable { .. }));
}
