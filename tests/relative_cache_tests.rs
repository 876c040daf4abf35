//! End-to-end tests for RelativeRangeCache
//!
//! A dashboard panel refreshes a relative range; the cache must serve the still
//! valid prefix and request only the tail, and the reassembled response must match
//! what a full fetch would have returned.

mod helpers;

use std::time::Duration;

use anyhow::Context;
use helpers::{
    at, by_ref_id, descending, history_query, init_tracing, relative_request, MockDataSource,
};
use relcache::{
    CacheConfig, CacheConfigBuilder, CacheWriteError, DataFrame, Field, Query, QueryRequest,
    QueryResponse, QueryType, RelativeRangeCache, TimeRange, WriteOutcome,
};

fn mixed_targets() -> Vec<Query> {
    vec![
        history_query("A"),
        Query::new("B", QueryType::ListAssets),
        Query::new("C", QueryType::PropertyValue),
        Query {
            resolution: Some(relcache::Resolution::OneMinute),
            ..Query::new("D", QueryType::PropertyAggregate)
        },
    ]
}

/// Store a response for `now-1h` at 01:00 and return the cache
fn primed_cache(source: &MockDataSource, targets: Vec<Query>) -> RelativeRangeCache {
    let mut cache = RelativeRangeCache::new();
    let request = relative_request("first", "now-1h", at(1, 0), targets);
    let outcome = cache.set(&request, &source.fetch(&request));
    assert_eq!(outcome, WriteOutcome::Stored { replaced: false });
    cache
}

#[test]
fn test_refresh_requests_only_the_tail() -> anyhow::Result<()> {
    init_tracing();
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, mixed_targets());

    let request = relative_request("second", "now-1h", at(1, 5), mixed_targets());
    let info = cache.get(&request).context("expected a cache hit")?;

    let paginating = &info.paginating_request;
    assert_eq!(paginating.range.from, at(0, 50));
    assert_eq!(paginating.range.to, at(1, 5));
    assert_eq!(paginating.range.raw, request.range.raw);
    assert_eq!(paginating.request_id, "second");

    let ref_ids: Vec<&str> = paginating.targets.iter().map(|t| t.ref_id.as_str()).collect();
    assert_eq!(ref_ids, vec!["A", "C", "D"]);
    assert!(info.needs_fetch());

    Ok(())
}

#[test]
fn test_assembled_response_matches_full_fetch() -> anyhow::Result<()> {
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, mixed_targets());

    let request = relative_request("second", "now-1h", at(1, 5), mixed_targets());
    let info = cache.get(&request).context("expected a cache hit")?;
    let fresh = source.fetch(&info.paginating_request);
    let assembled = info.assemble(fresh);

    assert_eq!(by_ref_id(&assembled), by_ref_id(&source.fetch(&request)));
    Ok(())
}

#[test]
fn test_assembled_descending_response_matches_full_fetch() -> anyhow::Result<()> {
    let targets = vec![
        descending(history_query("A")),
        descending(Query::new("B", QueryType::PropertyInterpolated)),
        history_query("C"),
    ];
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, targets.clone());

    let request = relative_request("second", "now-1h", at(1, 5), targets);
    let info = cache.get(&request).context("expected a cache hit")?;
    assert_eq!(info.cached_response.end.data.len(), 2);

    let fresh = source.fetch(&info.paginating_request);
    let assembled = info.assemble(fresh);
    let full = source.fetch(&request);

    assert_eq!(by_ref_id(&assembled), by_ref_id(&full));
    let times = by_ref_id(&assembled)["A"]
        .time_values()
        .context("time column")?
        .to_vec();
    assert!(times.windows(2).all(|pair| pair[0] > pair[1]));
    Ok(())
}

#[test]
fn test_repeated_refreshes_stay_consistent() -> anyhow::Result<()> {
    let source = MockDataSource::new();
    let mut cache = RelativeRangeCache::new();
    let targets = vec![history_query("A"), descending(history_query("B"))];

    for minute in [0, 3, 7, 12, 20, 34] {
        let request = relative_request("refresh", "now-1h", at(1, minute), targets.clone());

        let response = match cache.get(&request) {
            Some(info) => {
                let fresh = source.fetch(&info.paginating_request);
                info.assemble(fresh)
            }
            None => source.fetch(&request),
        };

        assert_eq!(by_ref_id(&response), by_ref_id(&source.fetch(&request)), "minute {minute}");
        assert!(cache.set(&request, &response).is_stored());
    }

    Ok(())
}

#[test]
fn test_paginating_request_starts_at_cache_end_when_older() -> anyhow::Result<()> {
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, vec![history_query("A")]);

    let request = relative_request("late", "now-1h", at(1, 30), vec![history_query("A")]);
    let info = cache.get(&request).context("expected a cache hit")?;

    assert_eq!(info.paginating_request.range.from, at(1, 0));
    Ok(())
}

#[test]
fn test_request_past_cached_range_misses() {
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, vec![history_query("A")]);

    let request = relative_request("much later", "now-1h", at(2, 0), vec![history_query("A")]);

    assert!(cache.get(&request).is_none());
    assert_eq!(cache.stats().stale_lookups, 1);
}

#[test]
fn test_only_list_queries_need_no_fetch() -> anyhow::Result<()> {
    let targets = vec![
        Query::new("A", QueryType::ListAssets),
        Query::new("B", QueryType::DescribeAsset),
    ];
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, targets.clone());

    let request = relative_request("second", "now-1h", at(1, 5), targets);
    let info = cache.get(&request).context("expected a cache hit")?;

    assert!(!info.needs_fetch());
    assert_eq!(info.cached_response.start.data.len(), 2);
    Ok(())
}

#[test]
fn test_absolute_range_is_never_cached() {
    let source = MockDataSource::new();
    let mut cache = RelativeRangeCache::new();
    let request = QueryRequest::new(
        "absolute",
        TimeRange::absolute(at(0, 0), at(23, 0)),
        vec![history_query("A")],
    );

    assert_eq!(cache.set(&request, &source.fetch(&request)), WriteOutcome::NotCacheable);
    assert!(cache.get(&request).is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_short_relative_range_is_never_cached() {
    let source = MockDataSource::new();
    let mut cache = RelativeRangeCache::new();
    let request = relative_request("short", "now-10m", at(1, 0), vec![history_query("A")]);

    assert_eq!(cache.set(&request, &source.fetch(&request)), WriteOutcome::NotCacheable);
    assert!(cache.get(&request).is_none());
}

#[test]
fn test_discarded_write_keeps_previous_entry() -> anyhow::Result<()> {
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, vec![history_query("A")]);

    let request = relative_request("bad", "now-1h", at(1, 2), vec![history_query("A")]);
    let mut response = source.fetch(&request);
    response.data.push(
        DataFrame::new("stray")
            .with_ref_id("Z")
            .with_field(Field::time(vec![])),
    );

    assert_eq!(
        cache.set(&request, &response),
        WriteOutcome::Discarded(CacheWriteError::unmatched_frame("Z"))
    );

    // Still answered from the entry stored at 01:00
    let info = cache.get(&request).context("previous entry kept")?;
    assert_eq!(info.paginating_request.range.from, at(0, 47));
    assert_eq!(cache.stats().discarded_writes, 1);
    Ok(())
}

#[test]
fn test_set_replaces_entry_for_same_key() {
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, vec![history_query("A")]);

    let request = relative_request("again", "now-1h", at(1, 10), vec![history_query("A")]);

    assert_eq!(
        cache.set(&request, &source.fetch(&request)),
        WriteOutcome::Stored { replaced: true }
    );
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_different_raw_from_are_separate_entries() {
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, vec![history_query("A")]);

    let request = relative_request("wider", "now-2h", at(1, 0), vec![history_query("A")]);
    assert!(cache.get(&request).is_none());

    assert_eq!(
        cache.set(&request, &source.fetch(&request)),
        WriteOutcome::Stored { replaced: false }
    );
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_target_order_shares_entry() -> anyhow::Result<()> {
    let targets = vec![history_query("A"), Query::new("B", QueryType::ListAssets)];
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, targets.clone());

    let reversed: Vec<Query> = targets.into_iter().rev().collect();
    let request = relative_request("reordered", "now-1h", at(1, 5), reversed);

    cache.get(&request).context("same queries in another order")?;
    Ok(())
}

#[test]
fn test_bounded_cache_evicts_least_recently_used() -> anyhow::Result<()> {
    let source = MockDataSource::new();
    let mut cache = RelativeRangeCache::with_config(CacheConfig::bounded(2))?;

    for expression in ["now-1h", "now-2h", "now-3h"] {
        let request = relative_request(expression, expression, at(4, 0), vec![history_query("A")]);
        cache.set(&request, &source.fetch(&request));
    }

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().evictions, 1);

    let evicted = relative_request("1h", "now-1h", at(4, 1), vec![history_query("A")]);
    assert!(cache.get(&evicted).is_none());
    let kept = relative_request("3h", "now-3h", at(4, 1), vec![history_query("A")]);
    assert!(cache.get(&kept).is_some());
    Ok(())
}

#[test]
fn test_ttl_expires_entries() -> anyhow::Result<()> {
    let config = CacheConfigBuilder::new()
        .ttl(Duration::from_millis(50))
        .build();
    let source = MockDataSource::new();
    let mut cache = RelativeRangeCache::with_config(config)?;

    let request = relative_request("first", "now-1h", at(1, 0), vec![history_query("A")]);
    cache.set(&request, &source.fetch(&request));
    std::thread::sleep(Duration::from_millis(100));

    let later = relative_request("second", "now-1h", at(1, 5), vec![history_query("A")]);
    assert!(cache.get(&later).is_none());
    assert_eq!(cache.stats().expirations, 1);
    Ok(())
}

#[test]
fn test_custom_refresh_window() -> anyhow::Result<()> {
    let config = CacheConfigBuilder::new().refresh_window_minutes(5).build();
    let source = MockDataSource::new();
    let mut cache = RelativeRangeCache::with_config(config)?;

    // Cacheable with a 5 minute window, not with the default 15
    let request = relative_request("first", "now-10m", at(1, 0), vec![history_query("A")]);
    assert!(cache.set(&request, &source.fetch(&request)).is_stored());

    let later = relative_request("second", "now-10m", at(1, 2), vec![history_query("A")]);
    let info = cache.get(&later).context("expected a cache hit")?;
    assert_eq!(info.paginating_request.range.from, at(0, 57));
    Ok(())
}

#[test]
fn test_clear_drops_entries() {
    let source = MockDataSource::new();
    let mut cache = primed_cache(&source, vec![history_query("A")]);

    cache.clear();

    assert!(cache.is_empty());
    let request = relative_request("second", "now-1h", at(1, 5), vec![history_query("A")]);
    assert!(cache.get(&request).is_none());
}

#[test]
fn test_empty_response_is_cached() -> anyhow::Result<()> {
    let mut cache = RelativeRangeCache::new();
    let request = relative_request("first", "now-1h", at(1, 0), vec![history_query("A")]);

    assert!(cache.set(&request, &QueryResponse::default()).is_stored());

    let later = relative_request("second", "now-1h", at(1, 5), vec![history_query("A")]);
    let info = cache.get(&later).context("expected a cache hit")?;
    assert!(info.cached_response.start.data.is_empty());
    Ok(())
}
