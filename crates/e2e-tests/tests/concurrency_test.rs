//! Concurrent discovery runs must not corrupt the topic set.
//!
//! Runs for the same organization are serialized behind a per-org lock;
//! runs for different organizations proceed independently.

use std::sync::Arc;

use futures::future::join_all;
use pretty_assertions::assert_eq;

use e2e_tests::{seed_two_blobs, TestHarness};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_runs_same_org_do_not_duplicate_topics() {
    let harness = TestHarness::new();
    seed_two_blobs(&harness.store, "org").await;
    let discovery = Arc::new(harness.discovery());

    let runs = (0..4).map(|_| {
        let discovery = discovery.clone();
        tokio::spawn(async move { discovery.run("org").await })
    });
    let reports: Vec<_> = join_all(runs)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    // Exactly one run created the two topics; every later run claimed
    // them instead of duplicating or archiving them.
    let created: usize = reports.iter().map(|r| r.new_topics).sum();
    let archived: usize = reports.iter().map(|r| r.archived_topics).sum();
    assert_eq!(created, 2);
    assert_eq!(archived, 0);
    assert_eq!(harness.store.topic_count("org").await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_runs_for_different_orgs_are_independent() {
    let harness = TestHarness::new();
    seed_two_blobs(&harness.store, "org-a").await;
    seed_two_blobs(&harness.store, "org-b").await;
    let discovery = Arc::new(harness.discovery());

    let runs = ["org-a", "org-b"].map(|org| {
        let discovery = discovery.clone();
        tokio::spawn(async move { discovery.run(org).await })
    });
    for joined in join_all(runs).await {
        let report = joined.unwrap().unwrap();
        assert_eq!(report.new_topics, 2);
    }

    assert_eq!(harness.store.topic_count("org-a").await, 2);
    assert_eq!(harness.store.topic_count("org-b").await, 2);
}
