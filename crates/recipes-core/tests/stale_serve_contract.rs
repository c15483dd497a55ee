//! Cache Contract Test: Stale Data Survives Failed Refreshes
//!
//! Verifies the stale-while-revalidate degradation path:
//! - A failed refresh leaves the previously cached catalog intact
//! - The failure is published through the error signal
//! - The next successful refresh clears the error
//! - A storage write failure leaves both catalog and timestamp untouched
//!
//! If this test fails, a flaky network can wipe out usable cached data.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use recipes_core::error::Error;
use recipes_core::model::FilterQuery;
use recipes_core::sync::SyncCoordinator;
use recipes_core::traits::CatalogStore;
use recipes_core::CachingProvider;

#[tokio::test]
async fn failed_refresh_serves_previously_cached_catalog() {
    let remote = ScriptedRemoteSource::new(vec![
        ScriptedFetch::ok_after(Duration::from_millis(20), raw_set(&["Goulash", "Pho"])),
        ScriptedFetch::err_after(Duration::from_millis(20), Error::network("connection reset")),
    ]);
    let store = CountingStore::new();
    let store_view = CountingStore::sharing_with(&store);

    // TTL of zero: every fetch sees a stale catalog and refreshes
    let provider = CachingProvider::new(Arc::new(store), Arc::new(remote), 0);
    let filter = FilterQuery::default();

    // First fetch: empty catalog served, successful refresh in background
    let first = provider.fetch(&filter).await.expect("fetch succeeds");
    assert!(first.is_empty(), "nothing cached before the first refresh");
    wait_until_idle(provider.is_loading()).await;

    // Second fetch: cached catalog served, refresh fails in background
    let second = provider.fetch(&filter).await.expect("fetch succeeds");
    assert_eq!(titles(&second), vec!["Goulash".to_string(), "Pho".to_string()]);
    wait_until_idle(provider.is_loading()).await;

    let err = provider.last_error().borrow().clone();
    assert!(
        matches!(err, Some(Error::NetworkFetchFailed(_))),
        "fetch failure must be published, got {:?}",
        err
    );

    // The failed refresh must not have touched the catalog
    let after = store_view
        .query(&filter)
        .await
        .expect("query succeeds");
    assert_eq!(titles(&after), vec!["Goulash".to_string(), "Pho".to_string()]);
}

#[tokio::test]
async fn next_successful_refresh_clears_the_error() {
    let remote = ScriptedRemoteSource::new(vec![
        ScriptedFetch::err_after(Duration::from_millis(20), Error::network("timeout")),
        ScriptedFetch::ok_after(Duration::from_millis(20), raw_set(&["Ramen"])),
    ]);
    let store = CountingStore::new();
    let store_view = CountingStore::sharing_with(&store);

    let coordinator = SyncCoordinator::new(Arc::new(remote), Arc::new(store));

    coordinator.request_refresh();
    wait_until_idle(coordinator.is_loading()).await;
    assert!(
        coordinator.last_error().borrow().is_some(),
        "first refresh fails and publishes its error"
    );

    coordinator.request_refresh();
    wait_until_idle(coordinator.is_loading()).await;
    assert!(
        coordinator.last_error().borrow().is_none(),
        "a successful refresh clears the error"
    );

    let recipes = store_view
        .query(&FilterQuery::default())
        .await
        .expect("query succeeds");
    assert_eq!(titles(&recipes), vec!["Ramen".to_string()]);
}

#[tokio::test]
async fn storage_failure_is_published_and_catalog_is_kept() {
    let remote = ScriptedRemoteSource::new(vec![
        ScriptedFetch::ok_after(Duration::from_millis(20), raw_set(&["Chili"])),
        ScriptedFetch::ok_after(Duration::from_millis(20), raw_set(&["Paella"])),
    ]);
    let store = CountingStore::new();
    let store_view = CountingStore::sharing_with(&store);

    let coordinator = SyncCoordinator::new(Arc::new(remote), Arc::new(store));

    coordinator.request_refresh();
    wait_until_idle(coordinator.is_loading()).await;
    let stamp = store_view.last_updated().await.expect("last_updated");
    assert!(stamp.is_some(), "first refresh lands");

    store_view.fail_writes(true);
    coordinator.request_refresh();
    wait_until_idle(coordinator.is_loading()).await;

    let err = coordinator.last_error().borrow().clone();
    assert!(
        matches!(err, Some(Error::StorageWriteFailed(_))),
        "write failure must be published, got {:?}",
        err
    );

    let recipes = store_view
        .query(&FilterQuery::default())
        .await
        .expect("query succeeds");
    assert_eq!(
        titles(&recipes),
        vec!["Chili".to_string()],
        "failed overwrite must leave the catalog unchanged"
    );
    assert_eq!(
        store_view.last_updated().await.expect("last_updated"),
        stamp,
        "failed overwrite must leave the timestamp unchanged"
    );
}
