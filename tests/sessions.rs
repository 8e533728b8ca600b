use std::time::{Duration, Instant};

use eshop_storefront::{
    catalog::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    config::catalog_page_size,
    session::SessionStore,
};
use uuid::Uuid;

#[test]
fn read_does_not_store_unknown_sessions() {
    let store = SessionStore::new(5);
    let id = Uuid::new_v4();

    let empty = store.read(id, |s| s.cart.is_empty());
    assert!(empty);
    assert!(store.is_empty());

    store.with(id, |_| ());
    assert!(store.contains(id));
    assert_eq!(store.read(id, |s| s.browser.tracker().page_size()), 5);
}

#[test]
fn idle_sessions_are_evicted_after_ttl() {
    let store = SessionStore::with_ttl(5, Duration::from_secs(60));
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    store.with(first, |_| ());
    store.with(second, |_| ());

    assert_eq!(store.evict_idle(), 0);
    assert_eq!(store.len(), 2);

    let later = Instant::now() + Duration::from_secs(61);
    assert_eq!(store.evict_idle_at(later), 2);
    assert!(store.is_empty());
}

#[test]
fn activity_refreshes_last_seen() {
    let store = SessionStore::with_ttl(5, Duration::from_secs(60));
    let id = Uuid::new_v4();
    let created = store.with(id, |s| s.last_seen());
    std::thread::sleep(Duration::from_millis(5));
    let seen = store.read(id, |s| s.last_seen());
    assert!(seen > created);
}

#[tokio::test]
async fn background_sweep_drops_idle_sessions() {
    let store = SessionStore::with_ttl(5, Duration::from_millis(20));
    store.with(Uuid::new_v4(), |_| ());
    let sweeper = store.spawn_eviction(Duration::from_millis(10));

    tokio::time::sleep(Duration::from_millis(150)).await;
    sweeper.abort();
    assert!(store.is_empty());
}

#[test]
fn configured_page_size_is_bounded() {
    assert_eq!(catalog_page_size(None), DEFAULT_PAGE_SIZE);
    assert_eq!(catalog_page_size(Some(0)), 1);
    assert_eq!(catalog_page_size(Some(-3)), 1);
    assert_eq!(catalog_page_size(Some(20)), 20);
    assert_eq!(catalog_page_size(Some(10_000)), MAX_PAGE_SIZE);
}
