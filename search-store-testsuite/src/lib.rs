//! # Search Store Testsuite
//!
//! Conformance scenarios any `ItemStore` backend is expected to pass. Each
//! scenario works in its own random namespace, so scenarios can share one
//! backend (and one index) without seeing each other's items.
//!
//! Scenarios panic on the first violated expectation; call them from a test.

mod item;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use search_store_shared::{Filter, Item, ItemStore, ListOptions, SortOrder, StoreError};

pub use item::SuiteItem;

/// Which scenarios to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    /// Create, read, update and delete.
    Basic,
    /// `Basic` plus listing: scoping, pagination, sorting, filter rejection.
    Advanced,
}

/// Gap between writes whose timestamps must order. Engines store dates with
/// millisecond precision.
const WRITE_GAP: Duration = Duration::from_millis(5);

/// Run every scenario of `suite` against `store`.
pub async fn run_testsuite(store: &dyn ItemStore, suite: Suite) {
    info!(suite = ?suite, "Running item store testsuite");

    crud(store).await;
    read_missing(store).await;

    if suite == Suite::Advanced {
        list_scoped(store).await;
        list_paginated(store).await;
        list_sorted(store).await;
        list_rejects_filter(store).await;
    }
}

fn unique_namespace(scenario: &str) -> String {
    format!("{}-{}", scenario, Uuid::new_v4().simple())
}

fn ids(items: &[Box<dyn Item>]) -> Vec<String> {
    items.iter().map(|item| item.id()).collect()
}

async fn create_items(store: &dyn ItemStore, namespace: &str, count: usize) -> Vec<SuiteItem> {
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let id = format!("{}-{}", namespace, i);
        let mut item = SuiteItem::new(namespace, id, format!("value {}", i));
        store.create(&mut item).await.expect("create failed");
        created.push(item);
        tokio::time::sleep(WRITE_GAP).await;
    }
    created
}

/// Create, read back, update, read back, delete, read fails.
pub async fn crud(store: &dyn ItemStore) {
    let namespace = unique_namespace("crud");
    let mut item = SuiteItem::new(&namespace, format!("{}-1", namespace), "first");

    store.create(&mut item).await.expect("create failed");

    let mut fetched = SuiteItem::new(&namespace, item.id.clone(), "");
    store.read(&mut fetched).await.expect("read failed");
    assert_eq!(
        fetched.to_bytes(),
        item.to_bytes(),
        "read returned different content than was created"
    );

    item.value = "second".to_string();
    store.update(&mut item).await.expect("update failed");

    let mut fetched = SuiteItem::new(&namespace, item.id.clone(), "");
    store.read(&mut fetched).await.expect("read after update failed");
    assert_eq!(fetched.value, "second");
    assert_eq!(fetched.created_at, item.created_at);

    store.delete(&item).await.expect("delete failed");

    let result = store.read(&mut SuiteItem::new(&namespace, item.id.clone(), "")).await;
    assert!(
        matches!(result, Err(StoreError::NotFound(_))),
        "read after delete should be NotFound, got {:?}",
        result
    );
}

/// Reading an item that was never created fails with `NotFound`.
pub async fn read_missing(store: &dyn ItemStore) {
    let namespace = unique_namespace("missing");
    // Make sure the backend is initialised so the failure is about the item.
    let mut seed = SuiteItem::new(&namespace, format!("{}-seed", namespace), "seed");
    store.create(&mut seed).await.expect("create failed");

    let result = store
        .read(&mut SuiteItem::new(&namespace, "never-created", ""))
        .await;
    assert!(
        matches!(result, Err(StoreError::NotFound(_))),
        "read of unknown item should be NotFound, got {:?}",
        result
    );
}

/// Listing returns exactly the items of the requested namespace.
pub async fn list_scoped(store: &dyn ItemStore) {
    let namespace = unique_namespace("scoped");
    let other = unique_namespace("other");

    let created = create_items(store, &namespace, 3).await;
    create_items(store, &other, 2).await;

    let items = store
        .list(&SuiteItem::factory(&namespace), &ListOptions::new(0, 10))
        .await
        .expect("list failed");

    assert_eq!(items.len(), created.len());
    assert!(items.iter().all(|item| item.namespace() == namespace));

    let listed: HashSet<String> = ids(&items).into_iter().collect();
    let expected: HashSet<String> = created.iter().map(|item| item.id.clone()).collect();
    assert_eq!(listed, expected);

    let empty = store
        .list(
            &SuiteItem::factory(unique_namespace("empty")),
            &ListOptions::new(0, 10),
        )
        .await
        .expect("list of empty namespace failed");
    assert!(empty.is_empty());
}

/// Pages partition the namespace: sizes follow the limit and no item repeats.
pub async fn list_paginated(store: &dyn ItemStore) {
    let namespace = unique_namespace("paged");
    create_items(store, &namespace, 5).await;
    let factory = SuiteItem::factory(&namespace);

    let mut seen = HashSet::new();
    for (page, expected_len) in [(0, 2), (1, 2), (2, 1), (3, 0)] {
        let options = ListOptions::new(page, 2).with_sort(SortOrder::CreatedAsc);
        let items = store.list(&factory, &options).await.expect("list failed");
        assert_eq!(items.len(), expected_len, "page {} has the wrong size", page);
        for id in ids(&items) {
            assert!(seen.insert(id), "page {} repeats an item", page);
        }
    }
    assert_eq!(seen.len(), 5);
}

/// Created and updated orders follow the write timestamps.
pub async fn list_sorted(store: &dyn ItemStore) {
    let namespace = unique_namespace("sorted");
    let mut created = create_items(store, &namespace, 3).await;
    let factory = SuiteItem::factory(&namespace);

    let creation_order: Vec<String> = created.iter().map(|item| item.id.clone()).collect();
    let mut reversed = creation_order.clone();
    reversed.reverse();

    let list = |sort| {
        let options = ListOptions::new(0, 10).with_sort(sort);
        let factory = &factory;
        async move { ids(&store.list(factory, &options).await.expect("list failed")) }
    };

    assert_eq!(list(SortOrder::CreatedAsc).await, creation_order);
    assert_eq!(list(SortOrder::CreatedDesc).await, reversed);

    // Touch items newest first so update order is the reverse of creation order.
    for item in created.iter_mut().rev() {
        item.value = format!("{} (updated)", item.value);
        store.update(item).await.expect("update failed");
        tokio::time::sleep(WRITE_GAP).await;
    }

    assert_eq!(list(SortOrder::UpdatedAsc).await, reversed);
    assert_eq!(list(SortOrder::UpdatedDesc).await, creation_order);
}

struct AcceptAll;

impl Filter for AcceptAll {
    fn compare(&self, _item: &dyn Item) -> bool {
        true
    }
}

/// Any filter is rejected with `NotImplemented`, whatever the other options.
pub async fn list_rejects_filter(store: &dyn ItemStore) {
    let namespace = unique_namespace("filtered");
    create_items(store, &namespace, 1).await;
    let factory = SuiteItem::factory(&namespace);

    for sort in [SortOrder::Natural, SortOrder::CreatedAsc, SortOrder::UpdatedDesc] {
        for (page, limit) in [(0, 0), (0, 10), (4, 3)] {
            let options = ListOptions::new(page, limit)
                .with_sort(sort)
                .with_filter(Arc::new(AcceptAll));
            let result = store.list(&factory, &options).await;
            assert!(
                matches!(result, Err(StoreError::NotImplemented(_))),
                "filter with {:?} should be rejected",
                options
            );
        }
    }
}
