//! Tests for loading snapshots from the host, including partial failures.

use std::sync::Arc;

use tabdeck::platform::memory::{InMemoryHost, ROOT_BOOKMARK_ID};
use tabdeck::services::snapshot_loader::SnapshotLoader;
use tabdeck::types::snapshot::SnapshotPart;

fn seeded_host() -> Arc<InMemoryHost> {
    let host = Arc::new(InMemoryHost::new());
    let w1 = host.add_window();
    let w2 = host.add_window();
    host.add_tab(w1, "pinned", "https://a.example", true);
    host.add_tab(w1, "one", "https://b.example", false);
    host.add_tab(w2, "two", "https://c.example", false);
    host.add_tab(w1, "three", "https://d.example", false);

    let folder = host.add_folder(ROOT_BOOKMARK_ID, "Folder");
    host.add_bookmark(&folder, "Inside", "https://e.example");
    host.add_bookmark(ROOT_BOOKMARK_ID, "Top", "https://f.example");
    host
}

#[tokio::test]
async fn test_full_load_partitions_and_exposes_root_children() {
    let host = seeded_host();
    let loader = SnapshotLoader::new(host);

    let snapshot = loader.load_snapshot().await;

    assert!(snapshot.failures.is_empty());
    assert_eq!(snapshot.pinned_tabs.len(), 1);
    assert_eq!(snapshot.open_tabs_by_window.len(), 2);
    let titles: Vec<&str> = snapshot.open_tabs().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "three", "two"]);

    assert_eq!(snapshot.bookmark_roots.len(), 2);
    assert_eq!(snapshot.bookmark_roots[0].title(), "Folder");
    assert_eq!(snapshot.bookmark_roots[0].children().len(), 1);
    assert_eq!(snapshot.bookmark_roots[1].parent_id(), Some(ROOT_BOOKMARK_ID));
}

#[tokio::test]
async fn test_bookmark_failure_still_delivers_tabs() {
    let host = seeded_host();
    host.set_fail_bookmark_reads(true);
    let loader = SnapshotLoader::new(host);

    let snapshot = loader.load_snapshot().await;

    assert!(snapshot.failed(SnapshotPart::Bookmarks));
    assert!(!snapshot.failed(SnapshotPart::Tabs));
    assert!(snapshot.bookmark_roots.is_empty());
    assert_eq!(snapshot.all_tabs().count(), 4);
}

#[tokio::test]
async fn test_tab_failure_still_delivers_bookmarks() {
    let host = seeded_host();
    host.set_fail_tab_reads(true);
    let loader = SnapshotLoader::new(host);

    let snapshot = loader.load_snapshot().await;

    assert!(snapshot.failed(SnapshotPart::Tabs));
    assert_eq!(snapshot.all_tabs().count(), 0);
    assert_eq!(snapshot.bookmark_roots.len(), 2);
}

#[tokio::test]
async fn test_tabs_only_reuses_previous_bookmarks() {
    let host = seeded_host();
    let loader = SnapshotLoader::new(host.clone());
    let previous = loader.load_snapshot().await;

    host.add_bookmark(ROOT_BOOKMARK_ID, "Unseen", "https://g.example");
    host.add_tab(1, "four", "https://h.example", false);
    host.clear_calls();

    let fast = loader.load_tabs_only(&previous).await;

    assert_eq!(fast.bookmark_roots, previous.bookmark_roots);
    assert_eq!(fast.all_tabs().count(), 5);
    assert_eq!(host.calls(), vec![tabdeck::platform::memory::HostCall::QueryTabs]);
}

#[tokio::test]
async fn test_full_load_reads_each_half_once() {
    use tabdeck::platform::memory::HostCall;

    let host = seeded_host();
    let loader = SnapshotLoader::new(host.clone());

    loader.load_snapshot().await;

    let calls = host.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.contains(&HostCall::QueryTabs));
    assert!(calls.contains(&HostCall::GetBookmarkTree));
}
