//! Tests for the in-memory host: ordering rules, events and failure injection.

use tabdeck::platform::memory::{HostCall, InMemoryHost, ROOT_BOOKMARK_ID};
use tabdeck::platform::{HostEvent, HostPlatform};
use tabdeck::types::bookmark::BookmarkDestination;
use tabdeck::types::errors::HostError;
use tabdeck::types::tab::TabUpdate;

fn host_with_tabs(n: usize) -> (InMemoryHost, i64, Vec<i64>) {
    let host = InMemoryHost::new();
    let window = host.add_window();
    let tabs = (0..n)
        .map(|i| host.add_tab(window, &format!("t{}", i), "https://x.example", false))
        .collect();
    (host, window, tabs)
}

fn destination(parent: &str, index: usize) -> BookmarkDestination {
    BookmarkDestination {
        parent_id: parent.to_string(),
        index,
    }
}

#[tokio::test]
async fn test_move_tab_removes_then_inserts() {
    let (host, window, tabs) = host_with_tabs(6);
    host.move_tab(tabs[1], window, 4).await.unwrap();
    assert_eq!(
        host.tab_order(window),
        vec![tabs[0], tabs[2], tabs[3], tabs[4], tabs[1], tabs[5]]
    );

    let moved = host.get_tab(tabs[1]).await.unwrap();
    assert_eq!(moved.index, 4);
}

#[tokio::test]
async fn test_unpinned_tab_cannot_enter_pinned_block() {
    let host = InMemoryHost::new();
    let window = host.add_window();
    let pinned = host.add_tab(window, "p", "https://p.example", true);
    let a = host.add_tab(window, "a", "https://a.example", false);

    host.move_tab(a, window, 0).await.unwrap();
    assert_eq!(host.tab_order(window), vec![pinned, a]);
}

#[tokio::test]
async fn test_pin_moves_tab_to_end_of_pinned_block() {
    let host = InMemoryHost::new();
    let window = host.add_window();
    let p = host.add_tab(window, "p", "https://p.example", true);
    let a = host.add_tab(window, "a", "https://a.example", false);
    let b = host.add_tab(window, "b", "https://b.example", false);
    let mut events = host.subscribe();

    host.update_tab(b, TabUpdate::pin(true)).await.unwrap();

    assert_eq!(host.tab_order(window), vec![p, b, a]);
    assert!(host.get_tab(b).await.unwrap().pinned);
    assert_eq!(events.recv().await, Some(HostEvent::TabUpdated { tab_id: b }));
}

#[tokio::test]
async fn test_activate_emits_and_switches_active() {
    let (host, window, tabs) = host_with_tabs(3);
    let mut events = host.subscribe();

    host.update_tab(tabs[2], TabUpdate::activate()).await.unwrap();

    assert!(host.get_tab(tabs[2]).await.unwrap().active);
    assert!(!host.get_tab(tabs[0]).await.unwrap().active);
    assert_eq!(
        events.recv().await,
        Some(HostEvent::TabActivated {
            tab_id: tabs[2],
            window_id: window
        })
    );
}

#[tokio::test]
async fn test_remove_last_tab_closes_window() {
    let host = InMemoryHost::new();
    let first = host.add_window();
    host.add_tab(first, "a", "https://a.example", false);
    let second = host.add_window();
    let lone = host.add_tab(second, "b", "https://b.example", false);

    host.remove_tab(lone).await.unwrap();

    assert!(host.tab_order(second).is_empty());
    assert_eq!(host.focused_window(), Some(first));
    assert_eq!(host.get_tab(lone).await, Err(HostError::TabNotFound(lone)));
}

#[tokio::test]
async fn test_create_tab_opens_in_focused_window() {
    let host = InMemoryHost::new();
    let first = host.add_window();
    host.add_tab(first, "a", "https://a.example", false);
    let second = host.add_window();
    host.add_tab(second, "b", "https://b.example", false);
    host.focus_window(first).await.unwrap();

    let tab = host.create_tab("https://new.example").await.unwrap();

    assert_eq!(tab.window_id, first);
    assert!(tab.active);
    assert_eq!(tab.url, "https://new.example");
}

#[tokio::test]
async fn test_bookmark_same_parent_index_counts_before_removal() {
    let host = InMemoryHost::new();
    let ids: Vec<String> = (0..4)
        .map(|i| host.add_bookmark(ROOT_BOOKMARK_ID, &format!("b{}", i), "https://b.example"))
        .collect();

    host.move_bookmark(&ids[0], destination(ROOT_BOOKMARK_ID, 3))
        .await
        .unwrap();

    assert_eq!(
        host.bookmark_children(ROOT_BOOKMARK_ID),
        vec![ids[1].clone(), ids[2].clone(), ids[0].clone(), ids[3].clone()]
    );
    assert_eq!(host.get_bookmark(&ids[0]).await.unwrap().index(), 2);
}

#[tokio::test]
async fn test_bookmark_move_into_descendant_rejected() {
    let host = InMemoryHost::new();
    let outer = host.add_folder(ROOT_BOOKMARK_ID, "outer");
    let inner = host.add_folder(&outer, "inner");

    let result = host.move_bookmark(&outer, destination(&inner, 0)).await;

    assert!(matches!(result, Err(HostError::Rejected(_))));
    assert_eq!(host.bookmark_children(&outer), vec![inner]);
}

#[tokio::test]
async fn test_bookmark_move_into_leaf_rejected() {
    let host = InMemoryHost::new();
    let a = host.add_bookmark(ROOT_BOOKMARK_ID, "a", "https://a.example");
    let b = host.add_bookmark(ROOT_BOOKMARK_ID, "b", "https://b.example");
    assert!(host.move_bookmark(&a, destination(&b, 0)).await.is_err());
}

#[tokio::test]
async fn test_bookmark_move_emits_event() {
    let host = InMemoryHost::new();
    let folder = host.add_folder(ROOT_BOOKMARK_ID, "f");
    let leaf = host.add_bookmark(ROOT_BOOKMARK_ID, "l", "https://l.example");
    let mut events = host.subscribe();

    host.move_bookmark(&leaf, destination(&folder, 0)).await.unwrap();

    assert_eq!(events.recv().await, Some(HostEvent::BookmarkMoved { id: leaf.clone() }));
    let node = host.get_bookmark(&leaf).await.unwrap();
    assert_eq!(node.parent_id(), Some(folder.as_str()));
}

#[tokio::test]
async fn test_single_node_lookup_is_shallow() {
    let host = InMemoryHost::new();
    let folder = host.add_folder(ROOT_BOOKMARK_ID, "f");
    host.add_bookmark(&folder, "l", "https://l.example");

    let node = host.get_bookmark(&folder).await.unwrap();
    assert!(node.is_folder());
    assert!(node.children().is_empty());
    assert_eq!(host.get_bookmark_children(&folder).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failure_injection() {
    let (host, window, tabs) = host_with_tabs(2);

    host.set_fail_tab_reads(true);
    assert!(matches!(host.query_tabs().await, Err(HostError::Unavailable(_))));
    host.set_fail_tab_reads(false);

    host.set_fail_bookmark_reads(true);
    assert!(host.get_bookmark_tree().await.is_err());
    host.set_fail_bookmark_reads(false);

    host.set_fail_mutations(true);
    assert!(matches!(
        host.move_tab(tabs[0], window, 1).await,
        Err(HostError::Rejected(_))
    ));
    assert_eq!(host.tab_order(window), tabs);
}

#[tokio::test]
async fn test_call_log_separates_mutations() {
    let (host, window, tabs) = host_with_tabs(2);
    host.query_tabs().await.unwrap();
    host.move_tab(tabs[0], window, 1).await.unwrap();

    assert_eq!(host.calls().len(), 2);
    assert_eq!(
        host.mutation_calls(),
        vec![HostCall::MoveTab {
            tab_id: tabs[0],
            window_id: window,
            index: 1
        }]
    );
    host.clear_calls();
    assert!(host.calls().is_empty());
}
