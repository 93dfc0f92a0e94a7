//! Tests for drag interpretation: index arithmetic, reparenting, the cycle
//! check, the compatibility matrix and no-op elision.

use rstest::rstest;
use tabdeck::services::reorder_engine::{compute_move, EntityOrder};
use tabdeck::types::bookmark::{BookmarkDestination, BookmarkFolder, BookmarkLeaf, BookmarkNode};
use tabdeck::types::drag::{DragContext, DropSide, EntityId, EntityKind, MoveRequest};
use tabdeck::types::errors::InvalidMove;
use tabdeck::types::snapshot::{Snapshot, WindowGroup};
use tabdeck::types::tab::Tab;

fn tab(id: i64, window_id: i64, index: usize, pinned: bool) -> Tab {
    Tab {
        id,
        window_id,
        index,
        pinned,
        active: false,
        title: String::new(),
        url: String::new(),
        favicon_url: None,
    }
}

fn leaf(id: &str, parent: &str, index: usize) -> BookmarkNode {
    BookmarkNode::Leaf(BookmarkLeaf {
        id: id.to_string(),
        parent_id: parent.to_string(),
        index,
        title: id.to_string(),
        url: format!("https://{}.example", id),
    })
}

fn folder(id: &str, parent: &str, index: usize, children: Vec<BookmarkNode>) -> BookmarkNode {
    BookmarkNode::Folder(BookmarkFolder {
        id: id.to_string(),
        parent_id: Some(parent.to_string()),
        index,
        title: id.to_string(),
        children,
    })
}

/// Window 1: pinned tabs 100, 101 then tabs 10..=16 (host indices 2..=8).
/// Window 2: tabs 20, 21.
/// Bookmarks under root "0": F(G(g1), f1), L, M.
fn order() -> EntityOrder {
    let snapshot = Snapshot {
        pinned_tabs: vec![tab(100, 1, 0, true), tab(101, 1, 1, true)],
        open_tabs_by_window: vec![
            WindowGroup {
                window_id: 1,
                tabs: (0..7).map(|i| tab(10 + i as i64, 1, i + 2, false)).collect(),
            },
            WindowGroup {
                window_id: 2,
                tabs: vec![tab(20, 2, 0, false), tab(21, 2, 1, false)],
            },
        ],
        bookmark_roots: vec![
            folder(
                "F",
                "0",
                0,
                vec![folder("G", "F", 0, vec![leaf("g1", "G", 0)]), leaf("f1", "F", 1)],
            ),
            leaf("L", "0", 1),
            leaf("M", "0", 2),
        ],
        failures: vec![],
    };
    EntityOrder::from_snapshot(&snapshot)
}

fn tab_drag(kind: EntityKind, source: i64, target: i64, side: DropSide) -> DragContext {
    DragContext::new(kind, EntityId::Tab(source)).with_target(EntityId::Tab(target), side)
}

fn bookmark_drag(kind: EntityKind, source: &str, target: &str, side: DropSide) -> DragContext {
    DragContext::new(kind, EntityId::Bookmark(source.to_string()))
        .with_target(EntityId::Bookmark(target.to_string()), side)
}

fn moved_to(window_id: i64, index: usize, tab_id: i64) -> Result<MoveRequest, InvalidMove> {
    Ok(MoveRequest::Tab {
        tab_id,
        window_id,
        index,
    })
}

fn reparented(id: &str, parent: &str, index: usize) -> Result<MoveRequest, InvalidMove> {
    Ok(MoveRequest::Bookmark {
        bookmark_id: id.to_string(),
        destination: BookmarkDestination {
            parent_id: parent.to_string(),
            index,
        },
    })
}

// === Tabs ===

#[rstest]
// Host index 2 dropped below host index 5 lands at 5.
#[case(10, 13, DropSide::Below, moved_to(1, 5, 10))]
// Host index 5 dropped above host index 2 lands at 2.
#[case(13, 10, DropSide::Above, moved_to(1, 2, 13))]
#[case(10, 16, DropSide::Below, moved_to(1, 8, 10))]
#[case(16, 10, DropSide::Below, moved_to(1, 3, 16))]
#[case(10, 11, DropSide::Below, moved_to(1, 3, 10))]
// Into on a tab behaves like Above.
#[case(15, 12, DropSide::Into, moved_to(1, 4, 15))]
// No change: directly above the next tab, directly below the previous one.
#[case(12, 13, DropSide::Above, Err(InvalidMove::NoChange))]
#[case(12, 11, DropSide::Below, Err(InvalidMove::NoChange))]
#[case(12, 12, DropSide::Below, Err(InvalidMove::SelfDrop))]
fn test_tab_moves(
    #[case] source: i64,
    #[case] target: i64,
    #[case] side: DropSide,
    #[case] expected: Result<MoveRequest, InvalidMove>,
) {
    assert_eq!(compute_move(&tab_drag(EntityKind::Tab, source, target, side), &order()), expected);
}

#[test]
fn test_cross_window_move_targets_other_window_without_shift() {
    assert_eq!(
        compute_move(&tab_drag(EntityKind::Tab, 10, 20, DropSide::Below), &order()),
        moved_to(2, 1, 10)
    );
    assert_eq!(
        compute_move(&tab_drag(EntityKind::Tab, 21, 14, DropSide::Above), &order()),
        moved_to(1, 6, 21)
    );
}

#[test]
fn test_pinned_reorder_within_strip() {
    assert_eq!(
        compute_move(&tab_drag(EntityKind::PinnedTab, 100, 101, DropSide::Below), &order()),
        moved_to(1, 1, 100)
    );
}

// === Compatibility matrix ===

#[rstest]
#[case(tab_drag(EntityKind::PinnedTab, 100, 10, DropSide::Above))]
#[case(tab_drag(EntityKind::Tab, 10, 100, DropSide::Below))]
#[case(DragContext::new(EntityKind::Tab, EntityId::Tab(10)).with_target(EntityId::Bookmark("L".into()), DropSide::Above))]
#[case(DragContext::new(EntityKind::BookmarkLeaf, EntityId::Bookmark("L".into())).with_target(EntityId::Tab(10), DropSide::Above))]
#[case(DragContext::new(EntityKind::BookmarkFolder, EntityId::Bookmark("F".into())).with_target(EntityId::Tab(100), DropSide::Into))]
fn test_incompatible_kinds_rejected(#[case] ctx: DragContext) {
    assert_eq!(compute_move(&ctx, &order()), Err(InvalidMove::IncompatibleKinds));
}

#[test]
fn test_missing_target_rejected() {
    let ctx = DragContext::new(EntityKind::Tab, EntityId::Tab(10));
    assert_eq!(compute_move(&ctx, &order()), Err(InvalidMove::MissingDropTarget));
}

#[test]
fn test_unknown_entities_rejected() {
    assert!(matches!(
        compute_move(&tab_drag(EntityKind::Tab, 99, 10, DropSide::Above), &order()),
        Err(InvalidMove::UnknownEntity(_))
    ));
    assert!(matches!(
        compute_move(&bookmark_drag(EntityKind::BookmarkLeaf, "L", "gone", DropSide::Above), &order()),
        Err(InvalidMove::UnknownEntity(_))
    ));
}

#[test]
fn test_source_kind_changed_since_drag_start() {
    // Tab 100 is pinned in the current order.
    assert!(matches!(
        compute_move(&tab_drag(EntityKind::Tab, 100, 101, DropSide::Above), &order()),
        Err(InvalidMove::UnknownEntity(_))
    ));
}

// === Bookmarks ===

#[rstest]
// Onto a folder files into it as first child.
#[case("L", "F", DropSide::Into, reparented("L", "F", 0))]
#[case("M", "G", DropSide::Above, reparented("M", "G", 0))]
// Below a folder places next to it.
#[case("M", "F", DropSide::Below, reparented("M", "0", 1))]
// Adjacent to leaves.
#[case("M", "f1", DropSide::Above, reparented("M", "F", 1))]
#[case("M", "f1", DropSide::Below, reparented("M", "F", 2))]
#[case("L", "M", DropSide::Below, reparented("L", "0", 3))]
#[case("M", "L", DropSide::Above, reparented("M", "0", 1))]
// Into on a leaf is treated as Above.
#[case("g1", "L", DropSide::Into, reparented("g1", "0", 1))]
// Folder moves out of its parent.
#[case("G", "M", DropSide::Below, reparented("G", "0", 3))]
fn test_bookmark_moves(
    #[case] source: &str,
    #[case] target: &str,
    #[case] side: DropSide,
    #[case] expected: Result<MoveRequest, InvalidMove>,
) {
    let kind = if matches!(source, "F" | "G") {
        EntityKind::BookmarkFolder
    } else {
        EntityKind::BookmarkLeaf
    };
    assert_eq!(compute_move(&bookmark_drag(kind, source, target, side), &order()), expected);
}

#[rstest]
#[case("G", DropSide::Into)]
#[case("G", DropSide::Below)]
#[case("g1", DropSide::Above)]
#[case("f1", DropSide::Below)]
fn test_folder_into_own_descendant_rejected(#[case] target: &str, #[case] side: DropSide) {
    assert_eq!(
        compute_move(&bookmark_drag(EntityKind::BookmarkFolder, "F", target, side), &order()),
        Err(InvalidMove::DescendantCycle)
    );
}

#[rstest]
// Already the first child of F.
#[case("G", "F", DropSide::Into)]
// Directly above its next sibling, or directly below its previous one.
#[case("L", "M", DropSide::Above)]
#[case("M", "L", DropSide::Below)]
#[case("f1", "G", DropSide::Below)]
fn test_bookmark_no_change_elided(#[case] source: &str, #[case] target: &str, #[case] side: DropSide) {
    let kind = if source == "G" {
        EntityKind::BookmarkFolder
    } else {
        EntityKind::BookmarkLeaf
    };
    assert_eq!(
        compute_move(&bookmark_drag(kind, source, target, side), &order()),
        Err(InvalidMove::NoChange)
    );
}

#[test]
fn test_bookmark_self_drop_rejected() {
    assert_eq!(
        compute_move(&bookmark_drag(EntityKind::BookmarkFolder, "F", "F", DropSide::Into), &order()),
        Err(InvalidMove::SelfDrop)
    );
}

#[test]
fn test_ancestor_chain() {
    let order = order();
    assert_eq!(order.ancestors("g1"), vec!["G", "F", "0"]);
    assert!(order.is_within("g1", "F"));
    assert!(!order.is_within("L", "F"));
    assert_eq!(order.siblings(Some("F")), ["G".to_string(), "f1".to_string()]);
}
