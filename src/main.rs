//! Tabdeck demo.
//!
//! Runs the panel core against an in-memory host through a scripted session
//! and prints the visual list after each step.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use tabdeck::app::{open_state_store, PanelController};
use tabdeck::database::{Database, KeyValueStore, SqliteStore};
use tabdeck::logging;
use tabdeck::platform::memory::{InMemoryHost, ROOT_BOOKMARK_ID};
use tabdeck::platform::{HostEvent, HostPlatform};
use tabdeck::services::change_coalescer::RefreshKind;
use tabdeck::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabdeck::types::drag::{DropSide, EntityId, EntityKind};
use tabdeck::types::intent::PanelIntent;
use tabdeck::types::settings::PanelSettings;
use tabdeck::types::visual::{VisualEntry, VisualList};

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_view(view: &VisualList) {
    if view.is_empty() {
        println!("  (nothing to show)");
        return;
    }
    if !view.pinned.is_empty() {
        let strip: Vec<String> = view
            .pinned
            .iter()
            .map(|p| {
                if p.highlighted {
                    format!("[{}]", p.title)
                } else {
                    p.title.clone()
                }
            })
            .collect();
        println!("  pinned: {}", strip.join(" | "));
    }
    for entry in &view.entries {
        let mark = if entry.is_highlighted() { "*" } else { " " };
        match entry {
            VisualEntry::Tab(t) => println!("  {} tab {:>2}  {} (window {})", mark, t.tab_id, t.title, t.window_id),
            VisualEntry::Folder(f) => println!(
                "  {} {}{} {} ({})",
                mark,
                "  ".repeat(f.depth),
                f.toggle.glyph(),
                f.title,
                f.child_count
            ),
            VisualEntry::Bookmark(b) => {
                println!("  {} {}· {} <{}>", mark, "  ".repeat(b.depth), b.title, b.url)
            }
        }
    }
}

fn load_settings() -> PanelSettings {
    let mut engine = SettingsEngine::new(None);
    match engine.load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "settings unreadable; using defaults");
            PanelSettings::default()
        }
    }
}

fn state_store(settings: &PanelSettings) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    if settings.storage.database_path.is_some() {
        return Ok(Arc::new(open_state_store(&settings.storage)?));
    }
    Ok(Arc::new(SqliteStore::new(Database::open_in_memory()?)))
}

fn seed(host: &InMemoryHost) -> (Vec<i64>, Vec<String>) {
    let main = host.add_window();
    let side = host.add_window();
    let tabs = vec![
        host.add_tab(main, "Inbox", "https://mail.example.com", true),
        host.add_tab(main, "Rust docs", "https://doc.rust-lang.org", false),
        host.add_tab(main, "crates.io", "https://crates.io", false),
        host.add_tab(main, "Tokio", "https://tokio.rs", false),
        host.add_tab(main, "Serde", "https://serde.rs", false),
        host.add_tab(side, "Release notes", "https://blog.rust-lang.org", false),
    ];

    let work = host.add_folder(ROOT_BOOKMARK_ID, "Work");
    let archive = host.add_folder(&work, "Archive");
    let bookmarks = vec![
        work.clone(),
        archive.clone(),
        host.add_bookmark(&work, "Tracker", "https://issues.example.com"),
        host.add_bookmark(&archive, "Old wiki", "https://wiki.example.com"),
        host.add_bookmark(ROOT_BOOKMARK_ID, "This Week in Rust", "https://this-week-in-rust.org"),
    ];
    (tabs, bookmarks)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings();
    logging::init_logging(&settings.logging);

    println!();
    println!("  Tabdeck v{} demo", env!("CARGO_PKG_VERSION"));
    println!();

    let host = Arc::new(InMemoryHost::new());
    let (tabs, bookmarks) = seed(&host);
    let store = state_store(&settings)?;
    let mut panel = PanelController::new(host.clone(), store, &settings);
    let debounce = Duration::from_millis(settings.refresh.debounce_ms);

    section("Startup");
    panel.start().await;
    print_view(panel.view());

    section("Expand folders");
    panel.toggle_folder(&bookmarks[0]).await?;
    panel.toggle_folder(&bookmarks[1]).await?;
    print_view(panel.view());

    section("Drag 'Rust docs' below 'Tokio'");
    panel.begin_drag(EntityKind::Tab, EntityId::Tab(tabs[1]))?;
    panel.drag_over(EntityId::Tab(tabs[3]), DropSide::Below)?;
    let request = panel.complete_drag().await?;
    println!("  issued {:?}", request);
    tokio::time::sleep(debounce).await;
    panel.run_due(Instant::now()).await;
    print_view(panel.view());

    section("Drag 'This Week in Rust' onto 'Work'");
    panel.begin_drag(EntityKind::BookmarkLeaf, EntityId::Bookmark(bookmarks[4].clone()))?;
    panel.drag_over(EntityId::Bookmark(bookmarks[0].clone()), DropSide::Into)?;
    let request = panel.complete_drag().await?;
    println!("  issued {:?}", request);
    tokio::time::sleep(debounce).await;
    panel.run_due(Instant::now()).await;
    print_view(panel.view());

    section("Rejected gestures");
    panel.begin_drag(EntityKind::BookmarkFolder, EntityId::Bookmark(bookmarks[0].clone()))?;
    panel.drag_over(EntityId::Bookmark(bookmarks[3].clone()), DropSide::Above)?;
    if let Err(e) = panel.complete_drag().await {
        println!("  folder into its own descendant: {}", e);
    }
    panel.begin_drag(EntityKind::PinnedTab, EntityId::Tab(tabs[0]))?;
    panel.drag_over(EntityId::Tab(tabs[2]), DropSide::Above)?;
    if let Err(e) = panel.complete_drag().await {
        println!("  pinned tab onto unpinned tab: {}", e);
    }

    section("Bookmarks unavailable");
    host.set_fail_bookmark_reads(true);
    panel.refresh(RefreshKind::Full).await;
    for failure in &panel.snapshot().failures {
        println!("  failed to load {}: {}", failure.part, failure.reason);
    }
    print_view(panel.view());
    host.set_fail_bookmark_reads(false);

    section("Reconciliation loop");
    let (intent_tx, intent_rx) = tokio::sync::mpsc::unbounded_channel();
    let (view_tx, mut view_rx) = tokio::sync::mpsc::unbounded_channel();
    let events = host.subscribe();
    let task = tokio::spawn(panel.run(events, intent_rx, view_tx));

    host.emit(HostEvent::BookmarkChanged {
        id: bookmarks[2].clone(),
    });
    intent_tx.send(PanelIntent::ActivateTab { tab_id: tabs[4] })?;
    intent_tx.send(PanelIntent::CloseTab { tab_id: tabs[5] })?;
    tokio::time::sleep(debounce * 3).await;
    drop(intent_tx);

    let panel = task.await?;
    let mut published = 0;
    while view_rx.try_recv().is_ok() {
        published += 1;
    }
    println!("  views published: {}, rebuilds: {}", published, panel.rebuild_count());
    print_view(panel.view());

    println!();
    println!("  Done.");
    Ok(())
}
