//! Tests for the trailing-edge change coalescer.

use std::time::Duration;

use rstest::rstest;
use tabdeck::platform::{HostEvent, HostEventKind};
use tabdeck::services::change_coalescer::{
    ChangeCoalescer, CoalescerState, RefreshKind, SubscriptionList,
};
use tokio::time::Instant;

const FULL: Duration = Duration::from_millis(100);
const FAST: Duration = Duration::from_millis(50);

fn coalescer() -> ChangeCoalescer {
    ChangeCoalescer::new(FULL, FAST)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_burst_fires_once_after_quiet_window() {
    let mut c = coalescer();
    let t0 = Instant::now();

    for i in 0..10 {
        assert!(c.on_event(&HostEvent::TabUpdated { tab_id: i }, t0 + ms(i as u64 * 10)));
    }
    let last = t0 + ms(90);

    assert_eq!(c.fire(last + ms(99)), None);
    assert_eq!(c.fire(last + ms(100)), Some(RefreshKind::Full));
    assert_eq!(c.fire(last + ms(500)), None);
    assert_eq!(c.fired(), 1);
}

#[test]
fn test_each_event_rearms_deadline() {
    let mut c = coalescer();
    let t0 = Instant::now();
    c.on_event(&HostEvent::BookmarkMoved { id: "3".into() }, t0);
    assert_eq!(c.deadline(), Some(t0 + FULL));

    c.on_event(&HostEvent::BookmarkMoved { id: "3".into() }, t0 + ms(70));
    assert_eq!(c.deadline(), Some(t0 + ms(170)));
    assert_eq!(c.fire(t0 + ms(120)), None);
}

#[test]
fn test_separated_events_fire_separately() {
    let mut c = coalescer();
    let t0 = Instant::now();
    c.on_event(&HostEvent::TabCreated { tab_id: 1 }, t0);
    assert!(c.fire(t0 + ms(100)).is_some());
    c.on_event(&HostEvent::TabCreated { tab_id: 2 }, t0 + ms(300));
    assert!(c.fire(t0 + ms(400)).is_some());
    assert_eq!(c.fired(), 2);
}

#[rstest]
#[case(RefreshKind::Fast, RefreshKind::Fast, RefreshKind::Fast)]
#[case(RefreshKind::Fast, RefreshKind::Full, RefreshKind::Full)]
#[case(RefreshKind::Full, RefreshKind::Fast, RefreshKind::Full)]
#[case(RefreshKind::Full, RefreshKind::Full, RefreshKind::Full)]
fn test_pending_kinds_merge_to_larger(
    #[case] first: RefreshKind,
    #[case] second: RefreshKind,
    #[case] merged: RefreshKind,
) {
    let mut c = coalescer();
    let t0 = Instant::now();
    c.request(first, t0);
    c.request(second, t0 + ms(10));
    match c.state() {
        CoalescerState::Pending { kind, .. } => assert_eq!(kind, merged),
        CoalescerState::Idle => panic!("expected a pending refresh"),
    }
}

#[test]
fn test_fast_uses_shorter_window() {
    let mut c = coalescer();
    let t0 = Instant::now();
    c.request(RefreshKind::Fast, t0);
    assert_eq!(c.deadline(), Some(t0 + FAST));
}

#[test]
fn test_unsubscribed_events_ignored() {
    let mut subscriptions = SubscriptionList::empty();
    subscriptions.subscribe(HostEventKind::TabRemoved, RefreshKind::Fast);
    let mut c = coalescer().with_subscriptions(subscriptions);
    let t0 = Instant::now();

    assert!(!c.on_event(&HostEvent::BookmarkChanged { id: "1".into() }, t0));
    assert!(!c.is_pending());
    assert!(c.on_event(&HostEvent::TabRemoved { tab_id: 4 }, t0));
    assert_eq!(c.deadline(), Some(t0 + FAST));
}

#[test]
fn test_default_subscriptions_cover_every_kind() {
    let list = SubscriptionList::default();
    assert_eq!(list.len(), HostEventKind::ALL.len());
    assert_eq!(
        list.route(&HostEvent::TabActivated {
            tab_id: 1,
            window_id: 1
        }),
        Some(RefreshKind::Full)
    );
}

#[test]
fn test_resubscribe_replaces_route() {
    let mut list = SubscriptionList::default();
    assert_eq!(
        list.subscribe(HostEventKind::TabUpdated, RefreshKind::Fast),
        Some(RefreshKind::Full)
    );
    assert_eq!(list.unsubscribe(HostEventKind::TabUpdated), Some(RefreshKind::Fast));
    assert_eq!(list.len(), HostEventKind::ALL.len() - 1);
}

#[test]
fn test_cancel_drops_pending() {
    let mut c = coalescer();
    let t0 = Instant::now();
    c.request(RefreshKind::Full, t0);
    c.cancel();
    assert_eq!(c.fire(t0 + ms(1_000)), None);
    assert_eq!(c.state(), CoalescerState::Idle);
}
