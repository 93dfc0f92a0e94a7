//! Change Coalescer.
//!
//! Turns bursts of host notifications into a single downstream refresh.
//! Trailing-edge debounce: every accepted event re-arms the deadline, and the
//! refresh fires once the stream has been quiet for a whole window. Events are
//! never dropped, only merged into the pending refresh.
//!
//! The coalescer is a plain state machine driven with explicit instants; the
//! panel controller owns the timer that sleeps until [`ChangeCoalescer::deadline`].

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::platform::{HostEvent, HostEventKind};
use crate::types::settings::RefreshSettings;

/// How much state a refresh reloads.
///
/// Ordered so that merging two pending refreshes keeps the larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RefreshKind {
    /// Tabs only; bookmarks come from the previous snapshot.
    Fast,
    /// Tabs and the bookmark tree.
    Full,
}

/// Which host events the panel listens to and what each one triggers.
///
/// Subscribing a kind that is already subscribed replaces its route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionList {
    routes: HashMap<HostEventKind, RefreshKind>,
}

impl SubscriptionList {
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Routes `kind` to `refresh`, returning the route it replaced.
    pub fn subscribe(&mut self, kind: HostEventKind, refresh: RefreshKind) -> Option<RefreshKind> {
        self.routes.insert(kind, refresh)
    }

    pub fn unsubscribe(&mut self, kind: HostEventKind) -> Option<RefreshKind> {
        self.routes.remove(&kind)
    }

    pub fn route(&self, event: &HostEvent) -> Option<RefreshKind> {
        self.routes.get(&event.kind()).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for SubscriptionList {
    /// Every tab and bookmark event triggers a full refresh.
    fn default() -> Self {
        let mut list = Self::empty();
        for kind in HostEventKind::ALL {
            list.subscribe(kind, RefreshKind::Full);
        }
        list
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoalescerState {
    Idle,
    Pending { deadline: Instant, kind: RefreshKind },
}

/// Debounces refresh requests into at most one pending refresh.
#[derive(Debug)]
pub struct ChangeCoalescer {
    full_window: Duration,
    fast_window: Duration,
    subscriptions: SubscriptionList,
    state: CoalescerState,
    fired: u64,
}

impl ChangeCoalescer {
    pub fn new(full_window: Duration, fast_window: Duration) -> Self {
        Self {
            full_window,
            fast_window,
            subscriptions: SubscriptionList::default(),
            state: CoalescerState::Idle,
            fired: 0,
        }
    }

    pub fn from_settings(settings: &RefreshSettings) -> Self {
        Self::new(
            Duration::from_millis(settings.debounce_ms),
            Duration::from_millis(settings.fast_refresh_ms),
        )
    }

    pub fn with_subscriptions(mut self, subscriptions: SubscriptionList) -> Self {
        self.subscriptions = subscriptions;
        self
    }

    pub fn subscriptions_mut(&mut self) -> &mut SubscriptionList {
        &mut self.subscriptions
    }

    /// Feeds a host notification. Returns false if the event is not subscribed.
    pub fn on_event(&mut self, event: &HostEvent, now: Instant) -> bool {
        match self.subscriptions.route(event) {
            Some(kind) => {
                self.request(kind, now);
                true
            }
            None => {
                tracing::trace!(?event, "ignoring unsubscribed host event");
                false
            }
        }
    }

    /// Arms the timer, or re-arms it if a refresh is already pending.
    pub fn request(&mut self, kind: RefreshKind, now: Instant) {
        let kind = match self.state {
            CoalescerState::Pending { kind: pending, .. } => pending.max(kind),
            CoalescerState::Idle => kind,
        };
        let window = match kind {
            RefreshKind::Full => self.full_window,
            RefreshKind::Fast => self.fast_window,
        };
        self.state = CoalescerState::Pending {
            deadline: now + window,
            kind,
        };
    }

    pub fn state(&self) -> CoalescerState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, CoalescerState::Pending { .. })
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            CoalescerState::Pending { deadline, .. } => Some(deadline),
            CoalescerState::Idle => None,
        }
    }

    /// Returns the pending refresh if its deadline has passed, and goes idle.
    pub fn fire(&mut self, now: Instant) -> Option<RefreshKind> {
        match self.state {
            CoalescerState::Pending { deadline, kind } if deadline <= now => {
                self.state = CoalescerState::Idle;
                self.fired += 1;
                Some(kind)
            }
            _ => None,
        }
    }

    /// Drops any pending refresh without firing it.
    pub fn cancel(&mut self) {
        self.state = CoalescerState::Idle;
    }

    /// Number of refreshes fired so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}
