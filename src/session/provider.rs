//! Session provider: owns the current [`SessionState`], settles it from an
//! opaque resolution future and notifies subscribers synchronously on every
//! change.
//!
//! Handles are cheap `Rc` clones meant for a single-threaded UI loop. A state
//! published from inside a subscriber callback is queued and delivered after
//! the current delivery finishes, so every subscriber sees every change in the
//! order it was published.

use crate::error::SessionError;
use crate::session::state::{SessionState, Subject};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::{Rc, Weak};
use tracing::debug;

type Listener = Box<dyn FnMut(&SessionState)>;

#[derive(Default)]
struct Inner {
    state: SessionState,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
    pending: VecDeque<SessionState>,
    dispatching: bool,
    // Listeners moved out of `listeners` for the delivery in progress.
    checked_out: usize,
    // Ids dropped while their listener was checked out for delivery.
    removed: Vec<u64>,
}

impl Inner {
    fn subscriber_count(&self) -> usize {
        self.listeners.len() + self.checked_out - self.removed.len()
    }
}

/// Shared handle to the authentication state of one application instance.
#[derive(Clone, Default)]
pub struct SessionProvider {
    inner: Rc<RefCell<Inner>>,
}

impl std::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SessionProvider")
            .field("state", &inner.state)
            .field("subscribers", &inner.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl SessionProvider {
    /// Creates a provider whose session is still being resolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.borrow().state.clone()
    }

    /// Live subscriptions, including those whose listener is running right now.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscriber_count()
    }

    /// Registers `listener` for every subsequent state change. Delivery stops
    /// when the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&SessionState) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));

        Subscription {
            provider: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Calls `listener` with the current state, then subscribes it.
    ///
    /// States published while the first call runs are queued like any other
    /// re-entrant publish, so `listener` still sees them once subscribed.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn watch(&self, mut listener: impl FnMut(&SessionState) + 'static) -> Subscription {
        let dispatch = Dispatch::begin(&self.inner);
        let current = self.state();
        listener(&current);
        let subscription = self.subscribe(listener);
        if let Some(dispatch) = dispatch {
            dispatch.run();
        }
        subscription
    }

    /// Marks the session as authenticated for `subject`, typically after login.
    pub fn authenticate(&self, subject: Subject) {
        self.publish(SessionState::Authenticated(subject));
    }

    /// Marks the session as unauthenticated, typically on logout or expiry.
    pub fn sign_out(&self) {
        self.publish(SessionState::Unauthenticated);
    }

    /// Puts the session back into `Unknown` so resolution can start over.
    /// This is the only way back into `Unknown` once the session settled.
    pub fn invalidate(&self) {
        self.publish(SessionState::Unknown);
    }

    /// Awaits `resolution` and settles the session from its result.
    ///
    /// `Ok(Some(subject))` authenticates, `Ok(None)` and every error settle as
    /// unauthenticated so a failed resolution never leaves the session in
    /// `Unknown`.
    pub async fn resolve<F>(&self, resolution: F) -> SessionState
    where
        F: Future<Output = Result<Option<Subject>, SessionError>>,
    {
        self.publish(SessionState::settle(resolution.await));
        self.state()
    }

    /// [`invalidate`](Self::invalidate) followed by [`resolve`](Self::resolve).
    pub async fn refresh<F>(&self, resolution: F) -> SessionState
    where
        F: Future<Output = Result<Option<Subject>, SessionError>>,
    {
        self.invalidate();
        self.resolve(resolution).await
    }

    fn publish(&self, next: SessionState) {
        self.inner.borrow_mut().pending.push_back(next);
        if let Some(dispatch) = Dispatch::begin(&self.inner) {
            dispatch.run();
        }
    }
}

/// One delivery loop. Dropping it, also while unwinding from a panicking
/// listener, hands the checked-out listeners back and clears `dispatching`.
struct Dispatch<'a> {
    inner: &'a RefCell<Inner>,
    listeners: Vec<(u64, Listener)>,
}

impl<'a> Dispatch<'a> {
    /// `None` when a delivery is already running; it drains the queue.
    fn begin(inner: &'a RefCell<Inner>) -> Option<Self> {
        let mut guard = inner.borrow_mut();
        if guard.dispatching {
            return None;
        }
        guard.dispatching = true;
        Some(Self {
            inner,
            listeners: Vec::new(),
        })
    }

    fn run(mut self) {
        loop {
            let state = {
                let mut inner = self.inner.borrow_mut();
                let Some(next) = inner.pending.pop_front() else {
                    break;
                };
                if next == inner.state {
                    continue;
                }
                let previous = std::mem::replace(&mut inner.state, next.clone());
                debug!(
                    from = previous.label(),
                    to = next.label(),
                    subscribers = inner.subscriber_count(),
                    "session state changed"
                );
                self.listeners = std::mem::take(&mut inner.listeners);
                inner.checked_out = self.listeners.len();
                next
            };

            // Listeners run without a borrow held so they may read the state,
            // publish, subscribe or unsubscribe.
            for (id, listener) in &mut self.listeners {
                if self.inner.borrow().removed.contains(id) {
                    continue;
                }
                listener(&state);
            }

            drop(self.check_in());
        }
    }

    /// Merges the checked-out listeners with those added meanwhile and returns
    /// the ones unsubscribed during delivery. They are dropped by the caller
    /// once the borrow is released since they may own subscriptions.
    fn check_in(&mut self) -> Vec<(u64, Listener)> {
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            return Vec::new();
        };
        let mut listeners = std::mem::take(&mut self.listeners);
        listeners.append(&mut inner.listeners);
        let removed = std::mem::take(&mut inner.removed);
        let (detached, kept) = listeners
            .into_iter()
            .partition(|(id, _)| removed.contains(id));
        inner.listeners = kept;
        inner.checked_out = 0;
        detached
    }
}

impl Drop for Dispatch<'_> {
    fn drop(&mut self) {
        let detached = self.check_in();
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.dispatching = false;
        }
        drop(detached);
    }
}

/// Guard returned by [`SessionProvider::subscribe`]; unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    provider: Weak<RefCell<Inner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.provider.upgrade() else {
            return;
        };
        let detached = {
            let mut inner = inner.borrow_mut();
            let position = inner.listeners.iter().position(|(id, _)| *id == self.id);
            if let Some(index) = position {
                Some(inner.listeners.remove(index))
            } else {
                // Checked out for the delivery in progress.
                if inner.dispatching && !inner.removed.contains(&self.id) {
                    inner.removed.push(self.id);
                }
                None
            }
        };
        drop(detached);
    }
}
