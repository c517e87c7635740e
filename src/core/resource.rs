//! # Loadable Resources
//!
//! The `Idle → Loading → Ready | Failed` state machine shared by the list and
//! summary controllers, published through a `tokio::sync::watch` channel so
//! any number of subscribers can observe the latest snapshot.
//!
//! Every load takes a token from a [`Generation`] counter. A response is only
//! applied if its token is still the newest one issued, so a slow response
//! can never overwrite the result of a request issued after it. Retiring the
//! generation makes every outstanding response stale.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Resource::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Monotonic request tokens.
#[derive(Debug, Default)]
pub struct Generation {
    current: AtomicU64,
    retired: AtomicBool,
}

impl Generation {
    /// Issues a fresh token, invalidating all earlier ones.
    pub fn next(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        !self.retired.load(Ordering::SeqCst) && self.current.load(Ordering::SeqCst) == token
    }

    pub fn retire(&self) {
        self.retired.store(true, Ordering::SeqCst);
    }

    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::SeqCst)
    }
}

/// A watch-published [`Resource`] guarded by a [`Generation`].
pub(crate) struct ResourceCell<T> {
    state: watch::Sender<Resource<T>>,
    generation: Generation,
}

impl<T: Clone> ResourceCell<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(Resource::Idle);
        Self {
            state,
            generation: Generation::default(),
        }
    }

    /// Starts a load: issues a token and moves to `Loading` in one step.
    ///
    /// Returns `None` once retired.
    pub(crate) fn begin(&self) -> Option<u64> {
        let mut token = None;
        self.state.send_if_modified(|state| {
            if self.generation.is_retired() {
                return false;
            }
            token = Some(self.generation.next());
            *state = Resource::Loading;
            true
        });
        token
    }

    /// Applies a finished load if `token` is still current. Returns whether
    /// the state was updated.
    pub(crate) fn settle(&self, token: u64, next: Resource<T>) -> bool {
        self.state.send_if_modified(|state| {
            if !self.generation.is_current(token) {
                return false;
            }
            *state = next;
            true
        })
    }

    pub(crate) fn snapshot(&self) -> Resource<T> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Resource<T>> {
        self.state.subscribe()
    }

    pub(crate) fn retire(&self) {
        self.generation.retire();
    }
}
