//! State container that serializes every mutation through one dispatch path.
//!
//! The current state lives inside a `tokio::sync::watch` sender. `dispatch`
//! runs the reducer while holding the channel's write lock, so concurrent
//! dispatches from interleaved requests are applied one at a time, and
//! subscribers are only woken when the reducer actually produced a
//! different state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use crate::mvi::Reducer;

/// Sink that actions dispatch intents into.
pub trait Dispatcher<I>: Send + Sync {
    fn dispatch(&self, intent: I);
}

/// Owner of one state value.
pub struct Store<R: Reducer> {
    tx: Arc<watch::Sender<R::State>>,
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> R::State {
        self.tx.borrow().clone()
    }

    /// Receiver that is marked changed after every effective dispatch.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.tx.subscribe()
    }

    pub fn dispatch(&self, intent: impl Into<R::Intent>) {
        let intent = intent.into();
        trace!(?intent, "dispatch");
        self.tx.send_if_modified(|state| {
            let next = R::reduce(state.clone(), intent);
            if next == *state {
                return false;
            }
            *state = next;
            true
        });
    }
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::State::default())
    }
}

impl<R, I> Dispatcher<I> for Store<R>
where
    R: Reducer,
    I: Into<R::Intent> + Send,
{
    fn dispatch(&self, intent: I) {
        Store::dispatch(self, intent);
    }
}
