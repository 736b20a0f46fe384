//! Base trait for intents (local actions and settled requests).

use std::fmt::Debug;

/// Marker trait for intent objects.
///
/// Intents represent:
/// - Request lifecycle events (started, succeeded, failed)
/// - Local view actions (open/close confirm, set current record)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Debug + Send + 'static {}
