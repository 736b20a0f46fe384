//! Base trait for state snapshots.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data a view needs to render)
/// - Comparable (PartialEq, so subscribers are only woken on real changes)
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}
