//! State of one entity collection plus its single-record edit state.

use crate::mvi::UiState;

use super::record::{Record, RecordId};

/// Confirm-delete sub-state.
///
/// `Pending` always carries the id, so an open dialog without a target
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfirmDelete {
    #[default]
    Idle,
    Pending(RecordId),
}

impl ConfirmDelete {
    pub fn modal_open(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    pub fn id_to_delete(&self) -> Option<&RecordId> {
        match self {
            Self::Pending(id) => Some(id),
            Self::Idle => None,
        }
    }
}

/// Snapshot of one resource.
///
/// Replaced wholesale on every dispatch; only the reducer builds new values.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<T> {
    /// Current page, in server order.
    pub rows: Vec<T>,
    /// Total rows matching the current filter on the server.
    pub total_count: u64,
    /// Record loaded for view/edit.
    pub current: Option<T>,
    /// List request in flight.
    pub loading: bool,
    /// Single-record fetch in flight.
    pub find_loading: bool,
    /// Create, update or delete in flight.
    pub save_loading: bool,
    /// Number of writes started and not yet settled.
    pub pending_writes: u32,
    pub error_message: Option<String>,
    pub confirm: ConfirmDelete,
    /// Sequence number of the newest list request issued.
    pub list_seq: u64,
    /// Sequence number of the newest find request issued.
    pub find_seq: u64,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
            current: None,
            loading: false,
            find_loading: false,
            save_loading: false,
            pending_writes: 0,
            error_message: None,
            confirm: ConfirmDelete::Idle,
            list_seq: 0,
            find_seq: 0,
        }
    }
}

impl<T: Record> UiState for EntityState<T> {}

impl<T> EntityState<T> {
    pub fn modal_open(&self) -> bool {
        self.confirm.modal_open()
    }

    pub fn id_to_delete(&self) -> Option<&RecordId> {
        self.confirm.id_to_delete()
    }

    /// True while any request of any kind is in flight.
    pub fn is_busy(&self) -> bool {
        self.loading || self.find_loading || self.save_loading
    }
}
