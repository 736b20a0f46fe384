//! Intents owned by the generic entity reducer.

use std::sync::Arc;

use crate::mvi::Intent;

use super::record::{Record, RecordId};

/// Lifecycle events of the generic operations plus local view actions.
///
/// List and find intents carry the sequence number of the request that
/// produced them so responses to superseded requests can be discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityIntent<T> {
    ListFetchStarted {
        seq: u64,
    },
    ListFetchSuccess {
        seq: u64,
        rows: Vec<T>,
        total_count: u64,
    },
    ListFetchError {
        seq: u64,
        message: String,
    },

    FindStarted {
        seq: u64,
    },
    FindSuccess {
        seq: u64,
        current: T,
    },
    FindError {
        seq: u64,
        message: String,
    },

    SaveStarted,
    SaveSuccess {
        current: T,
    },
    SaveError {
        message: String,
    },

    DeleteStarted,
    DeleteSuccess {
        id: RecordId,
        /// Field the id was matched against when removing the row.
        id_field: Arc<str>,
    },
    DeleteError {
        message: String,
    },

    OpenConfirm {
        id: RecordId,
    },
    CloseConfirm,

    /// Raw local replacement of the edit record (e.g. "new record" forms).
    SetCurrent(Option<T>),
}

impl<T: Record> Intent for EntityIntent<T> {}
