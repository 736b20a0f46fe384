//! Reducer for the generic entity state.

use std::marker::PhantomData;

use crate::mvi::Reducer;

use super::intent::EntityIntent;
use super::record::Record;
use super::state::{ConfirmDelete, EntityState};

/// Pure transition function shared by every resource.
///
/// Each intent touches only the fields its operation kind owns: list intents
/// never touch `current`, find/save intents never touch `rows`, and each
/// kind flips only its own loading flag. Writes are counted, so
/// `save_loading` stays set until the last overlapping create, update or
/// delete settles.
pub struct EntityReducer<T>(PhantomData<T>);

impl<T: Record> Reducer for EntityReducer<T> {
    type State = EntityState<T>;
    type Intent = EntityIntent<T>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            EntityIntent::ListFetchStarted { seq } => EntityState {
                loading: true,
                error_message: None,
                list_seq: state.list_seq.max(seq),
                ..state
            },
            EntityIntent::ListFetchSuccess {
                seq,
                rows,
                total_count,
            } => {
                if seq < state.list_seq {
                    return state;
                }
                EntityState {
                    loading: false,
                    rows,
                    total_count,
                    ..state
                }
            }
            EntityIntent::ListFetchError { seq, message } => {
                if seq < state.list_seq {
                    return state;
                }
                // Previous rows stay visible.
                EntityState {
                    loading: false,
                    error_message: Some(message),
                    ..state
                }
            }

            EntityIntent::FindStarted { seq } => EntityState {
                find_loading: true,
                error_message: None,
                find_seq: state.find_seq.max(seq),
                ..state
            },
            EntityIntent::FindSuccess { seq, current } => {
                if seq < state.find_seq {
                    return state;
                }
                EntityState {
                    find_loading: false,
                    current: Some(current),
                    ..state
                }
            }
            EntityIntent::FindError { seq, message } => {
                if seq < state.find_seq {
                    return state;
                }
                EntityState {
                    find_loading: false,
                    current: None,
                    error_message: Some(message),
                    ..state
                }
            }

            EntityIntent::SaveStarted | EntityIntent::DeleteStarted => EntityState {
                pending_writes: state.pending_writes + 1,
                save_loading: true,
                error_message: None,
                ..state
            },
            EntityIntent::SaveSuccess { current } => {
                let pending_writes = state.pending_writes.saturating_sub(1);
                EntityState {
                    pending_writes,
                    save_loading: pending_writes > 0,
                    current: Some(current),
                    ..state
                }
            }
            // The edit record is kept so the form can be corrected and resubmitted.
            EntityIntent::SaveError { message } | EntityIntent::DeleteError { message } => {
                let pending_writes = state.pending_writes.saturating_sub(1);
                EntityState {
                    pending_writes,
                    save_loading: pending_writes > 0,
                    error_message: Some(message),
                    ..state
                }
            }
            EntityIntent::DeleteSuccess { id, id_field } => {
                let mut next = state;
                let before = next.rows.len();
                next.rows
                    .retain(|row| row.record_id(&id_field).as_ref() != Some(&id));
                let removed = (before - next.rows.len()) as u64;
                next.total_count = next.total_count.saturating_sub(removed);
                next.pending_writes = next.pending_writes.saturating_sub(1);
                next.save_loading = next.pending_writes > 0;
                // A dialog opened for another record meanwhile stays open.
                if next.confirm.id_to_delete() == Some(&id) {
                    next.confirm = ConfirmDelete::Idle;
                }
                next
            }

            EntityIntent::OpenConfirm { id } => EntityState {
                confirm: ConfirmDelete::Pending(id),
                ..state
            },
            EntityIntent::CloseConfirm => EntityState {
                confirm: ConfirmDelete::Idle,
                ..state
            },

            EntityIntent::SetCurrent(current) => EntityState { current, ..state },
        }
    }
}
