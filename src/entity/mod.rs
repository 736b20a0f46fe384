//! Generic entity-state controller.
//!
//! One implementation of list paging, single-record fetch/save/delete,
//! the confirm-delete sub-state and reference-list fan-out, instantiated
//! per resource by [`crate::context::EntityContext`].

mod actions;
mod intent;
mod query;
mod record;
mod reducer;
mod references;
mod state;

pub use actions::EntityActions;
pub(crate) use actions::spawn_settled;
pub use intent::EntityIntent;
pub use query::{ListPage, ListQuery, SortOrder};
pub use record::{Record, RecordId};
pub use reducer::EntityReducer;
pub use references::{
    ReferenceIntent, ReferenceItem, ReferenceLoader, ReferenceReducer, ReferenceState,
    ReferenceUrls, References,
};
pub use state::{ConfirmDelete, EntityState};
