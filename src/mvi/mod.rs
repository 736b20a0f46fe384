//! Model-View-Intent (MVI) primitives shared by every entity context.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Intent ──→ Reducer ──→ State ──→ View
//!    ↑                                          │
//!    └──────────────────────────────────────────┘
//! ```
//!
//! - **State**: immutable snapshot of one resource (rows, current record, flags)
//! - **Intent**: the settled or started outcome of an action
//! - **Reducer**: pure function that folds an intent into the next state
//!
//! Actions perform I/O and dispatch intents; reducers never call actions.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
