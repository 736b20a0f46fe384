//! Entity-state controller for an administrative REST console.
//!
//! Every resource (dictionaries, medical brands, services, clinic
//! specializations, food catalog, tasks) is driven by the same generic
//! controller: a pure reducer over [`entity::EntityState`], an action set
//! that turns REST calls into intents, a reference-list fan-out loader and
//! a confirm-delete sub-state, all owned by one [`context::EntityContext`]
//! per resource.

pub mod client;
pub mod config;
pub mod context;
pub mod entity;
pub mod logging;
pub mod mvi;
pub mod resources;
pub mod store;
