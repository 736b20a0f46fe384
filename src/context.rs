//! Per-resource context: one store plus the operations bound to it.
//!
//! A context combines three state slices:
//! - `entity`: the generic list/edit state
//! - `refs`: lookup tables, kept apart so they never collide with `rows`
//! - `ext`: fields owned by a resource-specific extension reducer
//!
//! Intents are routed extension first, then references, then the generic
//! reducer. Resources without extra behaviour use [`NoExtension`].

use std::convert::Infallible;
use std::future::Future;
use std::marker::PhantomData;

use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;

use crate::client::{ApiError, RestClient};
use crate::config::ResourceConfig;
use crate::entity::{
    EntityActions, EntityIntent, EntityReducer, EntityState, ListPage, ListQuery, Record,
    RecordId, ReferenceIntent, ReferenceLoader, ReferenceReducer, ReferenceState,
    ReferenceUrls, References,
};
use crate::mvi::{Intent, Reducer, UiState};
use crate::store::Store;

impl UiState for () {}

impl Intent for Infallible {}

/// Extension for resources that only need the generic behaviour.
pub struct NoExtension;

impl Reducer for NoExtension {
    type State = ();
    type Intent = Infallible;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {}
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T, S> {
    pub entity: EntityState<T>,
    pub refs: ReferenceState,
    pub ext: S,
}

impl<T, S: Default> Default for ResourceState<T, S> {
    fn default() -> Self {
        Self {
            entity: EntityState::default(),
            refs: ReferenceState::default(),
            ext: S::default(),
        }
    }
}

impl<T: Record, S: UiState> UiState for ResourceState<T, S> {}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceIntent<T, E> {
    Entity(EntityIntent<T>),
    References(ReferenceIntent),
    Extension(E),
}

impl<T, E> From<EntityIntent<T>> for ResourceIntent<T, E> {
    fn from(intent: EntityIntent<T>) -> Self {
        ResourceIntent::Entity(intent)
    }
}

impl<T, E> From<ReferenceIntent> for ResourceIntent<T, E> {
    fn from(intent: ReferenceIntent) -> Self {
        ResourceIntent::References(intent)
    }
}

impl<T: Record, E: Intent> Intent for ResourceIntent<T, E> {}

/// Routes each intent to the slice that owns it.
pub struct ResourceReducer<T, X>(PhantomData<fn() -> (T, X)>);

impl<T: Record, X: Reducer> Reducer for ResourceReducer<T, X> {
    type State = ResourceState<T, X::State>;
    type Intent = ResourceIntent<T, X::Intent>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ResourceIntent::Extension(intent) => ResourceState {
                ext: X::reduce(state.ext, intent),
                ..state
            },
            ResourceIntent::References(intent) => ResourceState {
                refs: ReferenceReducer::reduce(state.refs, intent),
                ..state
            },
            ResourceIntent::Entity(intent) => ResourceState {
                entity: EntityReducer::reduce(state.entity, intent),
                ..state
            },
        }
    }
}

/// The provider a view layer talks to for one resource.
///
/// Dropping every clone discards the state.
pub struct EntityContext<T: Record, X: Reducer + 'static = NoExtension> {
    store: Store<ResourceReducer<T, X>>,
    actions: EntityActions<T>,
    references: ReferenceLoader,
    reference_urls: ReferenceUrls,
}

impl<T: Record, X: Reducer + 'static> Clone for EntityContext<T, X> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            actions: self.actions.clone(),
            references: self.references.clone(),
            reference_urls: self.reference_urls.clone(),
        }
    }
}

impl<T: Record, X: Reducer + 'static> EntityContext<T, X> {
    pub fn new(client: RestClient, resource: &ResourceConfig) -> Self {
        Self {
            store: Store::default(),
            actions: EntityActions::new(client.clone(), resource),
            references: ReferenceLoader::new(client),
            reference_urls: resource.references.clone(),
        }
    }

    pub fn state(&self) -> ResourceState<T, X::State> {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T, X::State>> {
        self.store.subscribe()
    }

    /// Raw sink for local intents (set current, open/close confirm, ...).
    pub fn dispatch(&self, intent: impl Into<ResourceIntent<T, X::Intent>>) {
        self.store.dispatch(intent);
    }

    pub fn dispatch_extension(&self, intent: X::Intent) {
        self.store.dispatch(ResourceIntent::Extension(intent));
    }

    pub fn store(&self) -> &Store<ResourceReducer<T, X>> {
        &self.store
    }

    pub fn actions(&self) -> &EntityActions<T> {
        &self.actions
    }

    pub fn reference_urls(&self) -> &ReferenceUrls {
        &self.reference_urls
    }

    pub fn fetch(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = Result<ListPage<T>, ApiError>> + Send + 'static {
        self.actions.fetch(&self.store, query)
    }

    pub fn find(&self, id: RecordId) -> impl Future<Output = Result<T, ApiError>> + Send + 'static {
        self.actions.find(&self.store, id)
    }

    pub fn create<P, S, E>(
        &self,
        payload: P,
        on_success: S,
        on_error: E,
    ) -> impl Future<Output = Result<T, ApiError>> + Send + 'static
    where
        P: Serialize + Send + Sync + 'static,
        S: FnOnce(&T) + Send + 'static,
        E: FnOnce(&str) + Send + 'static,
    {
        self.actions
            .create(&self.store, payload, on_success, on_error)
    }

    pub fn update<P, S, E>(
        &self,
        id: RecordId,
        payload: P,
        on_success: S,
        on_error: E,
    ) -> impl Future<Output = Result<T, ApiError>> + Send + 'static
    where
        P: Serialize + Send + Sync + 'static,
        S: FnOnce(&T) + Send + 'static,
        E: FnOnce(&str) + Send + 'static,
    {
        self.actions
            .update(&self.store, id, payload, on_success, on_error)
    }

    pub fn delete(&self, id: RecordId) -> impl Future<Output = Result<(), ApiError>> + Send + 'static {
        self.actions.delete(&self.store, id)
    }

    pub fn open_confirm(&self, id: RecordId) {
        self.actions.open_confirm(&self.store, id);
    }

    pub fn close_confirm(&self) {
        self.actions.close_confirm(&self.store);
    }

    /// Delete the record awaiting confirmation.
    ///
    /// Returns `None` without touching state when no delete is pending.
    pub fn delete_confirmed(
        &self,
    ) -> Option<impl Future<Output = Result<(), ApiError>> + Send + 'static> {
        let pending = self.state().entity.id_to_delete().cloned();
        match pending {
            Some(id) => Some(self.delete(id)),
            None => {
                warn!(resource = %self.actions.path(), "delete requested with no pending confirmation");
                None
            }
        }
    }

    /// Load the configured lookup tables into the `refs` slice.
    pub fn load_references(
        &self,
    ) -> impl Future<Output = Result<References, ApiError>> + Send + 'static {
        self.load_references_from(self.reference_urls.clone())
    }

    /// Load a caller-chosen set of lookup tables, e.g. a reduced key set
    /// after a failed full load.
    pub fn load_references_from(
        &self,
        urls: ReferenceUrls,
    ) -> impl Future<Output = Result<References, ApiError>> + Send + 'static {
        self.references.load(&self.store, urls)
    }
}
