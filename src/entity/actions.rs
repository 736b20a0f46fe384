//! Asynchronous operations bound to one REST resource.
//!
//! Every operation dispatches its *started* intent before it returns and
//! spawns the request onto the runtime, so the *settled* intent is
//! dispatched even if the caller drops the returned future (a timeout, a
//! `select!` branch, fire-and-forget). Awaiting the future yields the
//! request's result. Failures are always turned into an error intent
//! carrying [`ApiError::user_message`].
//!
//! Operations must be called from within a Tokio runtime.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::{ApiError, RestClient};
use crate::config::ResourceConfig;
use crate::store::Dispatcher;

use super::intent::EntityIntent;
use super::query::{ListPage, ListQuery};
use super::record::{Record, RecordId};

/// Operation set for one resource (`path` + `id_field`).
///
/// List and find requests are numbered from counters shared by clones, so
/// one context must use one `EntityActions` (or clones of it) for the
/// stale-response guard to hold.
pub struct EntityActions<T> {
    client: RestClient,
    path: Arc<str>,
    id_field: Arc<str>,
    list_seq: Arc<AtomicU64>,
    find_seq: Arc<AtomicU64>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityActions<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: Arc::clone(&self.path),
            id_field: Arc::clone(&self.id_field),
            list_seq: Arc::clone(&self.list_seq),
            find_seq: Arc::clone(&self.find_seq),
            _record: PhantomData,
        }
    }
}

impl<T: Record> EntityActions<T> {
    pub fn new(client: RestClient, resource: &ResourceConfig) -> Self {
        Self {
            client,
            path: Arc::from(resource.path.as_str()),
            id_field: Arc::from(resource.id_field.as_str()),
            list_seq: Arc::new(AtomicU64::new(0)),
            find_seq: Arc::new(AtomicU64::new(0)),
            _record: PhantomData,
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Load one page of the list.
    ///
    /// A zero `limit` is rejected with `ListFetchError` without any request.
    pub fn fetch<D>(
        &self,
        sink: &D,
        query: ListQuery,
    ) -> impl Future<Output = Result<ListPage<T>, ApiError>> + Send + 'static
    where
        D: Dispatcher<EntityIntent<T>> + Clone + 'static,
    {
        let seq = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        sink.dispatch(EntityIntent::ListFetchStarted { seq });

        let sink = sink.clone();
        let client = self.client.clone();
        let path = Arc::clone(&self.path);

        spawn_settled(async move {
            let result = match query.validate() {
                Ok(()) => list_page::<T>(&client, &path, &query).await,
                Err(reason) => Err(ApiError::InvalidQuery(reason)),
            };

            match &result {
                Ok(page) => {
                    debug!(resource = %path, seq, rows = page.rows.len(), total = page.total_count, "list loaded");
                    sink.dispatch(EntityIntent::ListFetchSuccess {
                        seq,
                        rows: page.rows.clone(),
                        total_count: page.total_count,
                    });
                }
                Err(e) => {
                    warn!(resource = %path, seq, error = %e, "list fetch failed");
                    sink.dispatch(EntityIntent::ListFetchError {
                        seq,
                        message: e.user_message(),
                    });
                }
            }
            result
        })
    }

    /// Load one record into `current`.
    pub fn find<D>(
        &self,
        sink: &D,
        id: RecordId,
    ) -> impl Future<Output = Result<T, ApiError>> + Send + 'static
    where
        D: Dispatcher<EntityIntent<T>> + Clone + 'static,
    {
        let seq = self.find_seq.fetch_add(1, Ordering::SeqCst) + 1;
        sink.dispatch(EntityIntent::FindStarted { seq });

        let sink = sink.clone();
        let client = self.client.clone();
        let path = Arc::clone(&self.path);

        spawn_settled(async move {
            let result = async {
                let url = client.url(&path, &[id.to_string().as_str()])?;
                client.get::<T, ()>(url, None).await
            }
            .await;

            match &result {
                Ok(record) => sink.dispatch(EntityIntent::FindSuccess {
                    seq,
                    current: record.clone(),
                }),
                Err(e) => {
                    warn!(resource = %path, %id, error = %e, "find failed");
                    sink.dispatch(EntityIntent::FindError {
                        seq,
                        message: e.user_message(),
                    });
                }
            }
            result
        })
    }

    /// `POST` a new record. The server assigns the id.
    pub fn create<D, P, S, E>(
        &self,
        sink: &D,
        payload: P,
        on_success: S,
        on_error: E,
    ) -> impl Future<Output = Result<T, ApiError>> + Send + 'static
    where
        D: Dispatcher<EntityIntent<T>> + Clone + 'static,
        P: Serialize + Send + Sync + 'static,
        S: FnOnce(&T) + Send + 'static,
        E: FnOnce(&str) + Send + 'static,
    {
        sink.dispatch(EntityIntent::SaveStarted);

        let sink = sink.clone();
        let client = self.client.clone();
        let path = Arc::clone(&self.path);

        spawn_settled(async move {
            let result = async {
                let url = client.url(&path, &[])?;
                client.send_json::<T, P>(Method::POST, url, &payload).await
            }
            .await;

            settle_save(&sink, &path, "created", result, on_success, on_error)
        })
    }

    /// `PUT` the full record at `id`.
    pub fn update<D, P, S, E>(
        &self,
        sink: &D,
        id: RecordId,
        payload: P,
        on_success: S,
        on_error: E,
    ) -> impl Future<Output = Result<T, ApiError>> + Send + 'static
    where
        D: Dispatcher<EntityIntent<T>> + Clone + 'static,
        P: Serialize + Send + Sync + 'static,
        S: FnOnce(&T) + Send + 'static,
        E: FnOnce(&str) + Send + 'static,
    {
        sink.dispatch(EntityIntent::SaveStarted);

        let sink = sink.clone();
        let client = self.client.clone();
        let path = Arc::clone(&self.path);

        spawn_settled(async move {
            let result = async {
                let url = client.url(&path, &[id.to_string().as_str()])?;
                client.send_json::<T, P>(Method::PUT, url, &payload).await
            }
            .await;

            settle_save(&sink, &path, "updated", result, on_success, on_error)
        })
    }

    /// Delete the record at `id` and drop it from the loaded page on success.
    pub fn delete<D>(
        &self,
        sink: &D,
        id: RecordId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send + 'static
    where
        D: Dispatcher<EntityIntent<T>> + Clone + 'static,
    {
        sink.dispatch(EntityIntent::DeleteStarted);

        let sink = sink.clone();
        let client = self.client.clone();
        let path = Arc::clone(&self.path);
        let id_field = Arc::clone(&self.id_field);

        spawn_settled(async move {
            let result = async {
                let url = client.url(&path, &[id.to_string().as_str()])?;
                client.delete(url).await
            }
            .await;

            match &result {
                Ok(()) => {
                    info!(resource = %path, %id, "record deleted");
                    sink.dispatch(EntityIntent::DeleteSuccess { id, id_field });
                }
                Err(e) => {
                    warn!(resource = %path, %id, error = %e, "delete failed");
                    sink.dispatch(EntityIntent::DeleteError {
                        message: e.user_message(),
                    });
                }
            }
            result
        })
    }

    pub fn open_confirm<D>(&self, sink: &D, id: RecordId)
    where
        D: Dispatcher<EntityIntent<T>>,
    {
        sink.dispatch(EntityIntent::OpenConfirm { id });
    }

    pub fn close_confirm<D>(&self, sink: &D)
    where
        D: Dispatcher<EntityIntent<T>>,
    {
        sink.dispatch(EntityIntent::CloseConfirm);
    }
}

/// Run `work` as its own task and return a future for its result.
///
/// The task keeps running when the returned future is dropped.
pub(crate) fn spawn_settled<R>(
    work: impl Future<Output = Result<R, ApiError>> + Send + 'static,
) -> impl Future<Output = Result<R, ApiError>> + Send + 'static
where
    R: Send + 'static,
{
    let handle = tokio::spawn(work);
    async move { handle.await.unwrap_or_else(|e| Err(ApiError::Task(e))) }
}

async fn list_page<T: Record>(
    client: &RestClient,
    path: &str,
    query: &ListQuery,
) -> Result<ListPage<T>, ApiError> {
    let url = client.url(path, &[])?;
    client.get(url, Some(query)).await
}

fn settle_save<T, D, S, E>(
    sink: &D,
    path: &str,
    verb: &str,
    result: Result<T, ApiError>,
    on_success: S,
    on_error: E,
) -> Result<T, ApiError>
where
    T: Record,
    D: Dispatcher<EntityIntent<T>>,
    S: FnOnce(&T),
    E: FnOnce(&str),
{
    match &result {
        Ok(record) => {
            info!(resource = %path, verb, "record saved");
            sink.dispatch(EntityIntent::SaveSuccess {
                current: record.clone(),
            });
            on_success(record);
        }
        Err(e) => {
            let message = e.user_message();
            warn!(resource = %path, verb, error = %e, "save failed");
            sink.dispatch(EntityIntent::SaveError {
                message: message.clone(),
            });
            on_error(&message);
        }
    }
    result
}
