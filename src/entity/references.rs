//! Lookup tables loaded in one fan-out.
//!
//! All URLs are requested concurrently and the outcome is reported as a
//! unit: one `Success` carrying every list, or one `Error`. Reference data
//! lives in its own state slice so a reference load never races with the
//! list rows.

use std::collections::BTreeMap;
use std::future::Future;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{ApiError, RestClient};
use crate::mvi::{Intent, Reducer, UiState};
use crate::store::Dispatcher;

use super::actions::spawn_settled;
use super::record::RecordId;

/// Logical key -> URL.
pub type ReferenceUrls = BTreeMap<String, String>;

/// Loaded lookup tables, keyed like the request map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct References(BTreeMap<String, Value>);

impl References {
    pub fn new(lists: BTreeMap<String, Value>) -> Self {
        Self(lists)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Decode a list as `[{id, name}]`.
    ///
    /// `None` when the key is missing or the body has another shape.
    pub fn items(&self, key: &str) -> Option<Vec<ReferenceItem>> {
        let value = self.0.get(key)?;
        Vec::<ReferenceItem>::deserialize(value).ok()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The common `{id, name}` shape of lookup rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceIntent {
    Started,
    Success(References),
    Error { message: String },
}

impl Intent for ReferenceIntent {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceState {
    pub lists: References,
    pub loading: bool,
    pub error_message: Option<String>,
}

impl UiState for ReferenceState {}

pub struct ReferenceReducer;

impl Reducer for ReferenceReducer {
    type State = ReferenceState;
    type Intent = ReferenceIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ReferenceIntent::Started => ReferenceState {
                loading: true,
                error_message: None,
                ..state
            },
            ReferenceIntent::Success(lists) => ReferenceState {
                lists,
                loading: false,
                error_message: None,
            },
            // Previously loaded lists stay usable.
            ReferenceIntent::Error { message } => ReferenceState {
                loading: false,
                error_message: Some(message),
                ..state
            },
        }
    }
}

/// Fan-out/fan-in loader for lookup tables.
#[derive(Debug, Clone)]
pub struct ReferenceLoader {
    client: RestClient,
}

impl ReferenceLoader {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Request every URL concurrently and wait for all of them to settle.
    ///
    /// Dispatches `Started`, then exactly one of `Success` (every request
    /// succeeded) or `Error` (any failed; the message comes from the first
    /// failing key in key order). An empty map succeeds with no lists.
    pub fn load<D>(
        &self,
        sink: &D,
        urls: ReferenceUrls,
    ) -> impl Future<Output = Result<References, ApiError>> + Send + 'static
    where
        D: Dispatcher<ReferenceIntent> + Clone + 'static,
    {
        sink.dispatch(ReferenceIntent::Started);

        let sink = sink.clone();
        let client = self.client.clone();

        spawn_settled(async move {
            let result = fetch_all(&client, urls).await;
            match &result {
                Ok(lists) => {
                    debug!(lists = lists.len(), "reference lists loaded");
                    sink.dispatch(ReferenceIntent::Success(lists.clone()));
                }
                Err(e) => sink.dispatch(ReferenceIntent::Error {
                    message: e.user_message(),
                }),
            }
            result
        })
    }
}

async fn fetch_all(client: &RestClient, urls: ReferenceUrls) -> Result<References, ApiError> {
    let requests = urls.into_iter().map(|(key, url)| async move {
        let result = fetch_one(client, &url).await;
        if let Err(e) = &result {
            warn!(%key, %url, error = %e, "reference list failed");
        }
        (key, result)
    });

    let settled = join_all(requests).await;

    let mut lists = BTreeMap::new();
    for (key, result) in settled {
        lists.insert(key, result?);
    }
    Ok(References(lists))
}

async fn fetch_one(client: &RestClient, url: &str) -> Result<Value, ApiError> {
    let url = client.url(url, &[])?;
    client.get::<Value, ()>(url, None).await
}
