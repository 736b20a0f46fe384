//! Service endpoints, with an on-demand health check and metrics lookup.
//!
//! Both extra operations keep their own loading flags and error in the
//! extension slice, so a check never disturbs the list or the edit form.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::client::ApiError;
use crate::context::EntityContext;
use crate::entity::{spawn_settled, Record, RecordId};
use crate::mvi::{Intent, Reducer, UiState};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Service {}

/// Result of `GET <path>/<id>/check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCheck {
    pub status: String,
    #[serde(default)]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceCheck {
    pub fn is_up(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "up" | "ok" | "healthy")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceIntent {
    CheckStarted,
    CheckSuccess(ServiceCheck),
    CheckError { message: String },
    MetricsStarted,
    MetricsSuccess(Value),
    MetricsError { message: String },
}

impl Intent for ServiceIntent {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceState {
    pub check_loading: bool,
    pub check: Option<ServiceCheck>,
    pub metrics_loading: bool,
    pub metrics: Option<Value>,
    pub error_message: Option<String>,
}

impl UiState for ServiceState {}

pub struct ServiceReducer;

impl Reducer for ServiceReducer {
    type State = ServiceState;
    type Intent = ServiceIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ServiceIntent::CheckStarted => ServiceState {
                check_loading: true,
                check: None,
                error_message: None,
                ..state
            },
            ServiceIntent::CheckSuccess(check) => ServiceState {
                check_loading: false,
                check: Some(check),
                ..state
            },
            ServiceIntent::CheckError { message } => ServiceState {
                check_loading: false,
                error_message: Some(message),
                ..state
            },
            ServiceIntent::MetricsStarted => ServiceState {
                metrics_loading: true,
                error_message: None,
                ..state
            },
            ServiceIntent::MetricsSuccess(metrics) => ServiceState {
                metrics_loading: false,
                metrics: Some(metrics),
                ..state
            },
            ServiceIntent::MetricsError { message } => ServiceState {
                metrics_loading: false,
                metrics: None,
                error_message: Some(message),
                ..state
            },
        }
    }
}

pub type ServiceContext = EntityContext<Service, ServiceReducer>;

impl<T: Record> EntityContext<T, ServiceReducer> {
    /// Ask the backend to probe the service at `id`.
    pub fn check(
        &self,
        id: RecordId,
    ) -> impl Future<Output = Result<ServiceCheck, ApiError>> + Send + 'static {
        self.dispatch_extension(ServiceIntent::CheckStarted);

        let context = self.clone();
        let client = self.actions().client().clone();
        let path = self.actions().path().to_string();

        spawn_settled(async move {
            let id_segment = id.to_string();
            let result = async {
                let url = client.url(&path, &[id_segment.as_str(), "check"])?;
                client.get::<ServiceCheck, ()>(url, None).await
            }
            .await;

            match &result {
                Ok(check) => context.dispatch_extension(ServiceIntent::CheckSuccess(check.clone())),
                Err(e) => {
                    warn!(%id, error = %e, "service check failed");
                    context.dispatch_extension(ServiceIntent::CheckError {
                        message: e.user_message(),
                    });
                }
            }
            result
        })
    }

    /// Load the metrics document of the service at `id`.
    pub fn metrics(&self, id: RecordId) -> impl Future<Output = Result<Value, ApiError>> + Send + 'static {
        self.dispatch_extension(ServiceIntent::MetricsStarted);

        let context = self.clone();
        let client = self.actions().client().clone();
        let path = self.actions().path().to_string();

        spawn_settled(async move {
            let id_segment = id.to_string();
            let result = async {
                let url = client.url(&path, &[id_segment.as_str(), "metrics"])?;
                client.get::<Value, ()>(url, None).await
            }
            .await;

            match &result {
                Ok(metrics) => {
                    context.dispatch_extension(ServiceIntent::MetricsSuccess(metrics.clone()))
                }
                Err(e) => {
                    warn!(%id, error = %e, "service metrics failed");
                    context.dispatch_extension(ServiceIntent::MetricsError {
                        message: e.user_message(),
                    });
                }
            }
            result
        })
    }
}
