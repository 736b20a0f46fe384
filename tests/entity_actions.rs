//! Entity operations against a mock REST backend.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::mock_backend::{MockBackend, MockResponse};
use common::{client_for, Recorder};
use entity_console::client::{ApiError, RestClient, FALLBACK_MESSAGE, TRANSPORT_MESSAGE};
use entity_console::config::{ApiConfig, ResourceConfig};
use entity_console::entity::{EntityActions, EntityIntent, ListQuery, RecordId, SortOrder};
use entity_console::resources::{MedicalBrand, MedicalBrandContext};
use parking_lot::Mutex;
use serde_json::{json, Value};

fn brands(ids: std::ops::RangeInclusive<i64>) -> Value {
    Value::Array(
        ids.map(|id| json!({"id": id, "name": format!("Brand {}", id), "active": true}))
            .collect(),
    )
}

fn brand(id: i64, name: &str) -> MedicalBrand {
    MedicalBrand {
        id: Some(id),
        name: name.to_string(),
        active: true,
        ..MedicalBrand::default()
    }
}

fn context(backend: &MockBackend) -> MedicalBrandContext {
    MedicalBrandContext::new(client_for(backend), &ResourceConfig::new("/medical-brands", "id"))
}

#[tokio::test]
async fn fetch_second_page_of_twenty_five() {
    let backend = MockBackend::start().await;
    backend
        .route_query(
            "GET",
            "/api/medical-brands",
            "skip=10",
            MockResponse::json(json!({"rows": brands(11..=20), "totalCount": 25})),
        )
        .await;

    let ctx = context(&backend);
    let page = ctx
        .fetch(
            ListQuery::new(10, 10)
                .filter(Some("brand"))
                .sort("name", SortOrder::Desc),
        )
        .await
        .unwrap();
    assert_eq!(page.rows.len(), 10);

    let state = ctx.state().entity;
    assert_eq!(state.rows.len(), 10);
    assert_eq!(state.rows[0].id, Some(11));
    assert_eq!(state.total_count, 25);
    assert!(!state.loading);
    assert!(state.error_message.is_none());

    let requests = backend.captured_requests().await;
    assert_eq!(requests.len(), 1);
    let query = &requests[0].query;
    assert!(query.contains("skip=10"), "query: {}", query);
    assert!(query.contains("limit=10"), "query: {}", query);
    assert!(query.contains("filter=brand"), "query: {}", query);
    assert!(query.contains("sortField=name"), "query: {}", query);
    assert!(query.contains("sortOrder=desc"), "query: {}", query);
}

#[tokio::test]
async fn slower_older_response_is_discarded() {
    let backend = MockBackend::start().await;
    backend
        .route_query(
            "GET",
            "/api/medical-brands",
            "skip=0",
            MockResponse::json(json!({"rows": brands(1..=10), "totalCount": 25})).with_delay(300),
        )
        .await;
    backend
        .route_query(
            "GET",
            "/api/medical-brands",
            "skip=10",
            MockResponse::json(json!({"rows": brands(11..=20), "totalCount": 25})),
        )
        .await;

    let ctx = context(&backend);
    let first = ctx.fetch(ListQuery::new(0, 10));
    let second = ctx.fetch(ListQuery::new(10, 10));
    let (first, second) = tokio::join!(first, second);

    // Both requests completed; only the newest one was applied.
    assert!(first.is_ok());
    assert!(second.is_ok());
    let state = ctx.state().entity;
    assert_eq!(state.rows[0].id, Some(11));
    assert!(!state.loading);
}

#[tokio::test]
async fn confirmed_delete_removes_row_without_refetch() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "GET",
            "/api/medical-brands",
            MockResponse::json(json!({"rows": brands(5..=7), "totalCount": 25})),
        )
        .await;
    backend
        .route("DELETE", "/api/medical-brands/7", MockResponse::raw(204, ""))
        .await;

    let ctx = context(&backend);
    ctx.fetch(ListQuery::new(0, 10)).await.unwrap();

    ctx.open_confirm(RecordId::from(7));
    assert!(ctx.state().entity.modal_open());

    let delete = ctx.delete_confirmed().expect("a delete is pending");
    assert!(ctx.state().entity.save_loading);
    delete.await.unwrap();

    let state = ctx.state().entity;
    let ids: Vec<_> = state.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![Some(5), Some(6)]);
    assert_eq!(state.total_count, 24);
    assert!(!state.modal_open());
    assert!(!state.save_loading);

    let requests = backend.captured_requests().await;
    let lists = requests.iter().filter(|r| r.method == "GET").count();
    assert_eq!(lists, 1);
}

#[tokio::test]
async fn delete_confirmed_without_pending_id_does_nothing() {
    let backend = MockBackend::start().await;
    let ctx = context(&backend);

    assert!(ctx.delete_confirmed().is_none());
    assert_eq!(ctx.state().entity, Default::default());
    assert!(backend.captured_requests().await.is_empty());
}

#[tokio::test]
async fn rejected_create_reports_server_message() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "POST",
            "/api/medical-brands",
            MockResponse::error(400, "Name taken"),
        )
        .await;

    let ctx = context(&backend);
    let draft = brand(0, "Acme");
    ctx.dispatch(EntityIntent::SetCurrent(Some(draft.clone())));

    let reported = Arc::new(Mutex::new(None::<String>));
    let succeeded = Arc::new(Mutex::new(false));
    let result = ctx
        .create(
            json!({"name": "Acme"}),
            {
                let succeeded = Arc::clone(&succeeded);
                move |_: &MedicalBrand| *succeeded.lock() = true
            },
            {
                let reported = Arc::clone(&reported);
                move |message: &str| *reported.lock() = Some(message.to_string())
            },
        )
        .await;

    match result {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Name taken");
        }
        other => panic!("expected a 400, got {:?}", other),
    }
    assert_eq!(reported.lock().as_deref(), Some("Name taken"));
    assert!(!*succeeded.lock());

    let state = ctx.state().entity;
    assert!(!state.save_loading);
    assert_eq!(state.error_message.as_deref(), Some("Name taken"));
    assert_eq!(state.current, Some(draft));
}

#[tokio::test]
async fn create_sends_payload_and_stores_returned_record() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "POST",
            "/api/medical-brands",
            MockResponse::json(json!({"id": 31, "name": "Acme", "active": true})),
        )
        .await;

    let ctx = context(&backend);
    let created = Arc::new(Mutex::new(None::<MedicalBrand>));
    let record = ctx
        .create(
            json!({"name": "Acme", "active": true}),
            {
                let created = Arc::clone(&created);
                move |record: &MedicalBrand| *created.lock() = Some(record.clone())
            },
            |message: &str| panic!("unexpected error: {}", message),
        )
        .await
        .unwrap();

    assert_eq!(record.id, Some(31));
    assert_eq!(created.lock().as_ref(), Some(&record));
    assert_eq!(ctx.state().entity.current, Some(record));

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].json(), json!({"name": "Acme", "active": true}));
}

#[tokio::test]
async fn update_puts_to_record_url() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "PUT",
            "/api/medical-brands/3",
            MockResponse::json(json!({"id": 3, "name": "Renamed", "active": false})),
        )
        .await;

    let ctx = context(&backend);
    let record = ctx
        .update(
            RecordId::from(3),
            brand(3, "Renamed"),
            |_: &MedicalBrand| {},
            |_: &str| {},
        )
        .await
        .unwrap();

    assert_eq!(record.name, "Renamed");
    let state = ctx.state().entity;
    assert!(!state.save_loading);
    assert_eq!(state.current.map(|c| c.name), Some("Renamed".to_string()));
}

#[tokio::test]
async fn find_then_edit_flow() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "GET",
            "/api/medical-brands/3",
            MockResponse::json(json!({"id": 3, "name": "Brand 3", "country": "DE"})),
        )
        .await;

    let ctx = context(&backend);
    let find = ctx.find(RecordId::from(3));
    assert!(ctx.state().entity.find_loading);
    let record = find.await.unwrap();

    let state = ctx.state().entity;
    assert!(!state.find_loading);
    assert_eq!(state.current, Some(record.clone()));
    assert_eq!(record.country.as_deref(), Some("DE"));

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].header("authorization"), Some("Bearer test-token"));
    assert!(requests[0].header("x-request-id").is_some());
}

#[tokio::test]
async fn failed_find_clears_current() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "GET",
            "/api/medical-brands/404",
            MockResponse::error(404, "Brand not found"),
        )
        .await;

    let ctx = context(&backend);
    ctx.dispatch(EntityIntent::SetCurrent(Some(brand(1, "Old"))));
    assert!(ctx.find(RecordId::from(404)).await.is_err());

    let state = ctx.state().entity;
    assert!(state.current.is_none());
    assert_eq!(state.error_message.as_deref(), Some("Brand not found"));
}

#[tokio::test]
async fn zero_limit_is_rejected_without_a_request() {
    let backend = MockBackend::start().await;
    let ctx = context(&backend);

    let result = ctx.fetch(ListQuery::new(0, 0)).await;
    assert!(matches!(result, Err(ApiError::InvalidQuery(_))));

    let state = ctx.state().entity;
    assert!(!state.loading);
    assert!(state.error_message.is_some());
    assert!(backend.captured_requests().await.is_empty());
}

#[tokio::test]
async fn unreadable_error_body_uses_fallback_message() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "GET",
            "/api/medical-brands",
            MockResponse::raw(502, "<html>Bad Gateway</html>"),
        )
        .await;

    let ctx = context(&backend);
    ctx.fetch(ListQuery::new(0, 10)).await.unwrap_err();
    assert_eq!(
        ctx.state().entity.error_message.as_deref(),
        Some(FALLBACK_MESSAGE)
    );
}

#[tokio::test]
async fn unreachable_server_uses_transport_message() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = RestClient::new(&ApiConfig {
        base_url: format!("http://127.0.0.1:{}/api", port),
        timeout_seconds: 2,
        connect_timeout_seconds: 1,
        token: None,
    })
    .unwrap();

    let ctx = MedicalBrandContext::new(client, &ResourceConfig::new("/medical-brands", "id"));
    let result = ctx.fetch(ListQuery::new(0, 10)).await;
    assert!(matches!(result, Err(ApiError::Transport { .. })));
    assert_eq!(
        ctx.state().entity.error_message.as_deref(),
        Some(TRANSPORT_MESSAGE)
    );
}

#[tokio::test]
async fn rejected_save_dispatches_started_then_error() {
    let backend = MockBackend::start().await;
    backend
        .route("PUT", "/api/tasks/9", MockResponse::error(409, "Task is running"))
        .await;

    let actions: EntityActions<Value> =
        EntityActions::new(client_for(&backend), &ResourceConfig::new("/tasks", "id"));
    let recorder: Recorder<EntityIntent<Value>> = Recorder::new();

    let _ = actions
        .update(
            &recorder,
            RecordId::from(9),
            json!({"enabled": false}),
            |_: &Value| {},
            |_: &str| {},
        )
        .await;

    assert_eq!(
        recorder.intents(),
        vec![
            EntityIntent::SaveStarted,
            EntityIntent::SaveError {
                message: "Task is running".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn string_ids_are_one_path_segment() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "GET",
            "/api/tasks/nightly%2Fbackup",
            MockResponse::json(json!({"id": "nightly/backup", "name": "Backup"})),
        )
        .await;

    let actions: EntityActions<Value> =
        EntityActions::new(client_for(&backend), &ResourceConfig::new("/tasks", "id"));
    let recorder: Recorder<EntityIntent<Value>> = Recorder::new();
    let record = actions
        .find(&recorder, RecordId::from("nightly/backup"))
        .await
        .unwrap();
    assert_eq!(record["name"], "Backup");
}

#[tokio::test]
async fn fetch_settles_after_caller_gives_up_waiting() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "GET",
            "/api/medical-brands",
            MockResponse::json(json!({"rows": brands(1..=10), "totalCount": 25})).with_delay(200),
        )
        .await;

    let ctx = context(&backend);
    let waited = tokio::time::timeout(Duration::from_millis(20), ctx.fetch(ListQuery::new(0, 10))).await;
    assert!(waited.is_err(), "request should outlive the timeout");
    assert!(ctx.state().entity.loading);

    tokio::time::sleep(Duration::from_millis(500)).await;

    let state = ctx.state().entity;
    assert!(!state.loading);
    assert_eq!(state.rows.len(), 10);
    assert_eq!(state.total_count, 25);
}

#[tokio::test]
async fn dropped_delete_still_settles() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "DELETE",
            "/api/medical-brands/7",
            MockResponse::raw(204, "").with_delay(100),
        )
        .await;

    let ctx = context(&backend);
    drop(ctx.delete(RecordId::from(7)));
    assert!(ctx.state().entity.save_loading);

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(!ctx.state().entity.save_loading);
    assert_eq!(backend.captured_requests().await.len(), 1);
}

#[tokio::test]
async fn typed_zero_padded_id_is_sent_verbatim() {
    let backend = MockBackend::start().await;
    backend
        .route(
            "GET",
            "/api/tasks/007",
            MockResponse::json(json!({"id": "007", "name": "Agent"})),
        )
        .await;

    let actions: EntityActions<Value> =
        EntityActions::new(client_for(&backend), &ResourceConfig::new("/tasks", "id"));
    let recorder: Recorder<EntityIntent<Value>> = Recorder::new();
    let record = actions
        .find(&recorder, RecordId::parse("007"))
        .await
        .unwrap();

    assert_eq!(record["name"], "Agent");
    assert_eq!(backend.captured_requests().await[0].path, "/api/tasks/007");
}
