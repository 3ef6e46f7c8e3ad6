//! Behavioral tests for the task store against a scripted backend.
//!
//! The backend is a queue of canned responses behind the `HttpClient`
//! bridge, so every test drives the real `ApiClient` and `TaskStore`
//! wiring. Steps can be gated on a `Notify` to hold a request in
//! flight while the test observes or races other operations.

use async_trait::async_trait;
use bridge_traits::{BridgeError, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_api::{ApiClient, StaticTokenSource, TaskId};
use core_runtime::events::{CoreEvent, EventBus, TaskEvent};
use core_tasks::{TaskError, TaskStore};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

const BASE_URL: &str = "http://localhost:3001/api";

/// One scripted backend exchange.
struct Step {
    gate: Option<Arc<Notify>>,
    result: Result<(u16, String), String>,
}

impl Step {
    fn ok(status: u16, body: impl Into<String>) -> Self {
        Self {
            gate: None,
            result: Ok((status, body.into())),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            gate: None,
            result: Err(message.into()),
        }
    }

    fn gated(gate: Arc<Notify>, status: u16, body: impl Into<String>) -> Self {
        Self {
            gate: Some(gate),
            result: Ok((status, body.into())),
        }
    }
}

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: HttpMethod,
    url: String,
    body: Option<serde_json::Value>,
}

/// HttpClient that replays a fixed script of responses.
struct ScriptedHttp {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedHttp {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> bridge_traits::error::Result<HttpResponse> {
        let step = self
            .steps
            .lock()
            .await
            .pop_front()
            .expect("backend script ran out of responses");

        self.requests.lock().await.push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            body: request
                .body
                .as_ref()
                .map(|bytes| serde_json::from_slice(bytes).expect("request body is not JSON")),
        });

        if let Some(gate) = &step.gate {
            gate.notified().await;
        }

        match step.result {
            Ok((status, body)) => Ok(HttpResponse {
                status,
                headers: HashMap::new(),
                body: Bytes::from(body.into_bytes()),
            }),
            Err(message) => Err(BridgeError::Transport(message)),
        }
    }
}

fn task_json(id: i64, title: &str, completed: bool) -> String {
    let completed_at = if completed {
        r#""2024-01-02T00:00:00Z""#
    } else {
        "null"
    };
    format!(
        r#"{{"id":{id},"title":"{title}","completed":{completed},"completed_at":{completed_at},"user_id":1,"created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-02T00:00:00Z"}}"#
    )
}

/// The well-known two-task list: one open errand, one finished chore.
fn fixture_list() -> String {
    format!(
        "[{},{}]",
        task_json(1, "買い物に行く", false),
        task_json(2, "掃除する", true)
    )
}

fn store_with_events(http: Arc<ScriptedHttp>, events: EventBus) -> TaskStore {
    let api = ApiClient::new(
        BASE_URL,
        http,
        Arc::new(StaticTokenSource::new("t-123")),
    );
    TaskStore::new(Arc::new(api), events)
}

fn store_over(http: Arc<ScriptedHttp>) -> TaskStore {
    store_with_events(http, EventBus::default())
}

async fn wait_for_requests(http: &ScriptedHttp, count: usize) {
    for _ in 0..200 {
        if http.request_count().await >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("backend never saw {count} requests");
}

#[tokio::test]
async fn fetch_populates_list_in_backend_order() {
    let http = ScriptedHttp::new(vec![Step::ok(200, fixture_list())]);
    let store = store_over(http.clone());

    let fetched = store.fetch_tasks().await.unwrap();
    assert_eq!(fetched.len(), 2);

    let snapshot = store.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.tasks[0].id, TaskId::new(1));
    assert_eq!(snapshot.tasks[0].title, "買い物に行く");
    assert!(!snapshot.tasks[0].completed);
    assert_eq!(snapshot.tasks[1].id, TaskId::new(2));
    assert_eq!(snapshot.tasks[1].title, "掃除する");
    assert!(snapshot.tasks[1].completed);

    let requests = http.requests().await;
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].url, format!("{BASE_URL}/todos"));
}

#[tokio::test]
async fn fetch_replaces_the_list_instead_of_merging() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::ok(200, format!("[{}]", task_json(7, "洗濯する", false))),
    ]);
    let store = store_over(http);

    store.fetch_tasks().await.unwrap();
    store.fetch_tasks().await.unwrap();

    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::new(7));
    assert_eq!(tasks[0].title, "洗濯する");
}

#[tokio::test]
async fn fetch_failure_keeps_old_list_and_records_message() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::fail("connection refused"),
    ]);
    let store = store_over(http);

    store.fetch_tasks().await.unwrap();
    let err = store.fetch_tasks().await.unwrap_err();
    assert!(matches!(err, TaskError::Api(_)));

    let snapshot = store.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.tasks.len(), 2);
    assert!(snapshot.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn fetch_failure_surfaces_backend_message_verbatim() {
    let http = ScriptedHttp::new(vec![Step::ok(500, r#"{"message":"サーバーエラー"}"#)]);
    let store = store_over(http);

    store.fetch_tasks().await.unwrap_err();
    assert_eq!(store.last_error().await, Some("サーバーエラー".to_string()));
}

#[tokio::test]
async fn fetch_in_flight_shows_loading_without_error() {
    let gate = Arc::new(Notify::new());
    let http = ScriptedHttp::new(vec![
        Step::fail("connection refused"),
        Step::gated(gate.clone(), 200, fixture_list()),
    ]);
    let store = Arc::new(store_over(http.clone()));

    // Leave a failure in the error slot, then start a fetch over it
    store.fetch_tasks().await.unwrap_err();
    assert!(store.last_error().await.is_some());

    let fetch = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_tasks().await }
    });
    wait_for_requests(&http, 2).await;

    // Starting the fetch cleared the slot and raised the flag
    let snapshot = store.snapshot().await;
    assert!(snapshot.loading);
    assert_eq!(snapshot.error, None);

    gate.notify_one();
    fetch.await.unwrap().unwrap();

    let snapshot = store.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.tasks.len(), 2);
}

#[tokio::test]
async fn superseded_fetch_leaves_state_to_the_newer_one() {
    let gate = Arc::new(Notify::new());
    let stale_list = format!("[{}]", task_json(1, "買い物に行く", false));
    let fresh_list = format!("[{}]", task_json(9, "洗濯する", false));
    let http = ScriptedHttp::new(vec![
        Step::gated(gate.clone(), 200, stale_list),
        Step::ok(200, fresh_list),
    ]);
    let store = Arc::new(store_over(http.clone()));

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_tasks().await }
    });
    wait_for_requests(&http, 1).await;

    // A second fetch starts and finishes while the first is held open
    store.fetch_tasks().await.unwrap();
    gate.notify_one();

    // The held fetch still hands its caller its own payload
    let stale = first.await.unwrap().unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].id, TaskId::new(1));

    // But the list belongs to the fetch that started last
    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::new(9));
    assert!(!store.is_loading().await);
}

#[tokio::test]
async fn add_task_appends_the_confirmed_record() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, "[]"),
        Step::ok(201, task_json(10, "買い物に行く", false)),
    ]);
    let store = store_over(http.clone());

    store.fetch_tasks().await.unwrap();
    let added = store.add_task("買い物に行く").await.unwrap();
    assert_eq!(added.id, TaskId::new(10));

    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::new(10));

    let requests = http.requests().await;
    assert_eq!(requests[1].method, HttpMethod::Post);
    assert_eq!(requests[1].url, format!("{BASE_URL}/todos"));
    assert_eq!(requests[1].body.as_ref().unwrap()["title"], "買い物に行く");
}

#[tokio::test]
async fn blank_title_is_rejected_before_any_request() {
    let http = ScriptedHttp::new(vec![]);
    let store = store_over(http.clone());

    let err = store.add_task("   ").await.unwrap_err();
    assert!(matches!(err, TaskError::EmptyTitle));
    assert_eq!(http.request_count().await, 0);
    assert_eq!(
        store.last_error().await,
        Some("task title must not be empty".to_string())
    );

    let err = store.update_task(TaskId::new(1), "").await.unwrap_err();
    assert!(matches!(err, TaskError::EmptyTitle));
    assert_eq!(http.request_count().await, 0);
}

#[tokio::test]
async fn update_task_renames_in_place() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::ok(200, task_json(1, "牛乳を買う", false)),
    ]);
    let store = store_over(http.clone());

    store.fetch_tasks().await.unwrap();
    let updated = store.update_task(TaskId::new(1), "牛乳を買う").await.unwrap();
    assert_eq!(updated.title, "牛乳を買う");

    // Same position, new title, second task untouched
    let tasks = store.tasks().await;
    assert_eq!(tasks[0].id, TaskId::new(1));
    assert_eq!(tasks[0].title, "牛乳を買う");
    assert_eq!(tasks[1].title, "掃除する");

    let requests = http.requests().await;
    assert_eq!(requests[1].method, HttpMethod::Put);
    assert_eq!(requests[1].url, format!("{BASE_URL}/todos/1"));
    let body = requests[1].body.as_ref().unwrap();
    assert_eq!(body["title"], "牛乳を買う");
    assert!(body.get("completed").is_none());
}

#[tokio::test]
async fn toggle_sends_only_the_inverted_flag() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::ok(200, task_json(1, "買い物に行く", true)),
        Step::ok(200, task_json(2, "掃除する", false)),
    ]);
    let store = store_over(http.clone());

    store.fetch_tasks().await.unwrap();

    // Task 1 is open, so the toggle asks for completed
    let done = store.toggle_task(TaskId::new(1)).await.unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());

    // Task 2 is finished, so the toggle asks for reopened
    let reopened = store.toggle_task(TaskId::new(2)).await.unwrap();
    assert!(!reopened.completed);
    assert!(reopened.completed_at.is_none());

    let requests = http.requests().await;
    let first = requests[1].body.as_ref().unwrap();
    assert_eq!(first, &serde_json::json!({"completed": true}));
    let second = requests[2].body.as_ref().unwrap();
    assert_eq!(second, &serde_json::json!({"completed": false}));

    let tasks = store.tasks().await;
    assert!(tasks[0].completed);
    assert!(!tasks[1].completed);
}

#[tokio::test]
async fn toggle_of_unknown_task_is_a_local_error() {
    let http = ScriptedHttp::new(vec![Step::ok(200, fixture_list())]);
    let store = store_over(http.clone());

    store.fetch_tasks().await.unwrap();
    let err = store.toggle_task(TaskId::new(99)).await.unwrap_err();

    assert!(matches!(err, TaskError::UnknownTask { .. }));
    assert_eq!(http.request_count().await, 1);
    assert_eq!(
        store.last_error().await,
        Some("task 99 is not in the local task list".to_string())
    );
}

#[tokio::test]
async fn delete_removes_the_task_locally() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::ok(204, ""),
    ]);
    let store = store_over(http.clone());

    store.fetch_tasks().await.unwrap();
    store.delete_task(TaskId::new(1)).await.unwrap();

    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::new(2));

    let requests = http.requests().await;
    assert_eq!(requests[1].method, HttpMethod::Delete);
    assert_eq!(requests[1].url, format!("{BASE_URL}/todos/1"));
    assert!(requests[1].body.is_none());
}

#[tokio::test]
async fn failed_mutation_records_message_and_keeps_list() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::fail("connection refused"),
    ]);
    let store = store_over(http);

    store.fetch_tasks().await.unwrap();
    let err = store.toggle_task(TaskId::new(1)).await.unwrap_err();
    assert!(matches!(err, TaskError::Api(_)));

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.tasks.len(), 2);
    assert!(!snapshot.tasks[0].completed);
    assert!(snapshot.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn next_success_clears_the_error_slot() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, "[]"),
        Step::fail("connection refused"),
        Step::ok(201, task_json(10, "買い物に行く", false)),
    ]);
    let store = store_over(http);

    store.fetch_tasks().await.unwrap();
    store.add_task("買い物に行く").await.unwrap_err();
    assert!(store.last_error().await.is_some());

    store.add_task("買い物に行く").await.unwrap();
    assert_eq!(store.last_error().await, None);
}

#[tokio::test]
async fn mutation_failure_during_fetch_does_not_touch_the_slots() {
    let gate = Arc::new(Notify::new());
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::gated(gate.clone(), 200, fixture_list()),
        Step::fail("connection refused"),
    ]);
    let store = Arc::new(store_over(http.clone()));

    store.fetch_tasks().await.unwrap();

    let fetch = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_tasks().await }
    });
    wait_for_requests(&http, 2).await;
    assert!(store.is_loading().await);

    // The failure is returned to the caller but the in-flight fetch
    // keeps ownership of the loading and error slots
    let err = store.toggle_task(TaskId::new(1)).await.unwrap_err();
    assert!(matches!(err, TaskError::Api(_)));
    assert!(store.is_loading().await);
    assert_eq!(store.last_error().await, None);

    gate.notify_one();
    fetch.await.unwrap().unwrap();

    let snapshot = store.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn confirmed_record_for_a_vanished_task_is_dropped() {
    let gate = Arc::new(Notify::new());
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::gated(gate.clone(), 200, task_json(1, "買い物に行く", true)),
        Step::ok(200, format!("[{}]", task_json(2, "掃除する", true))),
    ]);
    let store = Arc::new(store_over(http.clone()));

    store.fetch_tasks().await.unwrap();

    let toggle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle_task(TaskId::new(1)).await }
    });
    wait_for_requests(&http, 2).await;

    // A refresh drops task 1 while its toggle is still in flight
    store.fetch_tasks().await.unwrap();
    gate.notify_one();

    // The toggle still succeeds for its caller
    let toggled = toggle.await.unwrap().unwrap();
    assert!(toggled.completed);

    // But the confirmed record is not resurrected into the list
    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::new(2));
}

#[tokio::test]
async fn operations_emit_lifecycle_events() {
    let http = ScriptedHttp::new(vec![
        Step::ok(200, fixture_list()),
        Step::ok(201, task_json(10, "洗濯する", false)),
        Step::ok(200, task_json(1, "買い物に行く", true)),
        Step::ok(204, ""),
    ]);
    let events = EventBus::default();
    let mut receiver = events.subscribe();
    let store = store_with_events(http, events);

    store.fetch_tasks().await.unwrap();
    store.add_task("洗濯する").await.unwrap();
    store.toggle_task(TaskId::new(1)).await.unwrap();
    store.delete_task(TaskId::new(2)).await.unwrap();

    let expected = [
        CoreEvent::Task(TaskEvent::FetchStarted),
        CoreEvent::Task(TaskEvent::FetchCompleted { count: 2 }),
        CoreEvent::Task(TaskEvent::TaskAdded { id: 10 }),
        CoreEvent::Task(TaskEvent::TaskToggled {
            id: 1,
            completed: true,
        }),
        CoreEvent::Task(TaskEvent::TaskDeleted { id: 2 }),
    ];
    for expected_event in expected {
        assert_eq!(receiver.recv().await.unwrap(), expected_event);
    }
}

#[tokio::test]
async fn failed_mutation_emits_mutation_failed() {
    let http = ScriptedHttp::new(vec![]);
    let events = EventBus::default();
    let mut receiver = events.subscribe();
    let store = store_with_events(http, events);

    store.add_task("").await.unwrap_err();

    assert_eq!(
        receiver.recv().await.unwrap(),
        CoreEvent::Task(TaskEvent::MutationFailed {
            message: "task title must not be empty".to_string(),
        })
    );
}
