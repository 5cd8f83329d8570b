use std::time::Duration;

use movekit_client::{ClientConfig, ClientError, HttpMoveApi, MoveApi, TimelineSession};
use movekit_common::{Category, CreateCustomTaskPayload, ToggleOutcome, TogglePolicy};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> HttpMoveApi {
    let config = ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        toggle_policy: TogglePolicy::Bidirectional,
    };
    HttpMoveApi::new(&config).unwrap()
}

fn move_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": "Spring move",
        "from_address": "12 Old Road",
        "to_address": null,
        "move_date": "2024-04-15",
        "created_at": "2024-01-02T10:00:00Z"
    })
}

fn task_json(id: i64, day_offset: Option<i32>, completed: bool) -> Value {
    json!({
        "id": id,
        "move_id": 1,
        "title": format!("Task {}", id),
        "description": "",
        "day_offset": day_offset,
        "category": "logistics",
        "priority": "high",
        "completed": completed,
        "estimated_time": "1 hour",
        "bucket": "1-week"
    })
}

#[tokio::test]
async fn test_get_user_moves_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/moves"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": [move_json(1), move_json(2)] })),
        )
        .mount(&server)
        .await;

    let moves = api_for(&server).get_user_moves().await.unwrap();
    assert_eq!(moves.len(), 2);
    assert_eq!(moves[0].id, 1);
    assert_eq!(moves[0].move_date.to_string(), "2024-04-15");
}

#[tokio::test]
async fn test_update_task_status_sends_flag() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/7"))
        .and(body_json(json!({ "completed": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": task_json(7, Some(-7), true) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = api_for(&server).update_task_status(7, true).await.unwrap().unwrap();
    assert_eq!(updated.id, 7);
    assert!(updated.completed);
    assert_eq!(updated.category, Category::Logistics);
}

#[tokio::test]
async fn test_failed_envelope_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "data": null,
            "message": "Task with ID 9 not found."
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).update_task_status(9, true).await.unwrap_err();
    match err {
        ClientError::Remote { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Task with ID 9 not found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_success_false_with_ok_status_is_still_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/moves"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": null,
            "message": "Session expired."
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).get_user_moves().await.unwrap_err();
    assert!(matches!(err, ClientError::Remote { status: 200, .. }));
    assert_eq!(err.user_message(), "Session expired.");
}

#[tokio::test]
async fn test_non_json_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/moves/1/timeline"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = api_for(&server).get_timeline_events(1).await.unwrap_err();
    match err {
        ClientError::Remote { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_data_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/moves"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": null })))
        .mount(&server)
        .await;

    let err = api_for(&server).get_user_moves().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingData("get_user_moves")));
}

#[tokio::test]
async fn test_create_custom_task_posts_payload() {
    let server = MockServer::start().await;
    let mut created = task_json(20, None, false);
    created["category"] = json!("custom");
    created["priority"] = json!("medium");
    Mock::given(method("POST"))
        .and(path("/api/moves/1/tasks"))
        .and(body_json(json!({ "title": "Pack garage", "bucket": null })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true, "data": created })))
        .mount(&server)
        .await;

    let task = api_for(&server)
        .create_custom_task(
            1,
            CreateCustomTaskPayload {
                title: "Pack garage".to_string(),
                bucket: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(task.id, 20);
    assert_eq!(task.category, Category::Custom);
    assert_eq!(task.day_offset, None);
}

#[tokio::test]
async fn test_session_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/moves"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [move_json(1)] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/moves/1/timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [task_json(1, Some(-14), true), task_json(2, Some(-7), false)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "data": null,
            "message": "An internal error occurred."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = TimelineSession::load(api_for(&server), TogglePolicy::OneWay)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.progress().percent, 50);

    // One-way: the completed task never reaches the backend.
    assert_eq!(session.toggle(1).await.unwrap(), ToggleOutcome::Unchanged);

    let err = session.toggle(2).await.unwrap_err();
    assert!(matches!(err, ClientError::Remote { status: 500, .. }));
    assert_eq!(session.progress().percent, 50);
}

#[tokio::test]
async fn test_session_drops_task_deleted_on_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/moves"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [move_json(1)] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/moves/1/timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [task_json(1, Some(-14), true), task_json(2, Some(-7), false)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "data": null,
            "message": "Task with ID 2 not found."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = TimelineSession::load(api_for(&server), TogglePolicy::Bidirectional)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(session.toggle(2).await.unwrap(), ToggleOutcome::NotFound);
    let remaining: Vec<i64> = session.tasks().iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![1]);
    assert_eq!(session.progress().percent, 100);
}

#[tokio::test]
async fn test_session_rejects_unknown_bucket_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/moves"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [move_json(1)] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/moves/1/timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/moves/1/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let session = TimelineSession::load(api_for(&server), TogglePolicy::Bidirectional)
        .await
        .unwrap()
        .unwrap();
    let added = session.add_custom_task("Pack garage", Some("12-weeks")).await.unwrap();
    assert!(added.is_none());
    assert!(session.tasks().is_empty());
}
