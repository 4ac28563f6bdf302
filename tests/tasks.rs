mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{register_and_login, send, TestContext};

fn future_date(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

fn task_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Integration test task",
        "due_date": future_date(1),
    })
}

#[actix_rt::test]
async fn test_task_routes_require_authentication() {
    let ctx = TestContext::new();
    let app = ctx.app().await;

    let req = test::TestRequest::get().uri("/api/tasks");
    let (status, body) = send(&app, req, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authorization header required");

    let req = test::TestRequest::get().uri("/api/tasks");
    let (status, body) = send(&app, req, Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");

    let req = test::TestRequest::post().uri("/api/tasks").set_json(task_payload("Nope"));
    let (status, _) = send(&app, req, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_writes_require_admin() {
    let ctx = TestContext::new();
    let app = ctx.app().await;
    let _admin = register_and_login(&app, "admin").await;
    let user_token = register_and_login(&app, "regular").await;

    let req = test::TestRequest::post().uri("/api/tasks").set_json(task_payload("Sneaky"));
    let (status, body) = send(&app, req, Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "admin access required");

    let id = uuid::Uuid::new_v4();
    let req = test::TestRequest::delete().uri(&format!("/api/tasks/{}", id));
    let (status, _) = send(&app, req, Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reads are open to any authenticated user.
    let req = test::TestRequest::get().uri("/api/tasks");
    let (status, body) = send(&app, req, Some(&user_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[test_log::test(actix_rt::test)]
async fn test_admin_task_lifecycle() {
    let ctx = TestContext::new();
    let app = ctx.app().await;
    let token = register_and_login(&app, "task_admin").await;

    // Create
    let req = test::TestRequest::post().uri("/api/tasks").set_json(task_payload("Test Task"));
    let (status, created) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED, "Create failed. Body: {}", created);
    assert_eq!(created["title"], "Test Task");
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_str().unwrap().to_string();

    // Get by id
    let req = test::TestRequest::get().uri(&format!("/api/tasks/{}", id));
    let (status, fetched) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    // List
    let req = test::TestRequest::get().uri("/api/tasks");
    let (status, all) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([created.clone()]));

    // Partial update leaves the other fields alone.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .set_json(json!({ "status": "completed", "title": "" }));
    let (status, body) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "Update failed. Body: {}", body);
    assert_eq!(body["message"], "task updated successfully");
    assert_eq!(body["updated_task"]["status"], "completed");
    assert_eq!(body["updated_task"]["title"], "Test Task");
    assert_eq!(body["updated_task"]["description"], created["description"]);

    // Delete
    let req = test::TestRequest::delete().uri(&format!("/api/tasks/{}", id));
    let (status, body) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "task deleted successfully");

    let req = test::TestRequest::get().uri(&format!("/api/tasks/{}", id));
    let (status, body) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "task not found");

    let req = test::TestRequest::delete().uri(&format!("/api/tasks/{}", id));
    let (status, _) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_create_task_validation() {
    let ctx = TestContext::new();
    let app = ctx.app().await;
    let token = register_and_login(&app, "validator").await;

    let test_cases = vec![
        (
            json!({ "title": "Old", "description": "d", "due_date": (Utc::now() - Duration::days(1)).to_rfc3339() }),
            StatusCode::BAD_REQUEST,
            "due date must be in the future",
        ),
        (
            json!({ "description": "d", "due_date": future_date(1) }),
            StatusCode::BAD_REQUEST,
            "task title cannot be empty",
        ),
        (
            json!({ "title": "t", "due_date": future_date(1) }),
            StatusCode::BAD_REQUEST,
            "task description cannot be empty",
        ),
        (
            json!({ "title": "t", "description": "d" }),
            StatusCode::BAD_REQUEST,
            "due date cannot be empty",
        ),
        (
            json!({ "title": "t", "description": "d", "due_date": future_date(1), "status": "archived" }),
            StatusCode::BAD_REQUEST,
            "invalid task status",
        ),
    ];

    for (payload, expected_status, expected_error) in test_cases {
        let req = test::TestRequest::post().uri("/api/tasks").set_json(&payload);
        let (status, body) = send(&app, req, Some(&token)).await;

        assert_eq!(status, expected_status, "Payload: {}", payload);
        assert_eq!(body["error"], expected_error);
    }

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({ "title": "t".repeat(201), "description": "d", "due_date": future_date(1) }));
    let (status, _) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_update_task_rejections() {
    let ctx = TestContext::new();
    let app = ctx.app().await;
    let token = register_and_login(&app, "updater").await;

    let req = test::TestRequest::post().uri("/api/tasks").set_json(task_payload("Target"));
    let (_, created) = send(&app, req, Some(&token)).await;
    let uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put().uri(&uri).set_json(json!({}));
    let (status, body) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no valid fields provided for update");

    let req = test::TestRequest::put().uri(&uri).set_json(json!({ "status": "bogus" }));
    let (status, body) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid task status");

    let past = (Utc::now() - Duration::hours(1)).to_rfc3339();
    let req = test::TestRequest::put().uri(&uri).set_json(json!({ "due_date": past }));
    let (status, body) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "due date must be in the future");

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", uuid::Uuid::new_v4()))
        .set_json(json!({ "title": "Ghost" }));
    let (status, _) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/tasks/not-a-uuid");
    let (status, body) = send(&app, req, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid task ID");

    // Nothing above touched the stored task.
    let req = test::TestRequest::get().uri(&uri);
    let (_, fetched) = send(&app, req, Some(&token)).await;
    assert_eq!(fetched, created);
}
