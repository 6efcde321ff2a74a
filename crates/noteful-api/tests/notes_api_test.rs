mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, create, delete, get, post, put, timestamp, ABSENT_ID};
use noteful_db::NoteRepository;

#[tokio::test]
async fn test_note_lifecycle() {
    let (app, _) = app();

    let res = post(&app, "/api/notes", json!({"title": "A", "content": "B"})).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.body["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);
    assert_eq!(res.location.as_deref(), Some(format!("/api/notes/{}", id).as_str()));
    assert_eq!(res.body["title"], "A");
    assert_eq!(res.body["content"], "B");
    assert_eq!(res.body["tags"], json!([]));
    assert!(res.body.get("folderId").is_none());
    assert!(res.body["createdAt"].is_string());
    assert_eq!(res.body["createdAt"], res.body["updatedAt"]);

    let fetched = get(&app, &format!("/api/notes/{}", id)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, res.body);

    let deleted = delete(&app, &format!("/api/notes/{}", id)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_null());

    let gone = get(&app, &format!("/api/notes/{}", id)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body, json!({"status": 404, "message": "Not Found"}));
}

#[tokio::test]
async fn test_create_requires_title() {
    let (app, store) = app();

    let res = post(&app, "/api/notes", json!({"content": "no title"})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!({"status": 400, "message": "Missing `title` in request body"})
    );

    let blank = post(&app, "/api/notes", json!({"title": "  "})).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(store.notes.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_validates_references() {
    let (app, store) = app();

    let res = post(&app, "/api/notes", json!({"title": "T", "folderId": "abc"})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "The `folderId` is not valid");

    let res = post(&app, "/api/notes", json!({"title": "T", "tags": [ABSENT_ID, "bad"]})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "The `tags` is not valid");

    assert_eq!(store.notes.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_dangling_references_are_accepted() {
    let (app, _) = app();

    let res = post(
        &app,
        "/api/notes",
        json!({"title": "T", "folderId": ABSENT_ID, "tags": [ABSENT_ID]}),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["folderId"], ABSENT_ID);
    assert_eq!(res.body["tags"], json!([ABSENT_ID]));

    // Unresolvable tags are dropped when expanded
    let id = res.body["id"].as_str().unwrap();
    let fetched = get(&app, &format!("/api/notes/{}", id)).await;
    assert_eq!(fetched.body["tags"], json!([]));
    assert_eq!(fetched.body["folderId"], ABSENT_ID);
}

#[tokio::test]
async fn test_get_expands_tags_but_create_returns_ids() {
    let (app, _) = app();
    let tag_id = create(&app, "/api/tags", json!({"name": "rust"})).await;

    let res = post(&app, "/api/notes", json!({"title": "T", "tags": [tag_id]})).await;
    assert_eq!(res.body["tags"], json!([tag_id]));

    let id = res.body["id"].as_str().unwrap();
    let fetched = get(&app, &format!("/api/notes/{}", id)).await;
    assert_eq!(fetched.body["tags"][0]["id"], tag_id.as_str());
    assert_eq!(fetched.body["tags"][0]["name"], "rust");
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let (app, _) = app();

    for res in [
        get(&app, "/api/notes/123").await,
        put(&app, "/api/notes/123", json!({"title": "T"})).await,
        delete(&app, "/api/notes/123").await,
    ] {
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["message"], "The `id` is not valid");
    }
}

#[tokio::test]
async fn test_absent_id() {
    let (app, _) = app();
    let uri = format!("/api/notes/{}", ABSENT_ID);

    assert_eq!(get(&app, &uri).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        put(&app, &uri, json!({"title": "T"})).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(delete(&app, &uri).await.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_update_is_full_replace() {
    let (app, _) = app();
    let folder_id = create(&app, "/api/folders", json!({"name": "Work"})).await;
    let tag_id = create(&app, "/api/tags", json!({"name": "todo"})).await;

    let original = post(
        &app,
        "/api/notes",
        json!({"title": "T", "content": "C", "folderId": folder_id, "tags": [tag_id]}),
    )
    .await
    .body;
    let uri = format!("/api/notes/{}", original["id"].as_str().unwrap());

    let res = put(&app, &uri, json!({"title": "T2"})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], original["id"]);
    assert_eq!(res.body["title"], "T2");
    assert!(res.body.get("content").is_none());
    assert!(res.body.get("folderId").is_none());
    assert_eq!(res.body["tags"], json!([]));
    assert_eq!(res.body["createdAt"], original["createdAt"]);
    assert!(timestamp(&res.body["updatedAt"]) >= timestamp(&original["updatedAt"]));
}

#[tokio::test]
async fn test_update_same_body_twice_keeps_created_at() {
    let (app, _) = app();
    let id = create(&app, "/api/notes", json!({"title": "T"})).await;
    let uri = format!("/api/notes/{}", id);
    let body = json!({"title": "Same", "content": "Body"});

    let first = put(&app, &uri, body.clone()).await.body;
    let second = put(&app, &uri, body).await.body;

    assert_eq!(first["title"], second["title"]);
    assert_eq!(first["content"], second["content"]);
    assert_eq!(first["createdAt"], second["createdAt"]);
    assert!(timestamp(&second["updatedAt"]) >= timestamp(&first["updatedAt"]));
}

#[tokio::test]
async fn test_update_validates_title_and_references() {
    let (app, _) = app();
    let id = create(&app, "/api/notes", json!({"title": "T"})).await;
    let uri = format!("/api/notes/{}", id);

    let res = put(&app, &uri, json!({"content": "x"})).await;
    assert_eq!(res.body["message"], "Missing `title` in request body");

    let res = put(&app, &uri, json!({"title": "T", "folderId": "x"})).await;
    assert_eq!(res.body["message"], "The `folderId` is not valid");
}

#[tokio::test]
async fn test_list_count_matches_store() {
    let (app, store) = app();
    for title in ["one", "two", "three"] {
        create(&app, "/api/notes", json!({"title": title})).await;
    }

    let res = get(&app, "/api/notes").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body.as_array().unwrap().len() as i64,
        store.notes.count().await.unwrap()
    );
}

#[tokio::test]
async fn test_list_search_and_filters() {
    let (app, _) = app();
    let work = create(&app, "/api/folders", json!({"name": "Work"})).await;
    let home = create(&app, "/api/folders", json!({"name": "Home"})).await;
    let urgent = create(&app, "/api/tags", json!({"name": "urgent"})).await;

    create(
        &app,
        "/api/notes",
        json!({"title": "Quarterly report", "folderId": work, "tags": [urgent]}),
    )
    .await;
    create(
        &app,
        "/api/notes",
        json!({"title": "Groceries", "content": "milk, eggs, REPORT card", "folderId": home}),
    )
    .await;
    create(&app, "/api/notes", json!({"title": "Loose thought"})).await;

    let titles = |body: &serde_json::Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap().to_string())
            .collect()
    };

    let res = get(&app, "/api/notes?searchTerm=report").await;
    assert_eq!(res.body.as_array().unwrap().len(), 2);

    let res = get(&app, &format!("/api/notes?searchTerm=report&folderId={}", work)).await;
    assert_eq!(titles(&res.body), vec!["Quarterly report"]);

    let res = get(&app, &format!("/api/notes?tagId={}", urgent)).await;
    assert_eq!(titles(&res.body), vec!["Quarterly report"]);

    let res = get(&app, &format!("/api/notes?folderId={}", home)).await;
    assert_eq!(titles(&res.body), vec!["Groceries"]);

    // Empty values mean no filter
    let res = get(&app, "/api/notes?searchTerm=&folderId=").await;
    assert_eq!(res.body.as_array().unwrap().len(), 3);

    let res = get(&app, "/api/notes?searchTerm=nothing-matches").await;
    assert_eq!(res.body, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_rejects_bad_filter_ids() {
    let (app, _) = app();

    let res = get(&app, "/api/notes?folderId=nope").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "The `folderId` is not valid");

    let res = get(&app, "/api/notes?tagId=nope").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "The `tagId` is not valid");
}

#[tokio::test]
async fn test_unparseable_query_string_uses_error_body() {
    let (app, _) = app();

    let res = get(&app, "/api/notes?folderId=a&folderId=b").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["status"], 400);
    let message = res.body["message"].as_str().expect("json error body");
    assert!(message.contains("folderId"), "{}", message);
}

#[tokio::test]
async fn test_list_most_recently_updated_first() {
    let (app, _) = app();
    let older = create(&app, "/api/notes", json!({"title": "older"})).await;
    create(&app, "/api/notes", json!({"title": "newer"})).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    put(&app, &format!("/api/notes/{}", older), json!({"title": "older, edited"})).await;

    let res = get(&app, "/api/notes").await;
    assert_eq!(res.body[0]["title"], "older, edited");
    assert_eq!(res.body[1]["title"], "newer");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let (app, store) = app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/notes")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.notes.count().await.unwrap(), 0);
}
