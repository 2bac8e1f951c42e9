//! API Integration Tests

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use bloglist_api::api::{self, AppState};

mod common;

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_blog_crud_e2e() {
    let _guard = common::DB_LOCK.lock().await;
    let pool = common::setup_test_db().await;
    let state = AppState::new(pool.clone(), common::test_config());
    let app = api::create_router(state.clone()).with_state(state);

    // 1. Register a user
    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "tester",
                "name": "Tester",
                "password": "tester123"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "Registration failed");

    // 2. Login
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "tester",
                "password": "tester123"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Login failed");
    let login = json_body(response).await;
    let token = login["token"].as_str().unwrap().to_string();
    assert_eq!(login["username"], "tester");

    // 3. Creating a blog without a token fails
    let req = Request::builder()
        .method("POST")
        .uri("/blogs")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "title": "Travels with John",
                "author": "John Smith",
                "url": "https://johnstravels.com/",
                "likes": 9
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error_code"], "missing_token");

    // 4. Creating a blog with the token succeeds and reports the owner
    let req = Request::builder()
        .method("POST")
        .uri("/blogs")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(
            json!({
                "title": "Travels with John",
                "author": "John Smith",
                "url": "https://johnstravels.com/",
                "likes": 9
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "Blog creation failed");
    let created = json_body(response).await;
    assert_eq!(created["likes"], 9);
    assert_eq!(created["user"]["username"], "tester");
    let blog_id = created["id"].as_str().unwrap().to_string();

    // 5. Likes default to zero when omitted
    let req = Request::builder()
        .method("POST")
        .uri("/blogs")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(
            json!({
                "title": "Second trip",
                "author": "John Smith",
                "url": "https://johnstravels.com/second"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["likes"], 0);

    // 6. Missing title is a 400
    let req = Request::builder()
        .method("POST")
        .uri("/blogs")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(
            json!({
                "author": "John Smith",
                "url": "https://johnstravels.com/"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["details"], "title is required");

    // 7. Both blogs are listed
    let req = Request::builder()
        .method("GET")
        .uri("/blogs")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let blogs = json_body(response).await;
    assert_eq!(blogs.as_array().unwrap().len(), 2);

    // 8. Update the like count
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/blogs/{}", blog_id))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "likes": 10 }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Update failed");
    let updated = json_body(response).await;
    assert_eq!(updated["likes"], 10);
    assert_eq!(updated["title"], "Travels with John");

    // 9. Negative likes are rejected
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/blogs/{}", blog_id))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "likes": -1 }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 10. Updating a missing blog is a 404
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/blogs/{}", Uuid::new_v4()))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "likes": 1 }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // 11. The owner can delete the blog
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/blogs/{}", blog_id))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT, "Delete failed");

    let req = Request::builder()
        .method("GET")
        .uri("/blogs")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let blogs = json_body(response).await;
    assert_eq!(blogs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let _guard = common::DB_LOCK.lock().await;
    let pool = common::setup_test_db().await;
    let state = AppState::new(pool.clone(), common::test_config());
    let app = api::create_router(state.clone()).with_state(state);

    // Empty list: defined statistics only
    let req = Request::builder()
        .method("GET")
        .uri("/blogs/stats")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await;
    assert_eq!(stats["blogs"], 0);
    assert_eq!(stats["total_likes"], 0);
    assert!(stats["favorite"].is_null());
    assert!(stats["most_blogs"].is_null());
    assert!(stats["most_likes"].is_null());

    // Register and login
    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "curator",
                "name": "Curator",
                "password": "curator123"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "curator",
                "password": "curator123"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let token = json_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    // The canonical six-record list
    let seed = [
        ("React patterns", "Michael Chan", "https://reactpatterns.com/", 7),
        (
            "Go To Statement Considered Harmful",
            "Edsger W. Dijkstra",
            "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html",
            5,
        ),
        (
            "Canonical string reduction",
            "Edsger W. Dijkstra",
            "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html",
            12,
        ),
        (
            "First class tests",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll",
            10,
        ),
        (
            "TDD harms architecture",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html",
            0,
        ),
        (
            "Type wars",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html",
            2,
        ),
    ];

    for (title, author, url, likes) in seed {
        let req = Request::builder()
            .method("POST")
            .uri("/blogs")
            .header("content-type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::from(
                json!({
                    "title": title,
                    "author": author,
                    "url": url,
                    "likes": likes
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "Seeding {} failed", title);
    }

    let req = Request::builder()
        .method("GET")
        .uri("/blogs/stats")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await;

    assert_eq!(stats["blogs"], 6);
    assert_eq!(stats["total_likes"], 36);
    assert_eq!(stats["favorite"]["title"], "Canonical string reduction");
    assert_eq!(stats["favorite"]["author"], "Edsger W. Dijkstra");
    assert_eq!(stats["favorite"]["likes"], 12);
    assert_eq!(stats["most_blogs"]["author"], "Robert C. Martin");
    assert_eq!(stats["most_blogs"]["count"], 3);
    assert_eq!(stats["most_likes"]["author"], "Edsger W. Dijkstra");
    assert_eq!(stats["most_likes"]["likes"], 17);
}

#[tokio::test]
async fn test_user_validation_and_login() {
    let _guard = common::DB_LOCK.lock().await;
    let pool = common::setup_test_db().await;
    let state = AppState::new(pool.clone(), common::test_config());
    let app = api::create_router(state.clone()).with_state(state);

    // Short password is rejected with the validation message
    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "ilee1234",
                "name": "Isaac Lee",
                "password": "p"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["details"], "password must be at least 3 chars");

    // No user was added
    let req = Request::builder()
        .method("GET")
        .uri("/users")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let users = json_body(response).await;
    assert_eq!(users.as_array().unwrap().len(), 0);

    // Register a valid user
    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "ilee1234",
                "name": "Isaac Lee",
                "password": "proper-password"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate username conflicts
    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "ilee1234",
                "name": "Impostor",
                "password": "whatever"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Wrong password and unknown user both fail the same way
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "ilee1234",
                "password": "wrong"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "nobody",
                "password": "whatever"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let _guard = common::DB_LOCK.lock().await;
    let pool = common::setup_test_db().await;
    let state = AppState::new(pool.clone(), common::test_config());
    let app = api::create_router(state.clone()).with_state(state);

    // Two users
    for (username, password) in [("owner", "owner123"), ("intruder", "intruder123")] {
        let req = Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "username": username,
                    "name": username,
                    "password": password
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let mut tokens = Vec::new();
    for (username, password) in [("owner", "owner123"), ("intruder", "intruder123")] {
        let req = Request::builder()
            .method("POST")
            .uri("/login")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "username": username,
                    "password": password
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        tokens.push(
            json_body(response).await["token"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }

    // Owner creates a blog
    let req = Request::builder()
        .method("POST")
        .uri("/blogs")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", tokens[0]))
        .body(Body::from(
            json!({
                "title": "Mine alone",
                "author": "Owner",
                "url": "https://example.com/mine"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let blog_id = json_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    // The other user cannot delete it
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/blogs/{}", blog_id))
        .header("Authorization", format!("Bearer {}", tokens[1]))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Deleting an unknown blog is a 404 even for an authenticated user
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/blogs/{}", Uuid::new_v4()))
        .header("Authorization", format!("Bearer {}", tokens[0]))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The blog is still there, with its owner populated
    let req = Request::builder()
        .method("GET")
        .uri("/blogs")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let blogs = json_body(response).await;
    assert_eq!(blogs.as_array().unwrap().len(), 1);
    assert_eq!(blogs[0]["user"]["username"], "owner");
}
