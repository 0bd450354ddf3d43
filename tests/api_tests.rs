mod common;

use common::{issue_token, spawn_app};
use verdant_vistas::models::{Confirmation, LoginResponse};

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn login_then_create_then_list_round_trip() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Login with the configured admin pair.
    let response = client
        .post(format!("{}/login", app.address))
        .json(&serde_json::json!({
            "email": app.config.admin_email,
            "password": app.config.admin_password,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let login: LoginResponse = response.json().await.unwrap();
    assert_eq!(login.user.role, "admin");
    assert!(!login.token.is_empty());

    // Create an article with the issued token.
    let response = client
        .post(format!("{}/articles", app.address))
        .bearer_auth(&login.token)
        .json(&serde_json::json!({
            "title": "Notes From The Meadow",
            "excerpt": "Short note",
            "content": "The long form content.",
            "cover_image_url": "https://img.example/meadow.jpg"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let confirmation: Confirmation = response.json().await.unwrap();
    assert_eq!(confirmation.message, "Article Created Successfully");

    // The listing exposes the renamed view fields.
    let response = client
        .get(format!("{}/articles", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let articles: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["title"], "Notes From The Meadow");
    assert_eq!(articles[0]["author"], "Super Admin");
    assert!(articles[0].get("date").is_some());
    assert!(articles[0].get("image").is_some());
    assert!(articles[0].get("created_at").is_none());

    // The stored slug is the hyphenated lowercase title.
    assert_eq!(
        app.repo.articles.lock().unwrap()[0].slug,
        "notes-from-the-meadow"
    );
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/login", app.address))
        .json(&serde_json::json!({
            "email": app.config.admin_email,
            "password": "wrong",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Invalid Credentials");
}

#[tokio::test]
async fn article_mutations_require_a_token() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/articles", app.address))
        .json(&serde_json::json!({
            "title": "x", "excerpt": "x", "content": "x", "cover_image_url": "x"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .put(format!("{}/articles/1", app.address))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .delete(format!("{}/articles/1", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn non_admin_token_is_forbidden() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let token = issue_token(&app.config, 2, "user");

    let response = client
        .post(format!("{}/articles", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "x", "excerpt": "x", "content": "x", "cover_image_url": "x"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
    assert!(app.repo.articles.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_article_paths_return_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/articles/99", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let token = issue_token(&app.config, 1, "admin");
    let response = client
        .delete(format!("{}/articles/99", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn empty_update_is_acknowledged_without_store_write() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let token = issue_token(&app.config, 1, "admin");
    let calls_before = app.repo.store_calls();

    let response = client
        .put(format!("{}/articles/1", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let confirmation: Confirmation = response.json().await.unwrap();
    assert_eq!(confirmation.message, "No changes detected");
    assert_eq!(app.repo.store_calls(), calls_before);
}

#[tokio::test]
async fn subscribing_twice_reports_success_both_times() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client
            .post(format!("{}/subscribe", app.address))
            .json(&serde_json::json!({ "email": "a@x.com" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let confirmation: Confirmation = response.json().await.unwrap();
        assert_eq!(confirmation.message, "Subscribed successfully");
    }

    assert_eq!(app.repo.subscribers.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn contact_form_accepts_camel_case_payload() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/contact", app.address))
        .json(&serde_json::json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com",
            "subject": "Stories",
            "message": "Lovely reading."
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let contacts = app.repo.contacts.lock().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].first_name, "Grace");
    assert_eq!(contacts[0].last_name, "Hopper");
}
