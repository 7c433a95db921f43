mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_guest_not_cooking_minimal_payload() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Jane Doe",
        "audienceType": "guest",
        "instagramHandle": "@jane.doe",
        "cooking": false
    })).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["kind"], "Guest");
    assert_eq!(body["data"]["displayName"], "Jane Doe");
    assert!(body["data"]["recipeId"].is_null());
    assert_eq!(body["data"]["isMember"], false);

    // no claim was attempted, no recipe exists to claim anyway
    let list = parse_body(app.get("/api/v1/rsvps").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_guest_without_contact_method_rejected() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Jane Doe",
        "audienceType": "guest",
        "cooking": false
    })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Instagram handle or email"));
}

#[tokio::test]
async fn test_member_cooking_happy_path() {
    let app = TestApp::new().await;
    app.seed_member("123456789012345678", "Alice").await;
    app.seed_recipe("7", "Sticky Rice", "Main").await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Alice",
        "audienceType": "member",
        "discordId": "123456789012345678",
        "cooking": true,
        "recipeId": "7",
        "note": "extra spicy"
    })).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["data"]["kind"], "Cook");
    assert_eq!(body["data"]["recipeName"], "Sticky Rice");
    assert_eq!(body["data"]["isMember"], true);
    assert_eq!(body["data"]["note"], "extra spicy");

    // the recipe is now claimed by the member's discord id
    let recipe = app.state.recipe_repo.find_by_id("7").await.unwrap().unwrap();
    assert!(recipe.claimed);
    assert_eq!(recipe.claimed_by.as_deref(), Some("123456789012345678"));
    assert!(recipe.claimed_at.is_some());
}

#[tokio::test]
async fn test_unknown_member_rejected() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Impostor",
        "audienceType": "member",
        "discordId": "999999999999999999",
        "cooking": false
    })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["message"].as_str().unwrap().contains("not found in member list"));
}

#[tokio::test]
async fn test_inactive_member_rejected() {
    let app = TestApp::new().await;
    let member = cookclub_backend::domain::models::member::Member::new(
        "123456789012345678".to_string(),
        "Ghost".to_string(),
        false,
    );
    app.state.member_repo.upsert(&member).await.unwrap();

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Ghost",
        "audienceType": "member",
        "discordId": "123456789012345678",
        "cooking": false
    })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cooking_without_recipe_rejected_before_any_write() {
    let app = TestApp::new().await;
    app.seed_member("123456789012345678", "Alice").await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Alice",
        "audienceType": "member",
        "discordId": "123456789012345678",
        "cooking": true
    })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let list = parse_body(app.get("/api/v1/rsvps").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_display_name_rejected() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "J",
        "audienceType": "guest",
        "email": "j@example.com",
        "cooking": false
    })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["message"].as_str().unwrap().contains("at least 2 characters"));
}

#[tokio::test]
async fn test_event_defaults_come_from_config() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Jane Doe",
        "audienceType": "guest",
        "email": "jane@example.com",
        "cooking": false
    })).await;

    let body = parse_body(res).await;
    assert_eq!(body["data"]["eventName"], "Test Potluck");
    assert_eq!(body["data"]["eventDate"], "2026-06-21");
}

#[tokio::test]
async fn test_submission_enqueues_notification_jobs() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Jane Doe",
        "audienceType": "guest",
        "email": "jane@example.com",
        "cooking": false
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let job_types: Vec<String> = sqlx::query_scalar("SELECT job_type FROM notification_jobs ORDER BY job_type")
        .fetch_all(&app.pool)
        .await
        .unwrap();
    assert_eq!(job_types, vec!["ANNOUNCE".to_string(), "GUEST_EMAIL".to_string()]);
}

#[tokio::test]
async fn test_tri_form_cooking_flag_accepted() {
    let app = TestApp::new().await;
    app.seed_member("123456789012345678", "Alice").await;
    app.seed_recipe("7", "Sticky Rice", "Main").await;

    // legacy exports send booleans as strings
    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Alice",
        "audienceType": "member",
        "discordId": "123456789012345678",
        "cooking": "TRUE",
        "recipeId": "7"
    })).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["data"]["kind"], "Cook");
}
