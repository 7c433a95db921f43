mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;
use tokio::time::sleep;

/// The worker polls every few seconds; give it room without hanging forever.
async fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        sleep(Duration::from_millis(100)).await;
    }
    false
}

#[tokio::test]
async fn test_cook_submission_announces_with_recipe_link() {
    let app = TestApp::new().await;
    app.seed_member("123456789012345678", "Alice").await;
    app.seed_recipe("7", "Sticky Rice", "Main").await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Alice",
        "audienceType": "member",
        "discordId": "123456789012345678",
        "cooking": true,
        "recipeId": "7"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let announced = wait_until(|| !app.announcer.sent.lock().unwrap().is_empty()).await;
    assert!(announced, "announcement never dispatched");

    let sent = app.announcer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("<@123456789012345678> is bringing"));
    assert!(sent[0].contains("[Sticky Rice](https://example.com/recipes/7)"));
}

#[tokio::test]
async fn test_guest_with_email_gets_confirmation() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Jane Doe",
        "audienceType": "guest",
        "email": "jane@example.com",
        "cooking": false
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let emailed = wait_until(|| !app.email.sent.lock().unwrap().is_empty()).await;
    assert!(emailed, "guest email never dispatched");

    let sent = app.email.sent.lock().unwrap();
    assert_eq!(sent[0].0, "jane@example.com");
    assert_eq!(sent[0].1, "RSVP Confirmation - Test Potluck");

    // the guest announcement also fires
    drop(sent);
    let announced = wait_until(|| !app.announcer.sent.lock().unwrap().is_empty()).await;
    assert!(announced);
    let announcements = app.announcer.sent.lock().unwrap();
    assert!(announcements[0].contains("**Jane Doe** will be at the table!"));
}

#[tokio::test]
async fn test_member_without_email_gets_no_confirmation_mail() {
    let app = TestApp::new().await;
    app.seed_member("123456789012345678", "Alice").await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Alice",
        "audienceType": "member",
        "discordId": "123456789012345678",
        "cooking": false
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let announced = wait_until(|| !app.announcer.sent.lock().unwrap().is_empty()).await;
    assert!(announced);
    assert!(app.email.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_jobs_are_marked_completed() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/rsvps", json!({
        "displayName": "Jane Doe",
        "audienceType": "guest",
        "instagramHandle": "@jane",
        "cooking": false
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let announced = wait_until(|| !app.announcer.sent.lock().unwrap().is_empty()).await;
    assert!(announced);

    // give the status update a moment to land after the send
    sleep(Duration::from_millis(500)).await;
    let statuses: Vec<String> = sqlx::query_scalar("SELECT status FROM notification_jobs")
        .fetch_all(&app.pool)
        .await
        .unwrap();
    assert!(statuses.iter().all(|s| s == "COMPLETED"), "statuses: {:?}", statuses);

    // and the notification log records the send
    let log_statuses: Vec<String> = sqlx::query_scalar("SELECT status FROM notification_log")
        .fetch_all(&app.pool)
        .await
        .unwrap();
    assert!(log_statuses.contains(&"SENT".to_string()));
}

#[tokio::test]
async fn test_rsvp_listing_is_newest_first() {
    let app = TestApp::new().await;

    for (name, handle) in [("Jane Doe", "@jane"), ("Joe Bloggs", "@joe")] {
        let res = app.post_json("/api/v1/rsvps", json!({
            "displayName": name,
            "audienceType": "guest",
            "instagramHandle": handle,
            "cooking": false
        })).await;
        assert_eq!(res.status(), StatusCode::OK);
        // distinct created_at values keep the ordering observable
        sleep(Duration::from_millis(10)).await;
    }

    let list = parse_body(app.get("/api/v1/rsvps").await).await;
    let rows = list["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["displayName"], "Joe Bloggs");
    assert_eq!(rows[1]["displayName"], "Jane Doe");
}
