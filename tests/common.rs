use cookclub_backend::{
    api::router::create_router,
    background::start_notification_worker,
    config::Config,
    domain::models::member::Member,
    domain::models::recipe::Recipe,
    domain::ports::{Announcer, EmailService},
    error::AppError,
    infra::repositories::{
        sqlite_member_repo::SqliteMemberRepo,
        sqlite_notification_repo::SqliteNotificationRepo,
        sqlite_recipe_repo::SqliteRecipeRepo,
        sqlite_rsvp_repo::SqliteRsvpRepo,
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use chrono::Utc;
use serde_json::Value;
use tera::Tera;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
pub struct MockAnnouncer {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Announcer for MockAnnouncer {
    async fn announce(&self, content: &str, _suppress_embeds: bool) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<(String, String)>>, // (recipient, subject)
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, _html_body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((recipient.to_string(), subject.to_string()));
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub announcer: Arc<MockAnnouncer>,
    pub email: Arc<MockEmailService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template(
            "guest_confirmation.html",
            "<html>Hi {{ display_name }}, see you at {{ event_name }}!</html>",
        ).unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            event_name: "Test Potluck".to_string(),
            event_date: "2026-06-21".to_string(),
            discord_webhook_url: None,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            allowed_origin: None,
        };

        let announcer = Arc::new(MockAnnouncer::default());
        let email = Arc::new(MockEmailService::default());

        let state = Arc::new(AppState {
            config: config.clone(),
            member_repo: Arc::new(SqliteMemberRepo::new(pool.clone())),
            recipe_repo: Arc::new(SqliteRecipeRepo::new(pool.clone())),
            rsvp_repo: Arc::new(SqliteRsvpRepo::new(pool.clone())),
            notification_repo: Arc::new(SqliteNotificationRepo::new(pool.clone())),
            announcer: announcer.clone(),
            email_service: email.clone(),
            templates,
        });

        // Start notification worker
        let worker_state = state.clone();
        tokio::spawn(async move {
            start_notification_worker(worker_state).await;
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            announcer,
            email,
        }
    }

    pub async fn seed_member(&self, discord_id: &str, display_name: &str) {
        let member = Member::new(discord_id.to_string(), display_name.to_string(), true);
        self.state.member_repo.upsert(&member).await.expect("failed to seed member");
    }

    pub async fn seed_recipe(&self, id: &str, title: &str, categories: &str) {
        let recipe = Recipe {
            id: id.to_string(),
            title: title.to_string(),
            page: "12".to_string(),
            book: "That Sounds So Good".to_string(),
            author: "Ali Slagle".to_string(),
            categories: categories.to_string(),
            ingredients: "olive oil; salt".to_string(),
            accompaniments: String::new(),
            record_url: Some(format!("https://example.com/recipes/{id}")),
            claimed: false,
            claimed_by: None,
            claimed_at: None,
            created_at: Utc::now(),
        };
        self.state.recipe_repo.upsert(&recipe).await.expect("failed to seed recipe");
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
