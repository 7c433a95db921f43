use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub event_name: String,
    pub event_date: String,
    pub discord_webhook_url: Option<String>,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            event_name: env::var("EVENT_NAME").unwrap_or_else(|_| "Cookbook Club Potluck".to_string()),
            event_date: env::var("EVENT_DATE").unwrap_or_else(|_| "2026-01-01".to_string()),
            discord_webhook_url: env::var("DISCORD_WEBHOOK_URL").ok(),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            allowed_origin: env::var("ALLOWED_ORIGIN").ok(),
        }
    }
}
