pub mod discord_webhook;
pub mod http_email_service;
