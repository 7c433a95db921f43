use crate::domain::ports::Announcer;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

// Discord message flag that suppresses link preview embeds.
const SUPPRESS_EMBEDS: u32 = 4;

pub struct DiscordWebhookAnnouncer {
    client: Client,
    webhook_url: Option<String>,
}

impl DiscordWebhookAnnouncer {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<u32>,
}

#[async_trait]
impl Announcer for DiscordWebhookAnnouncer {
    async fn announce(&self, content: &str, suppress_embeds: bool) -> Result<(), AppError> {
        let Some(url) = self.webhook_url.as_deref() else {
            info!("Discord webhook not configured, skipping announcement");
            return Ok(());
        };

        let payload = WebhookPayload {
            content,
            flags: suppress_embeds.then_some(SUPPRESS_EMBEDS),
        };

        let res = self.client.post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Discord webhook connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Discord webhook failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}
