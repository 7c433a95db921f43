use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::dtos::requests::SubmitRsvpRequest;
use crate::api::dtos::responses::{ApiEnvelope, FormData, MenuData, MenuUpdates, RsvpView};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Server-confirmed: the backend validated, wrote the record, and said so.
    Accepted { message: String, rsvp: Option<RsvpView> },
    /// Held in the offline queue; nothing has reached the server yet.
    Queued,
}

struct CacheEntry {
    fetched_at: Instant,
    value: serde_json::Value,
}

/// All network I/O from the client side. Reads go through a TTL cache for
/// cacheable topics; writes return the server's real verdict, and are queued
/// FIFO while the connectivity flag is down.
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    cache: Mutex<HashMap<String, CacheEntry>>,
    online: AtomicBool,
    queue: Mutex<VecDeque<SubmitRsvpRequest>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            config,
            cache: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    pub fn set_online(&self, online: bool) {
        let was = self.online.swap(online, Ordering::SeqCst);
        if was != online {
            info!("connectivity changed: online = {}", online);
        }
    }

    pub async fn ping(&self) -> bool {
        let url = format!("{}/health", self.config.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn fetch_form_data(&self) -> Result<FormData, ClientError> {
        self.get_json("/api/v1/form-data", Some("form-data")).await
    }

    /// The menu is never cached: the display widgets want live claim state.
    pub async fn fetch_menu(&self) -> Result<MenuData, ClientError> {
        self.get_json("/api/v1/menu", None).await
    }

    pub async fn fetch_menu_updates(&self, since: i64) -> Result<MenuUpdates, ClientError> {
        self.get_json(&format!("/api/v1/menu/updates?since={since}"), None).await
    }

    pub async fn submit(&self, payload: SubmitRsvpRequest) -> Result<SubmitOutcome, ClientError> {
        if !self.is_online() {
            let mut queue = self.queue.lock().unwrap();
            queue.push_back(payload);
            info!("offline: submission queued ({} pending)", queue.len());
            return Ok(SubmitOutcome::Queued);
        }

        self.send_submit(&payload).await
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// FIFO best-effort replay after reconnect. A transport failure puts the
    /// item back at the front and stops the flush; a server rejection drops
    /// the item since its outcome is known. Returns how many submissions the
    /// server confirmed. No idempotency key is attached, so a replay after a
    /// partially-successful original can create a duplicate record.
    pub async fn flush_queue(&self) -> usize {
        let mut flushed = 0;

        loop {
            let payload = {
                let mut queue = self.queue.lock().unwrap();
                queue.pop_front()
            };
            let Some(payload) = payload else { break };

            match self.send_submit(&payload).await {
                Ok(_) => flushed += 1,
                Err(ClientError::Rejected(msg)) => {
                    warn!("queued submission rejected by server: {}", msg);
                }
                Err(e) => {
                    warn!("flush failed, re-queueing: {}", e);
                    self.queue.lock().unwrap().push_front(payload);
                    break;
                }
            }
        }

        flushed
    }

    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
    }

    async fn send_submit(&self, payload: &SubmitRsvpRequest) -> Result<SubmitOutcome, ClientError> {
        let url = format!("{}/api/v1/rsvps", self.config.base_url);
        let response = self.http.post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<RsvpView> = response.json().await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if !envelope.success {
            return Err(ClientError::Rejected(envelope.message));
        }

        // A confirmed write changes claim state; cached reads are stale now.
        self.clear_cache();

        Ok(SubmitOutcome::Accepted { message: envelope.message, rsvp: envelope.data })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, cache_key: Option<&str>) -> Result<T, ClientError> {
        if let Some(key) = cache_key
            && let Some(value) = self.cached(key) {
            return serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()));
        }

        let url = format!("{}{}", self.config.base_url, path);
        let response = self.http.get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<serde_json::Value> = response.json().await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if !envelope.success {
            return Err(ClientError::Rejected(envelope.message));
        }
        let data = envelope.data.ok_or_else(|| ClientError::Decode("response envelope missing data".into()))?;

        if let Some(key) = cache_key {
            let mut cache = self.cache.lock().unwrap();
            cache.insert(key.to_string(), CacheEntry { fetched_at: Instant::now(), value: data.clone() });
        }

        serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn cached(&self, key: &str) -> Option<serde_json::Value> {
        let cache = self.cache.lock().unwrap();
        cache.get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.config.cache_ttl)
            .map(|entry| entry.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> SubmitRsvpRequest {
        SubmitRsvpRequest {
            display_name: name.to_string(),
            audience_type: "guest".to_string(),
            discord_id: None,
            instagram_handle: Some("@jane".to_string()),
            email: None,
            cooking: false,
            recipe_id: None,
            guest_count: None,
            note: None,
            event_name: None,
            event_date: None,
        }
    }

    #[tokio::test]
    async fn test_offline_submit_queues_without_network() {
        // base_url points nowhere; offline submissions must not touch it
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:1"));
        client.set_online(false);

        let outcome = client.submit(payload("Jane")).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Queued));
        assert_eq!(client.queue_len(), 1);

        let outcome = client.submit(payload("Joe")).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Queued));
        assert_eq!(client.queue_len(), 2);
    }

    #[tokio::test]
    async fn test_flush_requeues_on_transport_failure() {
        // flush against a dead endpoint: the item must survive
        let mut config = ClientConfig::new("http://127.0.0.1:1");
        config.timeout = Duration::from_millis(200);
        let client = ApiClient::new(config);
        client.set_online(false);
        client.submit(payload("Jane")).await.unwrap();

        client.set_online(true);
        let flushed = client.flush_queue().await;
        assert_eq!(flushed, 0);
        assert_eq!(client.queue_len(), 1);
    }

    #[tokio::test]
    async fn test_online_submit_transport_error_is_not_queued() {
        let mut config = ClientConfig::new("http://127.0.0.1:1");
        config.timeout = Duration::from_millis(200);
        let client = ApiClient::new(config);

        let result = client.submit(payload("Jane")).await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
        assert_eq!(client.queue_len(), 0);
    }
}
