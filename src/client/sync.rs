use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::Notify;
use tokio::time::interval;
use tracing::{error, info, warn};

use super::api::{ApiClient, ClientError};

pub const TOPIC_MENU: &str = "menu";
pub const TOPIC_CONNECTIVITY: &str = "connectivity";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_POST_SUBMIT_DELAY: Duration = Duration::from_secs(3);

type Subscriber = Arc<dyn Fn(&Value) + Send + Sync>;

/// Topic string -> ordered callbacks. A panicking subscriber is caught and
/// logged so it cannot block the ones registered after it.
#[derive(Default)]
pub struct SubscriberRegistry {
    topics: Mutex<HashMap<String, Vec<Subscriber>>>,
}

impl SubscriberRegistry {
    pub fn subscribe(&self, topic: &str, callback: impl Fn(&Value) + Send + Sync + 'static) {
        let mut topics = self.topics.lock().unwrap();
        topics.entry(topic.to_string()).or_default().push(Arc::new(callback));
    }

    pub fn publish(&self, topic: &str, payload: &Value) {
        let subscribers = {
            let topics = self.topics.lock().unwrap();
            topics.get(topic).cloned().unwrap_or_default()
        };

        for (index, subscriber) in subscribers.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| subscriber(payload))).is_err() {
                error!("subscriber {} for topic '{}' panicked", index, topic);
            }
        }
    }
}

#[derive(Clone)]
pub struct SyncConfig {
    pub poll_interval: Duration,
    pub probe_interval: Duration,
    pub post_submit_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            probe_interval: DEFAULT_PROBE_INTERVAL,
            post_submit_delay: DEFAULT_POST_SUBMIT_DELAY,
        }
    }
}

/// Polls the change feed against a last-seen cursor and reloads the full
/// menu when anything changed (updates are a signal, not a delta). A slower
/// connectivity probe flips the client's online flag and, on reconnect,
/// flushes the offline queue and forces a sync.
pub struct MenuSync {
    client: Arc<ApiClient>,
    registry: Arc<SubscriberRegistry>,
    config: SyncConfig,
    cursor: AtomicI64,
    visible: AtomicBool,
    stop: Notify,
}

impl MenuSync {
    pub fn new(client: Arc<ApiClient>, registry: Arc<SubscriberRegistry>, config: SyncConfig) -> Self {
        Self {
            client,
            registry,
            config,
            cursor: AtomicI64::new(0),
            visible: AtomicBool::new(true),
            stop: Notify::new(),
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor.load(Ordering::SeqCst)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Mirrors the page visibility signal: polling pauses while hidden.
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    /// One poll cycle. Returns true when subscribers were notified.
    pub async fn sync_once(&self) -> Result<bool, ClientError> {
        let updates = self.client.fetch_menu_updates(self.cursor()).await?;
        if !updates.has_updates {
            return Ok(false);
        }

        let menu = self.client.fetch_menu().await?;
        let payload = serde_json::to_value(&menu)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        self.registry.publish(TOPIC_MENU, &payload);

        self.cursor.store(updates.latest, Ordering::SeqCst);
        info!("menu synced, cursor advanced to {}", updates.latest);
        Ok(true)
    }

    /// Connectivity probe. An offline-to-online transition flushes the
    /// write queue and forces an immediate sync.
    pub async fn probe(&self) {
        let was_online = self.client.is_online();
        let alive = self.client.ping().await;
        self.client.set_online(alive);

        if alive && !was_online {
            info!("connectivity restored");
            let flushed = self.client.flush_queue().await;
            if flushed > 0 {
                info!("replayed {} queued submissions", flushed);
            }
            if let Err(e) = self.sync_once().await {
                warn!("post-reconnect sync failed: {}", e);
            }
            self.registry.publish(TOPIC_CONNECTIVITY, &json!({ "online": true }));
        } else if !alive && was_online {
            self.registry.publish(TOPIC_CONNECTIVITY, &json!({ "online": false }));
        }
    }

    /// Called after a confirmed submission: waits briefly so the first
    /// refresh lands after the backend's notification worker has run, then
    /// syncs.
    pub async fn notify_submitted(&self) {
        tokio::time::sleep(self.config.post_submit_delay).await;
        if let Err(e) = self.sync_once().await {
            warn!("post-submission sync failed: {}", e);
        }
    }

    pub fn shutdown(&self) {
        self.stop.notify_one();
    }

    pub async fn run(&self) {
        info!("Starting menu sync loop...");

        let mut poll = interval(self.config.poll_interval);
        let mut probe = interval(self.config.probe_interval);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    if self.is_visible() && self.client.is_online() {
                        if let Err(e) = self.sync_once().await {
                            error!("Sync failed: {}", e);
                        }
                    }
                }
                _ = probe.tick() => {
                    self.probe().await;
                }
                _ = self.stop.notified() => {
                    info!("Menu sync loop stopped");
                    break;
                }
            }
        }
    }
}
