use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const JOB_ANNOUNCE: &str = "ANNOUNCE";
pub const JOB_GUEST_EMAIL: &str = "GUEST_EMAIL";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct NotificationJob {
    pub id: String,
    pub job_type: String, // "ANNOUNCE" or "GUEST_EMAIL"
    pub rsvp_id: String,
    pub execute_at: DateTime<Utc>,
    pub status: String, // PENDING, PROCESSING, COMPLETED, FAILED
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NotificationJob {
    pub fn new(job_type: &str, rsvp_id: String, execute_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_type: job_type.to_string(),
            rsvp_id,
            execute_at,
            status: "PENDING".to_string(),
            error_message: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct NotificationLog {
    pub id: String,
    pub job_id: String,
    pub recipient: String,
    pub kind: String,
    pub context_hash: String,
    pub sent_at: DateTime<Utc>,
    pub status: String, // SENT or SKIPPED_DUPLICATE
}
