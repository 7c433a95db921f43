use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Member {
    pub discord_id: String,
    pub display_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(discord_id: String, display_name: String, active: bool) -> Self {
        Self {
            discord_id,
            display_name,
            active,
            created_at: Utc::now(),
        }
    }
}
