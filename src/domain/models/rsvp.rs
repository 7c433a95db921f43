use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const KIND_COOK: &str = "Cook";
pub const KIND_GUEST: &str = "Guest";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Rsvp {
    pub id: String, // time-based, matching the legacy claim ids
    pub kind: String, // "Cook" or "Guest"
    pub recipe_name: Option<String>,
    pub recipe_id: Option<String>,
    pub display_name: String,
    pub discord_id: Option<String>,
    pub instagram_handle: Option<String>,
    pub email: Option<String>,
    pub is_member: bool,
    pub guest_count: i32,
    pub created_at: DateTime<Utc>,
    pub event_name: String,
    pub event_date: String,
    pub note: Option<String>,
}

pub struct NewRsvpParams {
    pub cooking: bool,
    pub recipe_name: Option<String>,
    pub recipe_id: Option<String>,
    pub display_name: String,
    pub discord_id: Option<String>,
    pub instagram_handle: Option<String>,
    pub email: Option<String>,
    pub is_member: bool,
    pub guest_count: i32,
    pub event_name: String,
    pub event_date: String,
    pub note: Option<String>,
}

impl Rsvp {
    pub fn new(params: NewRsvpParams) -> Self {
        let now = Utc::now();
        Self {
            // microsecond resolution: two submissions in the same millisecond
            // must not collide on the primary key
            id: now.timestamp_micros().to_string(),
            kind: if params.cooking { KIND_COOK.to_string() } else { KIND_GUEST.to_string() },
            recipe_name: if params.cooking { params.recipe_name } else { None },
            recipe_id: if params.cooking { params.recipe_id } else { None },
            display_name: params.display_name,
            discord_id: params.discord_id,
            instagram_handle: params.instagram_handle,
            email: params.email,
            is_member: params.is_member,
            guest_count: params.guest_count,
            created_at: now,
            event_name: params.event_name,
            event_date: params.event_date,
            note: params.note,
        }
    }

    pub fn is_cooking(&self) -> bool {
        self.kind == KIND_COOK
    }
}
