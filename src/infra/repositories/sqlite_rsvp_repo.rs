use crate::domain::{models::rsvp::Rsvp, ports::RsvpRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const RSVP_COLUMNS: &str = "id, kind, recipe_name, recipe_id, display_name, discord_id, instagram_handle, email, is_member, guest_count, created_at, event_name, event_date, note";

pub struct SqliteRsvpRepo {
    pool: SqlitePool,
}

impl SqliteRsvpRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RsvpRepository for SqliteRsvpRepo {
    async fn append(&self, rsvp: &Rsvp) -> Result<Rsvp, AppError> {
        sqlx::query_as::<_, Rsvp>(&format!(
            "INSERT INTO rsvps ({RSVP_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {RSVP_COLUMNS}"
        ))
            .bind(&rsvp.id)
            .bind(&rsvp.kind)
            .bind(&rsvp.recipe_name)
            .bind(&rsvp.recipe_id)
            .bind(&rsvp.display_name)
            .bind(&rsvp.discord_id)
            .bind(&rsvp.instagram_handle)
            .bind(&rsvp.email)
            .bind(rsvp.is_member)
            .bind(rsvp.guest_count)
            .bind(rsvp.created_at)
            .bind(&rsvp.event_name)
            .bind(&rsvp.event_date)
            .bind(&rsvp.note)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Rsvp>, AppError> {
        sqlx::query_as::<_, Rsvp>(&format!("SELECT {RSVP_COLUMNS} FROM rsvps WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Rsvp>, AppError> {
        sqlx::query_as::<_, Rsvp>(&format!("SELECT {RSVP_COLUMNS} FROM rsvps ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Rsvp>, AppError> {
        sqlx::query_as::<_, Rsvp>(&format!(
            "SELECT {RSVP_COLUMNS} FROM rsvps WHERE created_at > ? ORDER BY created_at"
        ))
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
