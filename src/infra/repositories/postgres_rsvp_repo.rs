use crate::domain::{models::rsvp::Rsvp, ports::RsvpRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const RSVP_COLUMNS: &str = "id, kind, recipe_name, recipe_id, display_name, discord_id, instagram_handle, email, is_member, guest_count, created_at, event_name, event_date, note";

pub struct PostgresRsvpRepo {
    pool: PgPool,
}

impl PostgresRsvpRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RsvpRepository for PostgresRsvpRepo {
    async fn append(&self, rsvp: &Rsvp) -> Result<Rsvp, AppError> {
        sqlx::query_as::<_, Rsvp>(&format!(
            "INSERT INTO rsvps ({RSVP_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {RSVP_COLUMNS}"
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
        sqlx::query_as::<_, Rsvp>(&format!("SELECT {RSVP_COLUMNS} FROM rsvps WHERE id = $1"))
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
            "SELECT {RSVP_COLUMNS} FROM rsvps WHERE created_at > $1 ORDER BY created_at"
        ))
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
