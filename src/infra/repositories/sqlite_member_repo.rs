use crate::domain::{models::member::Member, ports::MemberRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteMemberRepo {
    pool: SqlitePool,
}

impl SqliteMemberRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepo {
    async fn upsert(&self, member: &Member) -> Result<Member, AppError> {
        sqlx::query_as::<_, Member>(
            "INSERT INTO members (discord_id, display_name, active, created_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(discord_id) DO UPDATE SET display_name = excluded.display_name, active = excluded.active \
             RETURNING discord_id, display_name, active, created_at",
        )
            .bind(&member.discord_id)
            .bind(&member.display_name)
            .bind(member.active)
            .bind(member.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_discord_id(&self, discord_id: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>(
            "SELECT discord_id, display_name, active, created_at FROM members WHERE discord_id = ?",
        )
            .bind(discord_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<Member>, AppError> {
        sqlx::query_as::<_, Member>(
            "SELECT discord_id, display_name, active, created_at FROM members WHERE active = TRUE ORDER BY display_name",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
