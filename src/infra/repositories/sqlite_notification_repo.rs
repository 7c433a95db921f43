use crate::domain::{
    models::job::{NotificationJob, NotificationLog},
    ports::NotificationJobRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteNotificationRepo {
    pool: SqlitePool,
}

impl SqliteNotificationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationJobRepository for SqliteNotificationRepo {
    async fn create(&self, job: &NotificationJob) -> Result<NotificationJob, AppError> {
        sqlx::query_as::<_, NotificationJob>(
            "INSERT INTO notification_jobs (id, job_type, rsvp_id, execute_at, status, error_message, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
            .bind(&job.id)
            .bind(&job.job_type)
            .bind(&job.rsvp_id)
            .bind(job.execute_at)
            .bind(&job.status)
            .bind(&job.error_message)
            .bind(job.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_due(&self, limit: i32) -> Result<Vec<NotificationJob>, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, NotificationJob>(
            "UPDATE notification_jobs SET status = 'PROCESSING' WHERE id IN \
             (SELECT id FROM notification_jobs WHERE status = 'PENDING' AND execute_at <= ? LIMIT ?) RETURNING *",
        )
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE notification_jobs SET status = ?, error_message = ? WHERE id = ?")
            .bind(status)
            .bind(error_message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn log(&self, entry: &NotificationLog) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notification_log (id, job_id, recipient, kind, context_hash, sent_at, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
            .bind(&entry.id)
            .bind(&entry.job_id)
            .bind(&entry.recipient)
            .bind(&entry.kind)
            .bind(&entry.context_hash)
            .bind(entry.sent_at)
            .bind(&entry.status)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn has_been_sent(&self, recipient: &str, kind: &str, context_hash: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notification_log WHERE recipient = ? AND kind = ? AND context_hash = ? AND status = 'SENT'",
        )
            .bind(recipient)
            .bind(kind)
            .bind(context_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(count > 0)
    }
}
