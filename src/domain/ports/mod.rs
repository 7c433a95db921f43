use crate::domain::models::{
    job::{NotificationJob, NotificationLog},
    member::Member,
    recipe::Recipe,
    rsvp::Rsvp,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn upsert(&self, member: &Member) -> Result<Member, AppError>;
    async fn find_by_discord_id(&self, discord_id: &str) -> Result<Option<Member>, AppError>;
    async fn list_active(&self) -> Result<Vec<Member>, AppError>;
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn upsert(&self, recipe: &Recipe) -> Result<Recipe, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, AppError>;
    async fn list(&self) -> Result<Vec<Recipe>, AppError>;
    /// Atomic conditional claim: flips claimed only if it is currently false.
    /// Returns true when this caller won the claim, false when the recipe was
    /// already taken. Never reports a missing recipe as claimable.
    async fn claim(&self, id: &str, claimed_by: &str, at: DateTime<Utc>) -> Result<bool, AppError>;
    async fn claimed_since(&self, since: DateTime<Utc>) -> Result<Vec<Recipe>, AppError>;
}

#[async_trait]
pub trait RsvpRepository: Send + Sync {
    async fn append(&self, rsvp: &Rsvp) -> Result<Rsvp, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Rsvp>, AppError>;
    async fn list(&self) -> Result<Vec<Rsvp>, AppError>;
    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Rsvp>, AppError>;
}

#[async_trait]
pub trait NotificationJobRepository: Send + Sync {
    async fn create(&self, job: &NotificationJob) -> Result<NotificationJob, AppError>;
    /// Claims up to `limit` due PENDING jobs by flipping them to PROCESSING.
    async fn find_due(&self, limit: i32) -> Result<Vec<NotificationJob>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
    async fn log(&self, entry: &NotificationLog) -> Result<(), AppError>;
    async fn has_been_sent(&self, recipient: &str, kind: &str, context_hash: &str) -> Result<bool, AppError>;
}

/// Posts an announcement to the club's chat channel (a Discord webhook in
/// production). Failures must be surfaced, never panicked.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, content: &str, suppress_embeds: bool) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
