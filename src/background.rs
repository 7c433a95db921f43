use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::time::sleep;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::models::job::{NotificationJob, NotificationLog, JOB_ANNOUNCE, JOB_GUEST_EMAIL};
use crate::domain::models::rsvp::Rsvp;
use crate::error::AppError;
use crate::state::AppState;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const BATCH_SIZE: i32 = 10;

pub async fn start_notification_worker(state: Arc<AppState>) {
    info!("Starting notification worker...");

    loop {
        match state.notification_repo.find_due(BATCH_SIZE).await {
            Ok(jobs) => {
                for job in jobs {
                    let span = info_span!(
                        "notification_job",
                        job_id = %job.id,
                        job_type = %job.job_type,
                        rsvp_id = %job.rsvp_id
                    );

                    let state = state.clone();

                    async move {
                        info!("Processing job: {}", job.job_type);
                        match process_job(&state, &job).await {
                            Ok(_) => {
                                info!("Job completed successfully");
                                if let Err(e) = state.notification_repo.update_status(&job.id, "COMPLETED", None).await {
                                    error!("Failed to mark job as completed: {:?}", e);
                                }
                            }
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Job failed with error: {}", err_msg);
                                if let Err(up_err) = state.notification_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                                    error!("Failed to mark job as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                        .instrument(span)
                        .await;
                }
            }
            Err(e) => error!("Failed to fetch due notification jobs: {:?}", e),
        }
        sleep(POLL_INTERVAL).await;
    }
}

async fn process_job(state: &Arc<AppState>, job: &NotificationJob) -> Result<(), AppError> {
    let rsvp = state.rsvp_repo.find_by_id(&job.rsvp_id).await?
        .ok_or(AppError::NotFound(format!("RSVP {} not found", job.rsvp_id)))?;

    match job.job_type.as_str() {
        JOB_ANNOUNCE => process_announce(state, job, &rsvp).await,
        JOB_GUEST_EMAIL => process_guest_email(state, job, &rsvp).await,
        other => Err(AppError::InternalWithMsg(format!("Unknown job type {}", other))),
    }
}

async fn process_announce(state: &Arc<AppState>, job: &NotificationJob, rsvp: &Rsvp) -> Result<(), AppError> {
    let record_url = match rsvp.recipe_id.as_deref() {
        Some(id) => state.recipe_repo.find_by_id(id).await?.and_then(|r| r.record_url),
        None => None,
    };

    let (content, suppress_embeds) = format_announcement(rsvp, record_url.as_deref());

    let hash = context_hash(JOB_ANNOUNCE, "discord", &content);
    if state.notification_repo.has_been_sent("discord", JOB_ANNOUNCE, &hash).await? {
        info!("Announcement skipped (duplicate) for job {}", job.id);
        record_log(state, job, "discord", JOB_ANNOUNCE, hash, "SKIPPED_DUPLICATE").await?;
        return Ok(());
    }

    state.announcer.announce(&content, suppress_embeds).await?;
    info!("Announcement sent: {}", content);
    record_log(state, job, "discord", JOB_ANNOUNCE, hash, "SENT").await
}

async fn process_guest_email(state: &Arc<AppState>, job: &NotificationJob, rsvp: &Rsvp) -> Result<(), AppError> {
    let Some(email) = rsvp.email.as_deref() else {
        warn!("Guest email job {} has no recipient address, skipping", job.id);
        return Ok(());
    };

    let mut context = tera::Context::new();
    context.insert("display_name", &rsvp.display_name);
    context.insert("event_name", &rsvp.event_name);
    context.insert("event_date", &rsvp.event_date);
    context.insert("cooking", &rsvp.is_cooking());
    context.insert("recipe_name", &rsvp.recipe_name.as_deref().unwrap_or(""));
    context.insert("note", &rsvp.note);

    let html_body = state.templates.render("guest_confirmation.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;
    let subject = format!("RSVP Confirmation - {}", rsvp.event_name);

    let context_json = context.into_json().to_string();
    let hash = context_hash(JOB_GUEST_EMAIL, email, &context_json);
    if state.notification_repo.has_been_sent(email, JOB_GUEST_EMAIL, &hash).await? {
        info!("Guest email skipped (duplicate) for job {}. Recipient: {}", job.id, email);
        record_log(state, job, email, JOB_GUEST_EMAIL, hash, "SKIPPED_DUPLICATE").await?;
        return Ok(());
    }

    state.email_service.send(email, &subject, &html_body).await?;
    info!("Guest confirmation email sent to {}", email);
    record_log(state, job, email, JOB_GUEST_EMAIL, hash, "SENT").await
}

async fn record_log(
    state: &Arc<AppState>,
    job: &NotificationJob,
    recipient: &str,
    kind: &str,
    context_hash: String,
    status: &str,
) -> Result<(), AppError> {
    let entry = NotificationLog {
        id: Uuid::new_v4().to_string(),
        job_id: job.id.clone(),
        recipient: recipient.to_string(),
        kind: kind.to_string(),
        context_hash,
        sent_at: Utc::now(),
        status: status.to_string(),
    };
    state.notification_repo.log(&entry).await
}

fn context_hash(kind: &str, recipient: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(recipient.as_bytes());
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Builds the chat announcement for an RSVP. Members get a real mention,
/// guests a bolded name. Returns the content plus whether link embeds should
/// be suppressed (only when an Instagram link is appended).
fn format_announcement(rsvp: &Rsvp, record_url: Option<&str>) -> (String, bool) {
    let mention = match rsvp.discord_id.as_deref() {
        Some(id) if !id.is_empty() => format!("<@{}>", id),
        _ => format!("**{}**", rsvp.display_name),
    };

    let mut content = if rsvp.is_cooking() {
        let recipe_name = rsvp.recipe_name.as_deref().unwrap_or("a recipe");
        let link = match record_url {
            Some(url) => format!("[{}]({})", recipe_name, url),
            None => recipe_name.to_string(),
        };
        format!("{} is bringing {}!", mention, link)
    } else {
        format!("{} will be at the table!", mention)
    };

    let mut suppress_embeds = false;
    if let Some(handle) = rsvp.instagram_handle.as_deref() {
        let clean = handle.trim_start_matches('@');
        content.push_str(&format!(" [@{}](https://instagram.com/{})", clean, clean));
        suppress_embeds = true;
    }

    if let Some(note) = rsvp.note.as_deref() {
        let note = note.trim();
        if !note.is_empty() {
            content.push_str(&format!("\n> {}", note));
        }
    }

    (content, suppress_embeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::rsvp::{NewRsvpParams, Rsvp};

    fn cook_rsvp() -> Rsvp {
        Rsvp::new(NewRsvpParams {
            cooking: true,
            recipe_name: Some("Sticky Rice".to_string()),
            recipe_id: Some("7".to_string()),
            display_name: "Alice".to_string(),
            discord_id: Some("123456789012345678".to_string()),
            instagram_handle: None,
            email: None,
            is_member: true,
            guest_count: 0,
            event_name: "Potluck".to_string(),
            event_date: "2026-06-21".to_string(),
            note: None,
        })
    }

    #[test]
    fn test_announcement_mentions_member_and_links_recipe() {
        let rsvp = cook_rsvp();
        let (content, suppress) = format_announcement(&rsvp, Some("https://example.com/r/7"));
        assert_eq!(content, "<@123456789012345678> is bringing [Sticky Rice](https://example.com/r/7)!");
        assert!(!suppress);
    }

    #[test]
    fn test_announcement_bolds_guest_without_discord_id() {
        let mut rsvp = cook_rsvp();
        rsvp.discord_id = None;
        rsvp.display_name = "Jane".to_string();
        let (content, _) = format_announcement(&rsvp, None);
        assert!(content.starts_with("**Jane** is bringing Sticky Rice!"));
    }

    #[test]
    fn test_announcement_guest_attendance_with_instagram_and_note() {
        let mut rsvp = cook_rsvp();
        rsvp.kind = "Guest".to_string();
        rsvp.discord_id = None;
        rsvp.instagram_handle = Some("@jane.doe".to_string());
        rsvp.note = Some("bringing a plus one".to_string());
        let (content, suppress) = format_announcement(&rsvp, None);
        assert!(content.contains("will be at the table!"));
        assert!(content.contains("[@jane.doe](https://instagram.com/jane.doe)"));
        assert!(content.ends_with("> bringing a plus one"));
        assert!(suppress);
    }

    #[test]
    fn test_context_hash_is_stable() {
        assert_eq!(context_hash("ANNOUNCE", "discord", "x"), context_hash("ANNOUNCE", "discord", "x"));
        assert_ne!(context_hash("ANNOUNCE", "discord", "x"), context_hash("ANNOUNCE", "discord", "y"));
    }
}
