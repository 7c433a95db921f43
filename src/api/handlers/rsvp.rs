use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::dtos::requests::SubmitRsvpRequest;
use crate::api::dtos::responses::{ApiEnvelope, RsvpView};
use crate::domain::models::job::{NotificationJob, JOB_ANNOUNCE, JOB_GUEST_EMAIL};
use crate::domain::models::rsvp::{NewRsvpParams, Rsvp};
use crate::domain::services::validation::{validate_submission, SubmissionInput};
use crate::error::AppError;
use crate::state::AppState;

pub async fn submit_rsvp(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitRsvpRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("submit_rsvp: Starting for {}", payload.display_name);

    let input = SubmissionInput {
        audience_type: &payload.audience_type,
        display_name: &payload.display_name,
        discord_id: payload.discord_id.as_deref(),
        instagram_handle: payload.instagram_handle.as_deref(),
        email: payload.email.as_deref(),
        cooking: payload.cooking,
        recipe_id: payload.recipe_id.as_deref(),
        guest_count: payload.guest_count.unwrap_or(0),
        note: payload.note.as_deref(),
    };

    let normalized = validate_submission(&input)
        .map_err(|errors| AppError::Validation(errors.join(", ")))?;

    let mut is_member = false;
    if normalized.is_member() {
        let discord_id = normalized.discord_id.as_deref().ok_or(AppError::Internal)?;
        match state.member_repo.find_by_discord_id(discord_id).await? {
            Some(member) if member.active => is_member = true,
            _ => {
                return Err(AppError::Validation(
                    "Invalid member - Discord ID not found in member list".into(),
                ))
            }
        }
    }

    // Claiming before appending: if the claim loses we write nothing at all.
    let mut recipe_name = None;
    if normalized.cooking {
        let recipe_id = normalized.recipe_id.as_deref().ok_or(AppError::Internal)?;
        let recipe = state.recipe_repo.find_by_id(recipe_id).await?
            .ok_or(AppError::NotFound("Recipe not found".into()))?;

        let claimer = normalized.discord_id.clone()
            .unwrap_or_else(|| normalized.display_name.clone());

        let won = state.recipe_repo.claim(&recipe.id, &claimer, Utc::now()).await?;
        if !won {
            warn!("submit_rsvp: duplicate claim attempt on recipe {}", recipe.id);
            return Err(AppError::Conflict(
                "This recipe has already been claimed. Please choose another one.".into(),
            ));
        }

        info!("submit_rsvp: recipe {} claimed by {}", recipe.id, claimer);
        recipe_name = Some(recipe.title);
    }

    let rsvp = Rsvp::new(NewRsvpParams {
        cooking: normalized.cooking,
        recipe_name,
        recipe_id: normalized.recipe_id.clone(),
        display_name: normalized.display_name.clone(),
        discord_id: if normalized.is_member() { normalized.discord_id.clone() } else { None },
        instagram_handle: if normalized.is_member() { None } else { normalized.instagram_handle.clone() },
        email: normalized.email.clone(),
        is_member,
        guest_count: normalized.guest_count,
        event_name: payload.event_name.clone().unwrap_or_else(|| state.config.event_name.clone()),
        event_date: payload.event_date.clone().unwrap_or_else(|| state.config.event_date.clone()),
        note: normalized.note.clone(),
    });

    let created = state.rsvp_repo.append(&rsvp).await?;
    info!("submit_rsvp: RSVP recorded: {} ({})", created.id, created.kind);

    // Notifications are best-effort and must never fail the submission.
    let announce = NotificationJob::new(JOB_ANNOUNCE, created.id.clone(), Utc::now());
    if let Err(e) = state.notification_repo.create(&announce).await {
        error!("Failed to enqueue announcement for RSVP {}: {:?}", created.id, e);
    }
    if !is_member && created.email.is_some() {
        let email_job = NotificationJob::new(JOB_GUEST_EMAIL, created.id.clone(), Utc::now());
        if let Err(e) = state.notification_repo.create(&email_job).await {
            error!("Failed to enqueue guest email for RSVP {}: {:?}", created.id, e);
        }
    }

    Ok(Json(ApiEnvelope::ok("RSVP submitted successfully", RsvpView::from(created))))
}

pub async fn list_rsvps(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rsvps = state.rsvp_repo.list().await?;
    let views: Vec<RsvpView> = rsvps.into_iter().map(RsvpView::from).collect();
    Ok(Json(ApiEnvelope::ok("RSVPs retrieved successfully", views)))
}
