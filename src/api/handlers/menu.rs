use axum::{extract::{Query, State}, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::dtos::responses::{ApiEnvelope, MenuChange, MenuUpdates};
use crate::domain::services::menu::build_menu;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_menu(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = state.recipe_repo.list().await?;
    let rsvps = state.rsvp_repo.list().await?;
    let members = state.member_repo.list_active().await?;

    let menu = build_menu(&state.event_info(), &recipes, &rsvps, &members);

    Ok(Json(ApiEnvelope::ok("Menu retrieved successfully", menu)))
}

#[derive(Deserialize)]
pub struct MenuUpdatesQuery {
    pub since: Option<i64>,
}

/// Change feed for the polling sync loop. `since` is the client's last-seen
/// cursor in epoch milliseconds; the reply carries the new cursor value.
pub async fn get_menu_updates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MenuUpdatesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let since_millis = query.since.unwrap_or(0);
    let since = DateTime::<Utc>::from_timestamp_millis(since_millis)
        .ok_or(AppError::Validation("Invalid since cursor".into()))?;

    let new_rsvps = state.rsvp_repo.list_since(since).await?;
    let new_claims = state.recipe_repo.claimed_since(since).await?;

    let mut changes: Vec<MenuChange> = Vec::new();
    for rsvp in &new_rsvps {
        changes.push(MenuChange { kind: "new_rsvp".to_string(), at: ceil_millis(rsvp.created_at) });
    }
    for recipe in &new_claims {
        if let Some(at) = recipe.claimed_at {
            changes.push(MenuChange { kind: "recipe_claimed".to_string(), at: ceil_millis(at) });
        }
    }
    changes.sort_by_key(|c| c.at);

    let latest = changes.iter().map(|c| c.at).max().unwrap_or(since_millis);

    let data = MenuUpdates {
        has_updates: !changes.is_empty(),
        changes,
        latest,
    };

    Ok(Json(ApiEnvelope::ok("Updates retrieved successfully", data)))
}

/// Rounds up to the next whole millisecond. Timestamps are stored with
/// sub-millisecond precision but the cursor travels in milliseconds; rounding
/// down would make a just-reported change reappear on every poll.
fn ceil_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros().div_euclid(1000)
        + if at.timestamp_micros().rem_euclid(1000) > 0 { 1 } else { 0 }
}
