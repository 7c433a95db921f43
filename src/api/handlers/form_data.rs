use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::responses::{ApiEnvelope, FormData, MemberView, RecipeView};
use crate::domain::services::menu::{member_name_map, rsvp_claimer_map};
use crate::error::AppError;
use crate::state::AppState;

/// Everything the sign-up form needs in one round trip: the active roster,
/// every recipe with claim status, and the current event.
pub async fn get_form_data(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let members = state.member_repo.list_active().await?;
    let recipes = state.recipe_repo.list().await?;
    let rsvps = state.rsvp_repo.list().await?;

    let member_names = member_name_map(&members);
    let rsvp_claimers = rsvp_claimer_map(&rsvps);

    let recipe_views: Vec<RecipeView> = recipes
        .iter()
        .map(|r| RecipeView::from_recipe(r, &member_names, &rsvp_claimers))
        .collect();

    info!("form data: {} active members, {} recipes", members.len(), recipe_views.len());

    let data = FormData {
        event: state.event_info(),
        members: members.iter().map(MemberView::from).collect(),
        recipes: recipe_views,
    };

    Ok(Json(ApiEnvelope::ok("Data retrieved successfully", data)))
}
