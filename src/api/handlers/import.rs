use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ImportMembersRequest, ImportRecipesRequest};
use crate::api::dtos::responses::{ApiEnvelope, ImportSummary};
use crate::domain::models::member::Member;
use crate::domain::models::recipe::Recipe;
use crate::error::AppError;
use crate::state::AppState;

/// Roster sync from the external member source. Upserts by discord id so
/// repeated imports converge instead of duplicating.
pub async fn import_members(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ImportMembersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut imported = 0;
    for entry in &payload.members {
        let member = Member::new(entry.discord_id.clone(), entry.display_name.clone(), entry.active);
        state.member_repo.upsert(&member).await?;
        imported += 1;
    }

    info!("Imported {} members", imported);
    Ok(Json(ApiEnvelope::ok("Members imported successfully", ImportSummary { imported })))
}

/// Recipe list sync from the editors' source of truth. Claim state is left
/// untouched for rows that already exist; a brand-new row may arrive already
/// claimed (historical imports).
pub async fn import_recipes(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ImportRecipesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut imported = 0;
    for entry in &payload.recipes {
        let recipe = Recipe {
            id: entry.id.clone(),
            title: entry.title.clone(),
            page: entry.page.clone(),
            book: entry.book.clone(),
            author: entry.author.clone(),
            categories: entry.categories.clone(),
            ingredients: entry.ingredients.clone(),
            accompaniments: entry.accompaniments.clone(),
            record_url: entry.record_url.clone(),
            claimed: entry.claimed,
            claimed_by: entry.claimed_by.clone().filter(|c| !c.is_empty()),
            claimed_at: entry.claimed.then(Utc::now),
            created_at: Utc::now(),
        };
        state.recipe_repo.upsert(&recipe).await?;
        imported += 1;
    }

    info!("Imported {} recipes", imported);
    Ok(Json(ApiEnvelope::ok("Recipes imported successfully", ImportSummary { imported })))
}
