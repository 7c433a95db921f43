use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::models::event::EventInfo;
use crate::domain::models::member::Member;
use crate::domain::models::recipe::Recipe;
use crate::domain::models::rsvp::Rsvp;
use crate::domain::services::menu::Menu;

/// Standard response envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub discord_id: String,
    pub display_name: String,
    pub active: bool,
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        Self {
            discord_id: member.discord_id.clone(),
            display_name: member.display_name.clone(),
            active: member.active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: String,
    pub title: String,
    pub page: String,
    pub book: String,
    pub author: String,
    pub categories: Vec<String>,
    pub ingredients: String,
    pub accompaniments: String,
    pub description: String,
    pub claimed: bool,
    pub claimed_by: String,
    pub claimed_by_discord_id: String,
    pub record_url: Option<String>,
}

impl RecipeView {
    /// claimed_by is resolved to a display name; the raw discord id is kept
    /// alongside when the claimant is a roster member so clients can link it.
    pub fn from_recipe(
        recipe: &Recipe,
        member_names: &HashMap<String, String>,
        rsvp_claimers: &HashMap<String, String>,
    ) -> Self {
        let raw = recipe.claimed_by.as_deref().unwrap_or("");
        let claimed_by_discord_id = if member_names.contains_key(raw) {
            raw.to_string()
        } else {
            String::new()
        };

        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            page: recipe.page.clone(),
            book: recipe.book.clone(),
            author: recipe.author.clone(),
            categories: recipe.category_list(),
            ingredients: recipe.ingredients.clone(),
            accompaniments: recipe.accompaniments.clone(),
            description: recipe.description(),
            claimed: recipe.claimed,
            claimed_by: crate::domain::services::menu::resolve_claimer_name(recipe, member_names, rsvp_claimers),
            claimed_by_discord_id,
            record_url: recipe.record_url.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub event: EventInfo,
    pub members: Vec<MemberView>,
    pub recipes: Vec<RecipeView>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RsvpView {
    pub id: String,
    pub kind: String,
    pub recipe_name: Option<String>,
    pub recipe_id: Option<String>,
    pub display_name: String,
    pub discord_id: Option<String>,
    pub instagram_handle: Option<String>,
    pub email: Option<String>,
    pub is_member: bool,
    pub guest_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub event_name: String,
    pub event_date: String,
    pub note: Option<String>,
}

impl From<Rsvp> for RsvpView {
    fn from(rsvp: Rsvp) -> Self {
        Self {
            id: rsvp.id,
            kind: rsvp.kind,
            recipe_name: rsvp.recipe_name,
            recipe_id: rsvp.recipe_id,
            display_name: rsvp.display_name,
            discord_id: rsvp.discord_id,
            instagram_handle: rsvp.instagram_handle,
            email: rsvp.email,
            is_member: rsvp.is_member,
            guest_count: rsvp.guest_count,
            created_at: rsvp.created_at,
            event_name: rsvp.event_name,
            event_date: rsvp.event_date,
            note: rsvp.note,
        }
    }
}

pub type MenuData = Menu;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MenuChange {
    pub kind: String, // "new_rsvp" or "recipe_claimed"
    pub at: i64,      // epoch milliseconds
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuUpdates {
    pub has_updates: bool,
    pub changes: Vec<MenuChange>,
    pub latest: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
}
