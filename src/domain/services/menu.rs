use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::models::event::EventInfo;
use crate::domain::models::member::Member;
use crate::domain::models::recipe::Recipe;
use crate::domain::models::rsvp::Rsvp;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub recipe_id: String,
    pub title: String,
    pub page: String,
    pub claimed_by: String,
    pub record_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub name: String,
    pub emoji: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeView {
    pub display_name: String,
    pub is_member: bool,
    pub kind: String,
    pub guest_count: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSummary {
    pub total_attendees: i64,
    pub cooks: i64,
    pub attendees: Vec<AttendeeView>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub event: EventInfo,
    pub categories: Vec<CategoryGroup>,
    pub summary: RsvpSummary,
    pub share_text: String,
}

pub fn category_emoji(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "main" => "\u{1f37d}\u{fe0f}",  // 🍽️
        "side" => "\u{1f957}",          // 🥗
        "dessert" => "\u{1f370}",       // 🍰
        "drink" => "\u{1f379}",         // 🍹
        _ => "\u{1f374}",               // 🍴 fallback
    }
}

/// Resolve the name shown for a claim. A claimed_by holding a roster discord
/// id maps to the member's display name; anything else is assumed to already
/// be a guest name. Falls back to the most recent RSVP naming the recipe.
pub fn resolve_claimer_name(
    recipe: &Recipe,
    member_names: &HashMap<String, String>,
    rsvp_claimers: &HashMap<String, String>,
) -> String {
    let raw = recipe.claimed_by.as_deref().unwrap_or("");
    let mut name = member_names.get(raw).cloned().unwrap_or_else(|| raw.to_string());

    if name.is_empty()
        && let Some(fallback) = rsvp_claimers.get(&recipe.id) {
        name = fallback.clone();
    }

    name
}

pub fn member_name_map(members: &[Member]) -> HashMap<String, String> {
    members
        .iter()
        .map(|m| (m.discord_id.clone(), m.display_name.clone()))
        .collect()
}

/// recipe id -> submitter name, most recent RSVP wins.
pub fn rsvp_claimer_map(rsvps: &[Rsvp]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut ordered: Vec<&Rsvp> = rsvps.iter().collect();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    for rsvp in ordered {
        if let Some(id) = rsvp.recipe_id.as_deref()
            && !rsvp.display_name.is_empty() {
            map.insert(id.to_string(), rsvp.display_name.clone());
        }
    }
    map
}

/// Derive the menu view the display widgets render: claimed recipes grouped
/// by primary category, plus an attendee summary and a shareable text form.
pub fn build_menu(event: &EventInfo, recipes: &[Recipe], rsvps: &[Rsvp], members: &[Member]) -> Menu {
    let member_names = member_name_map(members);
    let rsvp_claimers = rsvp_claimer_map(rsvps);

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for recipe in recipes.iter().filter(|r| r.claimed) {
        let category = recipe.primary_category().unwrap_or_else(|| "Uncategorized".to_string());
        let item = MenuItem {
            recipe_id: recipe.id.clone(),
            title: recipe.title.clone(),
            page: recipe.page.clone(),
            claimed_by: resolve_claimer_name(recipe, &member_names, &rsvp_claimers),
            record_url: recipe.record_url.clone(),
        };

        match groups.iter_mut().find(|g| g.name == category) {
            Some(group) => group.items.push(item),
            None => groups.push(CategoryGroup {
                emoji: category_emoji(&category).to_string(),
                name: category,
                items: vec![item],
            }),
        }
    }
    groups.sort_by(|a, b| a.name.cmp(&b.name));

    let attendees: Vec<AttendeeView> = rsvps
        .iter()
        .map(|r| AttendeeView {
            display_name: r.display_name.clone(),
            is_member: r.is_member,
            kind: r.kind.clone(),
            guest_count: r.guest_count,
        })
        .collect();

    let total_attendees = attendees.iter().map(|a| 1 + a.guest_count as i64).sum();
    let cooks = rsvps.iter().filter(|r| r.is_cooking()).count() as i64;
    let summary = RsvpSummary { total_attendees, cooks, attendees };

    let share_text = render_share_text(event, &groups, &summary);

    Menu {
        event: event.clone(),
        categories: groups,
        summary,
        share_text,
    }
}

fn render_share_text(event: &EventInfo, groups: &[CategoryGroup], summary: &RsvpSummary) -> String {
    let mut text = format!("{} ({})\n", event.name, event.date);

    for group in groups {
        text.push_str(&format!("\n{} {}:\n", group.emoji, group.name));
        for item in &group.items {
            if item.claimed_by.is_empty() {
                text.push_str(&format!("  {}\n", item.title));
            } else {
                text.push_str(&format!("  {} - {}\n", item.title, item.claimed_by));
            }
        }
    }

    text.push_str(&format!("\n\u{1f465} {} attendees\n", summary.total_attendees));
    text
}
