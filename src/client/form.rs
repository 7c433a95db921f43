use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::api::dtos::requests::SubmitRsvpRequest;
use crate::domain::models::event::EventInfo;
use crate::domain::services::validation::{validate_submission, SubmissionInput, AUDIENCE_MEMBER};
use super::api::{ApiClient, ClientError, SubmitOutcome};

pub const STEP_AUDIENCE: u8 = 1;
pub const STEP_IDENTITY: u8 = 2;
pub const STEP_PARTICIPATION: u8 = 3;
pub const STEP_RECIPE: u8 = 4;
pub const STEP_NOTES: u8 = 5;

const DRAFT_MAX_AGE_HOURS: i64 = 24;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormFields {
    pub audience_type: Option<String>,
    pub display_name: String,
    pub discord_id: Option<String>,
    pub instagram_handle: Option<String>,
    pub email: Option<String>,
    pub cooking: Option<bool>,
    pub recipe_id: Option<String>,
    pub guest_count: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedDraft {
    pub fields: FormFields,
    pub step: u8,
    pub saved_at: DateTime<Utc>,
}

/// Where in-progress form state is parked between visits. The production
/// frontend keeps this in browser storage; tests use the in-memory store.
pub trait DraftStore: Send + Sync {
    fn save(&self, draft: &SavedDraft);
    fn load(&self) -> Option<SavedDraft>;
    fn clear(&self);
}

#[derive(Default)]
pub struct MemoryDraftStore {
    slot: Mutex<Option<SavedDraft>>,
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, draft: &SavedDraft) {
        *self.slot.lock().unwrap() = Some(draft.clone());
    }

    fn load(&self) -> Option<SavedDraft> {
        self.slot.lock().unwrap().clone()
    }

    fn clear(&self) {
        *self.slot.lock().unwrap() = None;
    }
}

#[derive(Debug, Clone)]
pub struct StepValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl StepValidation {
    fn ok() -> Self {
        Self { valid: true, errors: Vec::new() }
    }

    fn fail(errors: Vec<String>) -> Self {
        Self { valid: false, errors }
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("form is not valid: {0:?}")]
    Invalid(Vec<String>),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Drives the five-step sign-up flow: audience, identity, participation,
/// recipe (skipped when attending only), notes. `next` is gated on the
/// current step's completion predicate; `back` is always allowed except at
/// the first step.
pub struct FormController {
    step: u8,
    fields: FormFields,
    store: Option<Arc<dyn DraftStore>>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            step: STEP_AUDIENCE,
            fields: FormFields::default(),
            store: None,
        }
    }

    pub fn with_store(store: Arc<dyn DraftStore>) -> Self {
        Self {
            step: STEP_AUDIENCE,
            fields: FormFields::default(),
            store: Some(store),
        }
    }

    pub fn current_step(&self) -> u8 {
        self.step
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn set_audience(&mut self, audience_type: &str) {
        self.fields.audience_type = Some(audience_type.to_string());
        self.autosave();
    }

    /// Member identity comes from the roster dropdown, so both values arrive
    /// together.
    pub fn pick_member(&mut self, discord_id: &str, display_name: &str) {
        self.fields.discord_id = Some(discord_id.to_string());
        self.fields.display_name = display_name.to_string();
        self.autosave();
    }

    pub fn set_guest_identity(&mut self, display_name: &str, instagram_handle: Option<&str>, email: Option<&str>) {
        self.fields.display_name = display_name.to_string();
        self.fields.instagram_handle = instagram_handle.map(str::to_string);
        self.fields.email = email.map(str::to_string);
        self.autosave();
    }

    pub fn set_cooking(&mut self, cooking: bool) {
        self.fields.cooking = Some(cooking);
        if !cooking {
            self.fields.recipe_id = None;
        }
        self.autosave();
    }

    pub fn set_recipe(&mut self, recipe_id: &str) {
        self.fields.recipe_id = Some(recipe_id.to_string());
        self.autosave();
    }

    pub fn set_guest_count(&mut self, count: i32) {
        self.fields.guest_count = count;
        self.autosave();
    }

    pub fn set_note(&mut self, note: Option<&str>) {
        self.fields.note = note.map(str::to_string);
        self.autosave();
    }

    fn is_cooking(&self) -> bool {
        self.fields.cooking == Some(true)
    }

    fn is_member(&self) -> bool {
        self.fields.audience_type.as_deref() == Some(AUDIENCE_MEMBER)
    }

    /// Completion predicate for the current step.
    pub fn can_advance(&self) -> StepValidation {
        match self.step {
            STEP_AUDIENCE => match self.fields.audience_type {
                Some(_) => StepValidation::ok(),
                None => StepValidation::fail(vec!["Please select member or guest".to_string()]),
            },
            STEP_IDENTITY => {
                if self.is_member() {
                    match self.fields.discord_id {
                        Some(_) => StepValidation::ok(),
                        None => StepValidation::fail(vec!["Please select your name".to_string()]),
                    }
                } else {
                    let mut errors = Vec::new();
                    if self.fields.display_name.trim().is_empty() {
                        errors.push("Please enter your name".to_string());
                    }
                    let has_contact = self.fields.instagram_handle.as_deref().is_some_and(|h| !h.trim().is_empty())
                        || self.fields.email.as_deref().is_some_and(|e| !e.trim().is_empty());
                    if !has_contact {
                        errors.push("Please provide Instagram handle or email".to_string());
                    }
                    if errors.is_empty() { StepValidation::ok() } else { StepValidation::fail(errors) }
                }
            }
            STEP_PARTICIPATION => match self.fields.cooking {
                Some(_) => StepValidation::ok(),
                None => StepValidation::fail(vec!["Please select participation type".to_string()]),
            },
            STEP_RECIPE => {
                if self.is_cooking() && self.fields.recipe_id.is_none() {
                    StepValidation::fail(vec!["Please select a recipe".to_string()])
                } else {
                    StepValidation::ok()
                }
            }
            STEP_NOTES => StepValidation::ok(),
            _ => StepValidation::fail(vec!["Invalid step".to_string()]),
        }
    }

    /// Advances when the current step is complete. The recipe step is skipped
    /// entirely when the submitter is attending only.
    pub fn next(&mut self) -> Result<u8, Vec<String>> {
        let validation = self.can_advance();
        if !validation.valid {
            return Err(validation.errors);
        }
        if self.step >= STEP_NOTES {
            return Ok(self.step);
        }

        let mut next = self.step + 1;
        if next == STEP_RECIPE && !self.is_cooking() {
            next += 1;
        }
        self.step = next;
        self.autosave();
        Ok(self.step)
    }

    pub fn back(&mut self) -> u8 {
        if self.step == STEP_AUDIENCE {
            return self.step;
        }

        let mut prev = self.step - 1;
        if prev == STEP_RECIPE && !self.is_cooking() {
            prev -= 1;
        }
        self.step = prev;
        self.autosave();
        self.step
    }

    pub fn can_submit(&self) -> bool {
        self.step == STEP_NOTES && self.can_advance().valid
    }

    /// Gathers the union of all step data and re-validates the complete set,
    /// returning the wire payload on success.
    pub fn build_payload(&self, event: Option<&EventInfo>) -> Result<SubmitRsvpRequest, Vec<String>> {
        let input = SubmissionInput {
            audience_type: self.fields.audience_type.as_deref().unwrap_or(""),
            display_name: &self.fields.display_name,
            discord_id: self.fields.discord_id.as_deref(),
            instagram_handle: self.fields.instagram_handle.as_deref(),
            email: self.fields.email.as_deref(),
            cooking: self.is_cooking(),
            recipe_id: self.fields.recipe_id.as_deref(),
            guest_count: self.fields.guest_count,
            note: self.fields.note.as_deref(),
        };

        let normalized = validate_submission(&input)?;

        Ok(SubmitRsvpRequest {
            display_name: normalized.display_name,
            audience_type: normalized.audience_type,
            discord_id: normalized.discord_id,
            instagram_handle: normalized.instagram_handle,
            email: normalized.email,
            cooking: normalized.cooking,
            recipe_id: normalized.recipe_id,
            guest_count: Some(normalized.guest_count),
            note: normalized.note,
            event_name: event.map(|e| e.name.clone()),
            event_date: event.map(|e| e.date.clone()),
        })
    }

    /// Validates, submits, and on a server-confirmed acceptance resets the
    /// form and clears the draft. A queued (offline) submission keeps the
    /// draft so the user still sees what they sent.
    pub async fn submit(&mut self, client: &ApiClient, event: Option<&EventInfo>) -> Result<SubmitOutcome, SubmitError> {
        let payload = self.build_payload(event).map_err(SubmitError::Invalid)?;

        let outcome = client.submit(payload).await?;

        if let SubmitOutcome::Accepted { ref message, .. } = outcome {
            info!("submission confirmed: {}", message);
            self.clear_draft();
            self.fields = FormFields::default();
            self.step = STEP_AUDIENCE;
        }

        Ok(outcome)
    }

    fn autosave(&self) {
        if let Some(store) = &self.store {
            store.save(&SavedDraft {
                fields: self.fields.clone(),
                step: self.step,
                saved_at: Utc::now(),
            });
        }
    }

    /// Restores a saved draft if one exists and is fresh enough. Stale drafts
    /// are discarded.
    pub fn restore_draft(&mut self) -> bool {
        let Some(store) = &self.store else { return false };
        let Some(draft) = store.load() else { return false };

        let age = Utc::now() - draft.saved_at;
        if age > Duration::hours(DRAFT_MAX_AGE_HOURS) {
            store.clear();
            return false;
        }

        self.fields = draft.fields;
        self.step = draft.step;
        true
    }

    pub fn clear_draft(&self) {
        if let Some(store) = &self.store {
            store.clear();
        }
    }
}
