use std::sync::Arc;
use crate::config::Config;
use crate::domain::models::event::EventInfo;
use crate::domain::ports::{
    Announcer, EmailService, MemberRepository, NotificationJobRepository,
    RecipeRepository, RsvpRepository,
};
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub member_repo: Arc<dyn MemberRepository>,
    pub recipe_repo: Arc<dyn RecipeRepository>,
    pub rsvp_repo: Arc<dyn RsvpRepository>,
    pub notification_repo: Arc<dyn NotificationJobRepository>,
    pub announcer: Arc<dyn Announcer>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn event_info(&self) -> EventInfo {
        EventInfo {
            name: self.config.event_name.clone(),
            date: self.config.event_date.clone(),
        }
    }
}
