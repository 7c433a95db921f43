pub mod sqlite_member_repo;
pub mod sqlite_recipe_repo;
pub mod sqlite_rsvp_repo;
pub mod sqlite_notification_repo;

pub mod postgres_member_repo;
pub mod postgres_recipe_repo;
pub mod postgres_rsvp_repo;
pub mod postgres_notification_repo;
