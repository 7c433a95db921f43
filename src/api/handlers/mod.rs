pub mod form_data;
pub mod health;
pub mod import;
pub mod menu;
pub mod rsvp;
