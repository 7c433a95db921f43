use serde::{Deserialize, Serialize};

/// The single event the club is currently signing up for. Seeded from
/// configuration, optionally overridden per submission.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventInfo {
    pub name: String,
    pub date: String,
}
