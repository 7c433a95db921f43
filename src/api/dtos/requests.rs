use serde::{Deserialize, Deserializer, Serialize};

/// Accepts the booleans legacy spreadsheet exports produce: real booleans,
/// "TRUE"/"true"/"FALSE"/"false" strings, or 0/1. Everything downstream of
/// this boundary sees a plain bool.
pub fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Str(String),
        Int(i64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Int(i) => Ok(i != 0),
        Raw::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Ok(true),
            "false" | "no" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("invalid boolean value: {other}"))),
        },
    }
}

fn default_false() -> bool {
    false
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRsvpRequest {
    pub display_name: String,
    pub audience_type: String,
    #[serde(default)]
    pub discord_id: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(deserialize_with = "flexible_bool", default = "default_false")]
    pub cooking: bool,
    #[serde(default)]
    pub recipe_id: Option<String>,
    #[serde(default)]
    pub guest_count: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MemberImport {
    pub discord_id: String,
    pub display_name: String,
    #[serde(deserialize_with = "flexible_bool", default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMembersRequest {
    pub members: Vec<MemberImport>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecipeImport {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub accompaniments: String,
    #[serde(default)]
    pub record_url: Option<String>,
    #[serde(deserialize_with = "flexible_bool", default = "default_false")]
    pub claimed: bool,
    #[serde(default)]
    pub claimed_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecipesRequest {
    pub recipes: Vec<RecipeImport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexible_bool_tri_form() {
        let json = r#"{"members": [
            {"discordId": "123", "displayName": "A", "active": true},
            {"discordId": "456", "displayName": "B", "active": "TRUE"},
            {"discordId": "789", "displayName": "C", "active": "false"},
            {"discordId": "012", "displayName": "D"}
        ]}"#;
        let req: ImportMembersRequest = serde_json::from_str(json).unwrap();
        assert!(req.members[0].active);
        assert!(req.members[1].active);
        assert!(!req.members[2].active);
        assert!(req.members[3].active); // defaults on
    }

    #[test]
    fn test_flexible_bool_rejects_garbage() {
        let json = r#"{"displayName": "A", "audienceType": "guest", "cooking": "maybe"}"#;
        assert!(serde_json::from_str::<SubmitRsvpRequest>(json).is_err());
    }

    #[test]
    fn test_submit_request_minimal_guest() {
        let json = r#"{"displayName": "Jane Doe", "audienceType": "guest", "cooking": false}"#;
        let req: SubmitRsvpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.display_name, "Jane Doe");
        assert!(!req.cooking);
        assert!(req.recipe_id.is_none());
    }
}
