use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

const INGREDIENTS_PREVIEW_LEN: usize = 100;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub page: String,
    pub book: String,
    pub author: String,
    pub categories: String, // semicolon-delimited, as maintained by the editors
    pub ingredients: String,
    pub accompaniments: String,
    pub record_url: Option<String>,
    pub claimed: bool,
    pub claimed_by: Option<String>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Split only at semicolons so commas inside a category survive.
    pub fn category_list(&self) -> Vec<String> {
        self.categories
            .split(';')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn primary_category(&self) -> Option<String> {
        self.category_list().into_iter().next()
    }

    /// Derived one-line description shown in the recipe picker.
    pub fn description(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.page.is_empty() {
            parts.push(format!("Page {}", self.page));
        }
        if !self.categories.is_empty() {
            parts.push(format!("Categories: {}", self.categories));
        }
        if !self.ingredients.is_empty() {
            let preview: String = if self.ingredients.chars().count() > INGREDIENTS_PREVIEW_LEN {
                let truncated: String = self.ingredients.chars().take(INGREDIENTS_PREVIEW_LEN).collect();
                format!("{}...", truncated)
            } else {
                self.ingredients.clone()
            };
            parts.push(format!("Ingredients: {}", preview));
        }
        if !self.accompaniments.is_empty() {
            parts.push(format!("Accompaniments: {}", self.accompaniments));
        }

        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(categories: &str, ingredients: &str) -> Recipe {
        Recipe {
            id: "r1".to_string(),
            title: "Sticky Rice".to_string(),
            page: "42".to_string(),
            book: "".to_string(),
            author: "".to_string(),
            categories: categories.to_string(),
            ingredients: ingredients.to_string(),
            accompaniments: "".to_string(),
            record_url: None,
            claimed: false,
            claimed_by: None,
            claimed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_category_list_splits_on_semicolons_only() {
        let r = recipe("Main; Rice, grains ; ", "");
        assert_eq!(r.category_list(), vec!["Main", "Rice, grains"]);
        assert_eq!(r.primary_category().as_deref(), Some("Main"));
    }

    #[test]
    fn test_description_truncates_long_ingredients() {
        let long = "x".repeat(150);
        let r = recipe("Main", &long);
        let desc = r.description();
        assert!(desc.starts_with("Page 42 | Categories: Main | Ingredients: "));
        assert!(desc.contains(&"x".repeat(100)));
        assert!(!desc.contains(&"x".repeat(101)));
        assert!(desc.contains("..."));
    }

    #[test]
    fn test_description_skips_empty_fields() {
        let r = recipe("", "");
        assert_eq!(r.description(), "Page 42");
    }
}
