use crate::domain::{models::recipe::Recipe, ports::RecipeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const RECIPE_COLUMNS: &str = "id, title, page, book, author, categories, ingredients, accompaniments, record_url, claimed, claimed_by, claimed_at, created_at";

pub struct SqliteRecipeRepo {
    pool: SqlitePool,
}

impl SqliteRecipeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for SqliteRecipeRepo {
    async fn upsert(&self, recipe: &Recipe) -> Result<Recipe, AppError> {
        sqlx::query_as::<_, Recipe>(&format!(
            "INSERT INTO recipes ({RECIPE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET title = excluded.title, page = excluded.page, book = excluded.book, \
             author = excluded.author, categories = excluded.categories, ingredients = excluded.ingredients, \
             accompaniments = excluded.accompaniments, record_url = excluded.record_url \
             RETURNING {RECIPE_COLUMNS}"
        ))
            .bind(&recipe.id)
            .bind(&recipe.title)
            .bind(&recipe.page)
            .bind(&recipe.book)
            .bind(&recipe.author)
            .bind(&recipe.categories)
            .bind(&recipe.ingredients)
            .bind(&recipe.accompaniments)
            .bind(&recipe.record_url)
            .bind(recipe.claimed)
            .bind(&recipe.claimed_by)
            .bind(recipe.claimed_at)
            .bind(recipe.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, AppError> {
        sqlx::query_as::<_, Recipe>(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Recipe>, AppError> {
        sqlx::query_as::<_, Recipe>(&format!("SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY title"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn claim(&self, id: &str, claimed_by: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE recipes SET claimed = TRUE, claimed_by = ?, claimed_at = ? WHERE id = ? AND claimed = FALSE",
        )
            .bind(claimed_by)
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() == 1)
    }

    async fn claimed_since(&self, since: DateTime<Utc>) -> Result<Vec<Recipe>, AppError> {
        sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE claimed_at IS NOT NULL AND claimed_at > ? ORDER BY claimed_at"
        ))
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
