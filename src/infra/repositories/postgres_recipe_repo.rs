use crate::domain::{models::recipe::Recipe, ports::RecipeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const RECIPE_COLUMNS: &str = "id, title, page, book, author, categories, ingredients, accompaniments, record_url, claimed, claimed_by, claimed_at, created_at";

pub struct PostgresRecipeRepo {
    pool: PgPool,
}

impl PostgresRecipeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for PostgresRecipeRepo {
    async fn upsert(&self, recipe: &Recipe) -> Result<Recipe, AppError> {
        sqlx::query_as::<_, Recipe>(&format!(
            "INSERT INTO recipes ({RECIPE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (id) DO UPDATE SET title = EXCLUDED.title, page = EXCLUDED.page, book = EXCLUDED.book, \
             author = EXCLUDED.author, categories = EXCLUDED.categories, ingredients = EXCLUDED.ingredients, \
             accompaniments = EXCLUDED.accompaniments, record_url = EXCLUDED.record_url \
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
        sqlx::query_as::<_, Recipe>(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
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
            "UPDATE recipes SET claimed = TRUE, claimed_by = $1, claimed_at = $2 WHERE id = $3 AND claimed = FALSE",
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
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE claimed_at IS NOT NULL AND claimed_at > $1 ORDER BY claimed_at"
        ))
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
