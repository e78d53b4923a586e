//! Clothing item service

use std::sync::Arc;

use serde::Deserialize;
use shared::ClothingItem;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::cache::{CacheEntity, ListCache, Lookup};
use crate::error::{AppError, AppResult};

/// Clothes service for managing finished clothing items
#[derive(Clone)]
pub struct ClothesService {
    db: PgPool,
    cache: Arc<ListCache>,
}

/// Input for creating a clothing item
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClothesInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 100))]
    pub code: Option<String>,
    pub image: Option<String>,
}

/// Input for updating a clothing item
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateClothesInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub code: Option<String>,
    pub image: Option<String>,
}

type ClothesRow = (
    Uuid,
    String,
    Option<String>,
    Option<String>,
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::Utc>,
);

fn into_item(r: ClothesRow) -> ClothingItem {
    ClothingItem {
        id: r.0,
        name: r.1,
        code: r.2,
        image: r.3,
        created_at: r.4,
        updated_at: r.5,
    }
}

impl ClothesService {
    /// Create a new ClothesService instance
    pub fn new(db: PgPool, cache: Arc<ListCache>) -> Self {
        Self { db, cache }
    }

    /// List all clothing items
    pub async fn list(&self) -> AppResult<Vec<ClothingItem>> {
        let generation = match self.cache.get(CacheEntity::Clothes, "all").await {
            Lookup::Hit(hit) => return Ok(hit),
            Lookup::Miss(generation) => generation,
        };

        let rows = sqlx::query_as::<_, ClothesRow>(
            r#"
            SELECT id, name, code, image, created_at, updated_at
            FROM clothes
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let items: Vec<ClothingItem> = rows.into_iter().map(into_item).collect();
        self.cache.put(CacheEntity::Clothes, "all", generation, &items).await;
        Ok(items)
    }

    /// Get a clothing item by ID
    pub async fn get(&self, id: Uuid) -> AppResult<ClothingItem> {
        let row = sqlx::query_as::<_, ClothesRow>(
            "SELECT id, name, code, image, created_at, updated_at FROM clothes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Clothes".to_string()))?;

        Ok(into_item(row))
    }

    /// Create a clothing item
    pub async fn create(&self, input: CreateClothesInput) -> AppResult<ClothingItem> {
        input.validate()?;

        let row = sqlx::query_as::<_, ClothesRow>(
            r#"
            INSERT INTO clothes (name, code, image)
            VALUES ($1, $2, $3)
            RETURNING id, name, code, image, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.code)
        .bind(&input.image)
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate(CacheEntity::Clothes).await;

        let item = into_item(row);
        tracing::info!(id = %item.id, "Clothes created");
        Ok(item)
    }

    /// Update a clothing item
    pub async fn update(&self, id: Uuid, input: UpdateClothesInput) -> AppResult<ClothingItem> {
        input.validate()?;
        let existing = self.get(id).await?;

        let name = input.name.unwrap_or(existing.name);
        let code = input.code.or(existing.code);
        let image = input.image.or(existing.image);

        let row = sqlx::query_as::<_, ClothesRow>(
            r#"
            UPDATE clothes
            SET name = $1, code = $2, image = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, code, image, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&code)
        .bind(&image)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate(CacheEntity::Clothes).await;
        Ok(into_item(row))
    }

    /// Delete a clothing item together with its recipe
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clothes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Clothes".to_string()));
        }

        self.cache.invalidate(CacheEntity::Clothes).await;
        tracing::info!(id = %id, "Clothes deleted");
        Ok(())
    }
}
