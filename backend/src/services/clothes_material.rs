//! Bill-of-materials service
//!
//! Owns the recipe lines linking a clothing item to the materials it consumes,
//! and serves them to the requirement calculator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_recipe_amount, ClothesMaterial, RecipeLine, RecipeStore};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Service for recipe lines
#[derive(Clone)]
pub struct ClothesMaterialService {
    db: PgPool,
}

/// Input for defining a clothing item's recipe in one go
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecipeInput {
    pub clothes_id: Uuid,
    #[validate(length(min = 1))]
    pub materials: Vec<RecipeMaterialInput>,
}

/// One material of a recipe
#[derive(Debug, Deserialize, Serialize)]
pub struct RecipeMaterialInput {
    pub material_id: Uuid,
    pub amount: Decimal,
}

/// Input for updating a single recipe line
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecipeLineInput {
    pub clothes_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub amount: Option<Decimal>,
}

/// Row for recipe queries joined with materials
#[derive(Debug, FromRow)]
struct RecipeRow {
    material_id: Uuid,
    material_name: String,
    material_type: String,
    measurement: String,
    material_code: String,
    per_unit_amount: Decimal,
}

impl TryFrom<RecipeRow> for RecipeLine {
    type Error = sqlx::Error;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        Ok(RecipeLine {
            material_id: row.material_id,
            material_name: row.material_name,
            material_type: row
                .material_type
                .parse()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            measurement: row.measurement,
            material_code: row.material_code,
            per_unit_amount: row.per_unit_amount,
        })
    }
}

/// Row for plain recipe line queries
#[derive(Debug, FromRow)]
struct LineRow {
    id: Uuid,
    clothes_id: Uuid,
    material_id: Uuid,
    amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LineRow> for ClothesMaterial {
    fn from(r: LineRow) -> Self {
        ClothesMaterial {
            id: r.id,
            clothes_id: r.clothes_id,
            material_id: r.material_id,
            amount: r.amount,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl ClothesMaterialService {
    /// Create a new ClothesMaterialService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn ensure_clothes(&self, clothes_id: Uuid) -> AppResult<()> {
        if !self.clothing_exists(clothes_id).await? {
            return Err(AppError::NotFound("Clothes".to_string()));
        }
        Ok(())
    }

    async fn ensure_materials(&self, material_ids: &[Uuid]) -> AppResult<()> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT id) FROM materials WHERE id = ANY($1)",
        )
        .bind(material_ids)
        .fetch_one(&self.db)
        .await?;

        let mut distinct = material_ids.to_vec();
        distinct.sort();
        distinct.dedup();
        if found != distinct.len() as i64 {
            return Err(AppError::NotFound("Material".to_string()));
        }
        Ok(())
    }

    /// Insert every line of a recipe in one transaction, keeping input order
    pub async fn create_many(&self, input: CreateRecipeInput) -> AppResult<Vec<ClothesMaterial>> {
        input.validate()?;
        for line in &input.materials {
            validate_recipe_amount(line.amount)?;
        }

        self.ensure_clothes(input.clothes_id).await?;
        let material_ids: Vec<Uuid> = input.materials.iter().map(|m| m.material_id).collect();
        self.ensure_materials(&material_ids).await?;

        let mut tx = self.db.begin().await?;
        let mut created = Vec::with_capacity(input.materials.len());
        for line in &input.materials {
            let row = sqlx::query_as::<_, LineRow>(
                r#"
                INSERT INTO clothes_materials (clothes_id, material_id, amount)
                VALUES ($1, $2, $3)
                RETURNING id, clothes_id, material_id, amount, created_at, updated_at
                "#,
            )
            .bind(input.clothes_id)
            .bind(line.material_id)
            .bind(line.amount)
            .fetch_one(&mut *tx)
            .await?;
            created.push(ClothesMaterial::from(row));
        }
        tx.commit().await?;

        tracing::info!(
            clothes_id = %input.clothes_id,
            lines = created.len(),
            "Recipe lines created"
        );
        Ok(created)
    }

    /// Get a recipe line by ID
    pub async fn get(&self, id: Uuid) -> AppResult<ClothesMaterial> {
        let row = sqlx::query_as::<_, LineRow>(
            r#"
            SELECT id, clothes_id, material_id, amount, created_at, updated_at
            FROM clothes_materials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe line".to_string()))?;

        Ok(row.into())
    }

    /// Recipe of a clothing item; 404 when the item does not exist
    pub async fn recipe(&self, clothes_id: Uuid) -> AppResult<Vec<RecipeLine>> {
        let lines = self.get_requirements(clothes_id).await?;
        if lines.is_empty() {
            self.ensure_clothes(clothes_id).await?;
        }
        Ok(lines)
    }

    /// Update a recipe line
    pub async fn update(&self, id: Uuid, input: UpdateRecipeLineInput) -> AppResult<ClothesMaterial> {
        let existing = self.get(id).await?;

        let clothes_id = input.clothes_id.unwrap_or(existing.clothes_id);
        let material_id = input.material_id.unwrap_or(existing.material_id);
        let amount = input.amount.unwrap_or(existing.amount);
        validate_recipe_amount(amount)?;

        if clothes_id != existing.clothes_id {
            self.ensure_clothes(clothes_id).await?;
        }
        if material_id != existing.material_id {
            self.ensure_materials(&[material_id]).await?;
        }

        let row = sqlx::query_as::<_, LineRow>(
            r#"
            UPDATE clothes_materials
            SET clothes_id = $1, material_id = $2, amount = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, clothes_id, material_id, amount, created_at, updated_at
            "#,
        )
        .bind(clothes_id)
        .bind(material_id)
        .bind(amount)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a recipe line
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clothes_materials WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe line".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for ClothesMaterialService {
    type Error = sqlx::Error;

    async fn get_requirements(&self, clothes_id: Uuid) -> Result<Vec<RecipeLine>, Self::Error> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT cm.material_id,
                   m.name AS material_name,
                   m.type AS material_type,
                   m.measurement,
                   m.code AS material_code,
                   cm.amount AS per_unit_amount
            FROM clothes_materials cm
            JOIN materials m ON m.id = cm.material_id
            WHERE cm.clothes_id = $1
            ORDER BY cm.position
            "#,
        )
        .bind(clothes_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(RecipeLine::try_from).collect()
    }

    async fn clothing_exists(&self, clothes_id: Uuid) -> Result<bool, Self::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clothes WHERE id = $1)")
            .bind(clothes_id)
            .fetch_one(&self.db)
            .await
    }
}
