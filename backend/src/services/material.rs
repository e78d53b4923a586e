//! Material catalogue service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{
    validate_code_unchanged, validate_material_code, Material, MaterialFilter, MaterialStatistics,
    MaterialType,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::cache::{CacheEntity, ListCache, Lookup};
use crate::error::{map_unique_violation, AppError, AppResult};

const MATERIAL_COLUMNS: &str =
    "id, type AS kind, name, color_code, code, measurement, image, created_at, updated_at";

/// Material service for managing the raw-material catalogue
#[derive(Clone)]
pub struct MaterialService {
    db: PgPool,
    cache: Arc<ListCache>,
}

/// Input for creating a material
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaterialInput {
    #[serde(rename = "type")]
    pub kind: MaterialType,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub color_code: String,
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    #[validate(length(min = 1, max = 50))]
    pub measurement: String,
    pub image: Option<String>,
}

/// Input for updating a material; absent fields keep their value.
/// `code` is accepted only when it repeats the current code.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMaterialInput {
    #[serde(rename = "type")]
    pub kind: Option<MaterialType>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub color_code: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub measurement: Option<String>,
    pub image: Option<String>,
}

/// Row for material queries
#[derive(Debug, FromRow)]
pub(crate) struct MaterialRow {
    id: Uuid,
    kind: String,
    name: String,
    color_code: String,
    code: String,
    measurement: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MaterialRow> for Material {
    type Error = sqlx::Error;

    fn try_from(row: MaterialRow) -> Result<Self, Self::Error> {
        Ok(Material {
            id: row.id,
            kind: row.kind.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            name: row.name,
            color_code: row.color_code,
            code: row.code,
            measurement: row.measurement,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_materials(rows: Vec<MaterialRow>) -> AppResult<Vec<Material>> {
    rows.into_iter()
        .map(|row| Material::try_from(row).map_err(AppError::from))
        .collect()
}

impl MaterialService {
    /// Create a new MaterialService instance
    pub fn new(db: PgPool, cache: Arc<ListCache>) -> Self {
        Self { db, cache }
    }

    /// List materials, optionally filtered by type and a name/code search
    pub async fn list(&self, filter: MaterialFilter) -> AppResult<Vec<Material>> {
        let filter = filter.normalized();
        let cache_key = ("list", &filter);
        let generation = match self.cache.get(CacheEntity::Materials, &cache_key).await {
            Lookup::Hit(hit) => return Ok(hit),
            Lookup::Miss(generation) => generation,
        };

        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            r#"
            SELECT {MATERIAL_COLUMNS}
            FROM materials
            WHERE ($1::text IS NULL OR type = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%' OR code ILIKE '%' || $2 || '%')
            ORDER BY created_at, id
            "#
        ))
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.search.as_deref())
        .fetch_all(&self.db)
        .await?;

        let materials = into_materials(rows)?;
        self.cache
            .put(CacheEntity::Materials, &cache_key, generation, &materials)
            .await;
        Ok(materials)
    }

    /// List materials of one type
    pub async fn list_by_type(&self, kind: MaterialType) -> AppResult<Vec<Material>> {
        self.list(MaterialFilter {
            kind: Some(kind),
            search: None,
        })
        .await
    }

    /// Get a material by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Material> {
        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Material".to_string()))?;

        Ok(Material::try_from(row)?)
    }

    /// Check whether a code is taken
    pub async fn code_exists(&self, code: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM materials WHERE code = $1)",
        )
        .bind(code)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    /// Create a material
    pub async fn create(&self, input: CreateMaterialInput) -> AppResult<Material> {
        input.validate()?;
        validate_material_code(&input.code)?;

        if self.code_exists(&input.code).await? {
            return Err(AppError::DuplicateEntry("code".to_string()));
        }

        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            r#"
            INSERT INTO materials (type, name, color_code, code, measurement, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MATERIAL_COLUMNS}
            "#
        ))
        .bind(input.kind.as_str())
        .bind(&input.name)
        .bind(&input.color_code)
        .bind(&input.code)
        .bind(&input.measurement)
        .bind(&input.image)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "materials_code_key", "code"))?;

        self.cache.invalidate(CacheEntity::Materials).await;

        let material = Material::try_from(row)?;
        tracing::info!(id = %material.id, code = %material.code, "Material created");
        Ok(material)
    }

    /// Update a material
    pub async fn update(&self, id: Uuid, input: UpdateMaterialInput) -> AppResult<Material> {
        input.validate()?;
        let existing = self.get(id).await?;

        // Storage lots reference the code by value
        validate_code_unchanged(&existing.code, input.code.as_deref())?;

        let kind = input.kind.unwrap_or(existing.kind);
        let name = input.name.unwrap_or(existing.name);
        let color_code = input.color_code.unwrap_or(existing.color_code);
        let measurement = input.measurement.unwrap_or(existing.measurement);
        let image = input.image.or(existing.image);

        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            r#"
            UPDATE materials
            SET type = $1, name = $2, color_code = $3, measurement = $4, image = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {MATERIAL_COLUMNS}
            "#
        ))
        .bind(kind.as_str())
        .bind(&name)
        .bind(&color_code)
        .bind(&measurement)
        .bind(&image)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate(CacheEntity::Materials).await;

        tracing::info!(id = %id, "Material updated");
        Ok(Material::try_from(row)?)
    }

    /// Delete a material; its recipe lines go with it
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Material".to_string()));
        }

        self.cache.invalidate(CacheEntity::Materials).await;
        tracing::info!(id = %id, "Material deleted");
        Ok(())
    }

    /// Count materials, total and per type
    pub async fn statistics(&self) -> AppResult<MaterialStatistics> {
        let cache_key = "statistics";
        let generation = match self.cache.get(CacheEntity::Materials, cache_key).await {
            Lookup::Hit(hit) => return Ok(hit),
            Lookup::Miss(generation) => generation,
        };

        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT type, COUNT(*) FROM materials GROUP BY type",
        )
        .fetch_all(&self.db)
        .await?;

        let counts = rows
            .into_iter()
            .map(|(kind, count)| {
                kind.parse::<MaterialType>()
                    .map(|kind| (kind, count))
                    .map_err(|e| AppError::from(sqlx::Error::Decode(Box::new(e))))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let statistics = MaterialStatistics::from_counts(counts);
        self.cache
            .put(CacheEntity::Materials, cache_key, generation, &statistics)
            .await;
        Ok(statistics)
    }
}
