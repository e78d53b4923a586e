//! Storage (warehouse stock) service
//!
//! Besides lot CRUD this is the stock ledger the requirement calculator reads.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_lot_amounts, MaterialType, StockLedger, StockLot, StorageLot};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::cache::{CacheEntity, ListCache, Lookup};
use crate::error::{AppError, AppResult};

const LOT_COLUMNS: &str = "id, type AS kind, code, color_code, measurement, come_amount, \
                           work_amount, price, created_at, updated_at";

/// Storage service for managing received material lots
#[derive(Clone)]
pub struct StorageService {
    db: PgPool,
    cache: Arc<ListCache>,
}

/// Input for recording a received lot
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStorageInput {
    #[serde(rename = "type")]
    pub kind: MaterialType,
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    #[validate(length(min = 1, max = 50))]
    pub color_code: String,
    #[validate(length(min = 1, max = 50))]
    pub measurement: String,
    pub come_amount: Decimal,
    pub price: Decimal,
}

/// Input for updating a lot; absent fields keep their value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateStorageInput {
    #[serde(rename = "type")]
    pub kind: Option<MaterialType>,
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub color_code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub measurement: Option<String>,
    pub come_amount: Option<Decimal>,
    pub work_amount: Option<Decimal>,
    pub price: Option<Decimal>,
}

/// Lot as listed, with the value of the received quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageLotView {
    #[serde(flatten)]
    pub lot: StorageLot,
    pub total_price: Decimal,
}

impl TryFrom<StorageLot> for StorageLotView {
    type Error = AppError;

    fn try_from(lot: StorageLot) -> Result<Self, Self::Error> {
        let total_price = lot.total_price().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("value of storage lot {} overflows", lot.id))
        })?;
        Ok(Self { lot, total_price })
    }
}

/// Row for lot queries
#[derive(Debug, FromRow)]
struct StorageRow {
    id: Uuid,
    kind: String,
    code: String,
    color_code: String,
    measurement: String,
    come_amount: Decimal,
    work_amount: Decimal,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StorageRow> for StorageLot {
    type Error = sqlx::Error;

    fn try_from(row: StorageRow) -> Result<Self, Self::Error> {
        Ok(StorageLot {
            id: row.id,
            kind: row.kind.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            code: row.code,
            color_code: row.color_code,
            measurement: row.measurement,
            come_amount: row.come_amount,
            work_amount: row.work_amount,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl StorageService {
    /// Create a new StorageService instance
    pub fn new(db: PgPool, cache: Arc<ListCache>) -> Self {
        Self { db, cache }
    }

    /// List every lot
    pub async fn list(&self) -> AppResult<Vec<StorageLotView>> {
        let generation = match self.cache.get(CacheEntity::Storage, "all").await {
            Lookup::Hit(hit) => return Ok(hit),
            Lookup::Miss(generation) => generation,
        };

        let rows = sqlx::query_as::<_, StorageRow>(&format!(
            "SELECT {LOT_COLUMNS} FROM storages ORDER BY created_at, id"
        ))
        .fetch_all(&self.db)
        .await?;

        let lots = rows
            .into_iter()
            .map(|row| StorageLotView::try_from(StorageLot::try_from(row)?))
            .collect::<AppResult<Vec<_>>>()?;

        self.cache.put(CacheEntity::Storage, "all", generation, &lots).await;
        Ok(lots)
    }

    /// Get a lot by ID
    pub async fn get(&self, id: Uuid) -> AppResult<StorageLot> {
        let row = sqlx::query_as::<_, StorageRow>(&format!(
            "SELECT {LOT_COLUMNS} FROM storages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Storage lot".to_string()))?;

        Ok(StorageLot::try_from(row)?)
    }

    /// Record a received lot; nothing of it is allocated yet
    pub async fn create(&self, input: CreateStorageInput) -> AppResult<StorageLot> {
        input.validate()?;
        validate_lot_amounts(input.come_amount, Decimal::ZERO, input.price)?;

        let row = sqlx::query_as::<_, StorageRow>(&format!(
            r#"
            INSERT INTO storages (type, code, color_code, measurement, come_amount, work_amount, price)
            VALUES ($1, $2, $3, $4, $5, 0, $6)
            RETURNING {LOT_COLUMNS}
            "#
        ))
        .bind(input.kind.as_str())
        .bind(&input.code)
        .bind(&input.color_code)
        .bind(&input.measurement)
        .bind(input.come_amount)
        .bind(input.price)
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate(CacheEntity::Storage).await;

        let lot = StorageLot::try_from(row)?;
        tracing::info!(id = %lot.id, code = %lot.code, come_amount = %lot.come_amount, "Storage lot received");
        Ok(lot)
    }

    /// Update a lot
    pub async fn update(&self, id: Uuid, input: UpdateStorageInput) -> AppResult<StorageLot> {
        input.validate()?;
        let existing = self.get(id).await?;

        let come_amount = input.come_amount.unwrap_or(existing.come_amount);
        let work_amount = input.work_amount.unwrap_or(existing.work_amount);
        let price = input.price.unwrap_or(existing.price);
        validate_lot_amounts(come_amount, work_amount, price)?;

        let kind = input.kind.unwrap_or(existing.kind);
        let code = input.code.unwrap_or(existing.code);
        let color_code = input.color_code.unwrap_or(existing.color_code);
        let measurement = input.measurement.unwrap_or(existing.measurement);

        let row = sqlx::query_as::<_, StorageRow>(&format!(
            r#"
            UPDATE storages
            SET type = $1, code = $2, color_code = $3, measurement = $4,
                come_amount = $5, work_amount = $6, price = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {LOT_COLUMNS}
            "#
        ))
        .bind(kind.as_str())
        .bind(&code)
        .bind(&color_code)
        .bind(&measurement)
        .bind(come_amount)
        .bind(work_amount)
        .bind(price)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate(CacheEntity::Storage).await;
        Ok(StorageLot::try_from(row)?)
    }

    /// Delete a lot
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM storages WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Storage lot".to_string()));
        }

        self.cache.invalidate(CacheEntity::Storage).await;
        tracing::info!(id = %id, "Storage lot deleted");
        Ok(())
    }
}

#[async_trait]
impl StockLedger for StorageService {
    type Error = sqlx::Error;

    async fn undepleted_lots(&self, code: &str) -> Result<Vec<StockLot>, Self::Error> {
        sqlx::query_as::<_, (Decimal, Decimal, String, Uuid, Decimal)>(
            r#"
            SELECT come_amount, price, code, id, work_amount
            FROM storages
            WHERE code = $1 AND come_amount <> work_amount
            ORDER BY created_at, id
            "#,
        )
        .bind(code)
        .fetch_all(&self.db)
        .await
        .map(|rows| {
            rows.into_iter()
                .map(|r| StockLot {
                    come_amount: r.0,
                    price: r.1,
                    code: r.2,
                    id: r.3,
                    work_amount: r.4,
                })
                .collect()
        })
    }
}
