//! Warehouse stock models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MaterialType;

/// A batch of received material stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageLot {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MaterialType,
    /// Material code this lot belongs to
    pub code: String,
    pub color_code: String,
    pub measurement: String,
    /// Quantity received in this lot
    pub come_amount: Decimal,
    /// Quantity already allocated to work in progress
    pub work_amount: Decimal,
    /// Unit cost
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StorageLot {
    /// Value of the whole received quantity; `None` when it overflows
    pub fn total_price(&self) -> Option<Decimal> {
        self.price.checked_mul(self.come_amount)
    }

    pub fn as_stock_lot(&self) -> StockLot {
        StockLot {
            come_amount: self.come_amount,
            price: self.price,
            code: self.code.clone(),
            id: self.id,
            work_amount: self.work_amount,
        }
    }
}

/// The slice of a lot the requirement calculator works with.
///
/// `work_amount` is read for filtering but never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLot {
    pub come_amount: Decimal,
    pub price: Decimal,
    pub code: String,
    pub id: Uuid,
    #[serde(skip_serializing, default)]
    pub work_amount: Decimal,
}
