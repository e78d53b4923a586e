//! Material requirement report models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MaterialType, StockLot};

/// Requirement breakdown for one production run of a clothing item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementReport {
    pub all_amount: Vec<MaterialNeed>,
}

impl RequirementReport {
    /// True when the clothing item has no recipe lines
    pub fn is_empty(&self) -> bool {
        self.all_amount.is_empty()
    }

    /// True when every material is sufficiently stocked
    pub fn is_feasible(&self) -> bool {
        self.all_amount
            .iter()
            .all(|need| need.need_amount_price_detail.status)
    }

    /// Materials whose stock does not cover the need
    pub fn shortages(&self) -> impl Iterator<Item = &MaterialNeed> {
        self.all_amount
            .iter()
            .filter(|need| !need.need_amount_price_detail.status)
    }
}

/// Need for a single material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialNeed {
    pub material_id: Uuid,
    pub material_name: String,
    pub material_type: MaterialType,
    pub material_measurement: String,
    pub material_code: String,
    pub need_amount: Decimal,
    pub need_amount_price_detail: PriceDetail,
}

/// Stock that can cover a material need, and whether it does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDetail {
    /// Lots of this material that are not fully drawn down
    pub material: Vec<StockLot>,
    pub has_amount: Decimal,
    pub need_amount: Decimal,
    pub status: bool,
}
