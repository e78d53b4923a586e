//! Bill-of-materials models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MaterialType;

/// One recipe line: how much of a material a single clothing item consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClothesMaterial {
    pub id: Uuid,
    pub clothes_id: Uuid,
    pub material_id: Uuid,
    /// Per-unit quantity, in the material's measurement unit
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recipe line joined with the descriptive fields of its material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub material_id: Uuid,
    pub material_name: String,
    pub material_type: MaterialType,
    pub measurement: String,
    pub material_code: String,
    pub per_unit_amount: Decimal,
}
