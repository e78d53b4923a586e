//! Material requirement calculation service

use std::sync::Arc;

use shared::{AvailabilityFormula, RequirementCalculator, RequirementReport};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::ListCache;
use crate::error::AppResult;
use crate::services::{ClothesMaterialService, StorageService};

/// Checks a production run of a clothing item against warehouse stock
#[derive(Clone)]
pub struct CalculateService {
    calculator: RequirementCalculator<ClothesMaterialService, StorageService>,
}

impl CalculateService {
    /// Create a new CalculateService instance
    pub fn new(db: PgPool, cache: Arc<ListCache>, formula: AvailabilityFormula) -> Self {
        let recipes = ClothesMaterialService::new(db.clone());
        let ledger = StorageService::new(db, cache);
        Self {
            calculator: RequirementCalculator::new(recipes, ledger).with_formula(formula),
        }
    }

    /// Per-material needs for producing `count` units of a clothing item
    pub async fn calculate(&self, clothes_id: Uuid, count: i64) -> AppResult<RequirementReport> {
        let report = self.calculator.calculate(clothes_id, count).await?;

        if report.is_empty() {
            tracing::debug!(clothes_id = %clothes_id, "Clothes has no recipe");
        } else {
            tracing::debug!(
                clothes_id = %clothes_id,
                count,
                materials = report.all_amount.len(),
                shortages = report.shortages().count(),
                formula = ?self.calculator.formula(),
                "Requirements calculated"
            );
        }

        Ok(report)
    }
}
