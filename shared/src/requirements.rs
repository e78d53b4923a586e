//! Material-requirement calculation
//!
//! Joins a clothing item's recipe with warehouse stock to tell, per material,
//! how much a production run needs and whether stock covers it. The
//! calculation only reads; it reserves nothing.

use std::convert::Infallible;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{MaterialNeed, PriceDetail, RecipeLine, RequirementReport, StockLot};
use crate::stock::{Availability, AvailabilityFormula};
use crate::validation::validate_count;

/// Result of looking up a clothing item's recipe
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeLookup {
    /// No clothing item with this id
    UnknownClothing,
    /// The item exists but has no recipe lines
    Empty,
    Lines(Vec<RecipeLine>),
}

/// Source of bill-of-materials lines
#[async_trait]
pub trait RecipeStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Recipe lines of a clothing item joined with their material, in
    /// insertion order. Empty when the item has no recipe or does not exist.
    async fn get_requirements(&self, clothes_id: Uuid) -> Result<Vec<RecipeLine>, Self::Error>;

    async fn clothing_exists(&self, clothes_id: Uuid) -> Result<bool, Self::Error>;

    /// Like [`RecipeStore::get_requirements`] but tells a missing item apart
    /// from an item without a recipe
    async fn lookup_recipe(&self, clothes_id: Uuid) -> Result<RecipeLookup, Self::Error> {
        let lines = self.get_requirements(clothes_id).await?;
        if !lines.is_empty() {
            return Ok(RecipeLookup::Lines(lines));
        }
        if self.clothing_exists(clothes_id).await? {
            Ok(RecipeLookup::Empty)
        } else {
            Ok(RecipeLookup::UnknownClothing)
        }
    }
}

/// Source of warehouse lots
#[async_trait]
pub trait StockLedger: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lots of `code` whose `come_amount` differs from `work_amount`
    async fn undepleted_lots(&self, code: &str) -> Result<Vec<StockLot>, Self::Error>;

    async fn get_availability(
        &self,
        code: &str,
        formula: AvailabilityFormula,
    ) -> Result<Availability, Self::Error> {
        let lots = self.undepleted_lots(code).await?;
        Ok(Availability::from_lots(lots, formula))
    }
}

/// Calculation failures
#[derive(Debug, Error)]
pub enum CalculationError<E>
where
    E: std::error::Error + 'static,
{
    #[error("count must be a positive integer, got {0}")]
    InvalidCount(i64),

    #[error("clothing item {0} not found")]
    ClothingNotFound(Uuid),

    #[error("need for material {material_code} exceeds the representable amount")]
    AmountOverflow { material_code: String },

    #[error("data access failed: {0}")]
    DataAccess(#[source] E),
}

/// Quantity of a material one production run consumes; `None` on overflow
pub fn need_amount(per_unit_amount: Decimal, count: Decimal) -> Option<Decimal> {
    per_unit_amount.checked_mul(count)
}

fn line_need<E>(line: &RecipeLine, count: Decimal) -> Result<Decimal, CalculationError<E>>
where
    E: std::error::Error + 'static,
{
    need_amount(line.per_unit_amount, count).ok_or_else(|| CalculationError::AmountOverflow {
        material_code: line.material_code.clone(),
    })
}

/// Build the need entry of one recipe line from its stock
pub fn compose_need(line: RecipeLine, need_amount: Decimal, availability: Availability) -> MaterialNeed {
    let status = availability.covers(need_amount);
    MaterialNeed {
        material_id: line.material_id,
        material_name: line.material_name,
        material_type: line.material_type,
        material_measurement: line.measurement,
        material_code: line.material_code,
        need_amount,
        need_amount_price_detail: PriceDetail {
            material: availability.lots,
            has_amount: availability.total_available,
            need_amount,
            status,
        },
    }
}

/// Run the calculation over an in-memory snapshot of recipe and stock.
///
/// `lots` may hold lots of any code and depleted lots; each line picks the
/// undepleted lots of its own material code.
pub fn calculate_from_snapshot(
    lines: Vec<RecipeLine>,
    lots: &[StockLot],
    count: i64,
    formula: AvailabilityFormula,
) -> Result<RequirementReport, CalculationError<Infallible>> {
    let units = validate_count(count).map_err(|_| CalculationError::InvalidCount(count))?;
    let all_amount = lines
        .into_iter()
        .map(|line| {
            let need = line_need(&line, units)?;
            let availability = Availability::from_lots(
                lots.iter().filter(|lot| lot.code == line.material_code).cloned(),
                formula,
            );
            Ok(compose_need(line, need, availability))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RequirementReport { all_amount })
}

/// Computes material requirements against live stores
#[derive(Clone)]
pub struct RequirementCalculator<R, S> {
    recipes: R,
    ledger: S,
    formula: AvailabilityFormula,
}

impl<R, S> RequirementCalculator<R, S>
where
    R: RecipeStore,
    S: StockLedger<Error = R::Error>,
{
    pub fn new(recipes: R, ledger: S) -> Self {
        Self {
            recipes,
            ledger,
            formula: AvailabilityFormula::default(),
        }
    }

    pub fn with_formula(mut self, formula: AvailabilityFormula) -> Self {
        self.formula = formula;
        self
    }

    pub fn formula(&self) -> AvailabilityFormula {
        self.formula
    }

    /// Compute per-material needs for producing `count` units of a clothing
    /// item. An item without a recipe yields an empty report.
    pub async fn calculate(
        &self,
        clothes_id: Uuid,
        count: i64,
    ) -> Result<RequirementReport, CalculationError<R::Error>> {
        let units = validate_count(count).map_err(|_| CalculationError::InvalidCount(count))?;

        let lines = match self
            .recipes
            .lookup_recipe(clothes_id)
            .await
            .map_err(CalculationError::DataAccess)?
        {
            RecipeLookup::UnknownClothing => {
                return Err(CalculationError::ClothingNotFound(clothes_id))
            }
            RecipeLookup::Empty => Vec::new(),
            RecipeLookup::Lines(lines) => lines,
        };

        let mut all_amount = Vec::with_capacity(lines.len());
        for line in lines {
            let need = line_need(&line, units)?;
            let availability = self
                .ledger
                .get_availability(&line.material_code, self.formula)
                .await
                .map_err(CalculationError::DataAccess)?;
            all_amount.push(compose_need(line, need, availability));
        }

        Ok(RequirementReport { all_amount })
    }
}
