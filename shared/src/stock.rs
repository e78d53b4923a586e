//! Stock availability rules
//!
//! A lot whose `come_amount` equals its `work_amount` is drawn down and never
//! counts towards availability. How much a remaining lot contributes is
//! decided by [`available_amount`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::StockLot;

/// Which quantity of an undepleted lot counts as available
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityFormula {
    /// Whole received quantity (`come_amount`) of every undepleted lot
    #[default]
    Received,
    /// Quantity not yet allocated (`come_amount - work_amount`)
    Remaining,
}

/// Lot considered fully drawn down
pub fn is_depleted(lot: &StockLot) -> bool {
    lot.come_amount == lot.work_amount
}

/// Total quantity available across `lots` under `formula`.
///
/// Callers pass undepleted lots only. The total saturates at the decimal
/// bounds instead of overflowing.
pub fn available_amount(lots: &[StockLot], formula: AvailabilityFormula) -> Decimal {
    lots.iter()
        .map(|lot| match formula {
            AvailabilityFormula::Received => lot.come_amount,
            AvailabilityFormula::Remaining => lot.come_amount.saturating_sub(lot.work_amount),
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Stock on hand for one material code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Availability {
    pub lots: Vec<StockLot>,
    pub total_available: Decimal,
}

impl Availability {
    /// Drop depleted lots and total the rest
    pub fn from_lots(lots: impl IntoIterator<Item = StockLot>, formula: AvailabilityFormula) -> Self {
        let lots: Vec<StockLot> = lots.into_iter().filter(|lot| !is_depleted(lot)).collect();
        let total_available = available_amount(&lots, formula);
        Self {
            lots,
            total_available,
        }
    }

    pub fn covers(&self, need_amount: Decimal) -> bool {
        self.total_available >= need_amount
    }
}
