//! Validation utilities for the Garment Workshop backend

use rust_decimal::Decimal;
use thiserror::Error;

/// A field failed a domain rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

// ============================================================================
// Production Validations
// ============================================================================

/// Validate a production count; only positive integers make sense
pub fn validate_count(count: i64) -> Result<Decimal, ValidationError> {
    if count <= 0 {
        return Err(ValidationError::new("count", "Count must be a positive integer"));
    }
    Ok(Decimal::from(count))
}

/// Validate a per-unit recipe amount
pub fn validate_recipe_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount", "Amount must be positive"));
    }
    Ok(())
}

// ============================================================================
// Stock Validations
// ============================================================================

/// Validate the counters of a storage lot
pub fn validate_lot_amounts(
    come_amount: Decimal,
    work_amount: Decimal,
    price: Decimal,
) -> Result<(), ValidationError> {
    if come_amount < Decimal::ZERO {
        return Err(ValidationError::new("come_amount", "Received amount cannot be negative"));
    }
    if work_amount < Decimal::ZERO {
        return Err(ValidationError::new("work_amount", "Work amount cannot be negative"));
    }
    if work_amount > come_amount {
        return Err(ValidationError::new(
            "work_amount",
            "Work amount cannot exceed received amount",
        ));
    }
    if price < Decimal::ZERO {
        return Err(ValidationError::new("price", "Price cannot be negative"));
    }
    if come_amount.checked_mul(price).is_none() {
        return Err(ValidationError::new("price", "Lot value is too large"));
    }
    Ok(())
}

// ============================================================================
// Catalogue Validations
// ============================================================================

/// Validate a material code: non-blank, no surrounding whitespace
pub fn validate_material_code(code: &str) -> Result<(), ValidationError> {
    if code.trim().is_empty() {
        return Err(ValidationError::new("code", "Material code is required"));
    }
    if code.trim() != code {
        return Err(ValidationError::new(
            "code",
            "Material code cannot start or end with whitespace",
        ));
    }
    Ok(())
}

/// A material's code is fixed once created; repeating it is allowed
pub fn validate_code_unchanged(
    current: &str,
    requested: Option<&str>,
) -> Result<(), ValidationError> {
    match requested {
        Some(code) if code != current => {
            Err(ValidationError::new("code", "Material code cannot be changed"))
        }
        _ => Ok(()),
    }
}
