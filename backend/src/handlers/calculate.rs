//! HTTP handler for the material requirement calculation

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::RequirementReport;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::CalculateService;
use crate::AppState;

/// Request body for a requirement calculation
#[derive(Debug, Deserialize, Validate)]
pub struct CalculateInput {
    pub clothes_id: Uuid,
    #[validate(required, range(min = 1))]
    pub count: Option<i64>,
}

/// Calculate the materials needed to produce `count` clothing items
pub async fn calculate_requirements(
    State(state): State<AppState>,
    Json(input): Json<CalculateInput>,
) -> AppResult<Json<RequirementReport>> {
    input.validate()?;
    let count = input.count.ok_or_else(|| {
        AppError::invalid_field("count", "Count is required", "Soni kiritilishi shart")
    })?;

    let service = CalculateService::new(
        state.db,
        state.cache,
        state.config.calculator.availability_formula,
    );
    let report = service.calculate(input.clothes_id, count).await?;
    Ok(Json(report))
}
