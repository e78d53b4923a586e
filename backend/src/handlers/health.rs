//! Liveness and readiness

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use shared::AvailabilityFormula;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    pub service: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub cache_enabled: bool,
    /// Stock formula the calculator runs with
    pub availability_formula: AvailabilityFormula,
}

/// 200 when the database answers, 503 otherwise
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "database unreachable");
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthReport {
            service: "gw-server",
            version: env!("CARGO_PKG_VERSION"),
            database,
            cache_enabled: state.config.cache.enabled,
            availability_formula: state.config.calculator.availability_formula,
        }),
    )
}
