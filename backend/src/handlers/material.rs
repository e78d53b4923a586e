//! HTTP handlers for material catalogue endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{ApiResponse, Material, MaterialFilter, MaterialStatistics, MaterialType};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::material::{CreateMaterialInput, MaterialService, UpdateMaterialInput};
use crate::AppState;

fn service(state: &AppState) -> MaterialService {
    MaterialService::new(state.db.clone(), state.cache.clone())
}

/// List materials, filtered by `type` and `search`
pub async fn list_materials(
    State(state): State<AppState>,
    Query(filter): Query<MaterialFilter>,
) -> AppResult<Json<ApiResponse<Vec<Material>>>> {
    let materials = service(&state).list(filter).await?;
    let count = materials.len();
    Ok(Json(
        ApiResponse::ok("Materials retrieved", materials).with_count(count),
    ))
}

/// List materials of one type
pub async fn list_materials_by_type(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Material>>>> {
    let kind: MaterialType = kind
        .parse()
        .map_err(|_| AppError::InvalidMaterialType(kind.clone()))?;
    let materials = service(&state).list_by_type(kind).await?;
    let count = materials.len();
    Ok(Json(
        ApiResponse::ok("Materials retrieved", materials).with_count(count),
    ))
}

/// Material counts by type
pub async fn get_material_statistics(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MaterialStatistics>>> {
    let statistics = service(&state).statistics().await?;
    Ok(Json(ApiResponse::ok("Statistics retrieved", statistics)))
}

/// Get a material
pub async fn get_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let material = service(&state).get(material_id).await?;
    Ok(Json(ApiResponse::ok("Material retrieved", material)))
}

/// Create a material
pub async fn create_material(
    State(state): State<AppState>,
    Json(input): Json<CreateMaterialInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Material>>)> {
    let material = service(&state).create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Material created", material)),
    ))
}

/// Update a material
pub async fn update_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
    Json(input): Json<UpdateMaterialInput>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let material = service(&state).update(material_id, input).await?;
    Ok(Json(ApiResponse::ok("Material updated", material)))
}

/// Delete a material
pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    service(&state).delete(material_id).await?;
    Ok(Json(ApiResponse::ok("Material deleted", ())))
}
