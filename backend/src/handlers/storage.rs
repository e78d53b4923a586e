//! HTTP handlers for storage (stock lot) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::storage::{
    CreateStorageInput, StorageLotView, StorageService, UpdateStorageInput,
};
use crate::AppState;

/// List stock lots with their total value
pub async fn list_storage(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<StorageLotView>>>> {
    let service = StorageService::new(state.db, state.cache);
    let lots = service.list().await?;
    Ok(Json(ApiResponse::ok("Storage retrieved", lots)))
}

/// Get a stock lot
pub async fn get_storage(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StorageLotView>>> {
    let service = StorageService::new(state.db, state.cache);
    let lot = service.get(lot_id).await?;
    Ok(Json(ApiResponse::ok("Storage lot retrieved", StorageLotView::try_from(lot)?)))
}

/// Record a received stock lot
pub async fn create_storage(
    State(state): State<AppState>,
    Json(input): Json<CreateStorageInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<StorageLotView>>)> {
    let service = StorageService::new(state.db, state.cache);
    let lot = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Storage lot created", StorageLotView::try_from(lot)?)),
    ))
}

/// Update a stock lot
pub async fn update_storage(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
    Json(input): Json<UpdateStorageInput>,
) -> AppResult<Json<ApiResponse<StorageLotView>>> {
    let service = StorageService::new(state.db, state.cache);
    let lot = service.update(lot_id, input).await?;
    Ok(Json(ApiResponse::ok("Storage lot updated", StorageLotView::try_from(lot)?)))
}

/// Delete a stock lot
pub async fn delete_storage(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = StorageService::new(state.db, state.cache);
    service.delete(lot_id).await?;
    Ok(Json(ApiResponse::ok("Storage lot deleted", ())))
}
