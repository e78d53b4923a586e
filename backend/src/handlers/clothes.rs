//! HTTP handlers for clothing item endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{ApiResponse, ClothingItem};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::clothes::{ClothesService, CreateClothesInput, UpdateClothesInput};
use crate::AppState;

/// List clothing items
pub async fn list_clothes(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ClothingItem>>>> {
    let service = ClothesService::new(state.db, state.cache);
    let items = service.list().await?;
    Ok(Json(ApiResponse::ok("Clothes retrieved", items)))
}

/// Get a clothing item
pub async fn get_clothes(
    State(state): State<AppState>,
    Path(clothes_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ClothingItem>>> {
    let service = ClothesService::new(state.db, state.cache);
    let item = service.get(clothes_id).await?;
    Ok(Json(ApiResponse::ok("Clothes retrieved", item)))
}

/// Create a clothing item
pub async fn create_clothes(
    State(state): State<AppState>,
    Json(input): Json<CreateClothesInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ClothingItem>>)> {
    let service = ClothesService::new(state.db, state.cache);
    let item = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Clothes created", item))))
}

/// Update a clothing item
pub async fn update_clothes(
    State(state): State<AppState>,
    Path(clothes_id): Path<Uuid>,
    Json(input): Json<UpdateClothesInput>,
) -> AppResult<Json<ApiResponse<ClothingItem>>> {
    let service = ClothesService::new(state.db, state.cache);
    let item = service.update(clothes_id, input).await?;
    Ok(Json(ApiResponse::ok("Clothes updated", item)))
}

/// Delete a clothing item
pub async fn delete_clothes(
    State(state): State<AppState>,
    Path(clothes_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = ClothesService::new(state.db, state.cache);
    service.delete(clothes_id).await?;
    Ok(Json(ApiResponse::ok("Clothes deleted", ())))
}
