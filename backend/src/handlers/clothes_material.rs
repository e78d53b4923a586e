//! HTTP handlers for bill-of-materials endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{ApiResponse, ClothesMaterial, RecipeLine};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::clothes_material::{
    ClothesMaterialService, CreateRecipeInput, UpdateRecipeLineInput,
};
use crate::AppState;

/// Define a clothing item's recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(input): Json<CreateRecipeInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<ClothesMaterial>>>)> {
    let service = ClothesMaterialService::new(state.db);
    let lines = service.create_many(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Recipe created", lines))))
}

/// Get the recipe of a clothing item
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(clothes_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<RecipeLine>>>> {
    let service = ClothesMaterialService::new(state.db);
    let lines = service.recipe(clothes_id).await?;
    let count = lines.len();
    Ok(Json(ApiResponse::ok("Recipe retrieved", lines).with_count(count)))
}

/// Update a recipe line
pub async fn update_recipe_line(
    State(state): State<AppState>,
    Path(line_id): Path<Uuid>,
    Json(input): Json<UpdateRecipeLineInput>,
) -> AppResult<Json<ApiResponse<ClothesMaterial>>> {
    let service = ClothesMaterialService::new(state.db);
    let line = service.update(line_id, input).await?;
    Ok(Json(ApiResponse::ok("Recipe line updated", line)))
}

/// Delete a recipe line
pub async fn delete_recipe_line(
    State(state): State<AppState>,
    Path(line_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = ClothesMaterialService::new(state.db);
    service.delete(line_id).await?;
    Ok(Json(ApiResponse::ok("Recipe line deleted", ())))
}
