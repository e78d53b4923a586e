//! Route definitions for the Garment Workshop API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Clothing items, their recipes and the requirement calculation
        .nest("/clothes", clothes_routes())
        // Raw material catalogue
        .nest("/materials", material_routes())
        // Warehouse stock lots
        .nest("/storage", storage_routes())
}

/// Clothing item routes
fn clothes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_clothes).post(handlers::create_clothes))
        .route("/calculate", post(handlers::calculate_requirements))
        // Earlier clients post the same body here
        .route("/seller", post(handlers::calculate_requirements))
        .route("/material", post(handlers::create_recipe))
        .route(
            "/material/:line_id",
            put(handlers::update_recipe_line).delete(handlers::delete_recipe_line),
        )
        .route(
            "/:clothes_id",
            get(handlers::get_clothes)
                .put(handlers::update_clothes)
                .delete(handlers::delete_clothes),
        )
        .route("/:clothes_id/materials", get(handlers::get_recipe))
}

/// Material catalogue routes
fn material_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_materials).post(handlers::create_material))
        .route("/statistics", get(handlers::get_material_statistics))
        .route("/type/:kind", get(handlers::list_materials_by_type))
        .route(
            "/:material_id",
            get(handlers::get_material)
                .put(handlers::update_material)
                .delete(handlers::delete_material),
        )
}

/// Storage routes
fn storage_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_storage).post(handlers::create_storage))
        .route(
            "/:lot_id",
            get(handlers::get_storage)
                .put(handlers::update_storage)
                .delete(handlers::delete_storage),
        )
}
