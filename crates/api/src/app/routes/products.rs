use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};

use restock_core::ProductId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(add_product))
        .route(
            "/:id",
            axum::routing::put(update_product).delete(delete_product),
        )
        .route("/:id/quantity", patch(adjust_quantity))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list() {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn add_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AddProductRequest>,
) -> axum::response::Response {
    match services.coordinator.add_product(body.into_new_product()) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    match services
        .coordinator
        .edit_product(ProductId::new(id), body.into_patch())
    {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn adjust_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
    Json(body): Json<dto::AdjustQuantityRequest>,
) -> axum::response::Response {
    match services
        .coordinator
        .adjust_quantity(ProductId::new(id), body.quantity_change)
    {
        Ok(product) => (
            StatusCode::OK,
            Json(serde_json::json!({ "new_quantity": product.quantity })),
        )
            .into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    match services.coordinator.delete_product(ProductId::new(id)) {
        Ok(product) => (
            StatusCode::OK,
            Json(serde_json::json!({ "product_name": product.name })),
        )
            .into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}
