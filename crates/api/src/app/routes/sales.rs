use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_sale))
        .route("/records", get(list_sale_records))
}

pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateSaleRequest>,
) -> axum::response::Response {
    let lines: Vec<_> = body
        .products
        .into_iter()
        .map(dto::SaleLineRequest::into_line_item)
        .collect();

    match services.coordinator.execute_sale(&lines) {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({ "total_sale": outcome.total_price })),
        )
            .into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn list_sale_records(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.sale_records() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}
