use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use restock_core::StockError;

pub fn stock_error_to_response(err: StockError) -> axum::response::Response {
    match err {
        StockError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
        StockError::ProductNotFound(id) => json_error(
            StatusCode::NOT_FOUND,
            "product_not_found",
            format!("product with id {id} not found"),
        ),
        StockError::InsufficientStock { name, available } => json_error(
            StatusCode::CONFLICT,
            "insufficient_stock",
            format!("insufficient stock for product \"{name}\". Available quantity: {available}"),
        ),
        StockError::Fatal(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
