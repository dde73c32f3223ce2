use std::sync::Arc;

use axum::{Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::get};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_notifications))
}

/// Live alerts, deduplicated by message, newest first.
pub async fn list_notifications(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.notifications.list() {
        Ok(alerts) => (StatusCode::OK, Json(alerts)).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}
