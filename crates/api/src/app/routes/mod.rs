use axum::Router;

pub mod notifications;
pub mod products;
pub mod sales;
pub mod system;

/// Router for all `/api` endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/sales", sales::router())
        .nest("/notifications", notifications::router())
}
