pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::customers::handlers as customers;
use crate::receipt::handlers as receipts;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Receipts
        .route(
            "/api/v1/receipts/next-number",
            get(receipts::handle_next_number),
        )
        .route("/api/v1/receipts/preview", post(receipts::handle_preview))
        .route("/api/v1/receipts", post(receipts::handle_generate))
        // Saved customers
        .route(
            "/api/v1/customers",
            get(customers::handle_list_customers).post(customers::handle_add_customer),
        )
        .route(
            "/api/v1/customers/:name",
            delete(customers::handle_remove_customer),
        )
        .with_state(state)
}
