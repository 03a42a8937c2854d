//! Axum route handlers for the saved-customer list.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::customers::store::{CustomerError, CustomerStore};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddCustomerRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CustomersResponse {
    pub customers: Vec<String>,
}

/// Runs a store operation off the async runtime; the store does blocking file I/O.
async fn with_store<F>(store: &Arc<CustomerStore>, op: F) -> Result<Vec<String>, AppError>
where
    F: FnOnce(&CustomerStore) -> Result<Vec<String>, CustomerError> + Send + 'static,
{
    let store = Arc::clone(store);
    let customers = tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed: {e}")))??;
    Ok(customers)
}

/// GET /api/v1/customers
pub async fn handle_list_customers(
    State(state): State<AppState>,
) -> Result<Json<CustomersResponse>, AppError> {
    let customers = with_store(&state.customers, |store| Ok(store.list())).await?;
    Ok(Json(CustomersResponse { customers }))
}

/// POST /api/v1/customers
pub async fn handle_add_customer(
    State(state): State<AppState>,
    Json(request): Json<AddCustomerRequest>,
) -> Result<(StatusCode, Json<CustomersResponse>), AppError> {
    let customers = with_store(&state.customers, move |store| store.add(&request.name)).await?;
    Ok((StatusCode::CREATED, Json(CustomersResponse { customers })))
}

/// DELETE /api/v1/customers/:name
pub async fn handle_remove_customer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CustomersResponse>, AppError> {
    let customers = with_store(&state.customers, move |store| store.remove(&name)).await?;
    Ok(Json(CustomersResponse { customers }))
}
