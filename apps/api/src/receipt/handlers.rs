//! Axum route handlers for the Receipt API.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::layout::LayoutPlan;
use crate::receipt::assembler::GeneratedReceipt;
use crate::receipt::models::{ReceiptData, ReceiptForm};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct NextNumberResponse {
    pub receipt_number: u64,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub receipt: ReceiptData,
    pub amount_display: String,
    pub written_amount: String,
    pub file_name: String,
    pub layout: LayoutPlan,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/receipts/next-number
///
/// One past the last committed receipt number; 1 when none exists yet.
pub async fn handle_next_number(
    State(state): State<AppState>,
) -> Result<Json<NextNumberResponse>, AppError> {
    let assembler = Arc::clone(&state.assembler);
    let receipt_number = tokio::task::spawn_blocking(move || assembler.suggest_next_number())
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed: {e}")))??;

    Ok(Json(NextNumberResponse { receipt_number }))
}

/// POST /api/v1/receipts/preview
///
/// Validates the form and returns the composed layout. Writes nothing.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(form): Json<ReceiptForm>,
) -> Result<Json<PreviewResponse>, AppError> {
    let composed = Arc::clone(&state.assembler).preview(form).await?;

    Ok(Json(PreviewResponse {
        amount_display: composed.data.amount_display(),
        receipt: composed.data,
        written_amount: composed.written_amount,
        file_name: composed.file_name,
        layout: composed.document.plan,
    }))
}

/// POST /api/v1/receipts
///
/// Renders the receipt, commits its number and dispatches printing.
/// Returns 201 even when printing failed; `printed` tells the caller.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(form): Json<ReceiptForm>,
) -> Result<(StatusCode, Json<GeneratedReceipt>), AppError> {
    let generated = Arc::clone(&state.assembler).generate(form).await?;
    Ok((StatusCode::CREATED, Json(generated)))
}
