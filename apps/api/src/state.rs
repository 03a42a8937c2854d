use std::sync::Arc;

use crate::config::Config;
use crate::customers::CustomerStore;
use crate::receipt::ReceiptAssembler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns the generation pipeline: layout, renderer, printer and the sequence counter.
    pub assembler: Arc<ReceiptAssembler>,
    pub customers: Arc<CustomerStore>,
}
