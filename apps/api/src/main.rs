mod config;
mod customers;
mod errors;
mod layout;
mod printing;
mod receipt;
mod render;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::customers::CustomerStore;
use crate::layout::{default_page_config, StaticMetrics};
use crate::printing::dispatcher_from_template;
use crate::receipt::sequence::ReceiptCounter;
use crate::receipt::{AssemblerSettings, ReceiptAssembler};
use crate::render::{SvgReceiptRenderer, SvgRenderConfig};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Receipt API v{}", env!("CARGO_PKG_VERSION"));

    // Renderer; the logo is embedded only if the file exists
    let logo_path = config.logo_path.is_file().then(|| config.logo_path.clone());
    if logo_path.is_none() {
        info!(
            "No logo at {}, drawing placeholder",
            config.logo_path.display()
        );
    }
    let renderer = Arc::new(SvgReceiptRenderer::new(SvgRenderConfig {
        logo_path,
        ..SvgRenderConfig::default()
    }));

    let printer = dispatcher_from_template(config.print_command.as_deref());
    match &config.print_command {
        Some(cmd) => info!("Print command: {cmd}"),
        None => info!("PRINT_COMMAND not set, printing disabled"),
    }

    let counter = ReceiptCounter::new(&config.counter_path);
    match counter.suggest_next() {
        Ok(next) => info!(
            "Receipt counter at {} (next suggested: {next})",
            counter.path().display()
        ),
        Err(e) => warn!(
            "Receipt counter at {} is unreadable: {e:#}",
            counter.path().display()
        ),
    }

    let assembler = ReceiptAssembler::new(
        AssemblerSettings {
            page: default_page_config(),
            output_dir: config.output_dir.clone(),
            contact_lines: config.contact_lines.clone(),
            signatory: config.signatory.clone(),
            default_copies: config.default_copies,
        },
        Arc::new(StaticMetrics),
        renderer,
        printer,
        counter,
    );

    let state = AppState {
        customers: Arc::new(CustomerStore::new(&config.customers_path)),
        assembler: Arc::new(assembler),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
