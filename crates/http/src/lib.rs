//! HTTP server facade for STACKS with Axum, error handling, and server-side
//! view rendering.

use anyhow::Context;
use axum::{routing::get, Router};

use stacks_kernel::ModuleRegistry;

pub mod error;
pub mod router;
pub mod views;

pub use error::AppError;
pub use views::View;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &stacks_kernel::settings::Settings,
) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &stacks_kernel::settings::Settings,
) -> Router {
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        let module_name = module.name();

        tracing::info!(
            module = module_name,
            "mounting module routes under /catalog/{}",
            module_name
        );
        router_builder = router_builder.mount_module(module_name, module.routes());
    }

    router_builder.build()
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
