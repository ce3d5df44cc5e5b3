use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization and startup.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Core module trait that every STACKS catalog module implements.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; also the URL segment its routes are
    /// mounted under (`/catalog/{name}`).
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context.
    /// Called during application startup, before any route is served.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes.
    /// Routes will be mounted under `/catalog/{module_name}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Start background tasks for this module, after all modules are
    /// initialized.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
