//! STACKS Application Library
//!
//! Library-catalog web application: CRUD screens for authors, genres, books,
//! and book instances over an in-memory document store.

pub mod forms;
pub mod modules;
pub mod state;

use std::sync::Arc;

use anyhow::Context;

use stacks_kernel::settings::Settings;
use stacks_kernel::{InitCtx, ModuleRegistry};

use state::Catalog;

/// Run the application: build the catalog, register modules, and serve HTTP
/// until the server exits.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let catalog = Arc::new(Catalog::new());
    if settings.catalog.seed {
        state::seed(&catalog)
            .await
            .context("failed to seed catalog")?;
    }

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, catalog);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    stacks_http::start_server(&registry, &settings).await?;

    registry.stop_all().await
}
