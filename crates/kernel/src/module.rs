use async_trait::async_trait;
use axum::Router;
use bookshelf_db::{DbPool, Migration};

use crate::settings::Settings;

/// Borrowed handles a module receives during `init` and `start`.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
    pub db: &'a DbPool,
}

/// A self-contained slice of the application: routes, docs, schema, lifecycle.
///
/// Dependencies a module needs at request time (stores, clients) are handed to
/// its constructor; the registry only drives the lifecycle below.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name, also used as the URL segment the routes mount under.
    fn name(&self) -> &'static str;

    /// Prefix the module router is nested at.
    fn mount_path(&self) -> String {
        format!("/api/{}", self.name())
    }

    /// Runs once migrations are applied and before the server accepts traffic.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Router relative to [`Module::mount_path`].
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` relative to the mount path and
    /// `components.schemas`; merged into the service document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Schema changes, applied in the order returned.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during shutdown, in reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
