//! Bookshelf application: module wiring and the bootstrap sequence shared by
//! the service binary and the CLI.

pub mod modules;

use anyhow::Context;
use axum::Router;
use bookshelf_kernel::{settings::Settings, DbPool, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::books::{
    models::{Book, BookInput},
    store::{BookStore, SharedBookStore, SqlBookStore, StoreError},
};

/// Settings, database pool, and the registered modules.
pub struct App {
    pub settings: Settings,
    pub pool: DbPool,
    pub registry: ModuleRegistry,
}

impl App {
    /// Open the configured database and register all modules
    pub async fn connect(settings: Settings) -> anyhow::Result<Self> {
        let pool = bookshelf_db::create_pool(&settings.database.pool_config())
            .await
            .context("failed to connect to database")?;
        bookshelf_db::health_check(&pool)
            .await
            .context("database health check failed")?;

        Ok(Self::with_pool(settings, pool))
    }

    /// Register all modules over an existing pool
    pub fn with_pool(settings: Settings, pool: DbPool) -> Self {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &pool);
        Self {
            settings,
            pool,
            registry,
        }
    }

    /// Apply pending module migrations; returns how many ran
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        let migrations = self.registry.collect_migrations();
        let applied = bookshelf_db::run_migrations(&self.pool, &migrations)
            .await
            .context("failed to run migrations")?;
        tracing::info!(applied, total = migrations.len(), "migrations complete");
        Ok(applied)
    }

    /// Migrate, then init and start every module
    pub async fn prepare(&self) -> anyhow::Result<()> {
        self.migrate().await?;

        let ctx = InitCtx {
            settings: &self.settings,
            db: &self.pool,
        };
        self.registry.init_all(&ctx).await?;
        self.registry.start_all(&ctx).await?;
        Ok(())
    }

    pub fn router(&self) -> Router {
        bookshelf_http::build_router(&self.registry, &self.settings)
    }

    pub fn openapi(&self) -> serde_json::Value {
        bookshelf_http::router::openapi_document(&self.registry)
    }

    /// Prepare modules, serve until shutdown, then stop modules
    pub async fn serve(&self) -> anyhow::Result<()> {
        self.prepare().await?;

        let served = bookshelf_http::start_server(&self.registry, &self.settings).await;
        self.registry.stop_all().await?;
        self.pool.close().await;

        served
    }
}
