use anyhow::Context;
use bookshelf_app::App;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Run and manage the bookshelf service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations, start modules, and serve HTTP until shutdown
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print the merged OpenAPI document
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "bookshelf cli");

    match cli.command {
        Command::Serve => App::connect(settings).await?.serve().await,
        Command::Migrate => {
            let app = App::connect(settings).await?;
            let applied = app.migrate().await?;
            app.pool.close().await;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Openapi => {
            let pool = bookshelf_db::create_lazy_pool(&settings.database.pool_config())
                .context("invalid database settings")?;
            let app = App::with_pool(settings, pool);
            let document = serde_json::to_string_pretty(&app.openapi())
                .context("failed to render OpenAPI document")?;
            println!("{document}");
            Ok(())
        }
    }
}
