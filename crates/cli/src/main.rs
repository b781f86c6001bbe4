use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_api::bootstrap;
use shelf_kernel::settings::Settings;

/// Book review API server and maintenance commands.
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve the HTTP API (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print the resolved settings with secrets redacted
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let settings = bootstrap::prepare()?;
            bootstrap::serve(settings).await
        }
        Command::Migrate => {
            let settings = bootstrap::prepare()?;
            let applied = bootstrap::migrate(&settings).await?;
            tracing::info!(applied, "migrate finished");
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Config => {
            let settings = Settings::load().context("failed to load shelf settings")?;
            println!("{settings:#?}");
            Ok(())
        }
    }
}
