use clap::Parser;
use dotenv::dotenv;
use interactions::cli::Cli;
use interactions::{AppError, Dependencies, Settings, commands};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("interactions=info,interactions_controller=info,interactions_repository=info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

/// Main entry point of the interactions service.
///
/// Loads `.env`, reads the settings, connects the configured store and runs
/// the requested maintenance command.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let dependencies = Dependencies::new(&settings).await?;

    let report = commands::run(cli.command, &dependencies).await?;
    println!("{report}");
    Ok(())
}
