use clap::Parser;
use teliaplay_rs::cli::args::Cli;
use teliaplay_rs::cli::commands;
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let mode = cli.to_mode()?;
    commands::run(mode).await
}
