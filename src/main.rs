mod backup;
mod catalog;
mod cli;
mod config;
mod context;
mod dotfiles;
mod error;
mod git;
mod host;
mod journal;
mod package;
mod selection;
#[cfg(test)]
mod testing;
mod tui;

use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "devstrap=debug"
    } else {
        "devstrap=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = cli.execute().await {
        eprintln!("{} {}", style("✕").red().bold(), e);
        std::process::exit(1);
    }
}
