use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

mod app;
mod catalog;
mod cli;
mod clipboard;
mod config;
mod core;
mod display;
mod input;
mod prompt;
mod providers;
mod spinner;
mod system;
mod utils;

use crate::cli::Args;
use crate::config::Config;
use crate::providers::CompletionBackend;
use crate::providers::openrouter::OpenRouterClient;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "magiccommand=debug"
    } else {
        "magiccommand=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

fn connect(config: &Config) -> Box<dyn CompletionBackend> {
    Box::new(OpenRouterClient::with_endpoint(
        config.base_url().to_string(),
        config.api_key.clone(),
    ))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let verbose = args.verbose;
    init_tracing(verbose);

    if let Err(e) = app::run(args, Config::load, connect).await {
        display::display_error(&e, verbose);
        std::process::exit(1);
    }
}
