//! Lissajous - randomized Lissajous animations served as GIFs.

mod animation;
mod cli;
mod config;
mod encode;
mod error;
mod output;
mod params;
mod raster;
mod server;

use std::process;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use crate::animation::{generate, generate_with_rng, gif_bounds};
use crate::cli::{Cli, Command, RenderArgs};
use crate::config::Config;
use crate::error::LissajousError;
use crate::output::{resolve_destination, write_to};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), LissajousError> {
    match cli.command {
        Command::Serve { addr, config: config_override } => {
            let config_path = config::discover_config_path(config_override.as_deref());
            let config = Config::load(&config_path)?;
            tracing::debug!(path = %config_path.display(), ?config, "loaded config");

            let addr = config.bind_addr(addr.as_deref());
            let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
            server::serve(listener, config.limits).await
        }
        Command::Render(args) => render(&args),
    }
}

fn render(args: &RenderArgs) -> Result<(), LissajousError> {
    let config = params::resolve(&args.params());
    tracing::info!(?config, "resolved configuration");
    gif_bounds(&config)?;

    let destination = resolve_destination(args.output.as_deref());
    let summary = write_to(&destination, |sink| match args.seed {
        Some(seed) => generate_with_rng(&config, &mut StdRng::seed_from_u64(seed), sink),
        None => generate(&config, sink),
    })?;

    tracing::info!(
        frames = summary.frames,
        side = summary.side,
        loop_count = summary.loop_count,
        delay = summary.frame_delay,
        freq = summary.frequency_ratio,
        "animation rendered"
    );
    eprintln!("Saved: {destination}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
