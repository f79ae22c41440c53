//! CLI argument parsing with clap.

use std::collections::HashMap;

use clap::{Args, Parser, Subcommand};

use crate::params::{KEY_CYCLES, KEY_FRAME_COUNT, KEY_FRAME_DELAY, KEY_RESOLUTION, KEY_SIZE};

/// Lissajous animations as GIFs, over HTTP or to a file.
#[derive(Parser, Debug)]
#[command(name = "lissajous", version, about)]
pub struct Cli {
    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve animations over HTTP.
    Serve {
        /// Address to listen on (overrides `LISSAJOUS_ADDR` and the config file).
        #[arg(short, long)]
        addr: Option<String>,

        /// Config file path override.
        #[arg(long)]
        config: Option<String>,
    },
    /// Render one animation to a file or stdout.
    Render(RenderArgs),
}

/// Animation parameters for `render`. Values are resolved exactly like the
/// HTTP query string, so invalid or zero values fall back to defaults.
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Number of complete x-oscillator revolutions.
    #[arg(long)]
    pub cycles: Option<String>,

    /// Angular resolution.
    #[arg(long)]
    pub res: Option<String>,

    /// Canvas half-extent in pixels.
    #[arg(long)]
    pub size: Option<String>,

    /// Number of animation frames.
    #[arg(long)]
    pub nframes: Option<String>,

    /// Delay between frames in hundredths of a second.
    #[arg(long)]
    pub delay: Option<String>,

    /// Seed for the frequency ratio, for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file path, `-` for stdout (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,
}

impl RenderArgs {
    /// Collect the supplied parameters into the same shape as a query string.
    #[must_use]
    pub fn params(&self) -> HashMap<String, String> {
        [
            (KEY_CYCLES, &self.cycles),
            (KEY_RESOLUTION, &self.res),
            (KEY_SIZE, &self.size),
            (KEY_FRAME_COUNT, &self.nframes),
            (KEY_FRAME_DELAY, &self.delay),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
    }
}
