//! tubemirror: mirror a YouTube account's playlists into local JSON feeds.
//!
//! # Usage
//!
//! ```text
//! tubemirror init    -o <output> [-a] [-v]   # wipe and pull everything
//! tubemirror update  -o <output> [-v]        # quiet sync, then plugins
//! tubemirror sync    -o <output> [-v]        # sync only, with progress
//! tubemirror execute -o <output> [-v]        # plugins only
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use commands::Options;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tubemirror",
    version,
    about = "Mirror YouTube playlists into per-playlist JSON feeds",
    long_about = None,
)]
struct Cli {
    #[arg(value_enum)]
    command: Command,

    #[command(flatten)]
    options: Options,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    /// Delete local data and pull every playlist again.
    Init,
    /// Sync quietly, then run plugins.
    Update,
    /// Sync with progress output; no plugins.
    Sync,
    /// Run plugins over records that have no outcome yet.
    Execute,
}

impl Command {
    fn default_log_level(self) -> &'static str {
        match self {
            Command::Init | Command::Sync => "info",
            Command::Update | Command::Execute => "warn",
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.options.verbose {
        "debug"
    } else {
        cli.command.default_log_level()
    };
    init_tracing(level);

    match cli.command {
        Command::Init => commands::init::run(&cli.options),
        Command::Update => commands::update::run(&cli.options),
        Command::Sync => commands::sync::run(&cli.options),
        Command::Execute => commands::execute::run(&cli.options),
    }
}

/// Log to stderr; `RUST_LOG` overrides `default_level`.
fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
