//! `tubemirror init -o <output> [-a]`

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tubemirror_sync::pipeline::{self, InitOutcome};
use tubemirror_youtube::auth;

use super::{ensure_nothing_skipped, print_sync_summary, Options};

pub fn run(options: &Options) -> Result<()> {
    if !options.authenticated {
        let path = options.credentials_path()?;
        auth::authenticate(&path, ask).context("authentication failed")?;
        println!("{} Saved credentials to {}", "✓".green(), path.display());
    }

    let client = options.connect()?;
    let store = options.store();
    let outcome = pipeline::initialize(&client, &store, confirm_reset)
        .with_context(|| format!("init of '{}' failed", options.output.display()))?;

    match outcome {
        InitOutcome::Declined => {
            println!("Aborted; '{}' left untouched.", options.output.display());
        }
        InitOutcome::Initialized(summary) => {
            println!(
                "{} Initialized {} playlists in '{}'",
                "✓".green(),
                summary.playlists.len(),
                options.output.display()
            );
            print_sync_summary(&summary);
            ensure_nothing_skipped(&summary)?;
        }
    }
    Ok(())
}

fn ask(question: &str) -> io::Result<String> {
    print!("{question}: ");
    io::stdout().flush()?;
    read_line()
}

/// Only an exact `Y` accepts.
fn confirm_reset(output: &Path) -> io::Result<bool> {
    print!(
        "Output directory '{}' already exists. Type Y to delete its feeds and start over: ",
        output.display()
    );
    io::stdout().flush()?;
    let answer = read_line()?;
    Ok(answer.trim_end_matches(['\r', '\n']) == "Y")
}

fn read_line() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
