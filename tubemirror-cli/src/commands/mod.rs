pub mod execute;
pub mod init;
pub mod sync;
pub mod update;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use tubemirror_plugins::{config, runner::DEFAULT_PLUGINS_DIR, ExecuteSummary, PluginRunner};
use tubemirror_sync::{FeedStore, SyncSummary};
use tubemirror_youtube::{auth, YoutubeClient};

/// Flags shared by every command.
#[derive(Args, Debug)]
pub struct Options {
    /// Directory holding `data/` (feeds) and `files/` (plugin output).
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Log debug detail to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the interactive token prompt of `init`; use saved credentials.
    #[arg(short, long)]
    pub authenticated: bool,

    /// Credentials file [default: <config dir>/tubemirror/auth.json].
    #[arg(long, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Plugin configuration document.
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_CONFIG_FILE)]
    pub plugin_config: PathBuf,

    /// Directory whose first entry is the plugin script.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_PLUGINS_DIR)]
    pub plugins_dir: PathBuf,
}

impl Options {
    pub fn store(&self) -> FeedStore {
        FeedStore::new(&self.output)
    }

    pub fn credentials_path(&self) -> Result<PathBuf> {
        match &self.credentials {
            Some(path) => Ok(path.clone()),
            None => auth::default_credentials_path().context("cannot locate credentials file"),
        }
    }

    /// A client authorised with the saved credentials.
    pub fn connect(&self) -> Result<YoutubeClient> {
        let path = self.credentials_path()?;
        let credentials = auth::load_at(&path)
            .with_context(|| format!("cannot use credentials from '{}'", path.display()))?;
        Ok(YoutubeClient::new(credentials).persist_refreshed_to(path))
    }

    pub fn plugin_runner(&self) -> Result<PluginRunner> {
        let config = config::load_at(&self.plugin_config).with_context(|| {
            format!(
                "cannot load plugin config '{}'",
                self.plugin_config.display()
            )
        })?;
        PluginRunner::new(config, &self.plugins_dir).with_context(|| {
            format!("cannot prepare plugins in '{}'", self.plugins_dir.display())
        })
    }
}

// ---------------------------------------------------------------------------
// Shared output
// ---------------------------------------------------------------------------

pub fn print_sync_summary(summary: &SyncSummary) {
    let added = summary.added();
    if added > 0 {
        println!("Sync found {added} new videos.");
    }
    for (playlist, reason) in summary.skipped() {
        eprintln!(
            "{} skipped playlist '{}' ({}): {reason}",
            "!".yellow().bold(),
            playlist.title,
            playlist.id
        );
    }
}

/// Fail the command when any playlist had to be left out of the sync.
pub fn ensure_nothing_skipped(summary: &SyncSummary) -> Result<()> {
    let skipped = summary.skipped().count();
    if skipped > 0 {
        bail!(
            "{skipped} playlists were not synced; rename them on YouTube so their \
             titles map to different directories"
        );
    }
    Ok(())
}

pub fn run_plugins(options: &Options) -> Result<ExecuteSummary> {
    let runner = options.plugin_runner()?;
    let store = options.store();
    let summary = runner.execute(&store).context("plugin execution failed")?;

    if summary.processed() > 0 {
        println!(
            "{} Plugins processed {} videos ({} saved, {} failed)",
            "✓".green(),
            summary.processed(),
            summary.succeeded,
            summary.failed
        );
    }
    for (directory, err) in &summary.errors {
        eprintln!("{} skipped '{directory}': {err}", "!".yellow().bold());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubemirror_core::{Playlist, PlaylistId, PlaylistKind};
    use tubemirror_sync::{PlaylistOutcome, PlaylistResult, SkipReason};

    fn result(playlist: Playlist, outcome: PlaylistOutcome) -> PlaylistResult {
        PlaylistResult { playlist, outcome }
    }

    #[test]
    fn clean_summary_passes() {
        let summary = SyncSummary {
            playlists: vec![result(
                Playlist::favorites("FL1"),
                PlaylistOutcome::Added {
                    added: 2,
                    previous: 0,
                },
            )],
        };
        assert!(ensure_nothing_skipped(&summary).is_ok());
    }

    #[test]
    fn skipped_playlist_fails_the_command() {
        let summary = SyncSummary {
            playlists: vec![
                result(
                    Playlist::new("PL1", "Favorites", PlaylistKind::Named),
                    PlaylistOutcome::Skipped {
                        reason: SkipReason::DirectoryCollision {
                            directory: "favorites".to_string(),
                            others: vec![PlaylistId::from("FL1")],
                        },
                    },
                ),
                result(Playlist::favorites("FL2"), PlaylistOutcome::Unchanged),
            ],
        };
        let err = ensure_nothing_skipped(&summary).unwrap_err();
        assert!(err.to_string().starts_with("1 playlists were not synced"), "got: {err}");
    }
}
