//! Plugin execution over stored feeds.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tubemirror_core::{paths, Record, Status};
use tubemirror_sync::FeedStore;

use crate::config::{PluginConfig, PluginSpec};
use crate::error::{io_err, PluginError};

pub const DEFAULT_PLUGINS_DIR: &str = "plugins";

/// Counts from one [`PluginRunner::execute`] pass.
#[derive(Debug, Default)]
pub struct ExecuteSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Playlists that could not be processed, with the error that stopped
    /// them. Other playlists still ran.
    pub errors: Vec<(String, PluginError)>,
}

impl ExecuteSummary {
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub struct PluginRunner {
    specs: Vec<PluginSpec>,
    script: Option<PathBuf>,
}

impl PluginRunner {
    /// Prepare a runner from `config` and the script found in `plugins_dir`.
    ///
    /// The directory is created when missing. Its first entry in name order
    /// is the plugin script; a script that is not executable disables the
    /// runner with a warning.
    pub fn new(config: PluginConfig, plugins_dir: &Path) -> Result<Self, PluginError> {
        fs::create_dir_all(plugins_dir).map_err(|e| io_err(plugins_dir, e))?;

        let mut entries: Vec<PathBuf> = fs::read_dir(plugins_dir)
            .map_err(|e| io_err(plugins_dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        let script = match entries.into_iter().next() {
            Some(path) if is_executable(&path) => {
                Some(fs::canonicalize(&path).map_err(|e| io_err(&path, e))?)
            }
            Some(path) => {
                tracing::warn!(
                    "plugin script found at {}, but it is not executable",
                    path.display()
                );
                None
            }
            None => None,
        };

        let specs = config.supported().cloned().collect();
        Ok(Self { specs, script })
    }

    pub fn script(&self) -> Option<&Path> {
        self.script.as_deref()
    }

    /// Whether there is a script and at least one entry that would run it.
    pub fn is_active(&self) -> bool {
        self.script.is_some() && !self.specs.is_empty()
    }

    /// Run the plugins over every pending record of every playlist in
    /// `store`.
    pub fn execute(&self, store: &FeedStore) -> Result<ExecuteSummary, PluginError> {
        let mut summary = ExecuteSummary::default();
        let Some(script) = self.script.as_deref().filter(|_| !self.specs.is_empty()) else {
            tracing::debug!("no runnable plugin configured");
            return Ok(summary);
        };

        for directory in store.list_playlists()? {
            if let Err(e) = self.process_feed(store, &directory, script, &mut summary) {
                tracing::warn!("plugins stopped for {directory}: {e}");
                summary.errors.push((directory, e));
            }
        }
        Ok(summary)
    }

    fn process_feed(
        &self,
        store: &FeedStore,
        directory: &str,
        script: &Path,
        summary: &mut ExecuteSummary,
    ) -> Result<(), PluginError> {
        let mut records = store.load(directory)?;
        let files_dir = paths::files_dir(store.output_dir());

        for i in 0..records.len() {
            if !records[i].is_pending() {
                continue;
            }
            let Some(status) = self.run_record(&records[i], script, &files_dir) else {
                continue;
            };
            match status {
                Status::Success => summary.succeeded += 1,
                Status::Failed => summary.failed += 1,
            }
            records[i] = records[i].clone().with_status(status);
            store.persist(directory, &records)?;
        }
        Ok(())
    }

    /// Outcome of running every plugin entry for `record`; the last entry that
    /// produced an outcome wins. `None` when none did.
    fn run_record(&self, record: &Record, script: &Path, files_dir: &Path) -> Option<Status> {
        let mut outcome = None;
        for spec in &self.specs {
            let command = spec.render_command(script, record.canonical_url());
            match run_command(&command, record, files_dir) {
                Ok(Some(status)) => outcome = Some(status),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("plugin for {} failed: {e}", record.safe_name());
                    outcome = Some(Status::Failed);
                }
            }
        }
        outcome
    }
}

/// Run `command` through `sh -c` in a scratch directory and collect what it
/// leaves behind.
fn run_command(command: &str, record: &Record, files_dir: &Path) -> Result<Option<Status>, PluginError> {
    let scratch = TempDir::new().map_err(|e| io_err(std::env::temp_dir(), e))?;
    tracing::debug!("running `{command}` in {}", scratch.path().display());

    let exit = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(scratch.path())
        .status()
        .map_err(|e| io_err(scratch.path(), e))?;
    if !exit.success() {
        tracing::info!("plugin exited with {exit} for {}", record.safe_name());
        return Ok(Some(Status::Failed));
    }

    let Some(produced) = first_entry(scratch.path())? else {
        tracing::debug!("plugin produced no output for {}", record.safe_name());
        return Ok(None);
    };

    let extension = produced
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let target = files_dir.join(format!("{}{extension}", record.safe_name()));
    fs::create_dir_all(files_dir).map_err(|e| io_err(files_dir, e))?;
    move_file(&produced, &target)?;
    tracing::info!("saved {}", target.display());
    Ok(Some(Status::Success))
}

fn first_entry(dir: &Path) -> Result<Option<PathBuf>, PluginError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    Ok(entries.into_iter().next())
}

/// Rename, falling back to copy + remove when the scratch directory is on
/// another filesystem.
fn move_file(from: &Path, to: &Path) -> Result<(), PluginError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(|e| io_err(to, e))?;
    fs::remove_file(from).map_err(|e| io_err(from, e))?;
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
