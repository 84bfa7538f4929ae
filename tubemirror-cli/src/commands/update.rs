//! `tubemirror update -o <output>`: sync, then run plugins over the result.

use anyhow::{Context, Result};
use tubemirror_sync::pipeline;

use super::{ensure_nothing_skipped, print_sync_summary, run_plugins, Options};

pub fn run(options: &Options) -> Result<()> {
    let client = options.connect()?;
    let store = options.store();
    let summary = pipeline::synchronize(&client, &store)
        .with_context(|| format!("update of '{}' failed", options.output.display()))?;
    print_sync_summary(&summary);
    run_plugins(options)?;
    ensure_nothing_skipped(&summary)
}
