//! `tubemirror sync -o <output>`: pull new videos, no plugins.

use anyhow::{Context, Result};
use tubemirror_sync::pipeline;

use super::{ensure_nothing_skipped, print_sync_summary, Options};

pub fn run(options: &Options) -> Result<()> {
    let client = options.connect()?;
    let store = options.store();
    let summary = pipeline::synchronize(&client, &store)
        .with_context(|| format!("sync into '{}' failed", options.output.display()))?;
    print_sync_summary(&summary);
    ensure_nothing_skipped(&summary)
}
