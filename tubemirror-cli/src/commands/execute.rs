//! `tubemirror execute -o <output>`: run plugins without contacting YouTube.

use anyhow::Result;

use super::{run_plugins, Options};

pub fn run(options: &Options) -> Result<()> {
    run_plugins(options)?;
    Ok(())
}
