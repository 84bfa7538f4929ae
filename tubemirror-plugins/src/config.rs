//! The plugin configuration document.
//!
//! ```json
//! {
//!   "plugins": [
//!     {
//!       "script": "*",
//!       "condition": "executable",
//!       "save_as": "${safename}",
//!       "defaults": true,
//!       "command": "${script} ${url}"
//!     }
//!   ]
//! }
//! ```
//!
//! The file is read with `serde_yaml`, so the same document may also be
//! written as YAML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, PluginError};

pub const DEFAULT_CONFIG_FILE: &str = "plugin_config.cfg";

const SCRIPT_PLACEHOLDER: &str = "${script}";
const URL_PLACEHOLDER: &str = "${url}";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,
}

/// One entry of the `plugins` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub save_as: String,
    #[serde(default)]
    pub defaults: bool,
    #[serde(default)]
    pub command: String,
}

impl PluginSpec {
    /// Only the "run the discovered script on every record and save under the
    /// record's safe name" form is understood; every other entry is ignored.
    pub fn is_supported(&self) -> bool {
        self.script == "*"
            && self.condition == "executable"
            && self.save_as == "${safename}"
            && self.defaults
    }

    pub fn render_command(&self, script: &Path, url: &str) -> String {
        self.command
            .replace(SCRIPT_PLACEHOLDER, &script.display().to_string())
            .replace(URL_PLACEHOLDER, url)
    }
}

impl PluginConfig {
    pub fn supported(&self) -> impl Iterator<Item = &PluginSpec> {
        self.plugins.iter().filter(|p| p.is_supported())
    }
}

/// Load the configuration at `path`. A missing file yields an empty
/// configuration.
pub fn load_at(path: &Path) -> Result<PluginConfig, PluginError> {
    if !path.exists() {
        tracing::debug!("no plugin config at {}", path.display());
        return Ok(PluginConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|source| PluginError::Config {
        path: path.to_path_buf(),
        source,
    })
}
