//! # tubemirror-plugins
//!
//! Runs an external plugin script against every record that has no outcome
//! yet and writes the outcome back into the record's feed.

pub mod config;
pub mod error;
pub mod runner;

pub use config::{PluginConfig, PluginSpec};
pub use error::PluginError;
pub use runner::{ExecuteSummary, PluginRunner};
