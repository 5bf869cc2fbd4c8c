use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, ReporterError};
use crate::reporters::formatter::{ExcludeFramesFilter, IdentityFilter, StackFilter};

/// Serializable reporter settings. Runtime capabilities (sink, timer, done
/// callback) live in `ReporterOptions` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    pub show_colors: bool,
    pub is_verbose: bool,
    pub include_stack_trace: bool,
    /// Stack lines containing any of these substrings are dropped.
    pub stack_exclude: Vec<String>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            show_colors: true,
            is_verbose: false,
            include_stack_trace: false,
            stack_exclude: Vec::new(),
        }
    }
}

impl ReporterConfig {
    /// Load a config file. `.toml` files are parsed as TOML, anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReporterError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;

        let config = if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
            toml::from_str::<Self>(&contents)?
        } else {
            serde_json::from_str::<Self>(&contents)?
        };

        Ok(config)
    }

    /// The stack filter described by `stack_exclude`.
    pub fn stack_filter(&self) -> Box<dyn StackFilter> {
        if self.stack_exclude.is_empty() {
            Box::new(IdentityFilter)
        } else {
            Box::new(ExcludeFramesFilter::new(self.stack_exclude.clone()))
        }
    }
}
