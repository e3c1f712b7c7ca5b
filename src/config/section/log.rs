//! `[log]` section configuration.
//!
//! ```toml
//! [log]
//! dir = "logs"   # dated rulebook.log.YYYYMMDD files go here
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log file directory. Relative to the config file.
    pub dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { dir: "logs".into() }
    }
}
