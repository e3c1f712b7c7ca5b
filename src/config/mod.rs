//! Tool configuration from `rulebook.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   ├── output     # [output]
//! │   ├── registry   # [registry]
//! │   ├── resolver   # [resolver]
//! │   └── log        # [log]
//! ├── error.rs       # ConfigError
//! ├── util.rs        # config discovery, URL checks
//! └── mod.rs         # RulebookConfig (this file)
//! ```
//!
//! A missing config file is not an error: every section has defaults that
//! reproduce the stock setup. Relative paths are resolved against the
//! directory holding the config file (or the cwd without one).

pub mod section;
mod error;
mod util;

pub use error::ConfigError;
pub use section::{LogConfig, OutputConfig, RegistryConfig, ResolverConfig, SiteConfig};

use util::{find_config_file, is_http_url};

use crate::utils::path::{expand_path, normalize_path};
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing rulebook.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulebookConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl RulebookConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(config_name, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = normalize_path(&path);
                config
            }
            None => Self::default(),
        };

        let root = config
            .config_path
            .parent()
            .map_or(cwd, Path::to_path_buf);
        config.finalize(&root);
        config.validate()?;

        if config.config_path.as_os_str().is_empty() {
            debug!("config"; "no {} found, using defaults", config_name.display());
        } else {
            debug!("config"; "loaded {}", config.config_path.display());
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Unknown keys are warned about and otherwise ignored.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Set root and make every configured path absolute.
    fn finalize(&mut self, root: &Path) {
        self.root = normalize_path(root);
        self.output.root = expand_path(&self.output.root, &self.root);
        self.registry.path = expand_path(&self.registry.path, &self.root);
        self.log.dir = expand_path(&self.log.dir, &self.root);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Check values that would only fail later, mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.site.base_url) {
            return Err(ConfigError::Url {
                field: "site.base_url",
                value: self.site.base_url.clone(),
            });
        }
        if !is_http_url(&self.registry.base_url) {
            return Err(ConfigError::Url {
                field: "registry.base_url",
                value: self.registry.base_url.clone(),
            });
        }
        if self.site.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "site.timeout_secs must be greater than 0".into(),
            ));
        }
        for kind in crate::model::ContentKind::ALL {
            let subdir = self.output.subdir(kind);
            if subdir.is_empty() || subdir.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "output folder for {kind} must be a single non-empty name, got `{subdir}`"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text on top of the defaults.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> RulebookConfig {
    let (parsed, ignored) = RulebookConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = RulebookConfig::parse_with_ignored("[site\nbase_url = \"x\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_defaults_validate() {
        let config = RulebookConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.config_path, PathBuf::new());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[site]\nbase_url = \"https://tow.whfb.app\"\nbase_ulr = \"typo\"\n[unknown_section]\nfield = 1";
        let (config, ignored) = RulebookConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.site.base_url, "https://tow.whfb.app");
        assert!(ignored.iter().any(|f| f.contains("base_ulr")));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = RulebookConfig::parse_with_ignored("[log]\ndir = \"out\"").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = test_parse_config("[site]\nbase_url = \"tow.whfb.app\"");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Url { field: "site.base_url", .. })
        ));

        let config = test_parse_config("[registry]\nbase_url = \"/owb/rules\"");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Url { field: "registry.base_url", .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = test_parse_config("[site]\ntimeout_secs = 0");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_nested_output_folder_rejected() {
        let config = test_parse_config("[output]\nunit = \"a/b\"");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_finalize_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let mut config =
            test_parse_config("[output]\nroot = \"public\"\n[log]\ndir = \"/var/log/rulebook\"");
        config.finalize(dir.path());

        let root = normalize_path(dir.path());
        assert_eq!(config.root, root);
        assert_eq!(config.output.root, root.join("public"));
        assert_eq!(
            config.registry.path,
            root.join("src/components/rules-index/rules-map.js")
        );
        assert_eq!(config.log.dir, Path::new("/var/log/rulebook"));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rulebook.toml");
        fs::write(&path, "[registry]\nbase_url = \"https://example.org/rules\"\n").unwrap();

        let config = RulebookConfig::from_path(&path).unwrap();
        assert_eq!(config.registry.base_url, "https://example.org/rules");
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = RulebookConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }
}
