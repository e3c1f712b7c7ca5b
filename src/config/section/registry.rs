//! `[registry]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [registry]
//! path = "src/components/rules-index/rules-map.js"
//! base_url = "https://owapps.grra.me/owb/rules"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Rules-map registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JavaScript registry file. Relative to the config file.
    pub path: PathBuf,

    /// Where the generated pages are hosted; prefix of every `fullUrl`.
    pub base_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: "src/components/rules-index/rules-map.js".into(),
            base_url: "https://owapps.grra.me/owb/rules".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::test_parse_config;

    #[test]
    fn test_registry_config() {
        let config = test_parse_config("[registry]\npath = \"rules-map.js\"");
        assert_eq!(config.registry.path, Path::new("rules-map.js"));
        assert_eq!(config.registry.base_url, "https://owapps.grra.me/owb/rules");
    }
}
