//! `[site]` section configuration.
//!
//! The upstream rules site: where data is fetched from and what generated
//! pages link back to.
//!
//! # Example
//!
//! ```toml
//! [site]
//! base_url = "https://tow.whfb.app"   # Rules site, also the link target
//! css_base = "/owb/rules"             # Prefix of the mirrored stylesheets
//! user_agent = "Mozilla/5.0"
//! timeout_secs = 20
//! ```

use serde::{Deserialize, Serialize};

/// Upstream site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Rules site root. Data requests and cross-reference links hang off it.
    pub base_url: String,

    /// Prefix of the stylesheets and icons referenced by generated pages.
    pub css_base: String,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tow.whfb.app".into(),
            css_base: "/owb/rules".into(),
            user_agent: "Mozilla/5.0".into(),
            timeout_secs: 20,
        }
    }
}

impl SiteConfig {
    /// Base URL without a trailing `/`.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_site_config() {
        let config = test_parse_config(
            "[site]\nbase_url = \"https://mirror.example/\"\nuser_agent = \"rulebook\"\ntimeout_secs = 5",
        );
        assert_eq!(config.site.base(), "https://mirror.example");
        assert_eq!(config.site.user_agent, "rulebook");
        assert_eq!(config.site.timeout_secs, 5);
        assert_eq!(config.site.css_base, "/owb/rules");
    }

    #[test]
    fn test_site_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.base_url, "https://tow.whfb.app");
        assert_eq!(config.site.timeout_secs, 20);
    }
}
