//! `[resolver]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [resolver]
//! # ruleType ids that mark a `rule` entry as a troop type
//! troop_type_ids = ["1cxV0Jnvb1D701DgF8Y7Op"]
//!
//! # extra or overridden type tag -> listing segment
//! [resolver.paths]
//! lore = "/lores-of-magic"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::render::Resolver;
use crate::render::resolve::DEFAULT_TROOP_TYPE_IDS;

/// Cross-reference resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub troop_type_ids: Vec<String>,

    /// Merged over the built-in tag table.
    pub paths: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            troop_type_ids: DEFAULT_TROOP_TYPE_IDS.iter().map(|s| (*s).into()).collect(),
            paths: BTreeMap::new(),
        }
    }
}

impl ResolverConfig {
    /// Resolver rooted at `base_url` with these settings applied.
    pub fn build(&self, base_url: &str) -> Resolver {
        Resolver::new(base_url)
            .with_troop_type_ids(self.troop_type_ids.iter().cloned())
            .with_paths(self.paths.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::model::EntryRef;
    use crate::render::resolve::LinkContext;

    #[test]
    fn test_resolver_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.resolver.troop_type_ids, ["1cxV0Jnvb1D701DgF8Y7Op"]);
        assert!(config.resolver.paths.is_empty());
    }

    #[test]
    fn test_resolver_overrides_reach_the_resolver() {
        let config = test_parse_config(
            "[resolver]\ntroop_type_ids = [\"abc\"]\n[resolver.paths]\nlore = \"lores-of-magic\"",
        );
        let resolver = config.resolver.build("https://tow.whfb.app");

        let lore = EntryRef::new(Some("lore"), "lore-of-battle");
        assert_eq!(
            resolver.resolve(&lore, LinkContext::Auto),
            "https://tow.whfb.app/lores-of-magic/lore-of-battle"
        );

        let infantry = EntryRef::new(Some("rule"), "infantry").with_rule_type("abc");
        assert_eq!(
            resolver.resolve(&infantry, LinkContext::Auto),
            "https://tow.whfb.app/troop-types-in-detail/infantry"
        );
    }
}
