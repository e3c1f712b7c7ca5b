//! `[output]` section configuration.
//!
//! Where generated pages land. Each content kind gets its own folder under
//! `root`; the folder names also appear in registry URLs.
//!
//! # Example
//!
//! ```toml
//! [output]
//! root = "rules"
//! unit = "unit"
//! weapons_of_war = "weapons-of-war"
//! magic_items = "magic-items"
//! special_rules = "special-rules"
//! troop_types = "troop-types-in-detail"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::ContentKind;

/// Output folder layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Parent of the per-kind folders. Relative to the config file.
    pub root: PathBuf,
    pub unit: String,
    pub weapons_of_war: String,
    pub magic_items: String,
    pub special_rules: String,
    pub troop_types: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: "rules".into(),
            unit: ContentKind::Unit.subdir().into(),
            weapons_of_war: ContentKind::WeaponOfWar.subdir().into(),
            magic_items: ContentKind::MagicItem.subdir().into(),
            special_rules: ContentKind::SpecialRule.subdir().into(),
            troop_types: ContentKind::TroopTypeDetail.subdir().into(),
        }
    }
}

impl OutputConfig {
    /// Folder name for a kind.
    pub fn subdir(&self, kind: ContentKind) -> &str {
        match kind {
            ContentKind::Unit => &self.unit,
            ContentKind::WeaponOfWar => &self.weapons_of_war,
            ContentKind::MagicItem => &self.magic_items,
            ContentKind::SpecialRule => &self.special_rules,
            ContentKind::TroopTypeDetail => &self.troop_types,
        }
    }

    /// Output directory for a kind.
    pub fn dir(&self, kind: ContentKind) -> PathBuf {
        self.root.join(self.subdir(kind))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::test_parse_config;
    use crate::model::ContentKind;

    #[test]
    fn test_output_defaults_follow_kind_folders() {
        let config = test_parse_config("");
        for kind in ContentKind::ALL {
            assert_eq!(config.output.subdir(kind), kind.subdir());
        }
        assert_eq!(
            config.output.dir(ContentKind::MagicItem),
            Path::new("rules/magic-items")
        );
    }

    #[test]
    fn test_output_override() {
        let config = test_parse_config("[output]\nroot = \"public\"\nunit = \"units\"");
        assert_eq!(config.output.dir(ContentKind::Unit), Path::new("public/units"));
        assert_eq!(
            config.output.dir(ContentKind::SpecialRule),
            Path::new("public/special-rules")
        );
    }
}
