//! Cross-reference resolution.
//!
//! Turns an [`EntryRef`] into an absolute URL on the rules site:
//! `base + segment + "/" + slug`.
//!
//! The `rule` type tag is overloaded upstream: the same tag covers general
//! special rules and troop-type descriptions. The two are told apart by the
//! id of the entry's first `ruleType` link, checked against a configurable
//! set of troop-type identities.

use std::collections::{BTreeMap, BTreeSet};

use crate::debug;
use crate::model::EntryRef;

/// Type tag → path segment, for tags with a fixed listing.
pub const DEFAULT_PATHS: [(&str, &str); 8] = [
    ("specialRule", "/special-rules"),
    ("weaponOfWar", "/weapons-of-war"),
    ("troopType", "/troop-types-in-detail"),
    ("unitCategory", "/troop-types-in-detail"),
    ("magicItem", "/magic-item"),
    ("spell", "/spells"),
    ("unit", "/unit"),
    ("army", "/army"),
];

/// `ruleType` ids observed to mean "troop type in detail".
pub const DEFAULT_TROOP_TYPE_IDS: [&str; 1] = ["1cxV0Jnvb1D701DgF8Y7Op"];

pub const SPECIAL_RULES: &str = "/special-rules";
pub const WEAPONS_OF_WAR: &str = "/weapons-of-war";
pub const TROOP_TYPES: &str = "/troop-types-in-detail";

/// The overloaded generic rule tag.
const RULE_TAG: &str = "rule";

/// Where a reference is embedded, when that already fixes its listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkContext {
    /// Derive the listing from the reference itself.
    #[default]
    Auto,
    /// Inside an equipment list: always a weapon.
    Equipment,
    /// Inside a special-rules list: always a special rule.
    Rules,
}

/// Computes canonical URLs for entry references.
#[derive(Debug, Clone)]
pub struct Resolver {
    base_url: String,
    paths: BTreeMap<String, String>,
    troop_type_ids: BTreeSet<String>,
}

impl Resolver {
    /// Resolver with the built-in tables. A trailing `/` on `base_url` is dropped.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            paths: DEFAULT_PATHS
                .iter()
                .map(|(tag, path)| ((*tag).to_owned(), (*path).to_owned()))
                .collect(),
            troop_type_ids: DEFAULT_TROOP_TYPE_IDS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Replace the troop-type identity set.
    pub fn with_troop_type_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.troop_type_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Add or override type tag → segment mappings.
    pub fn with_paths<I, K, V>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (tag, path) in paths {
            self.paths.insert(tag.into(), normalize_segment(&path.into()));
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base + segment + "/" + slug`.
    pub fn join(&self, segment: &str, slug: &str) -> String {
        format!("{}{}/{}", self.base_url, segment, slug)
    }

    /// Canonical URL of a cross-reference.
    pub fn resolve(&self, target: &EntryRef, ctx: LinkContext) -> String {
        if target.slug.is_empty() {
            return self.base_url.clone();
        }

        match ctx {
            LinkContext::Equipment => return self.join(WEAPONS_OF_WAR, &target.slug),
            LinkContext::Rules => return self.join(SPECIAL_RULES, &target.slug),
            LinkContext::Auto => {}
        }

        let tag = target.content_type.as_deref().unwrap_or_default();
        if tag == RULE_TAG {
            return self.join(self.rule_segment(target), &target.slug);
        }

        match self.paths.get(tag) {
            Some(segment) => self.join(segment, &target.slug),
            None => {
                debug!("resolve"; "unmapped type tag `{}` for `{}`", tag, target.slug);
                self.join("", &target.slug)
            }
        }
    }

    /// URL used in flat reference lists: mapped by tag, special rules otherwise.
    pub fn list_url(&self, target: &EntryRef) -> String {
        let tag = target.content_type.as_deref().unwrap_or_default();
        let segment = if tag == RULE_TAG {
            self.rule_segment(target)
        } else {
            self.paths.get(tag).map_or(SPECIAL_RULES, String::as_str)
        };
        self.join(segment, &target.slug)
    }

    /// Listing for the overloaded `rule` tag.
    fn rule_segment(&self, target: &EntryRef) -> &'static str {
        match target.rule_type_ids.first() {
            Some(id) if self.troop_type_ids.contains(id) => TROOP_TYPES,
            _ => SPECIAL_RULES,
        }
    }
}

/// Ensure a configured segment starts with `/` and has no trailing `/`.
fn normalize_segment(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
