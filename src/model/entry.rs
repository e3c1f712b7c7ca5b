//! Entries, field values and references between entries.

use std::collections::BTreeMap;
use std::fmt;

use super::node::Node;
use super::stats::StatRow;

/// Field holding a unit's stat rows.
pub const UNIT_PROFILE: &str = "unitProfile";

/// Field name → value, sorted by name.
pub type Fields = BTreeMap<String, FieldValue>;

// ============================================================================
// ContentKind
// ============================================================================

/// Kind of rules entry. Drives the fetch route, renderer and output folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ContentKind {
    #[value(name = "unit")]
    Unit,
    #[value(name = "weapons-of-war")]
    WeaponOfWar,
    #[value(name = "magic-item", alias = "magic-items")]
    MagicItem,
    #[value(name = "special-rule")]
    SpecialRule,
    #[value(name = "troop-types-in-detail")]
    TroopTypeDetail,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        Self::Unit,
        Self::WeaponOfWar,
        Self::MagicItem,
        Self::SpecialRule,
        Self::TroopTypeDetail,
    ];

    /// Name used on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::WeaponOfWar => "weapons-of-war",
            Self::MagicItem => "magic-item",
            Self::SpecialRule => "special-rule",
            Self::TroopTypeDetail => "troop-types-in-detail",
        }
    }

    /// Page-route segment of the upstream data API.
    pub const fn route(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::WeaponOfWar => "weapons-of-war",
            Self::MagicItem => "magic-item",
            Self::SpecialRule => "special-rules",
            Self::TroopTypeDetail => "troop-types-in-detail",
        }
    }

    /// Folder name used both for local output and registry URLs.
    pub const fn subdir(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::WeaponOfWar => "weapons-of-war",
            Self::MagicItem => "magic-items",
            Self::SpecialRule => "special-rules",
            Self::TroopTypeDetail => "troop-types-in-detail",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EntryRef
// ============================================================================

/// Unresolved pointer to another entry, as embedded in rich text or lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryRef {
    /// CMS record id (`sys.id`).
    pub id: String,
    /// Type tag of the referenced entry (`sys.contentType.sys.id`).
    pub content_type: Option<String>,
    pub slug: String,
    pub name: String,
    pub note: String,
    pub group_name: String,
    /// Ids of the linked `ruleType` records; only set on `rule` entries.
    pub rule_type_ids: Vec<String>,
}

#[cfg(test)]
impl EntryRef {
    /// Reference with just a type tag and slug.
    pub fn new(content_type: Option<&str>, slug: impl Into<String>) -> Self {
        Self {
            content_type: content_type.map(str::to_owned),
            slug: slug.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rule_type(mut self, id: impl Into<String>) -> Self {
        self.rule_type_ids.push(id.into());
        self
    }
}

// ============================================================================
// FieldValue
// ============================================================================

/// Value of one entry field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Rich(Node),
    Ref(EntryRef),
    Refs(Vec<EntryRef>),
    Rows(Vec<StatRow>),
    /// Heterogeneous list (e.g. rich documents mixed with links).
    List(Vec<FieldValue>),
    /// Anything else, kept for `--debug` dumps.
    Other(serde_json::Value),
}

impl FieldValue {
    /// Present means not null, not blank text and not an empty list.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(s) => !s.trim().is_empty(),
            Self::Refs(v) => !v.is_empty(),
            Self::Rows(v) => !v.is_empty(),
            Self::List(v) => !v.is_empty(),
            Self::Bool(_) | Self::Number(_) | Self::Rich(_) | Self::Ref(_) | Self::Other(_) => {
                true
            }
        }
    }

    /// Scalar as display text. Numbers use plain `Display`.
    pub fn as_scalar(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Short type label for debug dumps.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Rich(_) => "rich-text",
            Self::Ref(_) => "link",
            Self::Refs(_) => "links",
            Self::Rows(_) => "rows",
            Self::List(_) => "list",
            Self::Other(_) => "object",
        }
    }
}

// ============================================================================
// Entry
// ============================================================================

/// One fetched rules entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub slug: String,
    pub kind: ContentKind,
    pub fields: Fields,
}

impl Entry {
    pub fn new(slug: impl Into<String>, kind: ContentKind, fields: Fields) -> Self {
        Self {
            slug: slug.into(),
            kind,
            fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Scalar field as text, if present.
    pub fn scalar(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|v| v.is_present())
            .and_then(FieldValue::as_scalar)
    }

    /// Display name; falls back to the slug when `name` is absent or blank.
    pub fn name(&self) -> String {
        self.scalar("name").unwrap_or_else(|| self.slug.clone())
    }

    /// Stat rows of the `unitProfile` field.
    pub fn stat_rows(&self) -> &[StatRow] {
        match self.get(UNIT_PROFILE) {
            Some(FieldValue::Rows(rows)) => rows,
            _ => &[],
        }
    }

    /// Mutable stat rows, for the edit step.
    pub fn stat_rows_mut(&mut self) -> Option<&mut Vec<StatRow>> {
        match self.fields.get_mut(UNIT_PROFILE) {
            Some(FieldValue::Rows(rows)) => Some(rows),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(fields: &[(&str, FieldValue)]) -> Entry {
        let fields = fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        Entry::new("grave-guard", ContentKind::Unit, fields)
    }

    #[test]
    fn test_name_defaults_to_slug() {
        assert_eq!(entry_with(&[]).name(), "grave-guard");
        let blank = entry_with(&[("name", FieldValue::Text("  ".into()))]);
        assert_eq!(blank.name(), "grave-guard");
        let null = entry_with(&[("name", FieldValue::Null)]);
        assert_eq!(null.name(), "grave-guard");
    }

    #[test]
    fn test_name_when_present() {
        let entry = entry_with(&[("name", FieldValue::Text("Grave Guard".into()))]);
        assert_eq!(entry.name(), "Grave Guard");
    }

    #[test]
    fn test_is_present() {
        assert!(!FieldValue::Null.is_present());
        assert!(!FieldValue::Text(String::new()).is_present());
        assert!(!FieldValue::Refs(vec![]).is_present());
        assert!(FieldValue::Text("0".into()).is_present());
        assert!(FieldValue::Number(0.into()).is_present());
    }

    #[test]
    fn test_scalar_number_display() {
        let entry = entry_with(&[("cost", FieldValue::Number(14.into()))]);
        assert_eq!(entry.scalar("cost").as_deref(), Some("14"));
    }

    #[test]
    fn test_content_kind_paths() {
        assert_eq!(ContentKind::SpecialRule.route(), "special-rules");
        assert_eq!(ContentKind::SpecialRule.as_str(), "special-rule");
        assert_eq!(ContentKind::MagicItem.route(), "magic-item");
        assert_eq!(ContentKind::MagicItem.subdir(), "magic-items");
        assert_eq!(ContentKind::TroopTypeDetail.to_string(), "troop-types-in-detail");
    }

    #[test]
    fn test_content_kind_value_enum_alias() {
        use clap::ValueEnum;
        assert_eq!(
            ContentKind::from_str("magic-items", false),
            Ok(ContentKind::MagicItem)
        );
        assert_eq!(
            ContentKind::from_str("weapons-of-war", false),
            Ok(ContentKind::WeaponOfWar)
        );
        assert!(ContentKind::from_str("spell", false).is_err());
    }
}
