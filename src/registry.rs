//! `rules-map.js` registry.
//!
//! The registry is a JS source file holding one object literal:
//!
//! ```text
//! const additionalOWBRules = {
//!   "grave guard": {
//!     fullUrl: "https://…/unit/grave-guard.html?minimal=true",
//!     stats: [
//!       { Name: "Grave Guard", M: "4", … Ld: "8" }
//!     ]
//!   },
//!   "halberd": { fullUrl: "https://…/weapons-of-war/halberd.html?minimal=true" },
//!   …
//! ```
//!
//! It is patched textually. Anything that cannot be matched is left alone and
//! reported as a warning; the file is never rewritten blind.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::StatRow;

/// Opener of the table new records are inserted into.
const CONTAINER: &str = r"const additionalOWBRules\s*=\s*\{\n";

/// Result of one upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Key already present; nothing to add.
    Skipped { has_stats: bool },
    /// Existing record gained stat rows.
    Updated { rows: usize },
    /// New record added.
    Inserted { rows: usize },
    /// Structure not recognised; nothing written.
    Warning(String),
}

impl Outcome {
    /// Whether the registry text changed.
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Updated { .. } | Self::Inserted { .. })
    }
}

/// Registry key for a slug: `grave-guard` → `grave guard`.
pub fn display_key(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Public URL of a generated page in `folder`, opened in minimal mode.
pub fn page_url(base: &str, folder: &str, slug: &str) -> String {
    format!(
        "{}/{}/{}.html?minimal=true",
        base.trim_end_matches('/'),
        folder,
        slug
    )
}

/// In-memory registry text.
#[derive(Debug, Clone)]
pub struct Registry {
    text: String,
}

impl Registry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Insert or merge one record.
    ///
    /// - key present with stats → skipped
    /// - key present without stats, stats given → stats injected after `fullUrl`
    /// - key present, no stats given → skipped
    /// - key absent → inserted at the top of the table
    pub fn upsert(&mut self, key: &str, url: &str, stats: Option<&[StatRow]>) -> Outcome {
        let stats = stats.filter(|rows| !rows.is_empty());
        let quoted = key_pattern(key);

        let Ok(record) = Regex::new(&format!(r"{quoted}\s*:\s*\{{[^}}]*")) else {
            return Outcome::Warning(format!("cannot build pattern for `{key}`"));
        };
        if let Some(found) = record.find(&self.text) {
            let has_stats = found.as_str().contains("stats:");
            return match stats {
                Some(rows) if !has_stats => self.add_stats(&quoted, key, rows),
                _ => Outcome::Skipped { has_stats },
            };
        }
        self.insert(key, url, stats)
    }

    fn add_stats(&mut self, quoted: &str, key: &str, rows: &[StatRow]) -> Outcome {
        let pattern = format!(
            r#"({quoted}\s*:\s*\{{\s*fullUrl:\s*(?:"[^"]*"|'[^']*'))\s*,?\s*\}}"#
        );
        let Ok(re) = Regex::new(&pattern) else {
            return Outcome::Warning(format!("cannot build pattern for `{key}`"));
        };
        let Some(caps) = re.captures(&self.text) else {
            return Outcome::Warning(format!("could not update `{key}`: unexpected record shape"));
        };
        let (Some(whole), Some(head)) = (caps.get(0), caps.get(1)) else {
            return Outcome::Warning(format!("could not update `{key}`"));
        };
        let replacement = format!("{},\n    stats: {}\n  }}", head.as_str(), stats_js(rows));
        let range = whole.range();
        self.text.replace_range(range, &replacement);
        Outcome::Updated { rows: rows.len() }
    }

    fn insert(&mut self, key: &str, url: &str, stats: Option<&[StatRow]>) -> Outcome {
        let Ok(container) = Regex::new(CONTAINER) else {
            return Outcome::Warning("cannot build container pattern".into());
        };
        let Some(at) = container.find(&self.text).map(|m| m.end()) else {
            return Outcome::Warning("could not locate additionalOWBRules".into());
        };

        let key_js = js_string(key);
        let url_js = js_string(url);
        let record = match stats {
            Some(rows) => format!(
                "  {key_js}: {{\n    fullUrl: {url_js},\n    stats: {}\n  }},\n",
                stats_js(rows)
            ),
            None => format!("  {key_js}: {{ fullUrl: {url_js} }},\n"),
        };
        self.text.insert_str(at, &record);
        Outcome::Inserted {
            rows: stats.map_or(0, <[StatRow]>::len),
        }
    }
}

/// Upsert into the registry file. The file is rewritten only when it changes;
/// a missing file is a warning, not an error.
pub fn upsert_file(path: &Path, key: &str, url: &str, stats: Option<&[StatRow]>) -> Result<Outcome> {
    if !path.is_file() {
        return Ok(Outcome::Warning(format!(
            "file not found at {}",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read registry {}", path.display()))?;

    let mut registry = Registry::new(text);
    let outcome = registry.upsert(key, url, stats);
    if outcome.is_change() {
        fs::write(path, registry.text())
            .with_context(|| format!("failed to write registry {}", path.display()))?;
    }
    Ok(outcome)
}

/// `[\n      { Name: "…", M: "…", … },\n    ]` in display column order.
fn stats_js(rows: &[StatRow]) -> String {
    let lines: Vec<_> = rows
        .iter()
        .map(|row| {
            let cells: Vec<_> = row
                .displayed()
                .map(|(column, value)| format!("{column}: {}", js_string(value)))
                .collect();
            format!("      {{ {} }}", cells.join(", "))
        })
        .collect();
    format!("[\n{}\n    ]", lines.join(",\n"))
}

/// Key as written by [`Registry::insert`], or single-quoted by hand.
fn key_pattern(key: &str) -> String {
    format!(
        "(?:{}|'{}')",
        regex::escape(&js_string(key)),
        regex::escape(&key.replace('\\', "\\\\").replace('\'', "\\'"))
    )
}

/// Double-quoted JS string literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const URL: &str = "https://owapps.grra.me/owb/rules/unit/grave-guard.html?minimal=true";

    fn seed() -> String {
        "// generated\nconst additionalOWBRules = {\n  \"halberd\": { fullUrl: \"https://x/weapons-of-war/halberd.html?minimal=true\" },\n};\n\nexport default additionalOWBRules;\n".to_owned()
    }

    fn grave_guard() -> Vec<StatRow> {
        vec![StatRow::from_pairs([
            ("Name", "Grave Guard"),
            ("M", "4"),
            ("WS", "4"),
            ("BS", "2"),
            ("S", "4"),
            ("T", "4"),
            ("W", "1"),
            ("I", "2"),
            ("A", "1"),
            ("Ld", "8"),
        ])]
    }

    #[test]
    fn test_display_key_and_url() {
        assert_eq!(display_key("grave-guard"), "grave guard");
        assert_eq!(
            page_url("https://owapps.grra.me/owb/rules/", "unit", "grave-guard"),
            URL
        );
        assert_eq!(
            page_url("https://b", "magic-items", "the-fellblade"),
            "https://b/magic-items/the-fellblade.html?minimal=true"
        );
    }

    #[test]
    fn test_insert_with_stats() {
        let mut reg = Registry::new(seed());
        let rows = grave_guard();
        assert_eq!(
            reg.upsert("grave guard", URL, Some(&rows)),
            Outcome::Inserted { rows: 1 }
        );
        let expected = format!(
            "const additionalOWBRules = {{\n  \"grave guard\": {{\n    fullUrl: \"{URL}\",\n    stats: [\n      \
             {{ Name: \"Grave Guard\", M: \"4\", WS: \"4\", BS: \"2\", S: \"4\", T: \"4\", W: \"1\", I: \"2\", A: \"1\", Ld: \"8\" }}\n    ]\n  }},\n  \"halberd\""
        );
        assert!(reg.text().contains(&expected), "{}", reg.text());
    }

    #[test]
    fn test_insert_without_stats() {
        let mut reg = Registry::new(seed());
        let url = "https://b/special-rules/fear.html?minimal=true";
        assert_eq!(reg.upsert("fear", url, None), Outcome::Inserted { rows: 0 });
        assert!(reg.text().contains(&format!("  \"fear\": {{ fullUrl: \"{url}\" }},\n  \"halberd\"")));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let rows = grave_guard();
        let mut once = Registry::new(seed());
        once.upsert("grave guard", URL, Some(&rows));

        let mut twice = Registry::new(seed());
        twice.upsert("grave guard", URL, Some(&rows));
        assert_eq!(
            twice.upsert("grave guard", URL, Some(&rows)),
            Outcome::Skipped { has_stats: true }
        );
        assert_eq!(once.text(), twice.text());

        let mut plain = Registry::new(seed());
        plain.upsert("fear", "u", None);
        let after_one = plain.text().to_owned();
        assert_eq!(plain.upsert("fear", "u", None), Outcome::Skipped { has_stats: false });
        assert_eq!(plain.text(), after_one);

        let mut quoted = Registry::new(seed());
        assert_eq!(quoted.upsert("o\"brien", "u", None), Outcome::Inserted { rows: 0 });
        let after_insert = quoted.text().to_owned();
        assert_eq!(
            quoted.upsert("o\"brien", "u", None),
            Outcome::Skipped { has_stats: false }
        );
        assert_eq!(
            quoted.upsert("o\"brien", URL, Some(&rows)),
            Outcome::Updated { rows: 1 }
        );
        assert_eq!(after_insert.matches("\"o\\\"brien\"").count(), 1);
        assert_eq!(quoted.text().matches("\"o\\\"brien\"").count(), 1);
    }

    #[test]
    fn test_single_quoted_key_found() {
        let mut reg = Registry::new(
            "const additionalOWBRules = {\n  'fear': { fullUrl: 'u' },\n};\n",
        );
        assert_eq!(reg.upsert("fear", "u", None), Outcome::Skipped { has_stats: false });
    }

    #[test]
    fn test_never_replaces_stats() {
        let rows = grave_guard();
        let mut reg = Registry::new(seed());
        reg.upsert("grave guard", URL, Some(&rows));
        let before = reg.text().to_owned();

        assert_eq!(
            reg.upsert("grave guard", "https://other/url", None),
            Outcome::Skipped { has_stats: true }
        );
        let mut other = grave_guard();
        other[0].set("M", "9");
        assert_eq!(
            reg.upsert("grave guard", URL, Some(&other)),
            Outcome::Skipped { has_stats: true }
        );
        assert_eq!(reg.text(), before);
    }

    #[test]
    fn test_merge_stats_into_existing() {
        let text = seed().replace(
            "{\n  \"halberd\"",
            "{\n  \"grave guard\": { fullUrl: \"u\" },\n  \"halberd\"",
        );
        let mut reg = Registry::new(text);
        let rows = grave_guard();
        assert_eq!(
            reg.upsert("grave guard", URL, Some(&rows)),
            Outcome::Updated { rows: 1 }
        );
        assert!(reg.text().contains("\"grave guard\": { fullUrl: \"u\",\n    stats: [\n      { Name: \"Grave Guard\""));
        assert!(reg.text().contains("Ld: \"8\" }\n    ]\n  },\n  \"halberd\""));
        // merged once, then stable
        assert_eq!(
            reg.upsert("grave guard", URL, Some(&rows)),
            Outcome::Skipped { has_stats: true }
        );
    }

    #[test]
    fn test_merge_single_quoted_key() {
        let text = seed().replace("\"halberd\"", "'halberd'");
        let mut reg = Registry::new(text);
        let outcome = reg.upsert("halberd", "x", Some(&grave_guard()));
        assert_eq!(outcome, Outcome::Updated { rows: 1 });
    }

    #[test]
    fn test_merge_unexpected_shape_is_warning() {
        let text = seed().replace(
            "\"halberd\": { fullUrl:",
            "\"halberd\": { label: \"H\", fullUrl:",
        );
        let mut reg = Registry::new(text.clone());
        let outcome = reg.upsert("halberd", "x", Some(&grave_guard()));
        assert!(matches!(outcome, Outcome::Warning(_)));
        assert_eq!(reg.text(), text);
    }

    #[test]
    fn test_missing_container_is_warning() {
        let text = "export const rules = {};\n";
        let mut reg = Registry::new(text);
        assert!(matches!(reg.upsert("fear", "u", None), Outcome::Warning(_)));
        assert_eq!(reg.text(), text);
    }

    #[test]
    fn test_key_is_matched_literally() {
        let mut reg = Registry::new(seed());
        // regex metacharacters in the key must not match other records
        assert!(matches!(reg.upsert("hal.erd", "u", None), Outcome::Inserted { .. }));
    }

    #[test]
    fn test_values_are_js_escaped() {
        let rows = vec![StatRow::from_pairs([("Name", "The \"Mad\" One")])];
        let mut reg = Registry::new(seed());
        reg.upsert("mad", "u", Some(&rows));
        assert!(reg.text().contains(r#"Name: "The \"Mad\" One", M: "-""#));
    }

    #[test]
    fn test_upsert_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules-map.js");
        fs::write(&path, seed()).unwrap();

        let rows = grave_guard();
        let outcome = upsert_file(&path, "grave guard", URL, Some(&rows)).unwrap();
        assert_eq!(outcome, Outcome::Inserted { rows: 1 });
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"grave guard\""));

        let outcome = upsert_file(&path, "grave guard", URL, Some(&rows)).unwrap();
        assert_eq!(outcome, Outcome::Skipped { has_stats: true });
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn test_upsert_file_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.js");
        let outcome = upsert_file(&path, "fear", "u", None).unwrap();
        assert!(matches!(outcome, Outcome::Warning(_)));
        assert!(!path.exists());
    }
}
