//! Field extraction and profile tables.
//!
//! Turns an entry's loose field set into the row models shown on a page:
//! unit stat rows and the weapon profile (range / strength / armour piercing /
//! special rules).

use crate::model::{Entry, EntryRef, FieldValue, Fields, Node, StatRow};
use crate::utils::html::{escape, escape_attr};

use super::rich::{RenderContext, RichRenderer};

/// Description lookup order. The CMS is inconsistent about which field holds it.
pub const DESCRIPTION_CANDIDATES: [&str; 5] =
    ["description", "flavourText", "flavour", "intro", "summary"];

/// Notes / rules-body lookup order.
pub const NOTES_CANDIDATES: [&str; 5] = ["body", "notes", "rules", "text", "content"];

/// Content type of an embedded weapon profile block.
pub const WEAPON_PROFILE_TYPE: &str = "weaponProfile";

/// Profile column headers, in display order.
pub const PROFILE_HEADERS: [&str; 4] = ["Range", "Strength", "Armour Piercing", "Special Rules"];

const EMPTY: &str = "-";

/// First present field among `candidates`, with the name that matched.
pub fn first_present<'f, 'c>(
    fields: &'f Fields,
    candidates: &[&'c str],
) -> Option<(&'c str, &'f FieldValue)> {
    candidates.iter().find_map(|key| {
        fields
            .get(*key)
            .filter(|v| v.is_present())
            .map(|v| (*key, v))
    })
}

/// Normalised stat rows of a unit: every displayed column filled, `-` for gaps.
pub fn unit_stat_rows(entry: &Entry) -> Vec<StatRow> {
    entry.stat_rows().iter().map(StatRow::normalized).collect()
}

/// Depth-first search for the first embedded weapon profile.
pub fn find_embedded_profile(node: &Node) -> Option<&Fields> {
    if let Node::Embedded(embedded) = node
        && embedded.content_type == WEAPON_PROFILE_TYPE
    {
        return Some(&embedded.fields);
    }
    node.children().iter().find_map(find_embedded_profile)
}

// ============================================================================
// Weapon profile
// ============================================================================

/// The four profile columns, borrowed from a field set.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponProfile<'a> {
    pub range: Option<&'a FieldValue>,
    pub strength: Option<&'a FieldValue>,
    pub armour_piercing: Option<&'a FieldValue>,
    pub special_rules: Option<&'a FieldValue>,
}

impl<'a> WeaponProfile<'a> {
    pub fn from_fields(fields: &'a Fields) -> Self {
        Self {
            range: fields.get("range"),
            strength: fields.get("strength"),
            armour_piercing: fields.get("armourPiercing"),
            special_rules: fields.get("specialRules"),
        }
    }

    /// Profile of a weapon entry: its own columns, or the first embedded
    /// `weaponProfile` in its body when it has none.
    pub fn for_entry(entry: &'a Entry) -> Self {
        let direct = Self::from_fields(&entry.fields);
        if direct.is_present() {
            return direct;
        }
        match entry.get("body") {
            Some(FieldValue::Rich(body)) => find_embedded_profile(body)
                .map(Self::from_fields)
                .unwrap_or(direct),
            _ => direct,
        }
    }

    /// Worth a table: any non-rules column carries a value.
    pub fn is_present(&self) -> bool {
        [self.range, self.strength, self.armour_piercing]
            .into_iter()
            .flatten()
            .any(FieldValue::is_present)
    }
}

/// Render a profile as the site's profile table; empty when nothing to show.
pub fn profile_table(r: &RichRenderer<'_>, profile: &WeaponProfile<'_>, slug: &str) -> String {
    if !profile.is_present() {
        return String::new();
    }

    let th = |label: &str| {
        format!("\n                <th class=\"css-9p6xbs\" data-test-id=\"cf-ui-table-cell\">{label}</th>")
    };
    let td = |cell: String| {
        format!("\n                <td class=\"css-s8xoeu\" data-test-id=\"cf-ui-table-cell\">{cell}</td>")
    };

    let header: String = PROFILE_HEADERS.iter().map(|h| th(*h)).collect();
    let cells = [
        scalar_or_rich(r, profile.range),
        scalar_or_rich(r, profile.strength),
        scalar_or_rich(r, profile.armour_piercing),
        special_rules_cell(r, profile.special_rules),
    ];
    let body: String = cells.into_iter().map(td).collect();

    format!(
        "\n        <div class=\"table-wrapper {slug}\">\
         \n          <table class=\"generic-table weapon-profile-table profile-table css-1hz7skb\" data-test-id=\"cf-ui-table\" cellpadding=\"0\" cellspacing=\"0\">\
         \n            <thead class=\"css-1sojo49\" data-test-id=\"cf-ui-table-head\">\
         \n              <tr class=\"css-1sydf7g\" data-test-id=\"cf-ui-table-row\">{header}\
         \n              </tr>\
         \n            </thead>\
         \n            <tbody class=\"css-0\" data-test-id=\"cf-ui-table-body\">\
         \n              <tr class=\"css-1sydf7g\" data-test-id=\"cf-ui-table-row\">{body}\
         \n              </tr>\
         \n            </tbody>\
         \n          </table>\
         \n        </div>",
        slug = escape_attr(slug),
    )
}

// ============================================================================
// Cells
// ============================================================================

/// One profile cell: `-` when absent, paragraph text joined by `<br>` for rich
/// values, comma-joined links for reference lists, escaped text otherwise.
pub fn scalar_or_rich(r: &RichRenderer<'_>, value: Option<&FieldValue>) -> String {
    let Some(value) = value.filter(|v| v.is_present()) else {
        return EMPTY.to_owned();
    };
    match value {
        FieldValue::Rich(node) => {
            let lines = paragraph_lines(node);
            if lines.is_empty() {
                r.render(node, RenderContext::Default)
            } else {
                lines.join("<br>")
            }
        }
        FieldValue::Ref(target) => ref_link(r, target).unwrap_or_else(|| EMPTY.to_owned()),
        FieldValue::Refs(targets) => join_or_dash(targets.iter().filter_map(|t| ref_link(r, t)), ", "),
        FieldValue::List(items) => join_or_dash(
            items.iter().filter_map(|item| match item {
                FieldValue::Ref(target) => ref_link(r, target),
                other => scalar_html(r, other),
            }),
            ", ",
        ),
        other => scalar_html(r, other).unwrap_or_else(|| EMPTY.to_owned()),
    }
}

/// Special-rules cell: one `detailed-link` span per rule so they stack.
pub fn special_rules_cell(r: &RichRenderer<'_>, value: Option<&FieldValue>) -> String {
    let Some(value) = value.filter(|v| v.is_present()) else {
        return EMPTY.to_owned();
    };
    match value {
        FieldValue::Rich(node) => {
            let links = r.collect_links(node, RenderContext::Rules);
            if links.is_empty() {
                return r.render(node, RenderContext::Default);
            }
            links
                .iter()
                .map(|(href, label)| detailed_link(&format!("<a href=\"{href}\">{label}</a>")))
                .collect()
        }
        FieldValue::Ref(target) => ref_link(r, target)
            .map(|l| detailed_link(&l))
            .unwrap_or_else(|| EMPTY.to_owned()),
        FieldValue::Refs(targets) => join_or_dash(
            targets.iter().filter_map(|t| ref_link(r, t)).map(|l| detailed_link(&l)),
            "",
        ),
        FieldValue::List(items) => join_or_dash(
            items
                .iter()
                .filter_map(|item| match item {
                    FieldValue::Ref(target) => ref_link(r, target),
                    other => scalar_html(r, other),
                })
                .map(|l| detailed_link(&l)),
            "",
        ),
        other => scalar_html(r, other).unwrap_or_else(|| EMPTY.to_owned()),
    }
}

/// Trimmed, escaped text leaves of the top-level paragraphs.
fn paragraph_lines(node: &Node) -> Vec<String> {
    node.children()
        .iter()
        .filter(|c| matches!(c, Node::Paragraph(_)))
        .flat_map(Node::children)
        .filter_map(Node::as_text)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| escape(t).into_owned())
        .collect()
}

/// Link to a referenced entry, or its bare name when it has no slug.
fn ref_link(r: &RichRenderer<'_>, target: &EntryRef) -> Option<String> {
    if !target.slug.is_empty() {
        let href = r.resolver().list_url(target);
        Some(format!(
            "<a href=\"{}\">{}</a>",
            escape_attr(&href),
            escape(&target.name)
        ))
    } else if !target.name.is_empty() {
        Some(escape(&target.name).into_owned())
    } else {
        None
    }
}

fn scalar_html(r: &RichRenderer<'_>, value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Rich(node) => Some(r.render(node, RenderContext::Default)),
        other => other.as_scalar().map(|s| escape(&s).into_owned()),
    }
}

fn detailed_link(inner: &str) -> String {
    format!("<span class=\"detailed-link\">{inner}</span>")
}

fn join_or_dash(parts: impl Iterator<Item = String>, sep: &str) -> String {
    let parts: Vec<_> = parts.collect();
    if parts.is_empty() {
        EMPTY.to_owned()
    } else {
        parts.join(sep)
    }
}
