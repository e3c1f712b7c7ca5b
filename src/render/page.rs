//! Page renderers, one per content kind.
//!
//! Each builds the body markup for an [`Entry`] and wraps it in the embedded
//! page shell. Layout and CSS classes follow the rules site so the mirrored
//! stylesheets apply unchanged.

use crate::embed::page::{SHELL_HTML, ShellVars};
use crate::model::stats::stat_long_name;
use crate::model::{ContentKind, Entry, EntryRef, FieldValue, STAT_COLUMNS};
use crate::utils::html::{escape, escape_attr};

use super::profile::{
    DESCRIPTION_CANDIDATES, NOTES_CANDIDATES, WeaponProfile, first_present, profile_table,
    unit_stat_rows,
};
use super::resolve::{LinkContext, TROOP_TYPES};
use super::rich::{RenderContext, RichRenderer};

const TH: &str = r#"<th class="css-9p6xbs" data-test-id="cf-ui-table-cell">"#;
const TD: &str = r#"<td class="css-s8xoeu" data-test-id="cf-ui-table-cell">"#;

/// Renders complete HTML documents for entries.
#[derive(Debug, Clone, Copy)]
pub struct PageRenderer<'a> {
    rich: RichRenderer<'a>,
    css_base: &'a str,
}

impl<'a> PageRenderer<'a> {
    pub const fn new(rich: RichRenderer<'a>, css_base: &'a str) -> Self {
        Self { rich, css_base }
    }

    /// Full page for an entry, dispatched on its kind.
    pub fn render(&self, entry: &Entry) -> String {
        let body = match entry.kind {
            ContentKind::Unit => self.unit_body(entry),
            ContentKind::WeaponOfWar => self.weapon_body(entry),
            ContentKind::MagicItem => self.magic_item_body(entry),
            ContentKind::SpecialRule => self.special_rule_body(entry),
            ContentKind::TroopTypeDetail => self.troop_type_body(entry),
        };
        self.shell(entry, &body)
    }

    fn shell(&self, entry: &Entry, body: &str) -> String {
        let title = escape(&entry.name()).into_owned();
        let canonical = format!("{}.html", escape_attr(&entry.slug));
        SHELL_HTML.render(&ShellVars {
            title: &title,
            canonical: &canonical,
            site_base: self.rich.resolver().base_url(),
            css_base: self.css_base,
            body,
        })
    }

    // ========================================================================
    // Unit
    // ========================================================================

    fn unit_body(&self, entry: &Entry) -> String {
        let slug = escape_attr(&entry.slug);
        format!(
            "              <h1 class=\"page-title\">{name}</h1>{breadcrumb}\
             \n              <div class=\"unit-profile {slug}\">{table}{details}\
             \n              </div>",
            name = escape(&entry.name()),
            breadcrumb = self.army_breadcrumb(entry),
            table = unit_table(entry),
            details = self.unit_details(entry),
        )
    }

    fn army_breadcrumb(&self, entry: &Entry) -> String {
        let Some(army) = first_ref(entry.get("army")).filter(|a| !a.slug.is_empty()) else {
            return String::new();
        };
        let updated = entry
            .scalar("lastUpdated")
            .map(|d| {
                format!(
                    "\n            <li class=\"update-timestamp\">Last update: {}</li>",
                    escape(&d)
                )
            })
            .unwrap_or_default();
        format!(
            "\n        <div class=\"breadcrumb__wrapper\">\
             \n          <ul class=\"breadcrumb\">\
             \n            <li class=\"breadcrumb-link\">\
             \n              <a href=\"{href}\">{name}</a>\
             \n            </li>\
             \n          </ul>\
             \n          <ul class=\"breadcrumb\">{updated}\
             \n          </ul>\
             \n        </div>",
            href = escape_attr(&self.rich.resolver().join("/army", &army.slug)),
            name = escape(&army.name),
        )
    }

    fn unit_details(&self, entry: &Entry) -> String {
        let scalar = |key: &str| escape(&entry.scalar(key).unwrap_or_default()).into_owned();

        let mut html = String::from("\n        <div class=\"unit-profile__details\">");
        html.push_str(&detail("points", "Cost", &format!("{} points per model", scalar("cost"))));
        html.push_str(&detail(
            "unit-category",
            "Unit Category",
            &self.detail_link(first_ref(entry.get("unitCategory"))),
        ));
        html.push_str(&detail(
            "troop-type",
            "Troop Type",
            &self.detail_link(first_ref(entry.get("troopType"))),
        ));
        html.push_str(&detail("base-size", "Base Size", &scalar("baseSize")));
        html.push_str(&detail("unit-size", "Unit Size", &scalar("unitSize")));
        if let Some(armour) = entry.scalar("armourValue") {
            html.push_str(&detail("armour-value", "Armour Value", &escape(&armour)));
        }
        html.push_str(&self.equipment(entry.get("equipment")));
        html.push_str(&self.special_rules(entry.get("specialRules")));
        html.push_str("\n        </div>");
        html
    }

    /// Link to a troop-type description, wrapped as a details link.
    fn detail_link(&self, target: Option<&EntryRef>) -> String {
        let Some(target) = target else {
            return String::new();
        };
        format!(
            "<span class=\"unit-profile__details__link\"><a href=\"{}\">{}</a></span>",
            escape_attr(&self.rich.resolver().join(TROOP_TYPES, &target.slug)),
            escape(&target.name),
        )
    }

    fn equipment(&self, value: Option<&FieldValue>) -> String {
        let body = match value.filter(|v| v.is_present()) {
            Some(FieldValue::Rich(node)) => self.rich.render(node, RenderContext::Equipment),
            Some(FieldValue::Refs(items)) => {
                let items: Vec<_> = items.iter().map(|item| self.equipment_item(item)).collect();
                format!("<ul>\n{}\n</ul>\n<p></p>", items.join("\n"))
            }
            _ => return String::new(),
        };
        format!(
            "\n          <div class=\"unit-profile__details--equipment\">\
             \n            <strong>Equipment:</strong>{body}\
             \n          </div>"
        )
    }

    /// `<li><p><b>group:</b> note <a>weapon</a></p></li>`
    fn equipment_item(&self, item: &EntryRef) -> String {
        let link = format!(
            "<a href=\"{}\">{}</a>",
            escape_attr(&self.rich.resolver().resolve(item, LinkContext::Equipment)),
            escape(&item.name),
        );
        let inner = if item.group_name.is_empty() {
            link
        } else {
            format!(
                "<b>{}:</b> {} {link}",
                escape(&item.group_name),
                escape(&item.note)
            )
        };
        format!("<li><p>{inner}</p></li>")
    }

    fn special_rules(&self, value: Option<&FieldValue>) -> String {
        let mut pairs = Vec::new();
        match value {
            Some(FieldValue::Rich(node)) => {
                pairs.extend(self.rich.collect_links(node, RenderContext::Rules));
            }
            Some(FieldValue::Ref(target)) => pairs.push(self.rule_pair(target)),
            Some(FieldValue::Refs(targets)) => {
                pairs.extend(targets.iter().map(|t| self.rule_pair(t)));
            }
            Some(FieldValue::List(items)) => {
                for item in items {
                    match item {
                        FieldValue::Rich(node) => {
                            pairs.extend(self.rich.collect_links(node, RenderContext::Rules));
                        }
                        FieldValue::Ref(target) => pairs.push(self.rule_pair(target)),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        if pairs.is_empty() {
            return String::new();
        }
        let links: Vec<_> = pairs
            .iter()
            .map(|(href, label)| format!("<a href=\"{href}\">{label}</a>"))
            .collect();
        format!(
            "\n          <div class=\"unit-profile__details--special-rules unit-profile__details--link-list\">\
             \n            <strong>Special Rules:</strong> {}\
             \n          </div>",
            links.join(", ")
        )
    }

    /// `(href, "Name (note)")` for a listed special rule.
    fn rule_pair(&self, target: &EntryRef) -> (String, String) {
        let mut label = escape(&target.name).into_owned();
        if !target.note.is_empty() {
            label.push_str(&format!(" ({})", escape(&target.note)));
        }
        let href = self.rich.resolver().resolve(target, LinkContext::Rules);
        (escape_attr(&href).into_owned(), label)
    }

    // ========================================================================
    // Rules entries
    // ========================================================================

    fn weapon_body(&self, entry: &Entry) -> String {
        let profile = profile_table(&self.rich, &WeaponProfile::for_entry(entry), &entry.slug);
        self.rule_entry(
            entry,
            "weapon-of-war",
            &[self.description(entry), profile, self.notes(entry, true)],
        )
    }

    fn magic_item_body(&self, entry: &Entry) -> String {
        self.rule_entry(
            entry,
            "magic-item",
            &[magic_item_meta(entry), self.description(entry), self.notes(entry, true)],
        )
    }

    fn special_rule_body(&self, entry: &Entry) -> String {
        self.rule_entry(
            entry,
            "special-rule",
            &[self.description(entry), self.notes(entry, false)],
        )
    }

    fn troop_type_body(&self, entry: &Entry) -> String {
        let body = entry
            .get("body")
            .map(|v| self.rich.field_html(v))
            .unwrap_or_default();
        let notes = if body.is_empty() {
            body
        } else {
            format!("\n        <div class=\"rule-entry__notes\">{body}</div>")
        };
        self.rule_entry(
            entry,
            "troop-types-in-detail",
            &[self.related_links(entry), notes],
        )
    }

    /// Common frame of the non-unit pages.
    fn rule_entry(&self, entry: &Entry, class: &str, sections: &[String]) -> String {
        format!(
            "              <h1 class=\"page-title\">{name}</h1>{timestamp}\
             \n              <div class=\"rule-entry {class} {slug}\">{sections}\
             \n              </div>",
            name = escape(&entry.name()),
            timestamp = timestamp(entry),
            slug = escape_attr(&entry.slug),
            sections = sections.concat(),
        )
    }

    fn description(&self, entry: &Entry) -> String {
        let Some((_, value)) = first_present(&entry.fields, &DESCRIPTION_CANDIDATES) else {
            return String::new();
        };
        format!(
            "\n        <div class=\"rule-entry__description\"><em>{}</em></div>",
            self.rich.field_html(value)
        )
    }

    fn notes(&self, entry: &Entry, labelled: bool) -> String {
        let html = first_present(&entry.fields, &NOTES_CANDIDATES)
            .map(|(_, value)| self.rich.field_html(value))
            .unwrap_or_default();
        if html.is_empty() {
            return html;
        }
        let label = if labelled {
            "\n          <em>Notes:</em>"
        } else {
            ""
        };
        format!(
            "\n        <div class=\"rule-entry__notes\">{label}\
             \n          {html}\
             \n        </div>"
        )
    }

    /// "Parent" section of a troop-type page.
    fn related_links(&self, entry: &Entry) -> String {
        let links: Vec<_> = refs(entry.get("relatedLinks"))
            .into_iter()
            .map(|r| self.detail_link(Some(r)))
            .collect();
        if links.is_empty() {
            return String::new();
        }
        format!(
            "\n        <div class=\"section-link\"><span class=\"section-link__header\">Parent</span><span>{}</span></div>",
            links.join(", ")
        )
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Unit profile table: a blank corner cell, the nine stat keys, one row per
/// profile line with comments naming each value.
fn unit_table(entry: &Entry) -> String {
    let mut header = format!("            {TH}</th>\n");
    for column in &STAT_COLUMNS[1..] {
        header.push_str(&format!("            {TH}{column}</th>\n"));
    }

    let rows: Vec<_> = entry
        .stat_rows()
        .iter()
        .zip(unit_stat_rows(entry))
        .enumerate()
        .map(|(index, (raw, row))| {
            let mut lines = vec![
                format!("            <!-- Stats for: {} -->", escape(&raw.label(index))),
                "            <tr class=\"css-1sydf7g\" data-test-id=\"cf-ui-table-row\">".to_owned(),
            ];
            for (column, value) in row.displayed() {
                let value = escape(value);
                lines.push(format!("              <!-- {}: {value} -->", stat_long_name(column)));
                lines.push(format!("              {TD}{value}</td>"));
            }
            lines.push("            </tr>".to_owned());
            lines.join("\n")
        })
        .collect();

    format!(
        "\n        <div class=\"table-wrapper {slug}\">\
         \n          <table class=\"generic-table unit-profile-table css-1hz7skb\" data-test-id=\"cf-ui-table\" cellpadding=\"0\" cellspacing=\"0\">\
         \n            <thead class=\"css-1sojo49\" data-test-id=\"cf-ui-table-head\">\
         \n              <tr class=\"css-1sydf7g\" data-test-id=\"cf-ui-table-row\">\
         \n{header}              </tr>\
         \n            </thead>\
         \n            <tbody class=\"css-0\" data-test-id=\"cf-ui-table-body\">\
         \n{rows}\
         \n            </tbody>\
         \n          </table>\
         \n        </div>",
        slug = escape_attr(&entry.slug),
        rows = rows.join("\n"),
    )
}

fn detail(css: &str, label: &str, value: &str) -> String {
    format!(
        "\n          <div class=\"unit-profile__details--{css}\">\
         \n            <strong>{label}:</strong> {value}\
         \n          </div>"
    )
}

fn timestamp(entry: &Entry) -> String {
    let Some(updated) = entry.scalar("lastUpdated") else {
        return String::new();
    };
    format!(
        "\n        <div class=\"breadcrumb__wrapper\">\
         \n          <ul class=\"breadcrumb\">\
         \n            <li class=\"update-timestamp\">Last update: {}</li>\
         \n          </ul>\
         \n        </div>",
        escape(&updated)
    )
}

/// `type · N points` line of a magic item.
fn magic_item_meta(entry: &Entry) -> String {
    let cost = entry.scalar("cost").or_else(|| entry.scalar("points"));
    let item_type = entry
        .scalar("type")
        .or_else(|| entry.scalar("itemType"))
        .or_else(|| {
            ["type", "itemType"]
                .iter()
                .find_map(|key| first_ref(entry.get(key)))
                .map(|r| r.name.clone())
                .filter(|n| !n.is_empty())
        });

    let mut parts = Vec::new();
    if let Some(item_type) = item_type {
        parts.push(format!("<span class=\"magic-item__type\">{}</span>", escape(&item_type)));
    }
    if let Some(cost) = cost {
        parts.push(format!("<span class=\"magic-item__cost\">{} points</span>", escape(&cost)));
    }
    if parts.is_empty() {
        return String::new();
    }
    format!(
        "\n        <div class=\"unit-profile__details\">\
         \n          <div class=\"unit-profile__details--points\">\
         \n            {}\
         \n          </div>\
         \n        </div>",
        parts.join(" &nbsp;&middot;&nbsp; ")
    )
}

/// A single link, or the first of a link list.
fn first_ref(value: Option<&FieldValue>) -> Option<&EntryRef> {
    match value? {
        FieldValue::Ref(target) => Some(target),
        FieldValue::Refs(targets) => targets.first(),
        _ => None,
    }
}

fn refs(value: Option<&FieldValue>) -> Vec<&EntryRef> {
    match value {
        Some(FieldValue::Ref(target)) => vec![target],
        Some(FieldValue::Refs(targets)) => targets.iter().collect(),
        _ => Vec::new(),
    }
}
