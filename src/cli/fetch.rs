//! Fetch command - one entry from the data API to a static page.
//!
//! ```text
//! build id → data JSON → Entry → (stat edit) → page HTML → registry
//! ```

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::args::FetchArgs;
use super::edit::{Prompt, edit_rows};
use crate::config::RulebookConfig;
use crate::log;
use crate::model::parse::{parse_entry, parse_field};
use crate::model::{ContentKind, Entry, StatRow};
use crate::registry::{self, Outcome};
use crate::render::profile::{DESCRIPTION_CANDIDATES, NOTES_CANDIDATES, first_present, unit_stat_rows};
use crate::render::{PageRenderer, RichRenderer};
use crate::source::{Client, extract_fields};

/// Width of a string preview in `--debug` dumps.
const PREVIEW_CHARS: usize = 80;

/// Run the fetch command.
pub fn run_fetch(config: &RulebookConfig, args: &FetchArgs) -> Result<()> {
    log!("fetch"; "fetching: {} (type: {})", args.slug, args.kind);

    let client = Client::new(&config.site)?;
    let build_id = match &args.build {
        Some(id) => id.clone(),
        None => client.detect_build_id()?,
    };

    let payload = client
        .fetch_entry(&build_id, args.kind, &args.slug)
        .with_context(|| format!("failed to fetch `{}`", args.slug))?;
    let fields = extract_fields(&payload)?;

    if args.debug {
        log!("debug"; "{}", dump_fields(fields));
        log!("debug"; "exiting without writing HTML (--debug flag set)");
        return Ok(());
    }

    let mut entry = parse_entry(&args.slug, args.kind, fields);
    if entry.kind == ContentKind::Unit && !args.no_edit {
        edit_entry(&mut entry)?;
    }

    let out_dir = args.out.clone().unwrap_or_else(|| config.output.dir(args.kind));
    let rules_map = (!args.no_registry).then(|| {
        args.rules_map
            .clone()
            .unwrap_or_else(|| config.registry.path.clone())
    });
    save_entry(config, &entry, &out_dir, rules_map.as_deref())?;
    Ok(())
}

/// Console stat editor, skipped without a terminal.
fn edit_entry(entry: &mut Entry) -> Result<()> {
    let Some(rows) = entry.stat_rows_mut() else {
        log!("edit"; "no unit profile found to edit");
        return Ok(());
    };
    match Prompt::console() {
        Some(mut prompt) => {
            edit_rows(&mut prompt, rows)?;
        }
        None => log!("edit"; "stdin is not a terminal, skipping stat editing"),
    }
    Ok(())
}

/// Render `entry`, write `<out_dir>/<slug>.html`, then update the registry.
/// Returns the page path.
pub fn save_entry(
    config: &RulebookConfig,
    entry: &Entry,
    out_dir: &Path,
    rules_map: Option<&Path>,
) -> Result<PathBuf> {
    let stats = describe(entry);

    let resolver = config.resolver.build(config.site.base());
    let html = PageRenderer::new(RichRenderer::new(&resolver), &config.site.css_base).render(entry);

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let dest = out_dir.join(format!("{}.html", entry.slug));
    fs::write(&dest, &html).with_context(|| format!("failed to write {}", dest.display()))?;
    log!("write"; "saved: {} ({} bytes)", dest.display(), html.len());

    if let Some(path) = rules_map {
        let key = registry::display_key(&entry.slug);
        let url = registry::page_url(
            &config.registry.base_url,
            config.output.subdir(entry.kind),
            &entry.slug,
        );
        let outcome = registry::upsert_file(path, &key, &url, stats.as_deref())?;
        report(&key, &url, &outcome);
    }
    Ok(dest)
}

/// Log what the page will be built from. Units yield their stat rows.
fn describe(entry: &Entry) -> Option<Vec<StatRow>> {
    if entry.kind == ContentKind::Unit {
        let rows = unit_stat_rows(entry);
        if rows.is_empty() {
            log!("stats"; "no stats found");
            return None;
        }
        log!("stats"; "extracted {} stat row(s)", rows.len());
        return Some(rows);
    }

    let description = first_present(&entry.fields, &DESCRIPTION_CANDIDATES).map(|(k, _)| k);
    let notes = match entry.kind {
        ContentKind::TroopTypeDetail => Some("body"),
        _ => first_present(&entry.fields, &NOTES_CANDIDATES).map(|(k, _)| k),
    };
    log!("meta"; "description field: {}", description.unwrap_or("(none)"));
    log!("meta"; "notes field      : {}", notes.unwrap_or("(none)"));
    None
}

fn report(key: &str, url: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Skipped { has_stats: true } => {
            log!("rules-map"; "\"{}\" already has stats, skipping", key)
        }
        Outcome::Skipped { has_stats: false } => {
            log!("rules-map"; "\"{}\" already exists, skipping", key)
        }
        Outcome::Updated { rows } => {
            log!("rules-map"; "updated \"{}\" with {} stat row(s)", key, rows)
        }
        Outcome::Inserted { rows: 0 } => log!("rules-map"; "injected \"{}\" -> {}", key, url),
        Outcome::Inserted { rows } => {
            log!("rules-map"; "injected with {} stat row(s) \"{}\" -> {}", rows, key, url)
        }
        Outcome::Warning(message) => log!("rules-map"; "warning: {}, skipping", message),
    }
}

// =============================================================================
// --debug
// =============================================================================

/// One line per field: name, parsed type, raw preview. Sorted by name.
pub fn dump_fields(fields: &Map<String, Value>) -> String {
    let rule = "=".repeat(60);
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();

    let mut lines = vec![
        String::new(),
        rule.clone(),
        "raw fields from the data API".to_owned(),
        rule.clone(),
    ];
    for key in keys {
        let value = &fields[key.as_str()];
        lines.push(format!(
            "  {:<28}  {:<12}  {}",
            key,
            parse_field(value).type_name(),
            preview(value)
        ));
    }
    lines.push(rule);
    lines.join("\n")
}

fn preview(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("nodeType").and_then(Value::as_str) {
            Some(node_type) => format!("{{nodeType: {node_type} ...}}"),
            None => {
                let keys: Vec<&str> = map.keys().take(4).map(String::as_str).collect();
                format!("object({})", keys.join(", "))
            }
        },
        Value::Array(items) => format!("list[{}]", items.len()),
        Value::String(s) if s.chars().count() > PREVIEW_CHARS => {
            let head: String = s.chars().take(PREVIEW_CHARS).collect();
            format!("{head:?}...")
        }
        other => other.to_string(),
    }
}
