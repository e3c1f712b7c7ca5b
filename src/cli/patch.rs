//! Patch command - add minimal-mode support to existing pages.
//!
//! Pages written before minimal mode existed lack the style/script block.
//! The block goes right before the closing `</body>`; pages that already
//! carry it are left alone, so the command can be re-run safely.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RulebookConfig;
use crate::embed::page::{MINIMAL_HTML, MINIMAL_MARKER, MinimalVars};
use crate::log;
use crate::utils::path::collect_files_with_ext;

const BODY_CLOSE: &str = "</body>";

/// What happened to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Updated,
    /// Minimal mode already present.
    Skipped,
    /// No `</body>` to anchor on.
    NoBody,
}

/// Per-run tally.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PatchSummary {
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl PatchSummary {
    pub fn total(&self) -> usize {
        self.updated + self.skipped + self.errors
    }
}

/// Run the patch command over every `.html` file under `dirs`.
pub fn run_patch(config: &RulebookConfig, dirs: &[PathBuf]) -> Result<PatchSummary> {
    let block = MINIMAL_HTML.render(&MinimalVars {
        site_base: config.site.base(),
    });

    let files: Vec<PathBuf> = dirs
        .iter()
        .flat_map(|dir| {
            if !dir.is_dir() {
                log!("patch"; "not a directory, skipping: {}", dir.display());
            }
            collect_files_with_ext(dir, "html")
        })
        .collect();
    log!("patch"; "found {} HTML files to process", files.len());

    let mut summary = PatchSummary::default();
    for file in &files {
        match patch_file(file, &block) {
            Ok(PatchOutcome::Updated) => {
                log!("patch"; "{} updated: {}", "✓".green(), file.display());
                summary.updated += 1;
            }
            Ok(PatchOutcome::Skipped) => {
                log!("patch"; "- skipped (already updated): {}", file.display());
                summary.skipped += 1;
            }
            Ok(PatchOutcome::NoBody) => {
                log!("patch"; "{} error: {} - no </body>", "✗".red(), file.display());
                summary.errors += 1;
            }
            Err(e) => {
                log!("patch"; "{} error: {} - {:#}", "✗".red(), file.display(), e);
                summary.errors += 1;
            }
        }
    }

    log!(
        "patch";
        "updated {}, skipped {}, errors {}, total {}",
        summary.updated,
        summary.skipped,
        summary.errors,
        summary.total()
    );
    Ok(summary)
}

/// Patch one file in place.
fn patch_file(path: &Path, block: &str) -> Result<PatchOutcome> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let Some(patched) = insert_minimal(&content, block) else {
        return Ok(if content.contains(MINIMAL_MARKER) {
            PatchOutcome::Skipped
        } else {
            PatchOutcome::NoBody
        });
    };

    fs::write(path, patched).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(PatchOutcome::Updated)
}

/// Page text with `block` inserted before the last `</body>`.
///
/// Lands at the start of the `</body>` line when only indentation precedes
/// the tag, keeping that indentation intact. `None` when the page already has
/// minimal mode or has no `</body>`.
pub fn insert_minimal(content: &str, block: &str) -> Option<String> {
    if content.contains(MINIMAL_MARKER) {
        return None;
    }
    let tag = content.rfind(BODY_CLOSE)?;
    let line_start = content[..tag].rfind('\n').map_or(0, |i| i + 1);

    let mut patched = String::with_capacity(content.len() + block.len() + 1);
    if content[line_start..tag].trim().is_empty() {
        patched.push_str(&content[..line_start]);
        patched.push_str(block);
        patched.push_str(&content[line_start..]);
    } else {
        patched.push_str(&content[..tag]);
        patched.push('\n');
        patched.push_str(block);
        patched.push_str(&content[tag..]);
    }
    Some(patched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BLOCK: &str = "    <style>body.minimal-mode {}</style>\n";

    #[test]
    fn test_insert_before_indented_body_close() {
        let page = "<html>\n  <body>\n    <p>x</p>\n  </body>\n</html>\n";
        let patched = insert_minimal(page, BLOCK).unwrap();
        assert_eq!(
            patched,
            "<html>\n  <body>\n    <p>x</p>\n    <style>body.minimal-mode {}</style>\n  </body>\n</html>\n"
        );
    }

    #[test]
    fn test_insert_inline_body_close() {
        let patched = insert_minimal("<body><p>x</p></body>", BLOCK).unwrap();
        assert_eq!(
            patched,
            "<body><p>x</p>\n    <style>body.minimal-mode {}</style>\n</body>"
        );
    }

    #[test]
    fn test_insert_uses_last_body_close() {
        let page = "<body><pre>&lt;/body&gt; </body> as text</pre>\n</body>\n";
        let patched = insert_minimal(page, BLOCK).unwrap();
        assert!(patched.ends_with("as text</pre>\n    <style>body.minimal-mode {}</style>\n</body>\n"));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let once = insert_minimal("<body>\n</body>\n", BLOCK).unwrap();
        assert_eq!(insert_minimal(&once, BLOCK), None);
    }

    #[test]
    fn test_no_body_close() {
        assert_eq!(insert_minimal("<div>fragment</div>", BLOCK), None);
    }

    #[test]
    fn test_run_patch_counts() {
        let dir = TempDir::new().unwrap();
        let unit = dir.path().join("unit");
        fs::create_dir_all(&unit).unwrap();
        fs::write(unit.join("a.html"), "<html>\n  <body>\n  </body>\n</html>\n").unwrap();
        fs::write(unit.join("b.html"), "<body>body.minimal-mode</body>").unwrap();
        fs::write(unit.join("c.html"), "<div></div>").unwrap();
        fs::write(unit.join("notes.txt"), "</body>").unwrap();

        let config = RulebookConfig::default();
        let summary = run_patch(&config, &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(
            summary,
            PatchSummary {
                updated: 1,
                skipped: 1,
                errors: 1
            }
        );

        let a = fs::read_to_string(unit.join("a.html")).unwrap();
        assert!(a.contains(MINIMAL_MARKER));
        assert!(a.contains("a[href^=\"https://tow.whfb.app\"]"));
        assert!(a.ends_with("</script>\n  </body>\n</html>\n"));
        assert_eq!(fs::read_to_string(unit.join("notes.txt")).unwrap(), "</body>");

        let again = run_patch(&config, &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(again.updated, 0);
        assert_eq!(again.skipped, 2);
    }
}
