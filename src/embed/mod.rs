//! Embedded page templates.
//!
//! Templates are compiled in with `include_str!` and filled by plain
//! `__PLACEHOLDER__` replacement through a typed [`TemplateVars`] set.
//!
//! - `page/shell.html` - the document around every generated page
//! - `page/minimal.html` - style + script for `?minimal=true` display mode

use std::marker::PhantomData;

/// A set of values that knows how to fill its template.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template text tied to the variable set that fills it.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _vars: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _vars: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

pub mod page {
    use super::{Template, TemplateVars};

    /// Marker that identifies a page carrying the minimal-mode block.
    pub const MINIMAL_MARKER: &str = "body.minimal-mode";

    /// Variables for the minimal-mode block.
    pub struct MinimalVars<'a> {
        /// Links starting with this prefix keep `minimal=true` when followed.
        pub site_base: &'a str,
    }

    impl TemplateVars for MinimalVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__SITE_BASE__", self.site_base)
        }
    }

    /// Minimal-mode style and script, inserted just before `</body>`.
    pub const MINIMAL_HTML: Template<MinimalVars<'static>> =
        Template::new(include_str!("page/minimal.html"));

    /// Variables for the page shell.
    pub struct ShellVars<'a> {
        /// Already escaped page title.
        pub title: &'a str,
        pub canonical: &'a str,
        pub site_base: &'a str,
        /// Prefix of the mirrored stylesheets and icons.
        pub css_base: &'a str,
        /// Page body markup.
        pub body: &'a str,
    }

    impl TemplateVars for ShellVars<'_> {
        fn apply(&self, content: &str) -> String {
            let minimal = MINIMAL_HTML.render(&MinimalVars {
                site_base: self.site_base,
            });
            // body last: its text must not be touched by later replacements
            content
                .replace("__MINIMAL_MODE__", &minimal)
                .replace("__SITE_BASE__", self.site_base)
                .replace("__CSS_BASE__", self.css_base)
                .replace("__TITLE__", self.title)
                .replace("__CANONICAL__", self.canonical)
                .replace("__BODY__", self.body)
        }
    }

    /// The document around every generated page.
    pub const SHELL_HTML: Template<ShellVars<'static>> =
        Template::new(include_str!("page/shell.html"));
}

#[cfg(test)]
mod tests {
    use super::page::*;

    fn shell(body: &str) -> String {
        SHELL_HTML.render(&ShellVars {
            title: "Halberd",
            canonical: "halberd.html",
            site_base: "https://tow.whfb.app",
            css_base: "/owb/rules",
            body,
        })
    }

    #[test]
    fn test_shell_fills_every_placeholder() {
        let html = shell("<h1>x</h1>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Halberd | Warhammer: The Old World</title>"));
        assert!(html.contains("<link rel=\"canonical\" href=\"halberd.html\">"));
        assert!(html.contains("href=\"/owb/rules/_next/static/css/29367497e701a5f5.css\""));
        assert!(html.contains("href=\"/owb/rules/_next/static/css/0f8fcb57f7477acb.css\""));
        assert!(html.contains("a[href^=\"https://tow.whfb.app\"]"));
        assert!(html.contains(MINIMAL_MARKER));
        assert!(html.contains("\n<h1>x</h1>\n"));
        assert!(!html.contains("__BODY__"));
        assert!(!html.contains("__SITE_BASE__"));
        assert!(!html.contains("__MINIMAL_MODE__"));
        assert!(html.ends_with("  </body>\n</html>\n"));
    }

    #[test]
    fn test_body_is_inserted_verbatim() {
        let html = shell("literal __TITLE__ stays");
        assert!(html.contains("literal __TITLE__ stays"));
    }

    #[test]
    fn test_minimal_block_shape() {
        let block = MINIMAL_HTML.render(&MinimalVars {
            site_base: "https://example.org",
        });
        assert!(block.starts_with("    <style>"));
        assert!(block.ends_with("</script>\n"));
        assert!(block.contains("a[href^=\"https://example.org\"]"));
    }
}
