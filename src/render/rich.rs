//! Rich text → HTML.
//!
//! Two independent recursive walks over a [`Node`] tree:
//!
//! - [`RichRenderer::render`] produces markup
//! - [`RichRenderer::collect_links`] lists every link in document order
//!
//! Both are total: unknown node kinds pass their children through and raw
//! scalars are escaped as text.

use crate::debug;
use crate::model::{FieldValue, Node};
use crate::utils::html::{escape, escape_attr, wrap};

use super::resolve::{LinkContext, Resolver};

/// Where a rich-text value is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderContext {
    #[default]
    Default,
    /// Inside a unit's equipment list.
    Equipment,
    /// Inside a special-rules list.
    Rules,
    /// Inside a table header or data cell.
    TableCell,
}

impl RenderContext {
    /// Link context handed to the resolver for cross-references.
    pub const fn link_context(self) -> LinkContext {
        match self {
            Self::Equipment => LinkContext::Equipment,
            Self::Rules => LinkContext::Rules,
            Self::Default | Self::TableCell => LinkContext::Auto,
        }
    }
}

// Markup of the site's table component.
const TABLE_OPEN: &str = r#"<table class="generic-table weapon-profile-table css-1hz7skb" data-test-id="cf-ui-table" cellpadding="0" cellspacing="0">"#;
const ROW_OPEN: &str = r#"<tr class="css-1sydf7g" data-test-id="cf-ui-table-row">"#;
const TH_OPEN: &str = r#"<th class="css-9p6xbs" data-test-id="cf-ui-table-cell">"#;
const TD_OPEN: &str = r#"<td class="css-s8xoeu" data-test-id="cf-ui-table-cell">"#;

/// Renders rich text, resolving cross-references through a [`Resolver`].
#[derive(Debug, Clone, Copy)]
pub struct RichRenderer<'a> {
    resolver: &'a Resolver,
}

impl<'a> RichRenderer<'a> {
    pub const fn new(resolver: &'a Resolver) -> Self {
        Self { resolver }
    }

    pub const fn resolver(&self) -> &'a Resolver {
        self.resolver
    }

    /// Render a node tree to markup.
    pub fn render(&self, node: &Node, ctx: RenderContext) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node, ctx);
        out
    }

    /// Render a sequence of sibling nodes.
    pub fn render_all(&self, nodes: &[Node], ctx: RenderContext) -> String {
        let mut out = String::new();
        self.write_all(&mut out, nodes, ctx);
        out
    }

    /// Every hyperlink and cross-reference in document order, as
    /// `(href, label markup)`.
    pub fn collect_links(&self, node: &Node, ctx: RenderContext) -> Vec<(String, String)> {
        let mut links = Vec::new();
        self.collect_into(&mut links, node, ctx);
        links
    }

    /// Body markup for a description or notes field.
    ///
    /// Rich text is rendered; plain text becomes one paragraph; anything else
    /// (absent, links, rows) renders nothing.
    pub fn field_html(&self, value: &FieldValue) -> String {
        if !value.is_present() {
            return String::new();
        }
        match value {
            FieldValue::Rich(node) => self.render(node, RenderContext::Default),
            FieldValue::Text(_) | FieldValue::Number(_) | FieldValue::Bool(_) => value
                .as_scalar()
                .map(|s| wrap("p", &escape(&s)))
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn write_all(&self, out: &mut String, nodes: &[Node], ctx: RenderContext) {
        for node in nodes {
            self.write_node(out, node, ctx);
        }
    }

    fn write_node(&self, out: &mut String, node: &Node, ctx: RenderContext) {
        match node {
            Node::Text { value, marks } => {
                let mut html = escape(value).into_owned();
                // innermost first
                for mark in marks.iter().rev() {
                    html = wrap(mark.tag(), &html);
                }
                out.push_str(&html);
            }
            Node::Scalar(value) => out.push_str(&escape(value)),
            Node::Hyperlink { uri, children } => {
                let label = self.render_all(children, ctx);
                push_anchor(out, &escape_attr(uri), &label);
            }
            // Inline cross-references always route by their own content type.
            Node::EntryLink { target, children } => {
                let href = self.resolver.resolve(target, LinkContext::Auto);
                let label = self.render_all(children, ctx);
                push_anchor(out, &escape_attr(&href), &label);
            }
            Node::Paragraph(children) => {
                if ctx == RenderContext::TableCell
                    && let Some(lines) = text_lines(children)
                {
                    out.push_str(&lines.join("<br>"));
                    return;
                }
                out.push_str("<p>");
                self.write_all(out, children, ctx);
                out.push_str("</p>");
            }
            Node::Heading { level, children } => {
                out.push_str(&format!("<h{level}>"));
                self.write_all(out, children, ctx);
                out.push_str(&format!("</h{level}>"));
            }
            Node::UnorderedList(items) => self.write_list(out, "ul", items, ctx),
            Node::OrderedList(items) => self.write_list(out, "ol", items, ctx),
            Node::Table(rows) => {
                out.push_str(TABLE_OPEN);
                self.write_all(out, rows, ctx);
                out.push_str("</table>");
            }
            Node::TableRow(cells) => {
                out.push_str(ROW_OPEN);
                self.write_all(out, cells, ctx);
                out.push_str("</tr>");
            }
            Node::TableHeaderCell(children) => {
                out.push_str(TH_OPEN);
                self.write_all(out, children, RenderContext::TableCell);
                out.push_str("</th>");
            }
            Node::TableCell(children) => {
                out.push_str(TD_OPEN);
                self.write_all(out, children, RenderContext::TableCell);
                out.push_str("</td>");
            }
            // Profiles are lifted out by the page renderer, never shown inline.
            Node::Embedded(_) => {}
            Node::Document(children) | Node::ListItem(children) => {
                self.write_all(out, children, ctx);
            }
            Node::Other { children, .. } => {
                debug!("render"; "unknown node `{}`, keeping its children", node.kind_name());
                self.write_all(out, children, ctx);
            }
        }
    }

    fn write_list(&self, out: &mut String, tag: &str, items: &[Node], ctx: RenderContext) {
        out.push_str(&format!("<{tag}>"));
        for item in items {
            out.push_str("<li>");
            self.write_node(out, item, ctx);
            out.push_str("</li>");
        }
        out.push_str(&format!("</{tag}>"));
    }

    fn collect_into(&self, links: &mut Vec<(String, String)>, node: &Node, ctx: RenderContext) {
        match node {
            Node::Hyperlink { uri, children } => {
                links.push((escape_attr(uri).into_owned(), self.render_all(children, ctx)));
            }
            Node::EntryLink { target, children } => {
                let href = self.resolver.resolve(target, ctx.link_context());
                links.push((escape_attr(&href).into_owned(), self.render_all(children, ctx)));
            }
            _ => {
                for child in node.children() {
                    self.collect_into(links, child, ctx);
                }
            }
        }
    }
}

/// Escaped values when a paragraph holds more than one text leaf and nothing else.
fn text_lines(children: &[Node]) -> Option<Vec<String>> {
    if children.len() < 2 {
        return None;
    }
    children
        .iter()
        .map(|c| c.as_text().map(|t| escape(t).into_owned()))
        .collect()
}

fn push_anchor(out: &mut String, href: &str, label: &str) {
    out.push_str("<a href=\"");
    out.push_str(href);
    out.push_str("\">");
    out.push_str(label);
    out.push_str("</a>");
}
