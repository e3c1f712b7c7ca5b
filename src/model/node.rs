//! Rich-text document tree.
//!
//! The CMS ships rich text as loosely-typed JSON (`nodeType` + `content`).
//! [`Node`] is the closed set of kinds the renderers understand; anything else
//! lands in [`Node::Other`] and keeps its children so rendering can pass
//! through it.

use super::entry::{EntryRef, Fields};

/// Inline style marks carried by a text leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Code,
}

impl Mark {
    /// Nesting order, outermost first: bold wraps everything, code is innermost.
    pub const ORDER: [Mark; 4] = [Mark::Bold, Mark::Italic, Mark::Underline, Mark::Code];

    /// Parse the CMS mark name (`{"type": "bold"}`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "underline" => Some(Self::Underline),
            "code" => Some(Self::Code),
            _ => None,
        }
    }

    /// HTML tag used to render the mark.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
            Self::Code => "code",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Bold => 1,
            Self::Italic => 1 << 1,
            Self::Underline => 1 << 2,
            Self::Code => 1 << 3,
        }
    }
}

/// Set of marks on a text leaf. Source order is not retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marks(u8);

impl Marks {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, mark: Mark) {
        self.0 |= mark.bit();
    }

    pub const fn contains(self, mark: Mark) -> bool {
        self.0 & mark.bit() != 0
    }

    /// Marks present, in application order.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = Mark> {
        Mark::ORDER.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Mark> for Marks {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut marks = Self::empty();
        for mark in iter {
            marks.insert(mark);
        }
        marks
    }
}

/// A sub-entry embedded in rich text (`embedded-entry-block`).
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedEntry {
    /// CMS content type of the embedded record (e.g. `weaponProfile`).
    pub content_type: String,
    pub fields: Fields,
}

/// One node of a rich-text document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Document(Vec<Node>),
    Text { value: String, marks: Marks },
    Paragraph(Vec<Node>),
    Heading { level: u8, children: Vec<Node> },
    Hyperlink { uri: String, children: Vec<Node> },
    EntryLink { target: EntryRef, children: Vec<Node> },
    UnorderedList(Vec<Node>),
    OrderedList(Vec<Node>),
    ListItem(Vec<Node>),
    Table(Vec<Node>),
    TableRow(Vec<Node>),
    TableHeaderCell(Vec<Node>),
    TableCell(Vec<Node>),
    Embedded(Box<EmbeddedEntry>),
    /// Unrecognised `nodeType`; children are kept for pass-through.
    Other { node_type: String, children: Vec<Node> },
    /// A raw scalar found where a node object was expected.
    Scalar(String),
}

impl Node {
    /// Unmarked text leaf.
    #[cfg(test)]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
            marks: Marks::empty(),
        }
    }

    /// Text leaf with marks.
    #[cfg(test)]
    pub fn marked(value: impl Into<String>, marks: &[Mark]) -> Self {
        Self::Text {
            value: value.into(),
            marks: marks.iter().copied().collect(),
        }
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Document(c)
            | Self::Paragraph(c)
            | Self::UnorderedList(c)
            | Self::OrderedList(c)
            | Self::ListItem(c)
            | Self::Table(c)
            | Self::TableRow(c)
            | Self::TableHeaderCell(c)
            | Self::TableCell(c) => c,
            Self::Heading { children, .. }
            | Self::Hyperlink { children, .. }
            | Self::EntryLink { children, .. }
            | Self::Other { children, .. } => children,
            Self::Text { .. } | Self::Embedded(_) | Self::Scalar(_) => &[],
        }
    }

    /// Text value of a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value, .. } => Some(value),
            _ => None,
        }
    }

    /// `nodeType` name, for diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Document(_) => "document",
            Self::Text { .. } => "text",
            Self::Paragraph(_) => "paragraph",
            Self::Heading { .. } => "heading",
            Self::Hyperlink { .. } => "hyperlink",
            Self::EntryLink { .. } => "entry-hyperlink",
            Self::UnorderedList(_) => "unordered-list",
            Self::OrderedList(_) => "ordered-list",
            Self::ListItem(_) => "list-item",
            Self::Table(_) => "table",
            Self::TableRow(_) => "table-row",
            Self::TableHeaderCell(_) => "table-header-cell",
            Self::TableCell(_) => "table-cell",
            Self::Embedded(_) => "embedded-entry-block",
            Self::Other { node_type, .. } => node_type,
            Self::Scalar(_) => "scalar",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_iter_uses_fixed_order() {
        let marks: Marks = [Mark::Code, Mark::Bold].into_iter().collect();
        let order: Vec<_> = marks.iter().collect();
        assert_eq!(order, vec![Mark::Bold, Mark::Code]);
    }

    #[test]
    fn test_marks_insert_is_idempotent() {
        let mut marks = Marks::empty();
        marks.insert(Mark::Italic);
        marks.insert(Mark::Italic);
        assert_eq!(marks.iter().count(), 1);
        assert!(marks.contains(Mark::Italic));
        assert!(!marks.contains(Mark::Bold));
    }

    #[test]
    fn test_mark_from_name() {
        assert_eq!(Mark::from_name("underline"), Some(Mark::Underline));
        assert_eq!(Mark::from_name("superscript"), None);
    }

    #[test]
    fn test_children_of_leaf_is_empty() {
        assert!(Node::text("x").children().is_empty());
        assert!(Node::Scalar("7".into()).children().is_empty());
    }

    #[test]
    fn test_children_of_container() {
        let p = Node::Paragraph(vec![Node::text("a"), Node::text("b")]);
        assert_eq!(p.children().len(), 2);
        assert_eq!(p.kind_name(), "paragraph");
    }
}
