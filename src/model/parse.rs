//! Wire JSON → typed model.
//!
//! The CMS payload is a tree of loosely-typed objects. Parsing never fails:
//! unknown shapes degrade to [`Node::Other`], [`Node::Scalar`] or
//! [`FieldValue::Other`].

use serde_json::{Map, Value};

use super::entry::{ContentKind, Entry, EntryRef, FieldValue, Fields, UNIT_PROFILE};
use super::node::{EmbeddedEntry, Mark, Marks, Node};
use super::stats::StatRow;

/// Build an [`Entry`] from the `fields` object of a fetched record.
pub fn parse_entry(slug: &str, kind: ContentKind, fields: &Map<String, Value>) -> Entry {
    Entry::new(slug, kind, parse_fields(fields))
}

/// Parse every field of a CMS `fields` object.
pub fn parse_fields(fields: &Map<String, Value>) -> Fields {
    fields
        .iter()
        .map(|(k, v)| {
            let value = match k.as_str() {
                UNIT_PROFILE => parse_unit_profile(v),
                _ => parse_field(v),
            };
            (k.clone(), value)
        })
        .collect()
}

/// `unitProfile` is read as stat rows whatever else a row carries; nested
/// values are dropped cell by cell.
fn parse_unit_profile(value: &Value) -> FieldValue {
    match value.as_array() {
        Some(items) if !items.is_empty() && items.iter().all(is_row_object) => {
            FieldValue::Rows(items.iter().map(parse_stat_row).collect())
        }
        _ => parse_field(value),
    }
}

/// Classify one field value.
pub fn parse_field(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => FieldValue::Number(n.clone()),
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Object(obj) if obj.contains_key("nodeType") => FieldValue::Rich(parse_node(value)),
        Value::Object(obj) if obj.contains_key("sys") => FieldValue::Ref(parse_ref(value)),
        Value::Object(_) => FieldValue::Other(value.clone()),
        Value::Array(items) => parse_list(items),
    }
}

fn parse_list(items: &[Value]) -> FieldValue {
    if items.is_empty() {
        return FieldValue::Refs(Vec::new());
    }
    if items.iter().all(is_link) {
        return FieldValue::Refs(items.iter().map(parse_ref).collect());
    }
    if items.iter().all(is_stat_row) {
        return FieldValue::Rows(items.iter().map(parse_stat_row).collect());
    }
    FieldValue::List(items.iter().map(parse_field).collect())
}

fn is_link(value: &Value) -> bool {
    value.as_object().is_some_and(|o| o.contains_key("sys"))
}

/// An object that is neither a link nor rich text.
fn is_row_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| !o.contains_key("sys") && !o.contains_key("nodeType"))
}

/// A flat object of scalars, like `{"Name": "Wight", "M": 4}`.
fn is_stat_row(value: &Value) -> bool {
    is_row_object(value)
        && value
            .as_object()
            .is_some_and(|o| o.values().all(is_scalar))
}

fn is_scalar(value: &Value) -> bool {
    !value.is_object() && !value.is_array()
}

/// Scalar cells of a row object, in upstream order.
fn parse_stat_row(value: &Value) -> StatRow {
    let Some(obj) = value.as_object() else {
        return StatRow::new();
    };
    StatRow::from_pairs(
        obj.iter()
            .filter(|(_, v)| is_scalar(v))
            .map(|(k, v)| (k.clone(), scalar_text(v))),
    )
}

/// Scalar JSON value as text; null becomes the empty string.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// References
// ============================================================================

fn str_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

/// Parse a CMS link object (`{sys: {...}, fields: {...}}`).
pub fn parse_ref(value: &Value) -> EntryRef {
    let content_type = value
        .pointer("/sys/contentType/sys/id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    let rule_type_ids = value
        .pointer("/fields/ruleType")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| str_at(item, "/sys/id").to_owned())
                .filter(|id| !id.is_empty())
                .collect()
        })
        .unwrap_or_default();

    EntryRef {
        id: str_at(value, "/sys/id").to_owned(),
        content_type,
        slug: str_at(value, "/fields/slug").to_owned(),
        name: str_at(value, "/fields/name").to_owned(),
        note: str_at(value, "/fields/note").to_owned(),
        group_name: str_at(value, "/fields/groupName").to_owned(),
        rule_type_ids,
    }
}

// ============================================================================
// Rich text
// ============================================================================

/// Parse a rich-text node. Non-objects become [`Node::Scalar`].
pub fn parse_node(value: &Value) -> Node {
    let Some(obj) = value.as_object() else {
        return Node::Scalar(scalar_text(value));
    };

    let node_type = obj.get("nodeType").and_then(Value::as_str).unwrap_or_default();
    let children = || parse_children(obj);

    match node_type {
        "document" => Node::Document(children()),
        "text" => Node::Text {
            value: obj
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            marks: parse_marks(obj.get("marks")),
        },
        "paragraph" => Node::Paragraph(children()),
        "hyperlink" => Node::Hyperlink {
            uri: str_at(value, "/data/uri").to_owned(),
            children: children(),
        },
        "entry-hyperlink" => Node::EntryLink {
            target: value
                .pointer("/data/target")
                .map(parse_ref)
                .unwrap_or_default(),
            children: children(),
        },
        "unordered-list" => Node::UnorderedList(children()),
        "ordered-list" => Node::OrderedList(children()),
        "list-item" => Node::ListItem(children()),
        "table" => Node::Table(children()),
        "table-row" => Node::TableRow(children()),
        "table-header-cell" => Node::TableHeaderCell(children()),
        "table-cell" => Node::TableCell(children()),
        "embedded-entry-block" | "embedded-entry-inline" => {
            let target = value.pointer("/data/target");
            Node::Embedded(Box::new(EmbeddedEntry {
                content_type: target
                    .map(|t| str_at(t, "/sys/contentType/sys/id"))
                    .unwrap_or_default()
                    .to_owned(),
                fields: target
                    .and_then(|t| t.get("fields"))
                    .and_then(Value::as_object)
                    .map(parse_fields)
                    .unwrap_or_default(),
            }))
        }
        other => match heading_level(other) {
            Some(level) => Node::Heading {
                level,
                children: children(),
            },
            None => Node::Other {
                node_type: other.to_owned(),
                children: children(),
            },
        },
    }
}

fn parse_children(obj: &Map<String, Value>) -> Vec<Node> {
    obj.get("content")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(parse_node).collect())
        .unwrap_or_default()
}

fn parse_marks(marks: Option<&Value>) -> Marks {
    marks
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|m| m.get("type").and_then(Value::as_str))
                .filter_map(Mark::from_name)
                .collect()
        })
        .unwrap_or_default()
}

/// `heading-3` → 3.
fn heading_level(node_type: &str) -> Option<u8> {
    node_type
        .strip_prefix("heading-")
        .and_then(|n| n.parse().ok())
        .filter(|n| (1..=6).contains(n))
}
