//! Typed model of fetched rules entries.
//!
//! - [`node`]: rich-text document tree
//! - [`entry`]: entries, field values, references
//! - [`stats`]: unit stat rows
//! - [`parse`]: wire JSON → model
//! - [`edit`]: single-field stat edits

pub mod edit;
pub mod entry;
pub mod node;
pub mod parse;
pub mod stats;

pub use entry::{ContentKind, Entry, EntryRef, FieldValue, Fields};
pub use node::Node;
pub use stats::{STAT_COLUMNS, StatRow};
