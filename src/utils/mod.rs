//! Utility modules shared across commands.

pub mod date;
pub mod html;
pub mod path;
