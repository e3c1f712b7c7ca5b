//! Entry → HTML.
//!
//! - [`resolve`]: cross-reference URLs
//! - [`rich`]: rich-text markup and link collection
//! - [`profile`]: stat rows, weapon profiles, candidate-field lookup
//! - [`page`]: complete pages per content kind

pub mod page;
pub mod profile;
pub mod resolve;
pub mod rich;

pub use page::PageRenderer;
pub use resolve::Resolver;
pub use rich::RichRenderer;
