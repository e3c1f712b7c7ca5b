//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization and discovery
//!   (`normalize_path`, `expand_path`, `collect_files_with_ext`)

pub mod fs;

pub use fs::{collect_files_with_ext, expand_path, normalize_path};
