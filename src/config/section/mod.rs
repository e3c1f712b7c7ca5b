//! Configuration section definitions.
//!
//! Each module corresponds to a section in `rulebook.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `site`     | `[site]`       | Upstream site, HTTP settings         |
//! | `output`   | `[output]`     | Output root and per-kind folders     |
//! | `registry` | `[registry]`   | rules-map.js location and URL prefix |
//! | `resolver` | `[resolver]`   | Troop-type ids, extra type tags      |
//! | `log`      | `[log]`        | Log file directory                   |

mod log;
mod output;
mod registry;
mod resolver;
mod site;

pub use log::LogConfig;
pub use output::OutputConfig;
pub use registry::RegistryConfig;
pub use resolver::ResolverConfig;
pub use site::SiteConfig;
