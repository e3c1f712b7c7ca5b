//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::model::ContentKind;

/// Static rules pages for the Old World builder
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: rulebook.toml)
    #[arg(short = 'C', long, global = true, default_value = "rulebook.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fetch one entry and render it to a static page
    #[command(visible_alias = "f")]
    Fetch {
        #[command(flatten)]
        args: FetchArgs,
    },

    /// Add minimal-mode support to existing pages
    #[command(visible_alias = "p")]
    Patch {
        /// Directories scanned recursively for `.html` files
        #[arg(required = true, value_hint = clap::ValueHint::DirPath)]
        dirs: Vec<PathBuf>,
    },
}

/// Fetch command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct FetchArgs {
    /// Entry slug, e.g. `grave-guard`
    pub slug: String,

    /// Content type of the entry
    #[arg(short = 't', long = "type", value_enum, default_value_t = ContentKind::Unit)]
    pub kind: ContentKind,

    /// Output directory (default: `[output]` folder for the type)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub out: Option<PathBuf>,

    /// Build id of the site (auto-detected when omitted)
    #[arg(short, long)]
    pub build: Option<String>,

    /// Registry file (default: `[registry] path`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub rules_map: Option<PathBuf>,

    /// Print the raw fields and exit without writing anything
    #[arg(long)]
    pub debug: bool,

    /// Skip the interactive stat editor
    #[arg(long)]
    pub no_edit: bool,

    /// Do not touch the registry
    #[arg(long)]
    pub no_registry: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rulebook").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = parse(&["fetch", "grave-guard"]);
        assert_eq!(cli.config, PathBuf::from("rulebook.toml"));
        assert!(!cli.verbose);
        let Commands::Fetch { args } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.slug, "grave-guard");
        assert_eq!(args.kind, ContentKind::Unit);
        assert!(args.out.is_none() && args.build.is_none() && args.rules_map.is_none());
        assert!(!args.debug && !args.no_edit && !args.no_registry);
    }

    #[test]
    fn test_fetch_all_flags() {
        let cli = parse(&[
            "-V", "fetch", "halberd", "-t", "weapons-of-war", "-o", "out", "-b", "B1", "-r",
            "map.js", "--debug", "--no-edit", "--no-registry",
        ]);
        assert!(cli.verbose);
        let Commands::Fetch { args } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.kind, ContentKind::WeaponOfWar);
        assert_eq!(args.out, Some(PathBuf::from("out")));
        assert_eq!(args.build.as_deref(), Some("B1"));
        assert_eq!(args.rules_map, Some(PathBuf::from("map.js")));
        assert!(args.debug && args.no_edit && args.no_registry);
    }

    #[test]
    fn test_type_alias_and_unknown_type() {
        let cli = parse(&["fetch", "ogre-blade", "--type", "magic-items"]);
        let Commands::Fetch { args } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.kind, ContentKind::MagicItem);

        let err = Cli::try_parse_from(["rulebook", "fetch", "x", "-t", "spell"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_patch_requires_dirs() {
        assert!(Cli::try_parse_from(["rulebook", "patch"]).is_err());
        let cli = parse(&["patch", "rules/unit", "rules/special-rules"]);
        let Commands::Patch { dirs } = cli.command else {
            panic!("expected patch");
        };
        assert_eq!(dirs.len(), 2);
    }
}
