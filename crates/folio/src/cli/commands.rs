//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio - media storage with automatic thumbnails
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Store media locally or in S3 with automatic thumbnails", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (replaces ./folio.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file, deriving thumbnails for images
    Upload {
        /// File to upload
        path: PathBuf,

        /// Declared MIME type
        #[arg(long)]
        content_type: Option<String>,

        /// File name to upload as (defaults to the file's own name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Print a link to a stored object
    Link {
        /// Object key, e.g. uploads/<token>.png
        key: String,

        /// Link lifetime in seconds (defaults to media.link_ttl_secs)
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Delete an original and its thumbnails
    Delete {
        /// Key or reference of the original
        key: String,

        /// Key or reference of a thumbnail (repeatable)
        #[arg(long = "thumbnail")]
        thumbnails: Vec<String>,

        /// Delete every thumbnail size derivable from the original key
        #[arg(long, conflicts_with = "thumbnails")]
        all_sizes: bool,
    },

    /// Show which backend was selected
    Backend,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delete_with_thumbnails() {
        let cli = Cli::try_parse_from([
            "folio",
            "delete",
            "uploads/a.png",
            "--thumbnail",
            "thumbnails/thumb_small_a.png",
            "--thumbnail",
            "thumbnails/thumb_large_a.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Delete {
                key,
                thumbnails,
                all_sizes,
            } => {
                assert_eq!(key, "uploads/a.png");
                assert_eq!(thumbnails.len(), 2);
                assert!(!all_sizes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_all_sizes_conflicts_with_thumbnail_list() {
        let result = Cli::try_parse_from([
            "folio",
            "delete",
            "uploads/a.png",
            "--thumbnail",
            "x.png",
            "--all-sizes",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["folio", "link", "uploads/a.txt", "--ttl", "60", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Link { ttl: Some(60), .. }));
    }
}
