//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Incremental build tool for typst-based static sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to root (optional on disk)
    #[arg(short = 'C', long, default_value = "tufted.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Full build: html + pdf + assets + sitemap/robots/rss
    Build {
        /// Clean the output and rebuild everything, ignoring timestamps
        #[arg(short, long)]
        force: bool,
    },

    /// Compile html pages only
    Html {
        /// Recompile every page, ignoring timestamps
        #[arg(short, long)]
        force: bool,
    },

    /// Compile pdf documents only
    Pdf {
        /// Recompile every document, ignoring timestamps
        #[arg(short, long)]
        force: bool,
    },

    /// Copy static assets only
    Assets,

    /// Remove everything inside the output directory
    Clean,

    /// Serve the output directory locally
    Preview {
        /// The port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open the browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

impl Commands {
    /// Force flag of the build-like commands (`false` for the others).
    pub const fn force(&self) -> bool {
        match self {
            Self::Build { force } | Self::Html { force } | Self::Pdf { force } => *force,
            _ => false,
        }
    }
}
