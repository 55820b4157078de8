//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate reStructuredText API docs for a PHP class library
#[derive(Parser, Debug)]
#[command(name = "classdoc")]
#[command(about = "Generate reStructuredText API docs for a PHP class library")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one API page per class and output language
    Api {
        /// Library root directory (overrides config)
        path: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Namespace of the documented classes
        #[arg(short, long)]
        namespace: Option<String>,

        /// Output language tag (can be repeated)
        #[arg(short, long = "lang")]
        languages: Vec<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load the library and check it without writing anything
    Check {
        /// Library root directory (overrides config)
        path: Option<PathBuf>,

        /// Namespace of the documented classes
        #[arg(short, long)]
        namespace: Option<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build the static documentation site from markdown chapters
    Site {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}
