use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "depgraph-scanner",
    version,
    about = "Scan a source tree into a file dependency graph",
    long_about = "Walk a directory, extract import statements from JS/TS, CSS/SCSS and Python files, resolve relative imports to files in the tree, and emit a node/link graph. The root .gitignore is honored unless --no-ignore is given; dotfiles and node_modules/dist/out/build/target/vendor are always skipped."
)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and print or save its dependency graph
    Scan {
        /// Scan root
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Path to a TOML configuration file (default: <path>/depgraph-scanner.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the graph as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
        /// Stdout format (default from config, else text)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Do not apply the root .gitignore
        #[arg(long, default_value_t = false)]
        no_ignore: bool,
        /// Emit one link per resolved import instead of one per (source, target) pair
        #[arg(long, default_value_t = false)]
        keep_duplicates: bool,
        /// Drop links whose target is not a scanned node
        #[arg(long, default_value_t = false)]
        prune_dangling: bool,
        /// Worker threads for per-file processing
        #[arg(long, env = "DEPGRAPH_SCANNER_JOBS")]
        jobs: Option<usize>,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
