//! depgraph-scanner: file-level dependency graphs from source trees
//!
//! Walk a directory, extract import statements with per-language patterns, resolve
//! relative imports to files in the tree, and emit a `{ nodes, links }` graph ready
//! for a visualizer.
//!
//! # Features
//! - Traversal honoring the root `.gitignore`, plus fixed structural exclusions
//!   (dotfiles, `node_modules`, `dist`, `out`, `build`, `target`, `vendor`)
//! - Import extraction for ECMAScript (`.js .jsx .ts .tsx`), stylesheets (`.css .scss`)
//!   and Python; other supported files become nodes without edges
//! - Relative resolution with extension and `index` probing
//! - Parallel per-file processing; file-level failures never abort a scan
//!
//! # Quickstart (Library)
//! ```no_run
//! use depgraph_scanner::graph::Graph;
//!
//! let graph = Graph::scan(std::path::Path::new("/path/to/project")).expect("scan");
//! println!("files: {} links: {}", graph.nodes.len(), graph.links.len());
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! depgraph-scanner scan --path . --json graph.json
//! depgraph-scanner scan --path . --format text --keep-duplicates
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod utils;

pub use errors::ScanError;
pub use graph::{Graph, Link, Node, ScanOptions, ScanReport, Scanner};

/// Scan `root` with default options.
///
/// # Errors
/// Only root-level failures (missing, not a directory, unreadable).
pub fn scan(root: &std::path::Path) -> Result<Graph, ScanError> {
    Graph::scan(root)
}
