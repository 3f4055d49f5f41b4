//! Graph model, builder and the scan pipeline.
//!
//! A scan walks the root (`utils::file_walker`), runs the per-file pipeline
//! (stat, read, extract, resolve) for every accepted file, and accumulates the
//! results in a fresh [`GraphBuilder`]. Nothing carries over between scans.
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::{ScanError, SkipReason, SkippedFile};
use crate::parser::ImportExtractor;
use crate::utils::cancel::CancelToken;
use crate::utils::file_walker::{DirectoryWalker, WalkOutcome, WalkedFile};
use crate::utils::ignore_rules::IgnoreMatcher;

pub mod resolver;

use resolver::{FileLookup, FsLookup, PathResolver};

/// Number of leading lines kept in [`Node::preview`].
pub const PREVIEW_LINES: usize = 10;

/// One scanned source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    /// Root-relative, `/`-separated path. Unique within a graph.
    pub id: String,
    pub name: String,
    /// Lower-cased extension with the leading dot, e.g. `.ts`.
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: u64,
    pub preview: String,
}

/// `source` references `target`; both are node ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub source: String,
    pub target: String,
}

impl Link {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }
}

/// Nodes and links of one scan, in discovery order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    /// Scan `root` with default options.
    ///
    /// # Errors
    /// Only root-level failures; see [`Scanner::scan`].
    pub fn scan(root: &Path) -> Result<Self, ScanError> {
        Scanner::default().scan(root)
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Links with an endpoint that is not a node of this graph, e.g. a target
    /// that exists on disk but was excluded from the scan.
    #[must_use]
    pub fn dangling_links(&self) -> Vec<&Link> {
        let ids = self.node_ids();
        self.links
            .iter()
            .filter(|l| !ids.contains(l.source.as_str()) || !ids.contains(l.target.as_str()))
            .collect()
    }

    /// Drop dangling links; returns how many were removed.
    pub fn prune_dangling(&mut self) -> usize {
        let ids: HashSet<String> = self.nodes.iter().map(|n| n.id.clone()).collect();
        let before = self.links.len();
        self.links.retain(|l| ids.contains(&l.source) && ids.contains(&l.target));
        before - self.links.len()
    }

    /// Outgoing link count per node id, for summaries.
    #[must_use]
    pub fn out_degree(&self, id: &str) -> usize {
        self.links.iter().filter(|l| l.source == id).count()
    }

    /// Save the graph as JSON.
    ///
    /// # Errors
    /// Returns `ScanError::Json` if serialization fails or `ScanError::Io` if writing fails.
    pub fn save_json(&self, path: &Path, pretty: bool) -> Result<(), ScanError> {
        let data =
            if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        fs::write(path, data)?;
        Ok(())
    }

    /// Load a graph previously written by [`Graph::save_json`].
    ///
    /// # Errors
    /// Returns `ScanError::Io` if reading fails or `ScanError::Json` if the content is invalid.
    pub fn load_json(path: &Path) -> Result<Self, ScanError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Accumulates one scan's nodes and links.
///
/// With `dedupe` on, a repeated `(source, target)` pair is dropped and the
/// first occurrence keeps its position. Node ids are always unique.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    links: Vec<Link>,
    node_ids: HashSet<String>,
    seen_links: HashSet<Link>,
    dedupe: bool,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(dedupe: bool) -> Self {
        Self { dedupe, ..Self::default() }
    }

    /// Returns `false` if a node with the same id was already added.
    pub fn add_node(&mut self, node: Node) -> bool {
        if !self.node_ids.insert(node.id.clone()) {
            tracing::warn!(id = %node.id, "duplicate node id dropped");
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Returns `false` if the link was dropped as a duplicate.
    pub fn add_link(&mut self, link: Link) -> bool {
        if self.dedupe && !self.seen_links.insert(link.clone()) {
            return false;
        }
        self.links.push(link);
        true
    }

    #[must_use]
    pub fn finish(self) -> Graph {
        Graph { nodes: self.nodes, links: self.links }
    }
}

/// Knobs for a scan. Defaults: honor `.gitignore`, dedupe links, keep dangling links.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub respect_gitignore: bool,
    pub dedupe_links: bool,
    pub prune_dangling: bool,
    /// Worker threads for per-file processing; `None` uses rayon's global pool.
    pub jobs: Option<usize>,
    pub cancel: Option<CancelToken>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            dedupe_links: true,
            prune_dangling: false,
            jobs: None,
            cancel: None,
        }
    }
}

/// A graph plus the entries that were passed over while building it.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub graph: Graph,
    pub skipped: Vec<SkippedFile>,
}

/// Result of the per-file pipeline for one accepted file.
#[derive(Debug)]
pub enum FileOutcome {
    Scanned { node: Node, links: Vec<Link> },
    Skipped(SkippedFile),
}

fn preview_of(content: &str) -> String {
    content.lines().take(PREVIEW_LINES).collect::<Vec<_>>().join("\n")
}

/// Stat, read, extract and resolve one file. Never fails: errors become `Skipped`.
pub fn process_file<L: FileLookup>(
    file: &WalkedFile,
    extractor: &ImportExtractor,
    resolver: &PathResolver<L>,
) -> FileOutcome {
    let skipped = |reason: SkipReason| {
        tracing::warn!(file = %file.path.display(), error = %reason, "skipping file");
        FileOutcome::Skipped(SkippedFile { path: file.path.clone(), reason })
    };
    if let Err(e) = fs::metadata(&file.path) {
        return skipped(SkipReason::Metadata(e));
    }
    let bytes = match fs::read(&file.path) {
        Ok(b) => b,
        Err(e) => return skipped(SkipReason::Read(e)),
    };
    let content = String::from_utf8_lossy(&bytes);

    let links = extractor
        .extract_imports(&content, file.language)
        .iter()
        .filter_map(|raw| resolver.resolve(raw, &file.id, file.language).target())
        .map(|target| Link::new(file.id.clone(), target))
        .collect();

    let node = Node {
        id: file.id.clone(),
        name: file
            .path
            .file_name()
            .map_or_else(|| file.id.clone(), |n| n.to_string_lossy().into_owned()),
        file_type: file.extension.clone(),
        size: bytes.len() as u64,
        preview: preview_of(&content),
    };
    FileOutcome::Scanned { node, links }
}

/// Runs scans with a fixed set of options. Reusable; holds no per-scan state.
#[derive(Debug, Default)]
pub struct Scanner {
    options: ScanOptions,
    extractor: ImportExtractor,
}

impl Scanner {
    #[must_use]
    pub fn new(options: ScanOptions) -> Self {
        Self { options, extractor: ImportExtractor::new() }
    }

    /// Scan `root` into a graph.
    ///
    /// # Errors
    /// Returns `ScanError` if the root is missing, not a directory or unreadable, or
    /// if the scan was cancelled. File-level failures only shrink the graph.
    pub fn scan(&self, root: &Path) -> Result<Graph, ScanError> {
        self.scan_report(root).map(|r| r.graph)
    }

    /// Like [`Scanner::scan`], also returning every skipped entry and why.
    ///
    /// # Errors
    /// Same as [`Scanner::scan`].
    pub fn scan_report(&self, root: &Path) -> Result<ScanReport, ScanError> {
        let matcher = if self.options.respect_gitignore {
            IgnoreMatcher::from_root(root)
        } else {
            IgnoreMatcher::empty()
        };
        let walked = DirectoryWalker::new(root, matcher)
            .with_cancel(self.options.cancel.clone())
            .walk()?;
        tracing::info!(root = %root.display(), files = walked.files.len(), "scanning files");

        if self.options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(ScanError::Cancelled);
        }

        Ok(self.build_report(root, walked))
    }

    // Per-file stage and graph assembly over an already walked tree.
    fn build_report(&self, root: &Path, walked: WalkOutcome) -> ScanReport {
        let resolver = PathResolver::new(FsLookup::new(root));
        let outcomes = self.process_all(&walked.files, &resolver);

        let mut skipped = walked.skipped;
        let mut builder = GraphBuilder::new(self.options.dedupe_links);
        for outcome in outcomes {
            match outcome {
                FileOutcome::Scanned { node, links } => {
                    builder.add_node(node);
                    for link in links {
                        builder.add_link(link);
                    }
                }
                FileOutcome::Skipped(s) => skipped.push(s),
            }
        }
        let mut graph = builder.finish();
        if self.options.prune_dangling {
            let removed = graph.prune_dangling();
            tracing::debug!(removed, "pruned dangling links");
        }
        tracing::info!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            skipped = skipped.len(),
            "scan finished"
        );
        ScanReport { graph, skipped }
    }

    // Indexed parallel collect: output order matches discovery order.
    fn process_all(&self, files: &[WalkedFile], resolver: &PathResolver<FsLookup>) -> Vec<FileOutcome> {
        let run = || {
            files
                .par_iter()
                .map(|f| process_file(f, &self.extractor, resolver))
                .collect::<Vec<_>>()
        };
        match self.options.jobs {
            Some(n) if n > 0 => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    tracing::warn!(error = %e, "worker pool unavailable; using global pool");
                    run()
                }
            },
            _ => run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Language;
    use std::path::PathBuf;

    fn node(id: &str) -> Node {
        Node {
            id: id.into(),
            name: id.rsplit('/').next().unwrap_or(id).into(),
            file_type: ".ts".into(),
            size: 0,
            preview: String::new(),
        }
    }

    #[test]
    fn builder_dedupes_links_in_first_seen_order() {
        let mut b = GraphBuilder::new(true);
        assert!(b.add_node(node("a.ts")));
        assert!(!b.add_node(node("a.ts")));
        assert!(b.add_link(Link::new("a.ts", "b.ts")));
        assert!(b.add_link(Link::new("a.ts", "c.ts")));
        assert!(!b.add_link(Link::new("a.ts", "b.ts")));
        let g = b.finish();
        assert_eq!(g.nodes.len(), 1);
        assert_eq!(g.links, vec![Link::new("a.ts", "b.ts"), Link::new("a.ts", "c.ts")]);
    }

    #[test]
    fn builder_keeps_duplicates_when_asked() {
        let mut b = GraphBuilder::new(false);
        b.add_link(Link::new("a.ts", "b.ts"));
        b.add_link(Link::new("a.ts", "b.ts"));
        assert_eq!(b.finish().links.len(), 2);
    }

    #[test]
    fn dangling_links_are_reported_and_pruned() {
        let mut g = Graph {
            nodes: vec![node("a.ts"), node("b.ts")],
            links: vec![Link::new("a.ts", "b.ts"), Link::new("a.ts", "vendor/x.ts")],
        };
        assert_eq!(g.dangling_links(), vec![&Link::new("a.ts", "vendor/x.ts")]);
        assert_eq!(g.prune_dangling(), 1);
        assert!(g.dangling_links().is_empty());
        assert_eq!(g.out_degree("a.ts"), 1);
    }

    #[test]
    fn preview_keeps_first_ten_lines() {
        let content: String = (1..=50).map(|i| format!("line {i}\n")).collect();
        let expected: Vec<String> = (1..=10).map(|i| format!("line {i}")).collect();
        assert_eq!(preview_of(&content), expected.join("\n"));
        assert_eq!(preview_of("one\ntwo"), "one\ntwo");
        assert_eq!(preview_of(""), "");
    }

    #[test]
    fn vanished_file_is_skipped_not_fatal() {
        let file = WalkedFile {
            path: PathBuf::from("/definitely/not/here/a.ts"),
            id: "a.ts".into(),
            extension: ".ts".into(),
            language: Language::EcmaScript,
        };
        let resolver = PathResolver::new(HashSet::<String>::new());
        match process_file(&file, &ImportExtractor::new(), &resolver) {
            FileOutcome::Skipped(s) => assert!(matches!(s.reason, SkipReason::Metadata(_))),
            FileOutcome::Scanned { .. } => panic!("expected skip"),
        }
    }

    #[test]
    fn report_collects_skips_and_keeps_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.ts"), "import b from './b';\n").unwrap();
        fs::write(root.join("b.ts"), "").unwrap();
        let walked_file = |id: &str| WalkedFile {
            path: root.join(id),
            id: id.into(),
            extension: ".ts".into(),
            language: Language::EcmaScript,
        };
        // gone.ts was listed by the walk but removed before it was read.
        let walked = WalkOutcome {
            files: vec![walked_file("a.ts"), walked_file("gone.ts"), walked_file("b.ts")],
            skipped: vec![SkippedFile {
                path: root.join("locked"),
                reason: SkipReason::Walk("permission denied".into()),
            }],
        };

        let report = Scanner::default().build_report(root, walked);
        let ids: Vec<&str> = report.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a.ts", "b.ts"]);
        assert_eq!(report.graph.links, vec![Link::new("a.ts", "b.ts")]);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(report.skipped[0].reason, SkipReason::Walk(_)));
        assert!(report.skipped[1].path.ends_with("gone.ts"));
        assert!(matches!(report.skipped[1].reason, SkipReason::Metadata(_)));
    }

    #[test]
    fn process_file_builds_node_and_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Main.TS");
        fs::write(&path, "import b from './b';\nimport r from 'react';\n").unwrap();
        let file = WalkedFile {
            path,
            id: "Main.TS".into(),
            extension: ".ts".into(),
            language: Language::EcmaScript,
        };
        let lookup: HashSet<String> = ["b.ts".to_string()].into_iter().collect();
        let FileOutcome::Scanned { node, links } =
            process_file(&file, &ImportExtractor::new(), &PathResolver::new(lookup))
        else {
            panic!("expected scanned file");
        };
        assert_eq!(node.name, "Main.TS");
        assert_eq!(node.file_type, ".ts");
        assert_eq!(node.size, 44);
        assert_eq!(links, vec![Link::new("Main.TS", "b.ts")]);
    }

    #[test]
    fn node_serializes_type_field() {
        let json = serde_json::to_value(node("a.ts")).unwrap();
        assert_eq!(json["type"], ".ts");
        assert!(json.get("file_type").is_none());
    }
}
