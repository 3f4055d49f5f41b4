pub mod table {
    /// Column alignment for [`render_aligned`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Align {
        Left,
        Right,
    }

    fn width_of(s: &str) -> usize {
        s.chars().count()
    }

    fn sep(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    fn line(cells: &[&str], widths: &[usize], aligns: &[Align]) -> String {
        let mut s = String::from("|");
        for ((cell, w), align) in cells.iter().zip(widths).zip(aligns) {
            let pad = " ".repeat(w.saturating_sub(width_of(cell)));
            s.push(' ');
            match align {
                Align::Left => {
                    s.push_str(cell);
                    s.push_str(&pad);
                }
                Align::Right => {
                    s.push_str(&pad);
                    s.push_str(cell);
                }
            }
            s.push_str(" |");
        }
        s
    }

    /// Render an ASCII table with every column left-aligned.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        render_aligned(headers, rows, &vec![Align::Left; headers.len()])
    }

    /// Render an ASCII table. Missing cells render empty; `aligns` shorter than
    /// `headers` falls back to left alignment.
    #[must_use]
    pub fn render_aligned(headers: &[&str], rows: &[Vec<String>], aligns: &[Align]) -> String {
        let cols = headers.len();
        let aligns: Vec<Align> =
            (0..cols).map(|c| aligns.get(c).copied().unwrap_or(Align::Left)).collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| width_of(h)).collect();
        for row in rows {
            for (c, w) in widths.iter_mut().enumerate() {
                *w = (*w).max(row.get(c).map_or(0, |cell| width_of(cell)));
            }
        }

        let rule = sep(&widths);
        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&line(headers, &widths, &vec![Align::Left; cols]));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for row in rows {
            let cells: Vec<&str> =
                (0..cols).map(|c| row.get(c).map_or("", String::as_str)).collect();
            out.push_str(&line(&cells, &widths, &aligns));
            out.push('\n');
        }
        out.push_str(&rule);
        out
    }
}

pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::graph::ScanOptions;

    pub const DEFAULT_CONFIG_NAME: &str = "depgraph-scanner.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ScanConfig {
        pub respect_gitignore: Option<bool>,
        pub dedupe_links: Option<bool>,
        pub prune_dangling: Option<bool>,
        pub jobs: Option<usize>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct OutputConfig {
        pub format: Option<String>, // "text" | "json"
        pub pretty: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub scan: Option<ScanConfig>,
        pub output: Option<OutputConfig>,
    }

    impl Config {
        /// Built-in defaults overlaid with whatever `[scan]` sets.
        #[must_use]
        pub fn scan_options(&self) -> ScanOptions {
            let mut opts = ScanOptions::default();
            if let Some(scan) = &self.scan {
                if let Some(v) = scan.respect_gitignore {
                    opts.respect_gitignore = v;
                }
                if let Some(v) = scan.dedupe_links {
                    opts.dedupe_links = v;
                }
                if let Some(v) = scan.prune_dangling {
                    opts.prune_dangling = v;
                }
                if scan.jobs.is_some() {
                    opts.jobs = scan.jobs;
                }
            }
            opts
        }
    }

    fn default_config_path(root: &Path) -> PathBuf {
        root.join(DEFAULT_CONFIG_NAME)
    }

    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = fs::read_to_string(path).ok()?;
        match toml::from_str::<Config>(&data) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(config = %path.display(), error = %e, "ignoring unparsable config");
                None
            }
        }
    }

    #[must_use]
    pub fn load_config_near(root: &Path) -> Option<Config> {
        let p = default_config_path(root);
        if p.is_file() {
            load_config_at(&p)
        } else {
            None
        }
    }
}

pub mod cancel {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Cooperative cancellation flag shared between a host and a running scan.
    #[derive(Debug, Clone, Default)]
    pub struct CancelToken(Arc<AtomicBool>);

    impl CancelToken {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn cancel(&self) {
            self.0.store(true, Ordering::Relaxed);
        }

        #[must_use]
        pub fn is_cancelled(&self) -> bool {
            self.0.load(Ordering::Relaxed)
        }
    }
}

pub mod ignore_rules {
    use ignore::gitignore::{Gitignore, GitignoreBuilder};
    use std::path::{Component, Path};

    pub const GITIGNORE_NAME: &str = ".gitignore";

    /// Directory names skipped wherever they appear, regardless of ignore files.
    pub const DENYLIST: &[&str] = &["node_modules", "dist", "out", "build", "target", "vendor"];

    /// Gitignore rules loaded from the scan root. Pure predicate once built.
    #[derive(Debug, Clone)]
    pub struct IgnoreMatcher {
        gitignore: Gitignore,
    }

    impl Default for IgnoreMatcher {
        fn default() -> Self {
            Self::empty()
        }
    }

    impl IgnoreMatcher {
        /// A matcher with no rules: ignores nothing.
        #[must_use]
        pub fn empty() -> Self {
            Self { gitignore: Gitignore::empty() }
        }

        /// Load `<root>/.gitignore` if present. A missing or unreadable file yields no rules.
        #[must_use]
        pub fn from_root(root: &Path) -> Self {
            let path = root.join(GITIGNORE_NAME);
            if !path.is_file() {
                return Self::empty();
            }
            match std::fs::read(&path) {
                Ok(bytes) => Self::from_content(root, &String::from_utf8_lossy(&bytes)),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "cannot read ignore file; no rules applied");
                    Self::empty()
                }
            }
        }

        /// Build from gitignore text. Lines that fail to compile are dropped individually.
        #[must_use]
        pub fn from_content(root: &Path, content: &str) -> Self {
            let mut builder = GitignoreBuilder::new(root);
            for (idx, raw) in content.lines().enumerate() {
                if let Err(e) = builder.add_line(None, raw) {
                    tracing::debug!(line = idx + 1, error = %e, "skipping invalid ignore pattern");
                }
            }
            match builder.build() {
                Ok(gitignore) => Self { gitignore },
                Err(e) => {
                    tracing::warn!(error = %e, "ignore rules failed to build; no rules applied");
                    Self::empty()
                }
            }
        }

        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.gitignore.is_empty()
        }

        /// Whether a root-relative path is excluded, directly or through an excluded parent.
        /// Absolute paths and paths climbing out of the root never match.
        #[must_use]
        pub fn ignores(&self, relative: &Path, is_dir: bool) -> bool {
            if self.gitignore.is_empty()
                || relative.as_os_str().is_empty()
                || relative
                    .components()
                    .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
            {
                return false;
            }
            self.gitignore.matched_path_or_any_parents(relative, is_dir).is_ignore()
        }

        /// String form of [`IgnoreMatcher::ignores`]; a trailing `/` marks a directory.
        #[must_use]
        pub fn ignores_str(&self, relative: &str) -> bool {
            let is_dir = relative.ends_with('/');
            self.ignores(Path::new(relative.trim_end_matches('/')), is_dir)
        }
    }

    /// Structural rules: dotfiles (except a `.gitignore` file) and denylisted directories.
    #[must_use]
    pub fn structurally_excluded(name: &str, is_dir: bool) -> bool {
        if name.starts_with('.') && !(name == GITIGNORE_NAME && !is_dir) {
            return true;
        }
        is_dir && DENYLIST.contains(&name)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn matcher(content: &str) -> IgnoreMatcher {
            IgnoreMatcher::from_content(Path::new("/proj"), content)
        }

        #[test]
        fn directory_only_pattern_covers_descendants() {
            let m = matcher("build/\n");
            assert!(m.ignores(Path::new("build"), true));
            assert!(m.ignores(Path::new("build/app.js"), false));
            assert!(m.ignores(Path::new("pkg/build/x.ts"), false));
            assert!(!m.ignores(Path::new("build"), false));
        }

        #[test]
        fn anchored_and_negated_patterns() {
            let m = matcher("/gen\n*.log.ts\n!keep.log.ts\n");
            assert!(m.ignores(Path::new("gen/a.ts"), false));
            assert!(!m.ignores(Path::new("src/gen/a.ts"), false));
            assert!(m.ignores(Path::new("src/trace.log.ts"), false));
            assert!(!m.ignores(Path::new("src/keep.log.ts"), false));
        }

        #[test]
        fn malformed_lines_are_dropped_not_fatal() {
            let m = matcher("[unclosed\nsecret.ts\n");
            assert!(m.ignores_str("secret.ts"));
            assert!(!m.ignores_str("open.ts"));
        }

        #[test]
        fn empty_and_outside_paths_never_match() {
            let m = matcher("*\n");
            assert!(!m.ignores(Path::new(""), true));
            assert!(!m.ignores(Path::new("../elsewhere.ts"), false));
            assert!(!m.ignores(Path::new("/abs/file.ts"), false));
            assert!(IgnoreMatcher::empty().is_empty());
            assert!(!IgnoreMatcher::empty().ignores_str("anything.ts"));
        }

        #[test]
        fn structural_rules() {
            assert!(structurally_excluded(".git", true));
            assert!(structurally_excluded(".env", false));
            assert!(!structurally_excluded(".gitignore", false));
            assert!(structurally_excluded(".gitignore", true));
            assert!(structurally_excluded("node_modules", true));
            assert!(!structurally_excluded("node_modules", false));
            assert!(!structurally_excluded("src", true));
        }
    }
}

pub mod file_walker {
    use ignore::{DirEntry, WalkBuilder};
    use std::path::{Component, Path, PathBuf};
    use std::sync::Arc;

    use super::cancel::CancelToken;
    use super::ignore_rules::{structurally_excluded, IgnoreMatcher};
    use crate::errors::{ScanError, SkipReason, SkippedFile};
    use crate::parser::{normalized_extension, Language};

    /// A file accepted by the walk, ready for the per-file pipeline.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct WalkedFile {
        pub path: PathBuf,
        /// Root-relative, `/`-separated.
        pub id: String,
        pub extension: String,
        pub language: Language,
    }

    #[derive(Debug, Default)]
    pub struct WalkOutcome {
        pub files: Vec<WalkedFile>,
        pub skipped: Vec<SkippedFile>,
    }

    /// Convert a path under `root` to its `/`-joined relative id.
    #[must_use]
    pub fn relative_id(root: &Path, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(root).ok()?;
        let mut parts = Vec::new();
        for c in rel.components() {
            match c {
                Component::Normal(os) => parts.push(os.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// Check that `root` is an existing, listable directory.
    ///
    /// # Errors
    /// Returns the matching root-level `ScanError`.
    pub fn validate_root(root: &Path) -> Result<(), ScanError> {
        let meta = std::fs::metadata(root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScanError::RootNotFound { root: root.to_path_buf() }
            } else {
                ScanError::RootUnreadable { root: root.to_path_buf(), source: e }
            }
        })?;
        if !meta.is_dir() {
            return Err(ScanError::NotADirectory { root: root.to_path_buf() });
        }
        std::fs::read_dir(root)
            .map_err(|e| ScanError::RootUnreadable { root: root.to_path_buf(), source: e })?;
        Ok(())
    }

    /// Depth-first traversal in directory-listing order (no re-sorting).
    #[derive(Debug, Clone)]
    pub struct DirectoryWalker {
        root: PathBuf,
        matcher: Arc<IgnoreMatcher>,
        cancel: Option<CancelToken>,
    }

    impl DirectoryWalker {
        #[must_use]
        pub fn new(root: &Path, matcher: IgnoreMatcher) -> Self {
            Self { root: root.to_path_buf(), matcher: Arc::new(matcher), cancel: None }
        }

        #[must_use]
        pub fn with_cancel(mut self, cancel: Option<CancelToken>) -> Self {
            self.cancel = cancel;
            self
        }

        fn cancelled(&self) -> bool {
            self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
        }

        /// Enumerate accepted files. Entry-level failures are collected, not returned.
        ///
        /// # Errors
        /// Root-level failures, or `ScanError::Cancelled` when the token fires mid-walk.
        pub fn walk(&self) -> Result<WalkOutcome, ScanError> {
            validate_root(&self.root)?;
            if self.cancelled() {
                return Err(ScanError::Cancelled);
            }

            let root = self.root.clone();
            let matcher = Arc::clone(&self.matcher);
            let mut builder = WalkBuilder::new(&self.root);
            builder
                .standard_filters(false)
                .follow_links(false)
                .filter_entry(move |entry| entry.depth() == 0 || accept_entry(&root, &matcher, entry));

            let mut out = WalkOutcome::default();
            for result in builder.build() {
                let entry = match result {
                    Ok(entry) => entry,
                    Err(err) => {
                        out.skipped.push(skipped_from_walk_error(&self.root, &err));
                        continue;
                    }
                };
                if entry.depth() == 0 {
                    continue;
                }
                let Some(file_type) = entry.file_type() else { continue };
                if file_type.is_dir() {
                    if self.cancelled() {
                        return Err(ScanError::Cancelled);
                    }
                    continue;
                }
                if !file_type.is_file() {
                    tracing::debug!(path = %entry.path().display(), "skipping non-regular entry");
                    continue;
                }
                let Some(extension) = normalized_extension(entry.path()) else { continue };
                let Some(language) = Language::from_extension(&extension) else { continue };
                let Some(id) = relative_id(&self.root, entry.path()) else { continue };
                out.files.push(WalkedFile { path: entry.into_path(), id, extension, language });
            }
            Ok(out)
        }
    }

    fn accept_entry(root: &Path, matcher: &IgnoreMatcher, entry: &DirEntry) -> bool {
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        let name = entry.file_name().to_string_lossy();
        if structurally_excluded(&name, is_dir) {
            return false;
        }
        match entry.path().strip_prefix(root) {
            Ok(rel) => !matcher.ignores(rel, is_dir),
            Err(_) => true,
        }
    }

    /// Record a traversal error against the path it names, or the root when it names none.
    fn skipped_from_walk_error(root: &Path, err: &ignore::Error) -> SkippedFile {
        let path = error_path(err).unwrap_or(root).to_path_buf();
        tracing::warn!(path = %path.display(), error = %err, "skipping unreadable entry");
        SkippedFile { path, reason: SkipReason::Walk(err.to_string()) }
    }

    fn error_path(err: &ignore::Error) -> Option<&Path> {
        match err {
            ignore::Error::WithPath { path, .. } => Some(path.as_path()),
            ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
                error_path(err)
            }
            ignore::Error::Loop { child, .. } => Some(child.as_path()),
            ignore::Error::Partial(errs) => errs.iter().find_map(error_path),
            _ => None,
        }
    }

}
