use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::parser::Language;

/// Suffixes probed, in order, when a relative import does not name a file exactly.
pub const PROBE_SUFFIXES: &[&str] =
    &[".ts", ".tsx", ".js", ".jsx", ".css", ".scss", "/index.ts", "/index.js"];

/// Existence check for root-relative, `/`-separated ids.
pub trait FileLookup {
    fn is_file(&self, id: &str) -> bool;
}

/// Looks ids up on disk under a scan root.
#[derive(Debug, Clone)]
pub struct FsLookup {
    root: PathBuf,
}

impl FsLookup {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl FileLookup for FsLookup {
    fn is_file(&self, id: &str) -> bool {
        let mut p = self.root.clone();
        p.extend(id.split('/'));
        p.is_file()
    }
}

impl FileLookup for HashSet<String> {
    fn is_file(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// Outcome of resolving one raw import string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Bare/package import; never probed.
    External,
    /// Relative (or Python) import with no matching file, or one escaping the root.
    Unresolved,
    Resolved(String),
}

impl Resolution {
    #[must_use]
    pub fn target(self) -> Option<String> {
        match self {
            Self::Resolved(t) => Some(t),
            Self::External | Self::Unresolved => None,
        }
    }
}

pub struct PathResolver<L> {
    lookup: L,
}

impl<L: FileLookup> PathResolver<L> {
    #[must_use]
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolve `raw` as imported from the file `from_id` (a root-relative id).
    pub fn resolve(&self, raw: &str, from_id: &str, language: Language) -> Resolution {
        let raw = raw.trim();
        let resolution = match language {
            Language::Python => self.resolve_python(raw),
            _ if !is_relative(raw) => return Resolution::External,
            _ => self.resolve_relative(raw, from_id),
        };
        if resolution == Resolution::Unresolved {
            tracing::debug!(from = from_id, import = raw, "unresolved import");
        }
        resolution
    }

    fn resolve_relative(&self, raw: &str, from_id: &str) -> Resolution {
        let base_dir = from_id.rsplit_once('/').map_or("", |(dir, _)| dir);
        let Some(base) = normalize_join(base_dir, raw) else {
            return Resolution::Unresolved;
        };
        if !base.is_empty() && self.lookup.is_file(&base) {
            return Resolution::Resolved(base);
        }
        PROBE_SUFFIXES
            .iter()
            .filter_map(|suffix| probe_candidate(&base, suffix))
            .find(|cand| self.lookup.is_file(cand))
            .map_or(Resolution::Unresolved, Resolution::Resolved)
    }

    // Dotted module anchored at the scan root; leading dots are dropped.
    fn resolve_python(&self, raw: &str) -> Resolution {
        let module = raw.trim_start_matches('.');
        if module.is_empty() || module.split('.').any(str::is_empty) {
            return Resolution::Unresolved;
        }
        let candidate = format!("{}.py", module.replace('.', "/"));
        if self.lookup.is_file(&candidate) {
            Resolution::Resolved(candidate)
        } else {
            Resolution::Unresolved
        }
    }
}

/// A relative reference starts with a `.` or `..` segment; `.env` is a bare name.
fn is_relative(raw: &str) -> bool {
    raw == "." || raw == ".." || raw.starts_with("./") || raw.starts_with("../")
}

fn probe_candidate(base: &str, suffix: &str) -> Option<String> {
    match (base.is_empty(), suffix.strip_prefix('/')) {
        (true, Some(index)) => Some(index.to_string()),
        (true, None) => None,
        (false, _) => Some(format!("{base}{suffix}")),
    }
}

/// Lexically join `rel` onto the root-relative directory `base_dir`.
/// Returns `None` if the result would climb above the root.
#[must_use]
pub fn normalize_join(base_dir: &str, rel: &str) -> Option<String> {
    let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for seg in rel.split(['/', '\\']) {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s => parts.push(s),
        }
    }
    Some(parts.join("/"))
}
