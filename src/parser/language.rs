use std::path::Path;

/// Extensions (lower-case, with leading dot) that become graph nodes.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".css", ".scss", ".html", ".py", ".java", ".c", ".cpp", ".h",
    ".json", ".md", ".go", ".rs", ".php",
];

/// Language class of a supported file, which selects its import rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// `.js .jsx .ts .tsx`
    EcmaScript,
    /// `.css .scss`
    Stylesheet,
    /// `.py`
    Python,
    /// Any other supported extension: a node, never any imports.
    Plain,
}

impl Language {
    /// Classify a normalized extension such as `.tsx`. Returns `None` outside the allow-list.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        if !SUPPORTED_EXTENSIONS.contains(&ext) {
            return None;
        }
        Some(match ext {
            ".js" | ".jsx" | ".ts" | ".tsx" => Self::EcmaScript,
            ".css" | ".scss" => Self::Stylesheet,
            ".py" => Self::Python,
            _ => Self::Plain,
        })
    }
}

/// Lower-cased extension with its leading dot, e.g. `Foo.TS` -> `.ts`.
#[must_use]
pub fn normalized_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}
