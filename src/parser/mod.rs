//! Pattern-based import extraction.
//!
//! Each language class owns one alternation pattern; the first non-empty capture group
//! of every match is the raw import string. This is textual matching, not parsing:
//! look-alikes inside comments or string literals are reported too.
use regex::Regex;

pub mod language;

pub use language::{normalized_extension, Language, SUPPORTED_EXTENSIONS};

#[derive(Debug)]
pub struct ImportPatterns {
    pub ecmascript: Regex,
    pub stylesheet: Regex,
    pub python: Regex,
}

impl ImportPatterns {
    /// # Panics
    /// Only if one of the literal patterns below is invalid.
    #[must_use]
    pub fn compile() -> Self {
        // import ... from "x" | import "x" | export ... from "x" | require("x") | import("x")
        let ecmascript = Regex::new(concat!(
            r#"\bimport\s+[\w*{}\s,$]*?\s*from\s*["']([^"'\r\n]+)["']"#,
            r#"|\bimport\s*["']([^"'\r\n]+)["']"#,
            r#"|\bexport\s+[\w*{}\s,$]*?\s*from\s*["']([^"'\r\n]+)["']"#,
            r#"|\brequire\s*\(\s*["']([^"'\r\n]+)["']\s*\)"#,
            r#"|\bimport\s*\(\s*["']([^"'\r\n]+)["']\s*\)"#,
        ))
        .expect("ecmascript import pattern");
        // @import "x" | @import url(x) | url("x") | url(x)
        let stylesheet = Regex::new(concat!(
            r#"@import\s+(?:url\(\s*)?["']([^"'\r\n]+)["']"#,
            r#"|@import\s+url\(\s*([^"'()\s]+)\s*\)"#,
            r#"|\burl\(\s*["']([^"'\r\n]+)["']\s*\)"#,
            r#"|\burl\(\s*([^"'()\s]+)\s*\)"#,
        ))
        .expect("stylesheet import pattern");
        // from x.y import z | import x (first identifier only)
        let python = Regex::new(concat!(
            r"(?m)^[ \t]*from[ \t]+(\.*[\w.]*)[ \t]+import\b",
            r"|^[ \t]*import[ \t]+([A-Za-z_]\w*)",
        ))
        .expect("python import pattern");
        Self { ecmascript, stylesheet, python }
    }

    /// The dispatch table: which pattern, if any, applies to a language class.
    #[must_use]
    pub fn rule_for(&self, language: Language) -> Option<&Regex> {
        match language {
            Language::EcmaScript => Some(&self.ecmascript),
            Language::Stylesheet => Some(&self.stylesheet),
            Language::Python => Some(&self.python),
            Language::Plain => None,
        }
    }
}

impl Default for ImportPatterns {
    fn default() -> Self {
        Self::compile()
    }
}

/// Stateless once built; share one instance across the per-file workers of a scan.
#[derive(Debug, Default)]
pub struct ImportExtractor {
    patterns: ImportPatterns,
}

impl ImportExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: ImportPatterns::compile() }
    }

    /// Raw import targets in source order, duplicates kept.
    #[must_use]
    pub fn extract_imports(&self, content: &str, language: Language) -> Vec<String> {
        let Some(re) = self.patterns.rule_for(language) else {
            return Vec::new();
        };
        re.captures_iter(content)
            .filter_map(|cap| {
                cap.iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str().trim())
                    .find(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect()
    }
}
