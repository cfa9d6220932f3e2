//! Anchored name/path matchers compiled from raw config patterns.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

/// A pattern anchored at both ends: it matches a candidate only in its
/// entirety, never as a substring.
///
/// A candidate matches when either its base name or its full path satisfies
/// the pattern. Patterns are case-sensitive.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    raw: String,
    regex: Regex,
}

impl CompiledPattern {
    /// Compile a raw config pattern. Invalid syntax is a configuration
    /// error and must be surfaced before any traversal starts.
    pub fn compile(raw: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{raw})$"))
            .with_context(|| format!("invalid pattern `{raw}`"))?;
        Ok(Self {
            raw: raw.to_string(),
            regex,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True when the pattern matches the candidate's base name or its
    /// full path.
    pub fn matches(&self, candidate: &Path) -> bool {
        if let Some(name) = candidate.file_name()
            && self.regex.is_match(&name.to_string_lossy())
        {
            return true;
        }
        self.regex.is_match(&candidate.to_string_lossy())
    }
}

/// Compile every pattern up front so a bad one fails fast, not per-file.
pub fn compile_all(raw: &[String]) -> Result<Vec<CompiledPattern>> {
    raw.iter().map(|s| CompiledPattern::compile(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_base_name_exactly() {
        let p = CompiledPattern::compile(r"\..*").unwrap();
        assert!(p.matches(Path::new("assets/.git")));
        assert!(p.matches(Path::new(".hidden")));
        assert!(!p.matches(Path::new("assets/readme.md")));
    }

    #[test]
    fn anchored_not_substring() {
        let p = CompiledPattern::compile("target").unwrap();
        assert!(p.matches(Path::new("target")));
        assert!(!p.matches(Path::new("retargeted")));
        assert!(!p.matches(Path::new("target2")));
    }

    #[test]
    fn matches_full_path() {
        let p = CompiledPattern::compile("src/generated").unwrap();
        assert!(p.matches(Path::new("src/generated")));
        assert!(!p.matches(Path::new("other/src/generated/x")));
    }

    #[test]
    fn alternation_stays_anchored() {
        let p = CompiledPattern::compile("a|b").unwrap();
        assert!(p.matches(Path::new("a")));
        assert!(p.matches(Path::new("b")));
        assert!(!p.matches(Path::new("ab")));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = CompiledPattern::compile("(").unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn compile_all_reports_first_bad_pattern() {
        let raw = vec![r"\..*".to_string(), "[".to_string()];
        assert!(compile_all(&raw).is_err());
    }
}
