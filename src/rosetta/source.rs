//! Reading source files
//!
//! Sources are read whole. With normalization on, runs of empty lines
//! collapse into a single line break and every four-space indent becomes a
//! tab, so indentation reaches the scanner in one shape.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const INDENT: &str = "    ";

#[derive(Debug)]
pub enum SourceError {
    /// The file could not be read
    Io { path: PathBuf, source: std::io::Error },
    /// A sample name outside the curated set
    UnknownSample(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, source } => {
                write!(f, "Cannot read '{}': {}", path.display(), source)
            }
            SourceError::UnknownSample(name) => write!(f, "Sample '{}' is not available", name),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io { source, .. } => Some(source),
            SourceError::UnknownSample(_) => None,
        }
    }
}

/// Read a source file, optionally normalizing it
pub fn load(path: impl AsRef<Path>, normalize_indentation: bool) -> Result<String, SourceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if normalize_indentation {
        Ok(normalize(&text))
    } else {
        Ok(text)
    }
}

/// Collapse blank-line runs and turn four-space indents into tabs
pub fn normalize(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\n' && collapsed.ends_with('\n') {
            continue;
        }
        collapsed.push(ch);
    }
    collapsed.replace(INDENT, "\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_collapses_blank_lines() {
        assert_eq!(normalize("a\n\n\n\nb\n"), "a\nb\n");
    }

    #[test]
    fn test_normalize_converts_indents() {
        assert_eq!(normalize("fn:\n        ret x\n"), "fn:\n\t\tret x\n");
        // partial indents are left alone
        assert_eq!(normalize("  x"), "  x");
    }

    #[test]
    fn test_load_raw_and_normalized() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "public:Bool x\n\n\n    ret x\n").unwrap();

        let raw = load(file.path(), false).unwrap();
        assert_eq!(raw, "public:Bool x\n\n\n    ret x\n");

        let normalized = load(file.path(), true).unwrap();
        assert_eq!(normalized, "public:Bool x\n\tret x\n");
    }

    #[test]
    fn test_missing_file() {
        let err = load("/nonexistent/sample.ros", false).unwrap_err();
        assert!(err.to_string().starts_with("Cannot read '/nonexistent/sample.ros'"));
    }
}
