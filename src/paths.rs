//! Path normalization and root-relative trie keys.
//!
//! This module provides:
//! - Normalization of absolute paths (`.`/`..` resolved, `\` and `/` both
//!   treated as separators, repeated and trailing separators dropped)
//! - [`PathKey`], the project-root-relative key used by the config index
//! - Scope checks that reject paths escaping the project root
//!
//! Everything here is string manipulation; no filesystem I/O.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Token that stands for the project root in rendered keys.
pub const ROOT_TOKEN: &str = "@root";

/// How path segments are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    /// Segments must match exactly (default).
    #[default]
    Sensitive,
    /// Segments are compared after lowercasing.
    Insensitive,
}

impl CaseSensitivity {
    pub fn from_flag(case_sensitive: bool) -> Self {
        if case_sensitive {
            CaseSensitivity::Sensitive
        } else {
            CaseSensitivity::Insensitive
        }
    }

    /// Fold a segment into its comparison form.
    pub fn fold(self, segment: &str) -> String {
        match self {
            CaseSensitivity::Sensitive => segment.to_string(),
            CaseSensitivity::Insensitive => segment.to_lowercase(),
        }
    }

    fn segments_match(self, a: &str, b: &str) -> bool {
        match self {
            CaseSensitivity::Sensitive => a == b,
            CaseSensitivity::Insensitive => a.to_lowercase() == b.to_lowercase(),
        }
    }
}

/// An absolute path split into its drive prefix and normal segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Drive prefix such as `C:`, empty on Unix-style paths.
    prefix: String,
    segments: Vec<String>,
}

impl NormalizedPath {
    /// Normalize an absolute path. Returns `None` for relative paths.
    pub fn parse(path: &Path) -> Option<Self> {
        let raw = path_to_forward_slashes(path);
        let (prefix, rest) = split_prefix(&raw)?;
        let mut normalized = Self {
            prefix: prefix.to_string(),
            segments: Vec::new(),
        };
        normalized.push_relative(rest);
        Some(normalized)
    }

    /// Append a `/`-separated relative tail, resolving `.` and `..`.
    ///
    /// `..` never climbs above the filesystem root. Returns how many of the
    /// original segments survived.
    fn push_relative(&mut self, tail: &str) -> usize {
        let mut kept = self.segments.len();
        for part in tail.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    self.segments.pop();
                    kept = kept.min(self.segments.len());
                }
                name => self.segments.push(name.to_string()),
            }
        }
        kept
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments of `self` below `root`, or `None` if `self` is not inside `root`.
    pub fn strip_root(&self, root: &NormalizedPath, case: CaseSensitivity) -> Option<&[String]> {
        // Drive letters are case-insensitive everywhere.
        if !self.prefix.eq_ignore_ascii_case(&root.prefix) {
            return None;
        }
        if self.segments.len() < root.segments.len() {
            return None;
        }
        let matches = root
            .segments
            .iter()
            .zip(&self.segments)
            .all(|(r, s)| case.segments_match(r, s));
        matches.then(|| &self.segments[root.segments.len()..])
    }

    /// Render with forward slashes.
    pub fn to_slash_string(&self) -> String {
        format!("{}/{}", self.prefix, self.segments.join("/"))
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(self.to_slash_string())
    }
}

/// Split `C:/rest` or `/rest` into `(prefix, rest)`. `None` if not absolute.
fn split_prefix(raw: &str) -> Option<(&str, &str)> {
    if let Some(rest) = raw.strip_prefix('/') {
        return Some(("", rest));
    }
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        if bytes.len() == 2 {
            return Some((raw, ""));
        }
        if bytes[2] == b'/' {
            return Some((&raw[..2], &raw[3..]));
        }
    }
    None
}

/// Normalize an absolute path, failing with `OutOfScope` against `root` otherwise.
fn parse_in_scope(path: &Path, root: &Path) -> ConfigResult<NormalizedPath> {
    NormalizedPath::parse(path).ok_or_else(|| ConfigError::out_of_scope(path, root))
}

/// Normalize an absolute path into its canonical forward-slash form.
pub fn normalize_absolute(path: &Path) -> ConfigResult<PathBuf> {
    NormalizedPath::parse(path)
        .map(|p| p.to_path_buf())
        .ok_or_else(|| ConfigError::out_of_scope(path, "/"))
}

/// Segments of `target` relative to `root`, in their original case.
pub fn relative_segments(
    root: &Path,
    target: &Path,
    case: CaseSensitivity,
) -> ConfigResult<Vec<String>> {
    let root_norm = parse_in_scope(root, root)?;
    let target_norm = parse_in_scope(target, root)?;
    target_norm
        .strip_root(&root_norm, case)
        .map(|s| s.to_vec())
        .ok_or_else(|| ConfigError::out_of_scope(target, root))
}

/// Join a glob pattern onto a directory, producing an absolute forward-slash glob.
///
/// A leading separator in `pattern` does not reset to the filesystem root:
/// `/proj` + `/**/.git` is `/proj/**/.git`. Glob metacharacters in `dir`
/// are escaped, so `/my[1]proj` matches only itself.
pub fn join_pattern(dir: &Path, pattern: &str) -> ConfigResult<String> {
    let mut joined = parse_in_scope(dir, dir)?;
    let literal = joined.push_relative(&pattern.replace('\\', "/"));
    for segment in &mut joined.segments[..literal] {
        *segment = globset::escape(segment);
    }
    Ok(joined.to_slash_string())
}

/// Root-relative key into the config index.
///
/// The project root is the empty key and renders as [`ROOT_TOKEN`].
/// Segments are stored in folded form, so two keys compare equal iff their
/// normalized segments match under the index's case sensitivity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathKey {
    segments: Vec<String>,
}

impl PathKey {
    /// Key for the project root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Key of `target` relative to `root`.
    ///
    /// Fails with `OutOfScope` if `target` is not `root` or a descendant of it.
    pub fn from_paths(root: &Path, target: &Path, case: CaseSensitivity) -> ConfigResult<Self> {
        let segments = relative_segments(root, target, case)?;
        Ok(Self::from_segments(segments, case))
    }

    pub fn from_segments<I, S>(segments: I, case: CaseSensitivity) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: segments.into_iter().map(|s| case.fold(s.as_ref())).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Depth below the project root.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROOT_TOKEN)?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Convert path to string using forward slashes.
fn path_to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(root: &str, target: &str) -> ConfigResult<PathKey> {
        PathKey::from_paths(Path::new(root), Path::new(target), CaseSensitivity::Sensitive)
    }

    #[test]
    fn test_root_maps_to_sentinel() {
        let k = key("/proj", "/proj").unwrap();
        assert!(k.is_root());
        assert_eq!(k.to_string(), "@root");
    }

    #[test]
    fn test_descendant_segments() {
        let k = key("/proj", "/proj/a/b.txt").unwrap();
        assert_eq!(k.segments(), &["a".to_string(), "b.txt".to_string()]);
        assert_eq!(k.to_string(), "@root/a/b.txt");
    }

    #[test]
    fn test_trailing_separator_and_style_ignored() {
        let a = key("/proj/", "/proj/a/b/").unwrap();
        let b = key("/proj", "\\proj\\a\\b").unwrap();
        let c = key("/proj", "/proj//a/./b").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_dot_dot_resolved_within_root() {
        let k = key("/proj", "/proj/a/../b").unwrap();
        assert_eq!(k.to_string(), "@root/b");
    }

    #[test]
    fn test_escape_is_out_of_scope() {
        let err = key("/proj", "/proj/../etc/passwd").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::OutOfScope);
    }

    #[test]
    fn test_sibling_prefix_is_out_of_scope() {
        // "/projects" shares a string prefix with "/proj" but is not inside it
        assert!(key("/proj", "/projects/a").is_err());
    }

    #[test]
    fn test_relative_target_rejected() {
        assert!(key("/proj", "a/b").is_err());
    }

    #[test]
    fn test_case_insensitive_keys() {
        let case = CaseSensitivity::Insensitive;
        let a = PathKey::from_paths(Path::new("/Proj"), Path::new("/proj/Src/Main.rs"), case)
            .unwrap();
        let b = PathKey::from_paths(Path::new("/proj"), Path::new("/PROJ/src/main.RS"), case)
            .unwrap();
        assert_eq!(a, b);
        assert!(key("/Proj", "/proj/src").is_err());
    }

    #[test]
    fn test_relative_segments_keep_case() {
        let segs = relative_segments(
            Path::new("/proj"),
            Path::new("/PROJ/Src"),
            CaseSensitivity::Insensitive,
        )
        .unwrap();
        assert_eq!(segs, vec!["Src".to_string()]);
    }

    #[test]
    fn test_windows_drive_paths() {
        let k = key("C:\\work", "c:/work/app/src").unwrap();
        assert_eq!(k.to_string(), "@root/app/src");
        assert!(key("C:/work", "D:/work/app").is_err());
    }

    #[test]
    fn test_join_pattern() {
        assert_eq!(
            join_pattern(Path::new("/proj"), "/**/.git").unwrap(),
            "/proj/**/.git"
        );
        assert_eq!(
            join_pattern(Path::new("/proj/"), "build/*.o").unwrap(),
            "/proj/build/*.o"
        );
        assert_eq!(
            join_pattern(Path::new("/proj/sub"), "../shared/**").unwrap(),
            "/proj/shared/**"
        );
    }

    #[test]
    fn test_join_pattern_escapes_directory() {
        assert_eq!(
            join_pattern(Path::new("/work/my[1]proj"), "/**/.git").unwrap(),
            "/work/my[[]1[]]proj/**/.git"
        );
        assert_eq!(
            join_pattern(Path::new("/a{b}/c*"), "../*.log").unwrap(),
            "/a[{]b[}]/*.log"
        );
    }

    #[test]
    fn test_normalize_absolute() {
        assert_eq!(
            normalize_absolute(Path::new("/foo/bar/../baz/./qux/")).unwrap(),
            PathBuf::from("/foo/baz/qux")
        );
        assert_eq!(normalize_absolute(Path::new("/")).unwrap(), PathBuf::from("/"));
    }
}
