//! `@import` resolution.
//!
//! The evaluator asks an [`Importer`] for file contents by path. Which paths
//! are tried, and in what order, is decided by [`candidates`].

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Source of imported files.
pub trait Importer {
    /// Contents of the file at `path`, or `None` if it cannot be read.
    fn read(&self, path: &Path) -> Option<String>;
}

/// Reads imports from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImporter;

impl Importer for FsImporter {
    fn read(&self, path: &Path) -> Option<String> {
        if !path.is_file() {
            return None;
        }
        std::fs::read_to_string(path).ok()
    }
}

/// Serves imports from an in-memory map of path to contents.
///
/// ```
/// use scss::import::{Importer, MemoryImporter};
/// use std::path::Path;
///
/// let importer = MemoryImporter::new().with_file("_vars.scss", "$c: red;");
/// assert!(importer.read(Path::new("./_vars.scss")).is_some());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryImporter {
    files: HashMap<PathBuf, String>,
}

impl MemoryImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files.insert(normalize(path.as_ref()), contents.into());
    }
}

impl Importer for MemoryImporter {
    fn read(&self, path: &Path) -> Option<String> {
        self.files.get(&normalize(path)).cloned()
    }
}

/// Drops `.` components so `./a.scss` and `a.scss` name the same file.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Paths tried for `@import "target"`, in order.
///
/// For each include path (the current directory when there are none) the
/// target is tried as written, then with `.scss`, then as a `_partial.scss`
/// in the same directory.
pub fn candidates(target: &str, include_paths: &[PathBuf]) -> Vec<PathBuf> {
    let target = Path::new(target);
    let dir = target.parent().unwrap_or_else(|| Path::new(""));
    let stem = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut names = vec![target.to_path_buf()];
    if target.extension().is_some_and(|ext| ext == "scss") {
        names.push(dir.join(format!("_{stem}")));
    } else {
        names.push(dir.join(format!("{stem}.scss")));
        names.push(dir.join(format!("_{stem}.scss")));
    }

    let current = [PathBuf::from(".")];
    let roots = if include_paths.is_empty() {
        &current[..]
    } else {
        include_paths
    };

    roots
        .iter()
        .flat_map(|root| names.iter().map(move |name| root.join(name)))
        .collect()
}

/// Finds the first candidate for `target` that `importer` can read.
pub fn resolve(
    target: &str,
    include_paths: &[PathBuf],
    importer: &dyn Importer,
) -> Option<(PathBuf, String)> {
    candidates(target, include_paths).into_iter().find_map(|path| {
        let contents = importer.read(&path)?;
        log::trace!("import {target:?} resolved to {}", path.display());
        Some((normalize(&path), contents))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let paths = candidates("theme/colors", &[PathBuf::from("lib"), PathBuf::from("vendor")]);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("lib/theme/colors"),
                PathBuf::from("lib/theme/colors.scss"),
                PathBuf::from("lib/theme/_colors.scss"),
                PathBuf::from("vendor/theme/colors"),
                PathBuf::from("vendor/theme/colors.scss"),
                PathBuf::from("vendor/theme/_colors.scss"),
            ]
        );
    }

    #[test]
    fn test_candidates_default_to_current_directory() {
        let paths = candidates("base", &[]);
        assert_eq!(paths[0], PathBuf::from("./base"));
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_explicit_extension() {
        let paths = candidates("base.scss", &[]);
        assert_eq!(paths, vec![PathBuf::from("./base.scss"), PathBuf::from("./_base.scss")]);
    }

    #[test]
    fn test_resolve_prefers_earlier_candidates() {
        let importer = MemoryImporter::new()
            .with_file("_base.scss", "partial")
            .with_file("base.scss", "plain");
        let (path, contents) = resolve("base", &[], &importer).unwrap();
        assert_eq!(path, PathBuf::from("base.scss"));
        assert_eq!(contents, "plain");
        assert!(resolve("missing", &[], &importer).is_none());
    }
}
