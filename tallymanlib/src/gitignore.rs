//! Version-control ignore rules for a traversal root.
//!
//! Patterns are collected from the enclosing git repository (root
//! `.gitignore`, `.git/info/exclude`, and any intermediate `.gitignore`
//! between the repo root and the analysis root) and combined into one
//! matcher. Loading is best-effort: unreadable or malformed files simply
//! contribute no patterns.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Walk up from `start` looking for a directory containing `.git`.
///
/// Returns the git repo root, or None if not inside a git repository.
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = fs::canonicalize(start).ok()?;
    loop {
        if current.join(".git").exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Combined gitignore rules with an optional path prefix for subdirectory
/// matching.
///
/// Patterns are interpreted relative to the repository root. When the
/// analysis root is a subdirectory of the repository, every query is
/// transparently prefixed with the repo-relative offset so callers can
/// keep using paths relative to the analysis root.
pub struct IgnoreMatcher {
    gitignore: Gitignore,
    prefix: PathBuf,
}

impl IgnoreMatcher {
    /// True if the root-relative path is ignored. Pass `is_dir = true`
    /// when querying a directory so directory patterns (`foo/`) match.
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        let full = if self.prefix.as_os_str().is_empty() {
            PathBuf::from(rel_path)
        } else {
            self.prefix.join(rel_path)
        };
        self.gitignore
            .matched_path_or_any_parents(&full, is_dir)
            .is_ignore()
    }
}

/// Load gitignore patterns for an analysis root.
///
/// Inside a git repository this collects, in order:
/// - `<git-root>/.gitignore`
/// - `<git-root>/.git/info/exclude` (patterns apply from the repo root)
/// - any `.gitignore` in directories between the git root and `root`,
///   each scoped to its own directory
///
/// Outside a repository, only `<root>/.gitignore` is consulted.
pub fn load_gitignore(root: &Path) -> IgnoreMatcher {
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

    let Some(git_root) = find_git_root(&root) else {
        let mut builder = GitignoreBuilder::new(&root);
        builder.add(root.join(".gitignore"));
        return IgnoreMatcher {
            gitignore: builder.build().unwrap_or_else(|_| Gitignore::empty()),
            prefix: PathBuf::new(),
        };
    };

    let mut builder = GitignoreBuilder::new(&git_root);
    builder.add(git_root.join(".gitignore"));

    // .git/info/exclude patterns apply relative to the repo root, so add
    // them line by line rather than letting the builder scope them to
    // .git/info/.
    let exclude_file = git_root.join(".git").join("info").join("exclude");
    if let Ok(content) = fs::read_to_string(&exclude_file) {
        for line in content.lines() {
            let _ = builder.add_line(None, line);
        }
    }

    // Intermediate .gitignore files between the git root and the analysis
    // root, including the analysis root's own.
    if let Ok(rel) = root.strip_prefix(&git_root) {
        let mut current = git_root.clone();
        for part in rel.components() {
            current.push(part);
            builder.add(current.join(".gitignore"));
        }
    }

    let prefix = root
        .strip_prefix(&git_root)
        .map(Path::to_path_buf)
        .unwrap_or_default();

    IgnoreMatcher {
        gitignore: builder.build().unwrap_or_else(|_| Gitignore::empty()),
        prefix,
    }
}
