//! Project traversal: one depth-first pass that prunes excluded and
//! gitignored subtrees, identifies languages, and applies spec-directory
//! remapping.

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::{load_config, prefix_config, CONFIG_FILENAME};
use crate::gitignore::IgnoreMatcher;
use crate::languages::{self, Category, Language};

/// Directory names that auto-detect as spec directories (case-insensitive).
pub const SPEC_DIR_NAMES: [&str; 4] = ["specs", "specifications", "plans", "agents"];

const BINARY_SNIFF_LEN: usize = 8192;

/// True if the file appears to be binary: the first 8 KiB contains a NUL
/// byte, or the file cannot be read.
fn is_binary(path: &Path) -> bool {
    let Ok(file) = fs::File::open(path) else {
        return true;
    };
    let mut chunk = Vec::with_capacity(BINARY_SNIFF_LEN);
    if file
        .take(BINARY_SNIFF_LEN as u64)
        .read_to_end(&mut chunk)
        .is_err()
    {
        return true;
    }
    chunk.contains(&0)
}

/// Walk `root` and collect `(file_path, language)` for every countable
/// source file, in traversal order.
///
/// Each call performs one fresh depth-first, top-down traversal:
/// directories are visited before their contents, subdirectories recurse
/// in case-insensitive lexicographic order, and files within a directory
/// are emitted in lexicographic order. Hidden directories, directories in
/// `excluded_dirs`, and gitignore-matched directories are pruned without
/// being descended into. Symlinked directories are never followed.
///
/// Any directory below the root that contains its own `.tally-config.toml`
/// contributes additional exclusions and spec designations for its
/// subtree, unioned with the caller's sets. A config at the root itself is
/// the caller's responsibility and is not re-read here. Malformed nested
/// configs are skipped silently.
///
/// Files of a docs-category language inside an active spec directory are
/// emitted with the spec-reclassified descriptor. Ignore rules win over
/// spec designation.
pub fn walk_project(
    root: &Path,
    excluded_dirs: &BTreeSet<String>,
    matcher: &IgnoreMatcher,
    spec_dirs: &BTreeSet<String>,
) -> Vec<(PathBuf, Language)> {
    let mut state = WalkState {
        matcher,
        excluded: excluded_dirs.clone(),
        spec_roots: spec_dirs.clone(),
        results: Vec::new(),
    };
    state.visit_dir(root, "", false);
    state.results
}

struct WalkState<'a> {
    matcher: &'a IgnoreMatcher,
    excluded: BTreeSet<String>,
    spec_roots: BTreeSet<String>,
    results: Vec<(PathBuf, Language)>,
}

impl WalkState<'_> {
    fn visit_dir(&mut self, dir: &Path, rel: &str, parent_is_spec: bool) {
        // Nested configuration: a config below the root extends the active
        // sets for its subtree, with paths translated to root-relative
        // form. Listing or parse failures contribute nothing.
        if !rel.is_empty() {
            let config_path = dir.join(CONFIG_FILENAME);
            if config_path.is_file() {
                if let Ok(config) = load_config(&config_path) {
                    let translated = prefix_config(config, Path::new(rel));
                    self.excluded.extend(translated.excluded_dirs);
                    self.spec_roots.extend(translated.spec_dirs);
                }
            }
        }

        let dir_is_spec = self.spec_status(dir, rel, parent_is_spec);

        let Ok(entries) = fs::read_dir(dir) else {
            // Unreadable directory: skip the subtree silently.
            return;
        };

        let mut subdirs: Vec<(String, PathBuf)> = Vec::new();
        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };
            if file_type.is_dir() {
                subdirs.push((name, entry.path()));
            } else if file_type.is_file() {
                // Symlinks (including symlinked directories) fall through
                // here and are never followed.
                files.push((name, entry.path()));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        subdirs.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

        for (name, path) in files {
            let file_rel = join_rel(rel, &name);
            if self.matcher.is_ignored(&file_rel, false) {
                continue;
            }
            let Some(language) = languages::identify(&path) else {
                continue;
            };
            if is_binary(&path) {
                continue;
            }
            let mut language = *language;
            if dir_is_spec && language.category == Category::Docs {
                // Only docs languages reach as_spec, so this cannot fail.
                if let Ok(reclassified) = languages::as_spec(&language) {
                    language = reclassified;
                }
            }
            self.results.push((path, language));
        }

        for (name, path) in subdirs {
            if name.starts_with('.') {
                continue;
            }
            let child_rel = join_rel(rel, &name);
            if self.excluded.contains(&child_rel) {
                continue;
            }
            if self.matcher.is_ignored(&child_rel, true) {
                continue;
            }
            self.visit_dir(&path, &child_rel, dir_is_spec);
        }
    }

    /// Spec-directory activation, computed once per directory on first
    /// visit. An active directory is recorded in the accumulated spec set
    /// so deeper cascading matches work without re-deriving ancestry.
    fn spec_status(&mut self, dir: &Path, rel: &str, parent_is_spec: bool) -> bool {
        if rel.is_empty() {
            return false;
        }
        let name_matches = dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| SPEC_DIR_NAMES.contains(&n.to_lowercase().as_str()));
        let active = name_matches || self.spec_roots.contains(rel) || parent_is_spec;
        if active {
            self.spec_roots.insert(rel.to_string());
        }
        active
    }
}

fn join_rel(rel: &str, name: &str) -> String {
    if rel.is_empty() {
        name.to_string()
    } else {
        format!("{rel}/{name}")
    }
}
