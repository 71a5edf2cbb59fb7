//! Persisted user configuration: excluded directories and spec directories.
//!
//! One `.tally-config.toml` per configured directory, with two optional
//! sections:
//!
//! ```toml
//! [exclude]
//! directories = ["vendor", "static/external"]
//!
//! [specs]
//! directories = ["docs/arch"]
//! ```
//!
//! Paths are root-relative. An absent section means an empty set. Saved
//! lists are written in sorted order, so save/load round-trips exactly.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::TallymanError;
use crate::Result;

/// Name of the per-directory configuration file.
pub const CONFIG_FILENAME: &str = ".tally-config.toml";

/// Loaded configuration for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallyConfig {
    /// Root-relative directory paths to skip entirely
    pub excluded_dirs: BTreeSet<String>,
    /// Root-relative directory paths whose docs files count as specs
    pub spec_dirs: BTreeSet<String>,
}

impl TallyConfig {
    /// Union another config into this one.
    pub fn merge(&mut self, other: TallyConfig) {
        self.excluded_dirs.extend(other.excluded_dirs);
        self.spec_dirs.extend(other.spec_dirs);
    }
}

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude: Option<DirectoryList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    specs: Option<DirectoryList>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DirectoryList {
    directories: Vec<String>,
}

/// Find the nearest enclosing configuration file, walking up from `start`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = fs::canonicalize(start).ok()?;
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load a configuration file.
pub fn load_config(path: &Path) -> Result<TallyConfig> {
    let content = fs::read_to_string(path).map_err(|source| TallymanError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile =
        toml::from_str(&content).map_err(|source| TallymanError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(TallyConfig {
        excluded_dirs: section_to_set(parsed.exclude),
        spec_dirs: section_to_set(parsed.specs),
    })
}

fn section_to_set(section: Option<DirectoryList>) -> BTreeSet<String> {
    section
        .map(|list| list.directories.into_iter().collect())
        .unwrap_or_default()
}

/// Save exclusion and spec sets to a configuration file.
///
/// Directory lists are written sorted; empty sections are omitted.
pub fn save_config(
    path: &Path,
    excluded_dirs: &BTreeSet<String>,
    spec_dirs: &BTreeSet<String>,
) -> Result<()> {
    let document = ConfigFile {
        exclude: set_to_section(excluded_dirs),
        specs: set_to_section(spec_dirs),
    };
    let content = toml::to_string_pretty(&document)?;
    fs::write(path, content).map_err(|source| TallymanError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn set_to_section(set: &BTreeSet<String>) -> Option<DirectoryList> {
    if set.is_empty() {
        None
    } else {
        Some(DirectoryList {
            directories: set.iter().cloned().collect(),
        })
    }
}

/// Discover configuration files in subdirectories of `root` and merge
/// them, translating their paths to root-relative form.
///
/// The root's own configuration file is not included (the caller loads it
/// separately), hidden directories are not searched, and malformed nested
/// configs contribute nothing.
pub fn discover_nested_configs(root: &Path) -> TallyConfig {
    let mut merged = TallyConfig::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with('.'))
                || entry.file_name() == CONFIG_FILENAME
        });

    for entry in walker.flatten() {
        if entry.depth() < 2 || entry.file_name() != CONFIG_FILENAME {
            continue;
        }
        let Some(parent) = entry.path().parent() else {
            continue;
        };
        let Ok(rel) = parent.strip_prefix(root) else {
            continue;
        };
        if let Ok(config) = load_config(entry.path()) {
            merged.merge(prefix_config(config, rel));
        }
    }

    merged
}

/// Translate a nested config's paths by prefixing the config directory's
/// root-relative path.
pub(crate) fn prefix_config(config: TallyConfig, rel: &Path) -> TallyConfig {
    let prefix = rel.to_string_lossy().replace('\\', "/");
    let apply = |set: BTreeSet<String>| -> BTreeSet<String> {
        set.into_iter()
            .map(|path| {
                if prefix.is_empty() {
                    path
                } else {
                    format!("{prefix}/{path}")
                }
            })
            .collect()
    };
    TallyConfig {
        excluded_dirs: apply(config.excluded_dirs),
        spec_dirs: apply(config.spec_dirs),
    }
}

/// Remove entries whose ancestor is already present.
///
/// A path once excluded implicitly excludes all descendants, so
/// `{a, a/b, a/b/c}` cleans to `{a}`. Idempotent.
pub fn clean_exclusions(paths: &BTreeSet<String>) -> BTreeSet<String> {
    let mut cleaned: BTreeSet<String> = BTreeSet::new();
    for path in paths {
        if !cleaned
            .iter()
            .any(|kept| path.starts_with(kept.as_str()) && path[kept.len()..].starts_with('/'))
        {
            cleaned.insert(path.clone());
        }
    }
    cleaned
}
