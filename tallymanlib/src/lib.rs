//! # tallymanlib
//!
//! A library that classifies every file under a project root by language
//! and line kind (blank, comment, code), then tallies the results into
//! per-language and per-category summaries.
//!
//! ## Overview
//!
//! The pipeline is a single linear pass per invocation:
//!
//! 1. [`gitignore::load_gitignore`] builds the combined ignore matcher for
//!    the enclosing git repository (if any).
//! 2. [`config`] loads the persisted `.tally-config.toml` exclusions and
//!    spec-directory designations.
//! 3. [`walker::walk_project`] performs one depth-first traversal, pruning
//!    excluded/ignored/hidden subtrees, identifying each file's language
//!    via the [`languages`] registry, and remapping docs files inside spec
//!    directories to the specs category.
//! 4. [`counter::count_lines`] classifies each file's lines.
//! 5. [`aggregator::aggregate`] folds everything into a [`TallyResult`].
//!
//! ## Categories
//!
//! Every language belongs to one of five fixed categories: code, design,
//! docs, specs, and data. Directories named `specs`, `specifications`,
//! `plans`, or `agents` (or designated in configuration) reclassify their
//! docs-category files as specs, cascading to subdirectories.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use std::fs;
//! use tallymanlib::{aggregate, count_lines, load_gitignore, walk_project};
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("main.py"), "print('hi')\n\n# done\n").unwrap();
//!
//! let matcher = load_gitignore(dir.path());
//! let files = walk_project(dir.path(), &BTreeSet::new(), &matcher, &BTreeSet::new());
//! let tally = aggregate(
//!     files
//!         .iter()
//!         .map(|(path, language)| (*language, count_lines(path, language))),
//! );
//! assert_eq!(tally.grand_total_lines, 3);
//! ```

pub mod aggregator;
pub mod config;
pub mod counter;
pub mod error;
pub mod gitignore;
pub mod languages;
pub mod walker;

pub use aggregator::{aggregate, language_percentages, CategoryStats, LanguageStats, TallyResult};
pub use config::{
    clean_exclusions, discover_nested_configs, find_config, load_config, save_config, TallyConfig,
    CONFIG_FILENAME,
};
pub use counter::{count_lines, FileCount};
pub use error::TallymanError;
pub use gitignore::{find_git_root, load_gitignore, IgnoreMatcher};
pub use languages::{as_spec, identify, Category, Language, LANGUAGES};
pub use walker::{walk_project, SPEC_DIR_NAMES};

/// Result type for tallymanlib operations
pub type Result<T> = std::result::Result<T, TallymanError>;
