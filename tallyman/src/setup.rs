//! Interactive first-run setup: choose which directories to exclude and
//! which to designate as spec directories.
//!
//! This is a plain numbered-list prompt on [`console::Term`]. Gitignored
//! directories are shown for context but cannot be toggled; excluding a
//! directory clears any spec designation it had. Saved sets are cleaned
//! of redundant descendants before being returned.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use console::{Style, Term};
use tallymanlib::{clean_exclusions, IgnoreMatcher, SPEC_DIR_NAMES};

struct DirRow {
    /// Root-relative path, forward slashes
    rel: String,
    name: String,
    depth: usize,
    gitignored: bool,
}

/// Run the setup screen.
///
/// Returns the finalized `(excluded_dirs, spec_dirs)` pair, or None if
/// the user cancelled (including EOF on stdin).
pub fn run_setup(
    root: &Path,
    matcher: &IgnoreMatcher,
    existing_excluded: &BTreeSet<String>,
    existing_specs: &BTreeSet<String>,
) -> io::Result<Option<(BTreeSet<String>, BTreeSet<String>)>> {
    let mut rows = Vec::new();
    collect_dirs(root, "", 0, matcher, &mut rows);

    let mut excluded = existing_excluded.clone();
    let mut specs = existing_specs.clone();
    let term = Term::stdout();

    let bold = Style::new().bold();
    println!(
        "{} {}",
        bold.apply_to("Setup Tallyman for"),
        root.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    );
    println!("Commands: x N = toggle exclude, s N = toggle spec, enter = save & run, q = cancel");

    loop {
        println!();
        if rows.is_empty() {
            println!("  (no subdirectories)");
        }
        for (i, row) in rows.iter().enumerate() {
            println!("  {:>3}  {}{}", i + 1, "  ".repeat(row.depth), row_label(row, &excluded, &specs));
        }
        print!("> ");
        let _ = io::Write::flush(&mut io::stdout());

        let line = match term.read_line() {
            Ok(line) => line,
            // EOF or closed stdin counts as a cancel, not an error.
            Err(_) => return Ok(None),
        };
        let input = line.trim();

        if input.is_empty() {
            return Ok(Some((clean_exclusions(&excluded), clean_exclusions(&specs))));
        }
        if input.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        let Some((command, number)) = parse_command(input, rows.len()) else {
            println!("Unrecognized command: {input}");
            continue;
        };
        let row = &rows[number - 1];
        if row.gitignored {
            println!("{} is gitignored and cannot be toggled", row.rel);
            continue;
        }
        match command {
            'x' => {
                if excluded.contains(&row.rel) {
                    excluded.remove(&row.rel);
                } else {
                    excluded.insert(row.rel.clone());
                    specs.remove(&row.rel);
                }
            }
            's' => {
                if has_ancestor_or_self(&excluded, &row.rel) {
                    println!("{} is excluded; un-exclude it first", row.rel);
                } else if specs.contains(&row.rel) {
                    specs.remove(&row.rel);
                } else {
                    specs.insert(row.rel.clone());
                }
            }
            _ => unreachable!(),
        }
    }
}

fn parse_command(input: &str, row_count: usize) -> Option<(char, usize)> {
    let mut parts = input.split_whitespace();
    let command = parts.next()?;
    let number: usize = parts.next()?.parse().ok()?;
    if parts.next().is_some() || number == 0 || number > row_count {
        return None;
    }
    match command {
        "x" | "X" => Some(('x', number)),
        "s" | "S" => Some(('s', number)),
        _ => None,
    }
}

fn row_label(row: &DirRow, excluded: &BTreeSet<String>, specs: &BTreeSet<String>) -> String {
    let dim = Style::new().dim();
    if row.gitignored {
        return dim.apply_to(format!("{} (gitignored)", row.name)).to_string();
    }
    if has_ancestor_or_self(excluded, &row.rel) {
        return format!(
            "{} {}",
            Style::new().red().apply_to("✗"),
            dim.apply_to(&row.name)
        );
    }
    let auto = is_auto_spec(&row.rel);
    if auto || has_ancestor_or_self(specs, &row.rel) {
        let marker = Style::new().cyan().apply_to("S");
        if auto {
            return format!("{marker} {}", dim.apply_to(format!("{} (specs)", row.name)));
        }
        return format!("{marker} {}", row.name);
    }
    format!("{} {}", Style::new().green().apply_to("✓"), row.name)
}

fn has_ancestor_or_self(set: &BTreeSet<String>, rel: &str) -> bool {
    set.iter().any(|kept| {
        rel == kept || (rel.starts_with(kept.as_str()) && rel[kept.len()..].starts_with('/'))
    })
}

fn is_auto_spec(rel: &str) -> bool {
    rel.split('/')
        .any(|segment| SPEC_DIR_NAMES.contains(&segment.to_lowercase().as_str()))
}

/// Recursively list subdirectories, sorted case-insensitively. Hidden
/// directories are skipped; gitignored directories are listed but not
/// descended into.
fn collect_dirs(
    dir: &Path,
    rel: &str,
    depth: usize,
    matcher: &IgnoreMatcher,
    rows: &mut Vec<DirRow>,
) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut subdirs: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .collect();
    subdirs.sort_by_key(|name| name.to_lowercase());

    for name in subdirs {
        let child_dir = dir.join(&name);
        let child_rel = if rel.is_empty() {
            name.clone()
        } else {
            format!("{rel}/{name}")
        };
        let gitignored = matcher.is_ignored(&child_rel, true);
        rows.push(DirRow {
            rel: child_rel.clone(),
            name,
            depth,
            gitignored,
        });
        if !gitignored {
            collect_dirs(&child_dir, &child_rel, depth + 1, matcher, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("x 3", 5), Some(('x', 3)));
        assert_eq!(parse_command("S 1", 5), Some(('s', 1)));
        assert_eq!(parse_command("x 0", 5), None);
        assert_eq!(parse_command("x 6", 5), None);
        assert_eq!(parse_command("y 2", 5), None);
        assert_eq!(parse_command("x", 5), None);
        assert_eq!(parse_command("x 2 3", 5), None);
    }

    #[test]
    fn test_has_ancestor_or_self() {
        let set: BTreeSet<String> = ["vendor".to_string()].into();
        assert!(has_ancestor_or_self(&set, "vendor"));
        assert!(has_ancestor_or_self(&set, "vendor/sub"));
        assert!(!has_ancestor_or_self(&set, "vendor2"));
    }

    #[test]
    fn test_is_auto_spec() {
        assert!(is_auto_spec("specs"));
        assert!(is_auto_spec("docs/Plans"));
        assert!(is_auto_spec("specs/api"));
        assert!(!is_auto_spec("src"));
    }
}
