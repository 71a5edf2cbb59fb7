//! Statistics aggregation: fold per-file counts into per-language and
//! per-category summaries.
//!
//! Grouping is keyed by descriptor identity, not name alone, so the same
//! language name under two categories (Markdown/docs vs Markdown/specs)
//! accumulates into two separate entries.

use serde::Serialize;

use crate::counter::FileCount;
use crate::languages::{Category, Language};

/// Accumulated counts for one language/category pairing.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageStats {
    pub language: Language,
    pub file_count: u64,
    pub total_lines: u64,
    pub code_lines: u64,
    pub comment_lines: u64,
    pub blank_lines: u64,
}

impl LanguageStats {
    fn new(language: Language) -> Self {
        Self {
            language,
            file_count: 0,
            total_lines: 0,
            code_lines: 0,
            comment_lines: 0,
            blank_lines: 0,
        }
    }

    /// Lines excluding blanks, for languages without comment detection.
    pub fn non_blank(&self) -> u64 {
        self.total_lines - self.blank_lines
    }

    /// The line count used for category totals: code lines when the
    /// language supports comment detection, otherwise non-blank lines.
    pub fn effective_lines(&self) -> u64 {
        if self.language.comment_marker.is_some() {
            self.code_lines
        } else {
            self.non_blank()
        }
    }
}

/// Summed totals for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    /// Display name: "Code", "Design", "Docs", "Specs", "Data"
    pub name: &'static str,
    pub total_lines: u64,
    pub effective_lines: u64,
    /// Contributing language names, in descending-total order
    pub languages: Vec<&'static str>,
}

/// The final tally for one traversal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TallyResult {
    /// Sorted by total lines descending; ties keep first-seen order
    pub by_language: Vec<LanguageStats>,
    /// Fixed display order (Code, Design, Docs, Specs, Data); categories
    /// with no contributing files are omitted
    pub by_category: Vec<CategoryStats>,
    pub grand_total_lines: u64,
}

/// Consume per-file results and produce aggregated stats.
pub fn aggregate(file_results: impl IntoIterator<Item = (Language, FileCount)>) -> TallyResult {
    // Vec instead of a map keeps first-seen order for sort stability; the
    // registry is small enough that linear lookup is fine.
    let mut groups: Vec<LanguageStats> = Vec::new();

    for (language, counts) in file_results {
        let index = match groups.iter().position(|s| s.language == language) {
            Some(index) => index,
            None => {
                groups.push(LanguageStats::new(language));
                groups.len() - 1
            }
        };
        let stats = &mut groups[index];
        stats.file_count += 1;
        stats.total_lines += counts.total_lines;
        stats.code_lines += counts.code_lines;
        stats.comment_lines += counts.comment_lines;
        stats.blank_lines += counts.blank_lines;
    }

    groups.sort_by(|a, b| b.total_lines.cmp(&a.total_lines));

    let by_category = build_category_stats(&groups);
    let grand_total_lines = groups.iter().map(|s| s.total_lines).sum();

    TallyResult {
        by_language: groups,
        by_category,
        grand_total_lines,
    }
}

fn build_category_stats(sorted_groups: &[LanguageStats]) -> Vec<CategoryStats> {
    Category::DISPLAY_ORDER
        .iter()
        .filter_map(|&category| {
            let mut total_lines = 0;
            let mut effective_lines = 0;
            let mut languages = Vec::new();
            for stats in sorted_groups.iter().filter(|s| s.language.category == category) {
                total_lines += stats.total_lines;
                effective_lines += stats.effective_lines();
                languages.push(stats.language.name);
            }
            if languages.is_empty() {
                None
            } else {
                Some(CategoryStats {
                    name: category.display_name(),
                    total_lines,
                    effective_lines,
                    languages,
                })
            }
        })
        .collect()
}

/// Per-language shares of the grand total, sorted descending like
/// `by_language`. Empty when the grand total is zero.
pub fn language_percentages(result: &TallyResult) -> Vec<(Language, f64)> {
    if result.grand_total_lines == 0 {
        return Vec::new();
    }
    result
        .by_language
        .iter()
        .map(|s| {
            (
                s.language,
                s.total_lines as f64 / result.grand_total_lines as f64 * 100.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_lang(
        name: &'static str,
        category: Category,
        marker: Option<&'static str>,
    ) -> Language {
        Language {
            name,
            category,
            color: 7,
            comment_marker: marker,
            extensions: &[".x"],
        }
    }

    fn counts(total: u64, code: u64, comment: u64, blank: u64) -> FileCount {
        FileCount {
            total_lines: total,
            code_lines: code,
            comment_lines: comment,
            blank_lines: blank,
        }
    }

    #[test]
    fn test_single_language_accumulates() {
        let py = test_lang("Python", Category::Code, Some("#"));
        let tally = aggregate([
            (py, counts(100, 80, 10, 10)),
            (py, counts(50, 40, 5, 5)),
        ]);

        assert_eq!(tally.by_language.len(), 1);
        let stats = &tally.by_language[0];
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_lines, 150);
        assert_eq!(stats.code_lines, 120);
        assert_eq!(stats.comment_lines, 15);
        assert_eq!(stats.blank_lines, 15);
    }

    #[test]
    fn test_sorted_by_total_descending() {
        let py = test_lang("Python", Category::Code, Some("#"));
        let rs = test_lang("Rust", Category::Code, Some("//"));
        let tally = aggregate([
            (py, counts(50, 40, 5, 5)),
            (rs, counts(200, 180, 10, 10)),
        ]);

        assert_eq!(tally.by_language[0].language.name, "Rust");
        assert_eq!(tally.by_language[1].language.name, "Python");
    }

    #[test]
    fn test_grouping_is_by_name_and_category() {
        let docs = test_lang("Markdown", Category::Docs, None);
        let specs = test_lang("Markdown", Category::Specs, None);
        let tally = aggregate([
            (docs, counts(30, 30, 0, 0)),
            (specs, counts(20, 20, 0, 0)),
            (docs, counts(10, 10, 0, 0)),
        ]);

        assert_eq!(tally.by_language.len(), 2);
        let docs_entry = tally
            .by_language
            .iter()
            .find(|s| s.language.category == Category::Docs)
            .unwrap();
        let specs_entry = tally
            .by_language
            .iter()
            .find(|s| s.language.category == Category::Specs)
            .unwrap();
        assert_eq!(docs_entry.total_lines, 40);
        assert_eq!(specs_entry.total_lines, 20);
        assert_eq!(tally.grand_total_lines, 60);
    }

    #[test]
    fn test_category_display_order() {
        let md_docs = test_lang("Markdown", Category::Docs, None);
        let md_specs = test_lang("Markdown", Category::Specs, None);
        let yaml = test_lang("YAML", Category::Data, Some("#"));
        let tally = aggregate([
            (yaml, counts(5, 5, 0, 0)),
            (md_specs, counts(10, 10, 0, 0)),
            (md_docs, counts(20, 20, 0, 0)),
        ]);

        let names: Vec<&str> = tally.by_category.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Docs", "Specs", "Data"]);
    }

    #[test]
    fn test_empty_categories_omitted() {
        let py = test_lang("Python", Category::Code, Some("#"));
        let tally = aggregate([(py, counts(10, 8, 1, 1))]);

        assert_eq!(tally.by_category.len(), 1);
        assert_eq!(tally.by_category[0].name, "Code");
    }

    #[test]
    fn test_effective_lines_with_comment_marker() {
        let py = test_lang("Python", Category::Code, Some("#"));
        let tally = aggregate([(py, counts(100, 80, 10, 10))]);

        // Code lines only, comments and blanks excluded
        assert_eq!(tally.by_category[0].effective_lines, 80);
    }

    #[test]
    fn test_effective_lines_without_comment_marker() {
        let md = test_lang("Markdown", Category::Docs, None);
        let tally = aggregate([(md, counts(30, 25, 0, 5))]);

        // Total minus blank
        assert_eq!(tally.by_category[0].effective_lines, 25);
    }

    #[test]
    fn test_category_languages_in_descending_order() {
        let py = test_lang("Python", Category::Code, Some("#"));
        let rs = test_lang("Rust", Category::Code, Some("//"));
        let tally = aggregate([
            (py, counts(50, 50, 0, 0)),
            (rs, counts(200, 200, 0, 0)),
        ]);

        assert_eq!(tally.by_category[0].languages, vec!["Rust", "Python"]);
    }

    #[test]
    fn test_empty_input() {
        let tally = aggregate([]);
        assert!(tally.by_language.is_empty());
        assert!(tally.by_category.is_empty());
        assert_eq!(tally.grand_total_lines, 0);
        assert!(language_percentages(&tally).is_empty());
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let py = test_lang("Python", Category::Code, Some("#"));
        let rs = test_lang("Rust", Category::Code, Some("//"));
        let md = test_lang("Markdown", Category::Docs, None);
        let tally = aggregate([
            (py, counts(123, 100, 13, 10)),
            (rs, counts(456, 400, 26, 30)),
            (md, counts(78, 70, 0, 8)),
        ]);

        let sum: f64 = language_percentages(&tally).iter().map(|(_, p)| p).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_end_to_end_scenario() {
        // A root with main.py (2 code, 1 blank), README.md (1 line), and
        // specs/design.md (1 line, reclassified).
        let py = test_lang("Python", Category::Code, Some("#"));
        let md_docs = test_lang("Markdown", Category::Docs, None);
        let md_specs = test_lang("Markdown", Category::Specs, None);
        let tally = aggregate([
            (py, counts(3, 2, 0, 1)),
            (md_docs, counts(1, 1, 0, 0)),
            (md_specs, counts(1, 1, 0, 0)),
        ]);

        let py_stats = tally
            .by_language
            .iter()
            .find(|s| s.language.name == "Python")
            .unwrap();
        assert_eq!(py_stats.total_lines, 3);
        assert_eq!(py_stats.code_lines, 2);
        assert_eq!(py_stats.blank_lines, 1);

        let docs_cat = tally.by_category.iter().find(|c| c.name == "Docs").unwrap();
        let specs_cat = tally.by_category.iter().find(|c| c.name == "Specs").unwrap();
        assert_eq!(docs_cat.effective_lines, 1);
        assert_eq!(specs_cat.effective_lines, 1);

        let docs_pos = tally.by_category.iter().position(|c| c.name == "Docs").unwrap();
        let specs_pos = tally.by_category.iter().position(|c| c.name == "Specs").unwrap();
        assert!(docs_pos < specs_pos);
        assert_eq!(tally.grand_total_lines, 5);
    }
}
