//! Colored terminal rendering of a tally.

use console::Style;
use tallymanlib::{language_percentages, CategoryStats, TallyResult};

const SECTION_WIDTH: usize = 58;
const BAR_WIDTH: usize = 60;
/// Languages below this share of total lines are grouped as "Other".
const SMALL_LANGUAGE_THRESHOLD: f64 = 2.0;
const OTHER_COLOR: u8 = 244;

/// Render the full report to stdout.
pub fn display_results(result: &TallyResult, directory: &str) {
    let dim = Style::new().dim();
    let bold = Style::new().bold();

    println!("{}", dim.apply_to("─".repeat(SECTION_WIDTH)));
    println!(
        "{} {}",
        bold.apply_to("Tallyman"),
        dim.apply_to(format!("v{} created by Michael Kennedy", env!("CARGO_PKG_VERSION")))
    );
    println!("Report for {directory}");
    println!();

    if result.by_language.is_empty() {
        println!("{}", dim.apply_to("No recognized source files found."));
        return;
    }

    display_languages(result);
    println!("{}", dim.apply_to("─".repeat(SECTION_WIDTH)));
    display_category_totals(result);
    display_percentage_bar(result);
}

/// Build a centered header like: ─────────────  Python  ─────────────
fn language_header(name: &str, color: u8) -> String {
    let label = format!("  {name}  ");
    let remaining = SECTION_WIDTH.saturating_sub(label.chars().count());
    let left = remaining / 2;
    let right = remaining - left;
    let line = format!("{}{label}{}", "─".repeat(left), "─".repeat(right));
    Style::new().color256(color).apply_to(line).to_string()
}

fn display_languages(result: &TallyResult) {
    for stats in &result.by_language {
        let language = &stats.language;
        println!("{}", language_header(language.name, language.color));

        let total = group_digits(stats.total_lines);
        if language.comment_marker.is_some() {
            println!("  {total:>10} lines of code");
            println!(
                "  {:>10} excluding comments and blank lines",
                group_digits(stats.code_lines)
            );
        } else {
            println!("  {total:>10} lines");
            println!(
                "  {:>10} excluding blank lines",
                group_digits(stats.non_blank())
            );
        }
    }
}

fn display_category_totals(result: &TallyResult) {
    let active: Vec<&CategoryStats> = result
        .by_category
        .iter()
        .filter(|c| c.total_lines > 0)
        .collect();
    if active.is_empty() {
        return;
    }

    let bold = Style::new().bold();
    println!("  {}", bold.apply_to("Totals:"));

    let name_width = active
        .iter()
        .map(|c| c.name.len())
        .chain(std::iter::once("Combined".len()))
        .max()
        .unwrap_or(0)
        + 1;

    for category in &active {
        let language_list = if category.languages.len() <= 3 {
            category.languages.join(" + ")
        } else {
            format!("{}, etc", category.languages[..3].join(" + "))
        };
        let padded = format!("{}:", category.name);
        println!(
            "  {padded:<name_width$} {:>10} lines ({language_list})",
            group_digits(category.effective_lines)
        );
    }

    let combined: u64 = active.iter().map(|c| c.effective_lines).sum();
    let combined_line = format!(
        "{:<name_width$} {:>10} lines",
        "Combined:",
        group_digits(combined)
    );
    println!("  {}", bold.apply_to(combined_line));
}

fn display_percentage_bar(result: &TallyResult) {
    if result.grand_total_lines == 0 {
        return;
    }
    println!();

    let percentages = language_percentages(result);

    // Group small languages into "Other"
    let mut segments: Vec<(&str, u8, f64)> = percentages
        .iter()
        .filter(|(_, pct)| *pct >= SMALL_LANGUAGE_THRESHOLD)
        .map(|(language, pct)| (language.name, language.color, *pct))
        .collect();
    let other: f64 = percentages
        .iter()
        .filter(|(_, pct)| *pct < SMALL_LANGUAGE_THRESHOLD)
        .map(|(_, pct)| pct)
        .sum();
    if other > 0.0 {
        segments.push(("Other", OTHER_COLOR, other));
    }

    let mut bar = String::new();
    let mut chars_used = 0usize;
    for (i, (_, color, pct)) in segments.iter().enumerate() {
        let width = if i == segments.len() - 1 {
            BAR_WIDTH.saturating_sub(chars_used)
        } else {
            let wanted = ((pct / 100.0 * BAR_WIDTH as f64).round() as usize).max(1);
            wanted.min(BAR_WIDTH.saturating_sub(chars_used))
        };
        if width > 0 {
            let segment = "█".repeat(width);
            bar.push_str(&Style::new().color256(*color).apply_to(segment).to_string());
            chars_used += width;
        }
    }
    println!("  {bar}");

    let legend = segments
        .iter()
        .map(|(name, color, pct)| {
            format!(
                "{} {:.0}%",
                Style::new().color256(*color).apply_to(name),
                pct
            )
        })
        .collect::<Vec<_>>()
        .join("  ·  ");
    println!("  {legend}");
}

/// Format a number with thousands separators: 1234567 -> "1,234,567".
fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
    }

    #[test]
    fn test_language_header_is_section_width() {
        console::set_colors_enabled(false);
        let header = language_header("Python", 184);
        assert_eq!(header.chars().count(), SECTION_WIDTH);
    }
}
