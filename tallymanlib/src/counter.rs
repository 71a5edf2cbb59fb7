//! Line counting and classification.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::languages::Language;

/// Per-file line counts. Invariant: blank + comment + code == total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileCount {
    pub total_lines: u64,
    pub code_lines: u64,
    pub comment_lines: u64,
    pub blank_lines: u64,
}

/// Read a file and classify each line as blank, comment, or code.
///
/// For languages with a comment marker, a line is a comment if the trimmed
/// line starts with that marker. For languages without one, comment_lines
/// stays 0 and only the blank/non-blank distinction is meaningful.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing, and a
/// file that cannot be read at all yields an all-zero record. This is a
/// best-effort report, not a correctness-critical system.
pub fn count_lines(path: &Path, language: &Language) -> FileCount {
    let mut counts = FileCount::default();

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return counts,
    };
    let text = String::from_utf8_lossy(&bytes);

    for line in split_lines(&text) {
        counts.total_lines += 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            counts.blank_lines += 1;
        } else if matches!(language.comment_marker, Some(marker) if trimmed.starts_with(marker)) {
            counts.comment_lines += 1;
        } else {
            counts.code_lines += 1;
        }
    }

    counts
}

/// Split on universal newline conventions (\r\n, \n, and bare \r).
///
/// The final line need not be newline-terminated; a trailing newline does
/// not produce an extra empty line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['\n', '\r'])
        .scan(false, |prev_was_cr, chunk| {
            // A lone "\n" right after a chunk ending in '\r' is the second
            // half of a \r\n pair, not a line of its own.
            let is_crlf_tail = *prev_was_cr && chunk == "\n";
            *prev_was_cr = chunk.ends_with('\r');
            Some((chunk, is_crlf_tail))
        })
        .filter(|(_, is_crlf_tail)| !is_crlf_tail)
        .map(|(chunk, _)| chunk.trim_end_matches(['\n', '\r']))
}
