//! Helpdesk date parsing and filename-label helpers.
//!
//! The helpdesk emits US-style timestamps (`1/3/26 9:20 PM`); only the
//! calendar date matters for archiving. The label helpers support the
//! long-term naming convention `<YYYYMMDD>_<NN>_<label>_<ticket_id>.pdf`.

use crate::error::ArchiveError;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// Trailing date-like suffixes on subjects: "4.1.", "12.1.2026", "4.1.26".
static DATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\d{1,2}\.\d{1,2}\.(\d{2,4})?\s*$").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
// Unicode \w keeps accented letters; everything else is unsafe in filenames.
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-]").unwrap());

/// Parse a helpdesk timestamp (`M/D/YY h:mm AM/PM`) to a calendar date.
///
/// The time of day is discarded. There is deliberately no fallback
/// parsing: any other shape is an [`ArchiveError::Format`].
pub fn parse_ticket_date(date_str: &str) -> Result<NaiveDate, ArchiveError> {
    NaiveDateTime::parse_from_str(date_str.trim(), "%m/%d/%y %I:%M %p")
        .map(|dt| dt.date())
        .map_err(|_| ArchiveError::Format(date_str.trim().to_string()))
}

/// Infer a short, filename-safe label from a ticket subject.
///
/// Handles patterns like:
///   "Support - password reset"  -> "password_reset"
///   "Bug report, login issue"   -> "login_issue"
///   "Issue: slow loading"       -> "slow_loading"
///   "Support"                   -> `default_label`
///
/// The right-hand side of the first separator wins only when it still has
/// at most two words after stripping a trailing date; otherwise the left
/// side is used. An empty result falls back to `default_label`.
pub fn infer_label(subject: Option<&str>, default_label: &str) -> String {
    let Some(subject) = subject.map(str::trim).filter(|s| !s.is_empty()) else {
        return default_label.to_string();
    };

    let mut text = subject.to_string();
    for sep in [" - ", ", ", ": "] {
        if let Some((left, right)) = text.split_once(sep) {
            let right_clean = right.trim();
            let right_no_date = DATE_SUFFIX.replace(right_clean, "");
            if !right_no_date.trim().is_empty()
                && right_no_date.split_whitespace().count() <= 2
            {
                text = right_clean.to_string();
            } else {
                text = left.trim().to_string();
            }
            break;
        }
    }

    let text = DATE_SUFFIX.replace(&text, "");
    let text = text.trim().to_lowercase();
    let text = WHITESPACE_RUN.replace_all(&text, "_");
    let text = UNSAFE_CHARS.replace_all(&text, "");
    let text = text.trim_matches(['_', '-']);

    if text.is_empty() {
        default_label.to_string()
    } else {
        text.to_string()
    }
}

/// Next sequential number for `<date_prefix>_<NN>_*.pdf` files in `dir`.
///
/// Returns `max(NN) + 1`, or 1 when the directory is missing or holds no
/// match. Non-numeric `NN` segments are skipped, not fatal.
pub fn next_sequential_number(dir: &Path, date_prefix: &str) -> u32 {
    let Ok(entries) = fs::read_dir(dir) else {
        return 1;
    };

    let prefix = format!("{date_prefix}_");
    let mut max_num = 0u32;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("pdf") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(rest) = stem.strip_prefix(&prefix) else {
            continue;
        };
        let Some((seq, _)) = rest.split_once('_') else {
            continue;
        };
        if let Ok(num) = seq.parse::<u32>() {
            max_num = max_num.max(num);
        }
    }

    max_num + 1
}

/// First file in `dir` matching `*_<ticket_id>.pdf`, if any.
///
/// Entries are sorted so the answer is deterministic across platforms.
pub fn find_existing_archive(dir: &Path, ticket_id: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let suffix = format!("_{ticket_id}.pdf");
    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.ends_with(&suffix))
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}
