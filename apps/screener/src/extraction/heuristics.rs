//! Rule-based fallbacks for fields the token classifier misses.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::entities::NOT_FOUND;

lazy_static! {
    static ref LABELLED_NAME: Regex =
        Regex::new(r"Name[:\-\s]+([A-Z][a-z]+\s+[A-Z][a-z]+)").unwrap();
    static ref CAPITALISED_RUN: Regex =
        Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap();
}

/// Number of leading lines scanned for a bare "Firstname Lastname" header.
const HEADER_LINES: usize = 5;

/// Finds a candidate name: an explicit `Name:` label first, then a run of
/// capitalised words near the top of the document.
pub fn extract_name(text: &str) -> String {
    if let Some(caps) = LABELLED_NAME.captures(text) {
        return caps[1].trim().to_string();
    }

    text.lines()
        .take(HEADER_LINES)
        .find_map(|line| CAPITALISED_RUN.find(line))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// All distinct email addresses in first-seen order, `", "`-joined.
pub fn extract_email(text: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for m in EMAIL.find_iter(text) {
        if !seen.contains(&m.as_str()) {
            seen.push(m.as_str());
        }
    }

    if seen.is_empty() {
        NOT_FOUND.to_string()
    } else {
        seen.join(", ")
    }
}
