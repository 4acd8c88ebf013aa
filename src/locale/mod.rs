// src/locale/mod.rs
//
// Pulls a country or state code out of free-text identifier notes such as
// "Passport issued in Hong Kong" or "(CANADA)". Pure over (text, universe).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::code_tables::CodeTable;

/// Short words that collide with two-letter codes and common names.
pub const STOP_WORDS: [&str; 6] = ["id", "in", "is", "on", "no", "and"];

/// Literal label that narrows the search window to what follows it.
pub const ISSUE_LABEL: &str = "country of issue:";

const MAX_WINDOW: usize = 4;

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").unwrap());

/// Best matching code for `text` in `universe`, or `None`.
///
/// Parenthesised content is tried first. Otherwise the notes are tokenised
/// and scanned left to right with windows of up to four tokens ending at the
/// current token; the longest matching window wins at each position.
pub fn resolve(text: &str, universe: &CodeTable) -> Option<String> {
    let normalized = normalize(text);

    if let Some(code) = match_parentheticals(&normalized, universe) {
        return Some(code);
    }

    let tokens = tokenize(search_window(&normalized));
    match tokens.len() {
        0 => None,
        1 => match_single(&tokens[0], universe),
        _ => match_windows(&tokens, universe),
    }
}

pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase().replace('.', "")
}

pub(crate) fn match_parentheticals(normalized: &str, universe: &CodeTable) -> Option<String> {
    for found in PARENTHETICAL.find_iter(normalized) {
        let raw = found.as_str();
        let content = raw[1..raw.len() - 1].trim();
        if let Some(code) = universe.get(content) {
            return Some(code.to_string());
        }
        if let Some(pos) = content.rfind(',') {
            let tail = content[pos + 1..].trim();
            if let Some(code) = universe.get(tail) {
                return Some(code.to_string());
            }
        }
    }
    None
}

pub(crate) fn search_window(normalized: &str) -> &str {
    match normalized.find(ISSUE_LABEL) {
        Some(pos) => &normalized[pos + ISSUE_LABEL.len()..],
        None => normalized,
    }
}

pub(crate) fn tokenize(window: &str) -> Vec<String> {
    window
        .split_whitespace()
        .map(|token| {
            token
                .strip_suffix([',', ';', ':'])
                .unwrap_or(token)
                .to_string()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

pub(crate) fn match_single(token: &str, universe: &CodeTable) -> Option<String> {
    if is_stop_word(token) {
        return None;
    }
    universe.get(token).map(str::to_string)
}

pub(crate) fn match_windows(tokens: &[String], universe: &CodeTable) -> Option<String> {
    for end in 0..tokens.len() {
        let longest = MAX_WINDOW.min(end + 1);
        for size in (2..=longest).rev() {
            let candidate = tokens[end + 1 - size..=end].join(" ");
            if let Some(code) = universe.get(&candidate) {
                return Some(code.to_string());
            }
        }
        if let Some(code) = match_single(&tokens[end], universe) {
            return Some(code);
        }
    }
    None
}
