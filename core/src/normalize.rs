//! Grapheme-level helpers for elongated spellings and word boundaries.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static WORD_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w$").expect("valid word char regex"));

/// Lowercase and collapse every run of identical graphemes to one.
///
/// `"hellooo"` becomes `"helo"`, `"wow???"` becomes `"wow?"`.
pub fn collapse_repeats(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut prev: Option<&str> = None;
    for g in lowered.graphemes(true) {
        if prev != Some(g) {
            out.push_str(g);
        }
        prev = Some(g);
    }
    out
}

/// Longest run of identical consecutive graphemes, case-insensitive.
///
/// The empty string reports 1.
pub fn max_repeat_run(text: &str) -> usize {
    let lowered = text.to_lowercase();
    let mut max_run = 1;
    let mut current = 0;
    let mut prev: Option<&str> = None;
    for g in lowered.graphemes(true) {
        if prev == Some(g) {
            current += 1;
        } else {
            current = 1;
            prev = Some(g);
        }
        max_run = max_run.max(current);
    }
    max_run
}

/// Runs of identical graphemes as `(grapheme, count)` pairs.
fn grapheme_runs(text: &str) -> Vec<(&str, usize)> {
    let mut runs: Vec<(&str, usize)> = Vec::new();
    for g in text.graphemes(true) {
        if let Some((prev, count)) = runs.last_mut() {
            if *prev == g {
                *count += 1;
                continue;
            }
        }
        runs.push((g, 1));
    }
    runs
}

/// Whether `token` is `spelling` with some graphemes repeated.
///
/// Same test the elongation pattern applies to a whole token: runs line up
/// grapheme for grapheme and no run in the token is shorter than in the
/// spelling. Both sides are compared lowercase.
pub fn is_elongation_of(token: &str, spelling: &str) -> bool {
    let token = token.to_lowercase();
    let spelling = spelling.to_lowercase();
    if spelling.is_empty() {
        return false;
    }
    let token_runs = grapheme_runs(&token);
    let spelling_runs = grapheme_runs(&spelling);
    token_runs.len() == spelling_runs.len()
        && token_runs
            .iter()
            .zip(&spelling_runs)
            .all(|((tg, tc), (sg, sc))| tg == sg && tc >= sc)
}

/// Regex `\w`: alphabetic, marks, decimal digits, connector punctuation and
/// join controls.
pub fn is_word_char(ch: char) -> bool {
    let mut buf = [0u8; 4];
    WORD_CHAR_RE.is_match(ch.encode_utf8(&mut buf))
}

/// `\b` semantics: word-ness differs on the two sides of `pos`.
///
/// `pos` must lie on a char boundary of `text`.
pub fn is_word_boundary(text: &str, pos: usize) -> bool {
    let before = text[..pos].chars().next_back().is_some_and(is_word_char);
    let after = text[pos..].chars().next().is_some_and(is_word_char);
    before != after
}
