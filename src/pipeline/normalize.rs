//! Deterministic clean-up of extracted page text.
//!
//! Content-stream text comes out with whatever line endings, invisible
//! characters and padding the producer happened to use. These rules bring it
//! to a stable shape without touching the words themselves:
//!
//! 1. Normalise line endings (CRLF / CR → LF)
//! 2. Remove invisible Unicode (zero-width spaces, BOM, soft hyphen)
//! 3. Trim trailing whitespace on every line
//! 4. Collapse runs of 3+ blank lines down to 2
//! 5. Trim the end of the page
//!
//! Every rule is idempotent, so `clean_text(clean_text(x)) == clean_text(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all rules to one page of text.
pub fn clean_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim_end().to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .split('\n')
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}
