// File: src/core/formatter.rs
//! Cleans up dictated text: capitalization, punctuation spacing, commas before
//! connectors, colons after introductory phrases and capitalized domain terms.
//!
//! Every step is idempotent, so formatting already-formatted text is a no-op.

use crate::core::lexicon::{COMMA_CONNECTORS, DOMAIN_KEYWORDS, INTRO_PHRASES};
use crate::core::routing::whole_phrase;
use crate::core::vocabulary::capitalize;
use regex::{Captures, Regex, RegexBuilder};
use std::sync::LazyLock;

/// Texts longer than this get a closing period.
const MIN_LEN_FOR_PERIOD: usize = 10;

const PUNCTUATION: &[char] = &['.', ',', ';', '?', '!', ':'];
const SENTENCE_END: &[char] = &['.', '?', '!'];

static CONNECTOR_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = COMMA_CONNECTORS
        .iter()
        .map(|c| whole_phrase(c))
        .collect::<Vec<_>>()
        .join("|");
    build(&format!(r"\s+(?:{})", alternatives))
});

static INTRO_COLON: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = INTRO_PHRASES
        .iter()
        .map(|p| whole_phrase(p))
        .collect::<Vec<_>>()
        .join("|");
    build(&format!("(?:{})", alternatives))
});

static KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = DOMAIN_KEYWORDS
        .iter()
        .map(|k| whole_phrase(k))
        .collect::<Vec<_>>()
        .join("|");
    build(&format!("(?:{})", alternatives))
});

fn build(source: &str) -> Regex {
    match RegexBuilder::new(source).case_insensitive(true).build() {
        Ok(regex) => regex,
        // Sources are assembled from escaped constants.
        Err(e) => unreachable!("invalid formatter pattern {source:?}: {e}"),
    }
}

/// Runs the full formatting pipeline over `text`.
pub fn format_text(text: &str) -> String {
    let text = capitalize(text.trim());
    if text.is_empty() {
        return text;
    }
    let text = remove_space_before_punctuation(&text);
    let text = space_after_punctuation(&text);
    let text = comma_before_connectors(&text);
    let text = colon_after_intro_phrases(&text);
    let text = capitalize_keywords(&text);
    close_sentence(text)
}

fn remove_space_before_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = String::new();
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space.push(c);
            continue;
        }
        if !PUNCTUATION.contains(&c) {
            out.push_str(&pending_space);
        }
        pending_space.clear();
        out.push(c);
    }
    out.push_str(&pending_space);
    out
}

/// Inserts a space after punctuation glued to the next character, except
/// inside numbers ("3.5", "1,000") and runs of punctuation ("...", "?!").
fn space_after_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if !PUNCTUATION.contains(&c) {
            continue;
        }
        let Some(&next) = chars.get(i + 1) else {
            continue;
        };
        let in_number = i > 0 && chars[i - 1].is_ascii_digit() && next.is_ascii_digit();
        if !next.is_whitespace() && !PUNCTUATION.contains(&next) && !in_number {
            out.push(' ');
        }
    }
    out
}

/// Puts a comma in front of a connector unless the word before it already
/// ends in punctuation.
fn comma_before_connectors(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut last = 0;
    for found in CONNECTOR_COMMA.find_iter(text) {
        let before = text[..found.start()].chars().last();
        if before.is_some_and(|c| !PUNCTUATION.contains(&c)) {
            out.push_str(&text[last..found.start()]);
            out.push(',');
            last = found.start();
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Puts a colon right after an introductory phrase when something other than
/// punctuation follows it.
fn colon_after_intro_phrases(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut last = 0;
    for found in INTRO_COLON.find_iter(text) {
        let rest = &text[found.end()..];
        let Some(next) = rest.trim_start().chars().next() else {
            continue;
        };
        if PUNCTUATION.contains(&next) {
            continue;
        }
        out.push_str(&text[last..found.end()]);
        out.push(':');
        if !rest.starts_with(char::is_whitespace) {
            out.push(' ');
        }
        last = found.end();
    }
    out.push_str(&text[last..]);
    out
}

fn capitalize_keywords(text: &str) -> String {
    KEYWORDS
        .replace_all(text, |caps: &Captures| capitalize(&caps[0].to_lowercase()))
        .into_owned()
}

fn close_sentence(mut text: String) -> String {
    let long_enough = text.chars().count() > MIN_LEN_FOR_PERIOD;
    if long_enough && !text.ends_with(SENTENCE_END) {
        text.push('.');
    }
    text
}
