// File: src/core/routing.rs
//! Locates board and column mentions inside an utterance.
//!
//! The matching rules are spelled out as data on [`PhraseRouter`]:
//! candidates are always tried longest title first, and each router states
//! which occurrence counts, whether a connector word is required and how much
//! of the text is removed once a candidate is found.

use crate::core::lexicon::{is_word_char, BOARD_CONNECTORS, COLUMN_CONNECTORS};
use crate::core::types::{Board, Column};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Anything with a title the router can look for.
pub trait Routable {
    fn title(&self) -> &str;
}

impl Routable for Board {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Routable for Column {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Which occurrence of a title decides the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOrder {
    First,
    /// Catches trailing mentions such as "... ponlo en progreso".
    Last,
}

/// What is cut out of the text once a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    MatchedSpan,
    AllOccurrences,
}

#[derive(Debug, Clone, Copy)]
pub struct PhraseRouter {
    pub connectors: &'static [&'static str],
    pub connector_required: bool,
    pub order: MatchOrder,
    pub removal: Removal,
}

/// A routed candidate and the text left once its mention is removed.
#[derive(Debug)]
pub struct Route<'a, T> {
    pub target: &'a T,
    pub remaining: String,
}

impl PhraseRouter {
    /// "en Ventas", "para Ventas", "tablero Ventas": the connector is mandatory
    /// so a board name used as an ordinary word does not reroute the task.
    pub const BOARDS: PhraseRouter = PhraseRouter {
        connectors: BOARD_CONNECTORS,
        connector_required: true,
        order: MatchOrder::First,
        removal: Removal::MatchedSpan,
    };

    pub const COLUMNS: PhraseRouter = PhraseRouter {
        connectors: COLUMN_CONNECTORS,
        connector_required: false,
        order: MatchOrder::Last,
        removal: Removal::AllOccurrences,
    };

    /// Tries `candidates` longest title first; the first one mentioned in
    /// `text` wins.
    pub fn route<'a, T: Routable>(&self, text: &str, candidates: &'a [T]) -> Option<Route<'a, T>> {
        let mut ordered: Vec<&'a T> = candidates
            .iter()
            .filter(|c| !c.title().trim().is_empty())
            .collect();
        ordered.sort_by_key(|c| std::cmp::Reverse(c.title().trim().chars().count()));

        for candidate in ordered {
            let Some(pattern) = self.pattern_for(candidate.title()) else {
                continue;
            };

            let found = match self.order {
                MatchOrder::First => pattern.find(text),
                MatchOrder::Last => pattern.find_iter(text).last(),
            };
            let Some(found) = found else {
                continue;
            };

            debug!(title = candidate.title(), at = found.start(), "routed mention");
            let remaining = match self.removal {
                Removal::MatchedSpan => {
                    format!("{} {}", &text[..found.start()], &text[found.end()..])
                }
                Removal::AllOccurrences => pattern.replace_all(text, " ").into_owned(),
            };
            return Some(Route {
                target: candidate,
                remaining: squash_whitespace(&remaining),
            });
        }
        None
    }

    fn pattern_for(&self, title: &str) -> Option<Regex> {
        let connectors = self
            .connectors
            .iter()
            .map(|c| regex::escape(c))
            .collect::<Vec<_>>()
            .join("|");
        let quantifier = if self.connector_required { "" } else { "?" };
        let source = format!(
            r"(?:\b(?:{})\s+){}{}",
            connectors,
            quantifier,
            whole_phrase(title.trim())
        );
        RegexBuilder::new(&source).case_insensitive(true).build().ok()
    }
}

/// `phrase` escaped, with word boundaries on whichever ends are letters.
pub fn whole_phrase(phrase: &str) -> String {
    let mut source = String::new();
    if phrase.chars().next().is_some_and(is_word_char) {
        source.push_str(r"\b");
    }
    source.push_str(&regex::escape(phrase));
    if phrase.chars().last().is_some_and(is_word_char) {
        source.push_str(r"\b");
    }
    source
}

/// Collapses whitespace runs to a single space and trims the ends.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(id: &str, title: &str) -> Board {
        Board { id: id.into(), title: title.into(), columns: vec![] }
    }

    fn column(id: &str, title: &str) -> Column {
        Column { id: id.into(), title: title.into() }
    }

    #[test]
    fn board_needs_a_connector() {
        let boards = vec![board("v", "Ventas")];

        assert!(PhraseRouter::BOARDS.route("revisar ventas del mes", &boards).is_none());

        let route = PhraseRouter::BOARDS
            .route("Crear tarea en Ventas: llamar al cliente", &boards)
            .unwrap();
        assert_eq!(route.target.id, "v");
        assert_eq!(route.remaining, "Crear tarea : llamar al cliente");
    }

    #[test]
    fn longer_board_titles_are_preferred() {
        let boards = vec![board("short", "Ventas"), board("long", "Ventas Norte")];

        let route = PhraseRouter::BOARDS
            .route("llamar a Ana para ventas norte", &boards)
            .unwrap();
        assert_eq!(route.target.id, "long");
        assert_eq!(route.remaining, "llamar a Ana");
    }

    #[test]
    fn column_uses_last_mention_and_removes_all() {
        let columns = vec![column("todo", "Por hacer"), column("doing", "En progreso")];

        let route = PhraseRouter::COLUMNS
            .route("revisar el en progreso del IVA, ponlo en en progreso", &columns)
            .unwrap();
        assert_eq!(route.target.id, "doing");
        assert_eq!(route.remaining, "revisar el del IVA, ponlo");
    }

    #[test]
    fn column_connector_is_optional_and_removed() {
        let columns = vec![column("done", "Hecho")];

        let route = PhraseRouter::COLUMNS
            .route("Pagar IVA a la columna hecho", &columns)
            .unwrap();
        assert_eq!(route.remaining, "Pagar IVA a");
    }

    #[test]
    fn titles_only_match_whole_words() {
        let columns = vec![column("p", "Pendiente")];
        assert!(PhraseRouter::COLUMNS.route("pagos pendientes", &columns).is_none());
    }

    #[test]
    fn titles_with_regex_characters_are_escaped() {
        let columns = vec![column("q", "¿Dudas? (revisar)")];
        let route = PhraseRouter::COLUMNS
            .route("llamar a Ana en ¿dudas? (revisar)", &columns)
            .unwrap();
        assert_eq!(route.remaining, "llamar a Ana");
    }
}
