// File: src/core/parser.rs
use crate::core::entities::EntityMemory;
use crate::core::formatter::format_text;
use crate::core::lexicon::{COMMAND_PREFIXES, SEGMENT_MARKERS, TITLE_PLACEHOLDER};
use crate::core::routing::{squash_whitespace, whole_phrase, PhraseRouter};
use crate::core::types::{Board, Column, ParseOutcome, TaskIntent, UnclearIntent};
use crate::core::vocabulary::VocabularyStore;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::debug;

/// Above this many words, an utterance with no comment and no known entity is
/// considered too ambiguous to split automatically.
pub const MAX_UNSEGMENTED_WORDS: usize = 4;

static PREFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    COMMAND_PREFIXES
        .iter()
        .filter_map(|prefix| {
            RegexBuilder::new(&format!("^{}", whole_phrase(prefix)))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect()
});

static MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SEGMENT_MARKERS
        .iter()
        .filter_map(|marker| {
            RegexBuilder::new(&regex::escape(marker))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect()
});

/// How the title was separated from the comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// The text starts with a remembered entity.
    Entity,
    /// Split at the first period.
    Sentence,
    /// Split in front of a marker such as " necesita ".
    Marker,
    /// Nothing to split on; everything is the title.
    Whole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub title: String,
    pub comment: String,
    pub strategy: SplitStrategy,
}

/// Turns a dictated or typed command into a task intent.
///
/// Stateless between calls: everything it remembers lives in the vocabulary
/// and entity stores it borrows.
pub struct IntentParser<'a> {
    vocabulary: &'a VocabularyStore,
    entities: &'a EntityMemory,
}

impl<'a> IntentParser<'a> {
    pub fn new(vocabulary: &'a VocabularyStore, entities: &'a EntityMemory) -> Self {
        Self { vocabulary, entities }
    }

    /// Returns `None` when there is nothing to parse or nowhere to put it.
    pub fn parse(
        &self,
        text: &str,
        boards: &[Board],
        active_board_id: Option<&str>,
    ) -> Option<ParseOutcome> {
        if text.trim().is_empty() {
            return None;
        }
        let default_board = boards
            .iter()
            .find(|b| Some(b.id.as_str()) == active_board_id)
            .or_else(|| boards.first())?;

        let working = squash_whitespace(&self.vocabulary.correct(text));

        let (board, working) = match PhraseRouter::BOARDS.route(&working, boards) {
            Some(route) => (route.target, route.remaining),
            None => (default_board, working),
        };

        let (column, working) = match PhraseRouter::COLUMNS.route(&working, &board.columns) {
            Some(route) => (Some(route.target), route.remaining),
            None => (board.columns.first(), working),
        };

        let remaining = strip_command_prefix(&working);
        let segmentation = self.segment(remaining);
        debug!(
            board = %board.id,
            column = column.map(|c: &Column| c.id.as_str()).unwrap_or("-"),
            strategy = ?segmentation.strategy,
            "segmented command"
        );

        let title = finish_title(format_text(&segmentation.title));
        let comment = format_text(&segmentation.comment);

        if title != TITLE_PLACEHOLDER {
            self.vocabulary.learn(&title);
        }
        self.vocabulary.learn(&comment);

        let word_count = remaining.split_whitespace().count();
        if word_count > MAX_UNSEGMENTED_WORDS
            && comment.is_empty()
            && segmentation.strategy != SplitStrategy::Entity
        {
            debug!(words = word_count, "command too ambiguous to split");
            return Some(ParseOutcome::Unclear(UnclearIntent::new(text)));
        }

        Some(ParseOutcome::Task(TaskIntent {
            title,
            board_id: board.id.clone(),
            column_id: column.map(|c| c.id.clone()),
            description: String::new(),
            comment,
        }))
    }

    /// Entity memory first, then the first period outside a number, then the
    /// first marker phrase; otherwise the whole text is the title.
    pub fn segment(&self, text: &str) -> Segmentation {
        if let Some(entity) = self.entities.match_start(text) {
            let rest = skip_chars(text, entity.chars().count());
            return Segmentation {
                title: entity,
                comment: trim_leading_separators(rest).to_string(),
                strategy: SplitStrategy::Entity,
            };
        }

        if let Some(at) = sentence_break(text) {
            return Segmentation {
                title: text[..at].trim().to_string(),
                comment: trim_leading_separators(&text[at + 1..]).trim_end().to_string(),
                strategy: SplitStrategy::Sentence,
            };
        }

        for marker in MARKERS.iter() {
            if let Some(found) = marker.find(text) {
                return Segmentation {
                    title: text[..found.start()].trim().to_string(),
                    comment: text[found.start()..].trim().to_string(),
                    strategy: SplitStrategy::Marker,
                };
            }
        }

        Segmentation {
            title: text.trim().to_string(),
            comment: String::new(),
            strategy: SplitStrategy::Whole,
        }
    }
}

/// Drops the first command phrase ("crear tarea", "recuérdame"...) found at
/// the start of `text`, along with any separator after it.
pub fn strip_command_prefix(text: &str) -> &str {
    let text = text.trim_start();
    let rest = PREFIXES
        .iter()
        .find_map(|prefix| prefix.find(text).map(|found| &text[found.end()..]))
        .unwrap_or(text);
    rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ',' | ';' | '-'))
        .trim_end()
}

fn finish_title(title: String) -> String {
    let title = title.trim_end_matches('.').trim_end();
    if title.is_empty() {
        TITLE_PLACEHOLDER.to_string()
    } else {
        title.to_string()
    }
}

/// Byte offset of the first period that is not a decimal point ("3.5").
fn sentence_break(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    text.match_indices('.').map(|(at, _)| at).find(|&at| {
        let digit_before = at > 0 && bytes[at - 1].is_ascii_digit();
        let digit_after = bytes.get(at + 1).is_some_and(u8::is_ascii_digit);
        !(digit_before && digit_after)
    })
}

fn trim_leading_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
}

/// `text` without its first `count` characters.
fn skip_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((index, _)) => &text[index..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore, ENTITIES_KEY, VOCABULARY_KEY};
    use std::sync::Arc;

    fn stores() -> (VocabularyStore, EntityMemory) {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (
            VocabularyStore::new(backend.clone(), VOCABULARY_KEY),
            EntityMemory::new(backend, ENTITIES_KEY),
        )
    }

    fn boards() -> Vec<Board> {
        vec![Board {
            id: "b1".into(),
            title: "General".into(),
            columns: vec![
                Column { id: "todo".into(), title: "Por hacer".into() },
                Column { id: "done".into(), title: "Hecho".into() },
            ],
        }]
    }

    #[test]
    fn strips_the_most_specific_prefix() {
        assert_eq!(strip_command_prefix("Crear una tarea: llamar"), "llamar");
        assert_eq!(strip_command_prefix("crear tarea llamar"), "llamar");
        assert_eq!(strip_command_prefix("Recuérdame que pague el IVA"), "pague el IVA");
        assert_eq!(strip_command_prefix("creardor de cosas"), "creardor de cosas");
        assert_eq!(strip_command_prefix("Llamar a Ana"), "Llamar a Ana");
    }

    #[test]
    fn segments_on_entity_before_anything_else() {
        let (vocabulary, entities) = stores();
        entities.add("Talleres Ruiz S.L.");
        let parser = IntentParser::new(&vocabulary, &entities);

        let split = parser.segment("talleres ruiz s.l., necesita el albarán. Urgente");

        assert_eq!(split.strategy, SplitStrategy::Entity);
        assert_eq!(split.title, "Talleres Ruiz S.L.");
        assert_eq!(split.comment, "necesita el albarán. Urgente");
    }

    #[test]
    fn segments_on_first_period() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        let split = parser.segment("Llamar a Ana. Necesita el presupuesto. Hoy");

        assert_eq!(split.strategy, SplitStrategy::Sentence);
        assert_eq!(split.title, "Llamar a Ana");
        assert_eq!(split.comment, "Necesita el presupuesto. Hoy");
    }

    #[test]
    fn decimal_points_do_not_end_a_sentence() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        let split = parser.segment("Pagar 3.5 euros al banco");
        assert_eq!(split.strategy, SplitStrategy::Whole);
        assert_eq!(split.title, "Pagar 3.5 euros al banco");

        let split = parser.segment("Pagar 3.5 euros. Lo reclama el banco");
        assert_eq!(split.strategy, SplitStrategy::Sentence);
        assert_eq!(split.title, "Pagar 3.5 euros");
        assert_eq!(split.comment, "Lo reclama el banco");

        let split = parser.segment("Cobrar 2023. Cliente nuevo");
        assert_eq!(split.title, "Cobrar 2023");
        assert_eq!(split.comment, "Cliente nuevo");
    }

    #[test]
    fn segments_on_markers_in_list_order() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        let split = parser.segment("Pedro dice que Marta quiere la factura");

        assert_eq!(split.strategy, SplitStrategy::Marker);
        assert_eq!(split.title, "Pedro dice que Marta");
        assert_eq!(split.comment, "quiere la factura");
    }

    #[test]
    fn markers_need_surrounding_spaces() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        let split = parser.segment("Revisar pedidos");
        assert_eq!(split.strategy, SplitStrategy::Whole);
        assert_eq!(split.title, "Revisar pedidos");
    }

    #[test]
    fn column_mention_routes_and_disappears() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        let outcome = parser.parse("Pagar IVA ponlo en hecho", &boards(), Some("b1")).unwrap();
        let task = outcome.task().unwrap();

        assert_eq!(task.column_id.as_deref(), Some("done"));
        assert_eq!(task.title, "Pagar Iva ponlo");
    }

    #[test]
    fn empty_text_or_catalog_yields_nothing() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        assert!(parser.parse("", &boards(), Some("b1")).is_none());
        assert!(parser.parse("   ", &boards(), Some("b1")).is_none());
        assert!(parser.parse("Comprar pan", &[], None).is_none());
    }

    #[test]
    fn bare_prefix_gets_placeholder_title() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        let outcome = parser.parse("Crear tarea", &boards(), None).unwrap();
        let task = outcome.task().unwrap();

        assert_eq!(task.title, TITLE_PLACEHOLDER);
        assert_eq!(task.board_id, "b1");
        assert_eq!(task.column_id.as_deref(), Some("todo"));
    }

    #[test]
    fn titles_never_end_with_periods() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        let outcome = parser.parse("Revisar el banco...", &boards(), None).unwrap();
        let task = outcome.task().unwrap();
        assert_eq!(task.title, "Revisar el banco");
        assert_eq!(task.comment, "");
    }

    #[test]
    fn parsing_reinforces_vocabulary() {
        let (vocabulary, entities) = stores();
        let parser = IntentParser::new(&vocabulary, &entities);

        parser.parse("Comprar tóner", &boards(), None);
        parser.parse("Comprar tóner", &boards(), None);

        assert_eq!(vocabulary.frequency("tóner"), 2);
        assert_eq!(vocabulary.frequency("comprar"), 7);
    }
}
