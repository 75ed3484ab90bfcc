// File: src/core/vocabulary.rs
use crate::core::lexicon::{
    is_stop_word, is_word_char, KNOWN_FREQUENCY, MIN_CORRECT_LEN, SEED_FREQUENCY, SEED_WORDS,
};
use crate::error::StorageError;
use crate::fuzzy::nearest_known;
use crate::learning::LearningEngine;
use crate::persistence::{load_json, save_json, KeyValueStore};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Persistent word -> frequency table used to spot and fix typos.
///
/// Every operation reads the backing document, so two stores over the same
/// backend see each other's learning. The table is a `BTreeMap`, which makes
/// correction ties resolve alphabetically instead of by insertion history.
pub struct VocabularyStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    learning_engine: LearningEngine,
    write_lock: Mutex<()>,
}

impl VocabularyStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            learning_engine: LearningEngine::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Current table with the seed lexicon guaranteed present. A read
    /// failure yields an empty table, which disables correction for the call.
    pub fn words(&self) -> BTreeMap<String, u32> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load().unwrap_or_else(|e| {
            warn!("vocabulary unavailable, correcting nothing: {}", e);
            BTreeMap::new()
        })
    }

    pub fn frequency(&self, word: &str) -> u32 {
        self.words().get(&word.to_lowercase()).copied().unwrap_or(0)
    }

    /// Inserts any missing seed word at `SEED_FREQUENCY`. Returns whether the
    /// table changed.
    pub fn ensure_seeded(vocabulary: &mut BTreeMap<String, u32>) -> bool {
        let mut added = false;
        for word in SEED_WORDS {
            if !vocabulary.contains_key(*word) {
                vocabulary.insert((*word).to_string(), SEED_FREQUENCY);
                added = true;
            }
        }
        added
    }

    /// Counts every learnable token of `text`.
    pub fn learn(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.update(|vocabulary, engine| engine.learn(vocabulary, text) > 0);
    }

    /// Makes every learnable token of `text` a known word without inflating
    /// words that are already known.
    pub fn prime(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.update(|vocabulary, engine| engine.prime(vocabulary, text, KNOWN_FREQUENCY) > 0);
    }

    /// Replaces likely typos with the nearest known word. Every character that
    /// is not part of a word comes back exactly as it went in.
    pub fn correct(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let vocabulary = self.words();
        correct_with(&vocabulary, text)
    }

    fn load(&self) -> Result<BTreeMap<String, u32>, StorageError> {
        let mut vocabulary: BTreeMap<String, u32> =
            load_json(self.backend.as_ref(), &self.key)?.unwrap_or_default();
        if Self::ensure_seeded(&mut vocabulary) {
            self.persist(&vocabulary);
        }
        Ok(vocabulary)
    }

    fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut BTreeMap<String, u32>, &LearningEngine) -> bool,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut vocabulary = match self.load() {
            Ok(vocabulary) => vocabulary,
            Err(e) => {
                // Writing now would replace the stored table with a fragment.
                warn!("vocabulary unavailable, skipping learning: {}", e);
                return;
            }
        };
        if mutate(&mut vocabulary, &self.learning_engine) {
            self.persist(&vocabulary);
        }
    }

    fn persist(&self, vocabulary: &BTreeMap<String, u32>) {
        if let Err(e) = save_json(self.backend.as_ref(), &self.key, vocabulary) {
            warn!("failed to persist vocabulary: {}", e);
        }
    }
}

/// Splits `text` into alternating word / delimiter runs. Concatenating the
/// runs gives back `text` unchanged.
pub fn segments(text: &str) -> Vec<(bool, &str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_word: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let is_word = is_word_char(c);
        match in_word {
            Some(current) if current != is_word => {
                parts.push((current, &text[start..i]));
                start = i;
            }
            _ => {}
        }
        in_word = Some(is_word);
    }
    if let Some(current) = in_word {
        parts.push((current, &text[start..]));
    }
    parts
}

fn correct_with(vocabulary: &BTreeMap<String, u32>, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (is_word, part) in segments(text) {
        if is_word {
            out.push_str(&correct_word(vocabulary, part));
        } else {
            out.push_str(part);
        }
    }
    out
}

fn correct_word(vocabulary: &BTreeMap<String, u32>, word: &str) -> String {
    let lower = word.to_lowercase();
    let is_known = vocabulary.get(&lower).is_some_and(|&f| f >= KNOWN_FREQUENCY);
    if is_known || is_stop_word(&lower) || word.chars().count() < MIN_CORRECT_LEN {
        return word.to_string();
    }

    let known = vocabulary
        .iter()
        .filter(|&(_, &frequency)| frequency >= KNOWN_FREQUENCY)
        .map(|(w, _)| w.as_str());

    match nearest_known(&lower, known) {
        Some(found) => {
            debug!(from = word, to = found.word, distance = found.distance, "corrected word");
            match_leading_case(word, found.word)
        }
        None => word.to_string(),
    }
}

/// Capitalizes `replacement` when `original` starts with an uppercase letter.
fn match_leading_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if starts_upper {
        capitalize(replacement)
    } else {
        replacement.to_lowercase()
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::persistence::{MemoryStore, VOCABULARY_KEY};
    use proptest::prelude::*;

    fn store() -> (Arc<MemoryStore>, VocabularyStore) {
        let backend = Arc::new(MemoryStore::new());
        let vocabulary = VocabularyStore::new(backend.clone(), VOCABULARY_KEY);
        (backend, vocabulary)
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    #[test]
    fn seeding_is_idempotent() {
        let (backend, vocabulary) = store();

        let first = vocabulary.words();
        let stored_after_first = backend.get(VOCABULARY_KEY).unwrap();
        let second = vocabulary.words();
        let stored_after_second = backend.get(VOCABULARY_KEY).unwrap();

        assert_eq!(first, second);
        assert_eq!(stored_after_first, stored_after_second);
        assert_eq!(first.get("factura"), Some(&SEED_FREQUENCY));
        assert_eq!(first.len(), SEED_WORDS.len());
    }

    #[test]
    fn missing_seed_words_are_restored() {
        let (backend, vocabulary) = store();
        backend.set(VOCABULARY_KEY, r#"{"factura": 12, "ventas": 3}"#).unwrap();

        let words = vocabulary.words();

        assert_eq!(words.get("factura"), Some(&12));
        assert_eq!(words.get("ventas"), Some(&3));
        assert_eq!(words.get("iva"), Some(&SEED_FREQUENCY));
    }

    #[test]
    fn learn_increments_lowercased_tokens() {
        let (_, vocabulary) = store();

        vocabulary.learn("Constructora López");
        vocabulary.learn("constructora");

        assert_eq!(vocabulary.frequency("constructora"), 2);
        assert_eq!(vocabulary.frequency("López"), 1);
        assert_eq!(vocabulary.frequency("factura"), SEED_FREQUENCY);
    }

    #[test]
    fn corrects_near_miss_preserving_case() {
        let (_, vocabulary) = store();

        assert_eq!(vocabulary.correct("enviar facttura"), "enviar factura");
        assert_eq!(vocabulary.correct("Facttura"), "Factura");
    }

    #[test]
    fn leaves_distant_and_short_words_alone() {
        let (_, vocabulary) = store();

        assert_eq!(vocabulary.correct("zzzzzzz"), "zzzzzzz");
        assert_eq!(vocabulary.correct("ivx"), "ivx");
        assert_eq!(vocabulary.correct("sobre"), "sobre");
    }

    #[test]
    fn words_seen_once_are_not_trusted_yet() {
        let (_, vocabulary) = store();

        vocabulary.learn("facturb");
        assert_eq!(vocabulary.correct("facturb"), "factura");

        vocabulary.learn("facturb");
        assert_eq!(vocabulary.correct("facturb"), "facturb");
    }

    #[test]
    fn prime_makes_titles_known() {
        let (_, vocabulary) = store();

        assert_eq!(vocabulary.correct("Ventas"), "Cuentas");
        vocabulary.prime("Ventas");
        assert_eq!(vocabulary.correct("Ventas"), "Ventas");
        assert_eq!(vocabulary.frequency("ventas"), KNOWN_FREQUENCY);
    }

    #[test]
    fn broken_storage_disables_correction_without_panicking() {
        let vocabulary = VocabularyStore::new(Arc::new(BrokenStore), VOCABULARY_KEY);

        assert_eq!(vocabulary.correct("Facttura"), "Facttura");
        vocabulary.learn("factura");
        assert!(vocabulary.words().is_empty());
    }

    #[test]
    fn segments_alternate_words_and_delimiters() {
        assert_eq!(
            segments("¡Hola, Ana! 3x"),
            vec![
                (false, "¡"),
                (true, "Hola"),
                (false, ", "),
                (true, "Ana"),
                (false, "! 3"),
                (true, "x"),
            ]
        );
        assert!(segments("").is_empty());
    }

    proptest! {
        #[test]
        fn correction_preserves_every_delimiter(text in "[a-zA-Záñ0-9 .,;:!?¿¡-]{0,40}") {
            let (_, vocabulary) = store();
            let corrected = vocabulary.correct(&text);

            let delimiters =
                |s: &str| -> String { s.chars().filter(|c| !is_word_char(*c)).collect() };
            prop_assert_eq!(delimiters(&corrected), delimiters(&text));
        }
    }
}
