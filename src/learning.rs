// File: src/learning.rs
use crate::core::lexicon::{is_stop_word, is_word_char, MIN_LEARN_LEN};
use std::collections::BTreeMap;

/// Reinforces word frequencies from text the user has confirmed.
pub struct LearningEngine {
    frequency_increment: u32,
}

impl Default for LearningEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningEngine {
    pub fn new() -> Self {
        Self { frequency_increment: 1 }
    }

    /// Lowercased tokens worth learning: runs of Spanish letters at least
    /// `MIN_LEARN_LEN` long that are not stop words.
    pub fn tokens(text: &str) -> Vec<String> {
        text.split(|c: char| !is_word_char(c))
            .filter(|token| token.chars().count() >= MIN_LEARN_LEN)
            .map(str::to_lowercase)
            .filter(|token| !is_stop_word(token))
            .collect()
    }

    /// Bumps the frequency of every learnable token in `text`. Returns the
    /// number of tokens counted.
    pub fn learn(&self, vocabulary: &mut BTreeMap<String, u32>, text: &str) -> usize {
        let tokens = Self::tokens(text);
        for token in &tokens {
            let frequency = vocabulary.entry(token.clone()).or_insert(0);
            *frequency = frequency.saturating_add(self.frequency_increment);
        }
        tokens.len()
    }

    /// Raises every learnable token in `text` to at least `floor` without
    /// touching words already above it. Returns the number of words raised.
    pub fn prime(&self, vocabulary: &mut BTreeMap<String, u32>, text: &str, floor: u32) -> usize {
        let mut raised = 0;
        for token in Self::tokens(text) {
            let frequency = vocabulary.entry(token).or_insert(0);
            if *frequency < floor {
                *frequency = floor;
                raised += 1;
            }
        }
        raised
    }
}
