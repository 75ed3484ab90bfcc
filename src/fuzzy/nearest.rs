// File: src/fuzzy/nearest.rs
use crate::fuzzy::distance::levenshtein;

/// Largest edit distance at which a known word may replace a candidate.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Known words whose length differs from the candidate by more than this are
/// skipped before computing any distance.
pub const MAX_LENGTH_DELTA: usize = 2;

/// The best replacement found for a candidate word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearestMatch<'a> {
    pub word: &'a str,
    pub distance: usize,
}

/// Scans `known` in iteration order and returns the first word at the strictly
/// lowest edit distance from `candidate`, provided that distance is within
/// `MAX_EDIT_DISTANCE`.
///
/// Callers wanting reproducible results must hand in a deterministic order;
/// the vocabulary passes its keys alphabetically.
pub fn nearest_known<'a, I>(candidate: &str, known: I) -> Option<NearestMatch<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidate_len = candidate.chars().count();
    let mut best: Option<NearestMatch<'a>> = None;

    for word in known {
        let word_len = word.chars().count();
        if word_len.abs_diff(candidate_len) > MAX_LENGTH_DELTA {
            continue;
        }

        let distance = levenshtein(candidate, word);
        let improves = match &best {
            Some(current) => distance < current.distance,
            None => true,
        };
        if improves {
            best = Some(NearestMatch { word, distance });
            if distance == 0 {
                break;
            }
        }
    }

    best.filter(|m| m.distance <= MAX_EDIT_DISTANCE)
}
