// File: src/fuzzy/distance.rs

/// Classic Levenshtein edit distance: the minimum number of single-character
/// insertions, deletions or substitutions turning `a` into `b`.
///
/// Works on `char`s rather than bytes, so "albarán" vs "albaran" is one edit.
/// Only two rows of the `(|b|+1) x (|a|+1)` table are kept alive.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut curr = vec![0usize; a.len() + 1];

    for (i, &bc) in b.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &ac) in a.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[a.len()]
}
