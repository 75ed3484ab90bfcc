// File: src/fuzzy/mod.rs
pub mod distance;
pub mod nearest;

pub use distance::levenshtein;
pub use nearest::{nearest_known, NearestMatch};
