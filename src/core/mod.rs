// File: src/core/mod.rs
pub mod engine;
pub mod entities;
pub mod formatter;
pub mod lexicon;
pub mod parser;
pub mod routing;
pub mod types;
pub mod vocabulary;
