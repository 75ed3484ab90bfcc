// src/lib.rs

pub mod c_api;
pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod learning;
pub mod persistence;

pub use crate::config::AssistantConfig;
pub use crate::core::engine::AssistantEngine;
pub use crate::core::formatter::format_text;
pub use crate::core::types::{Board, Column, ParseOutcome, TaskIntent, UnclearIntent};
pub use crate::error::{ConfigError, StorageError};
