// File: src/config.rs
use crate::error::ConfigError;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "TASKBOARD_ASSISTANT_DIR";
pub const NAMESPACE_ENV: &str = "TASKBOARD_ASSISTANT_NAMESPACE";
pub const LOG_ENV: &str = "TASKBOARD_ASSISTANT_LOG";

const APP_DIR_NAME: &str = "taskboard-assistant";
const DEFAULT_LOG_FILTER: &str = "info";

/// Where the learned vocabulary lives and whose it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub data_dir: PathBuf,
    /// `None` shares one vocabulary between every user of the installation.
    pub namespace: Option<String>,
    pub log_filter: String,
}

impl AssistantConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match non_blank(lookup(DATA_DIR_ENV)) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        Ok(Self {
            data_dir,
            namespace: non_blank(lookup(NAMESPACE_ENV)),
            log_filter: non_blank(lookup(LOG_ENV))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or(ConfigError::NoDataDir)?;
    path.push(APP_DIR_NAME);
    Ok(path)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
