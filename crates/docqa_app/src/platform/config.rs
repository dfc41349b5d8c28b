use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docqa_engine::BackendSettings;
use docqa_logging::LogDestination;
use log::LevelFilter;

const ENV_LOG: &str = "DOCQA_LOG";
const ENV_LOG_FILE: &str = "DOCQA_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "docqa.log";
const ENV_FILE: &str = ".env";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendSettings,
    pub log_level: LevelFilter,
    pub log_destination: LogDestination,
}

impl AppConfig {
    /// Reads `.env` from the working directory, then the process environment.
    pub fn load() -> Result<Self> {
        Self::from_env_file(Path::new(ENV_FILE), |key| std::env::var(key).ok())
    }

    /// Values from `env` win over the file; a missing file is not an error.
    pub fn from_env_file(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file_values = read_env_file(path)?;
        Self::from_lookup(|key| env(key).or_else(|| file_values.get(key).cloned()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend =
            BackendSettings::from_lookup(&lookup).context("invalid backend configuration")?;
        let log_level = match lookup(ENV_LOG) {
            Some(raw) => docqa_logging::parse_level(&raw)
                .with_context(|| format!("{ENV_LOG} has unsupported level {raw:?}"))?,
            None => LevelFilter::Info,
        };
        // An empty log file name sends log output to the terminal.
        let log_destination = match lookup(ENV_LOG_FILE) {
            Some(raw) if raw.trim().is_empty() => LogDestination::Terminal,
            Some(raw) => LogDestination::File(PathBuf::from(raw.trim())),
            None => LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE)),
        };
        Ok(Self {
            backend,
            log_level,
            log_destination,
        })
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .map(|item| item.with_context(|| format!("failed to parse {}", path.display())))
        .collect()
}
