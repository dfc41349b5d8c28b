use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_STRATEGY: &str = "ai";

pub const ENV_API_URL: &str = "DOCQA_API_URL";
pub const ENV_STREAM_FALLBACK: &str = "DOCQA_STREAM_FALLBACK";
pub const ENV_STRATEGY: &str = "DOCQA_STRATEGY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{key} is not a usable http(s) base url: {value}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("{key} has unsupported value {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// Base url shared by `/stats`, `/process` and `/query`, without trailing slash.
    base_url: String,
    /// Chunking strategy label sent with `/process`.
    pub strategy: String,
    /// Accept a plain JSON body when `/process` does not answer with an event stream.
    pub stream_fallback: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            strategy: DEFAULT_STRATEGY.to_string(),
            stream_fallback: true,
        }
    }
}

impl BackendSettings {
    pub fn new(base_url: &str) -> Result<Self, SettingsError> {
        Ok(Self {
            base_url: normalize_base_url(ENV_API_URL, base_url)?,
            ..Self::default()
        })
    }

    /// Builds settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        if let Some(raw) = lookup(ENV_API_URL) {
            settings.base_url = normalize_base_url(ENV_API_URL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STRATEGY) {
            let raw = raw.trim();
            if !raw.is_empty() {
                settings.strategy = raw.to_string();
            }
        }
        if let Some(raw) = lookup(ENV_STREAM_FALLBACK) {
            settings.stream_fallback = parse_flag(ENV_STREAM_FALLBACK, &raw)?;
        }
        Ok(settings)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(key: &'static str, raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim();
    let invalid = || SettingsError::InvalidUrl {
        key,
        value: raw.to_string(),
    };
    let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, SettingsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}
