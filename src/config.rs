//! Credential and client settings.
//!
//! Settings come from three places, highest precedence first:
//! 1. command-line flags and their environment variables (see [`crate::cli`])
//! 2. a YAML secrets file, by default `linkcraft.yaml`
//! 3. built-in defaults for model, temperature and API endpoints
//!
//! The secrets file mirrors the layout of a Streamlit-style secrets store:
//!
//! ```yaml
//! news_api:
//!   api_key: "..."
//! openai_api:
//!   chatgpt_api: "..."
//!   model: gpt-4o-mini
//!   temperature: 0.7
//! ```
//!
//! Both API keys are required. A missing key is a fatal configuration error.

use crate::error::{LinkcraftError, Result};
use serde::Deserialize;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/";

/// Contents of the YAML secrets file. Every field is optional so keys can
/// live in the environment instead.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct SecretsFile {
    #[serde(default, alias = "NEWS_API")]
    pub news_api: NewsApiSection,
    #[serde(default, alias = "OPENAI_API")]
    pub openai_api: OpenAiSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct NewsApiSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct OpenAiSection {
    #[serde(alias = "api_key")]
    pub chatgpt_api: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub base_url: Option<String>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub news_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub news_api_url: Option<String>,
    pub openai_api_url: Option<String>,
}

/// Fully resolved settings for one session.
#[derive(Clone)]
pub struct Settings {
    pub news_api_key: String,
    pub openai_api_key: String,
    pub model: String,
    pub temperature: f32,
    pub news_api_url: Url,
    pub openai_api_url: Url,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("news_api_key", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("news_api_url", &self.news_api_url.as_str())
            .field("openai_api_url", &self.openai_api_url.as_str())
            .finish()
    }
}

/// Read the secrets file. A file that does not exist yields empty settings.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn load_secrets(path: &Path) -> Result<SecretsFile> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No secrets file; relying on flags and environment");
            return Ok(SecretsFile::default());
        }
        Err(source) => {
            return Err(LinkcraftError::ConfigRead {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let secrets = parse_secrets(&text).map_err(|source| LinkcraftError::ConfigParse {
        path: path.display().to_string(),
        source,
    })?;
    info!("Loaded secrets file");
    Ok(secrets)
}

fn parse_secrets(text: &str) -> std::result::Result<SecretsFile, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(SecretsFile::default());
    }
    serde_yaml::from_str(text)
}

/// Merge overrides over the file and defaults, failing on missing keys.
pub fn resolve(file: SecretsFile, overrides: Overrides) -> Result<Settings> {
    let news_api_key = non_empty(overrides.news_api_key)
        .or(non_empty(file.news_api.api_key))
        .ok_or(LinkcraftError::MissingCredential("NEWS_API.api_key"))?;
    let openai_api_key = non_empty(overrides.openai_api_key)
        .or(non_empty(file.openai_api.chatgpt_api))
        .ok_or(LinkcraftError::MissingCredential("OPENAI_API.chatgpt_api"))?;

    let model = non_empty(overrides.model)
        .or(non_empty(file.openai_api.model))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let temperature = overrides
        .temperature
        .or(file.openai_api.temperature)
        .unwrap_or(DEFAULT_TEMPERATURE);

    let news_api_url = base_url(
        "news API",
        overrides.news_api_url.or(file.news_api.base_url),
        DEFAULT_NEWS_API_URL,
    )?;
    let openai_api_url = base_url(
        "OpenAI API",
        overrides.openai_api_url.or(file.openai_api.base_url),
        DEFAULT_OPENAI_API_URL,
    )?;

    Ok(Settings {
        news_api_key,
        openai_api_key,
        model,
        temperature,
        news_api_url,
        openai_api_url,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an API base URL, forcing a trailing slash so that `Url::join`
/// appends endpoint paths instead of replacing the last segment.
fn base_url(what: &'static str, value: Option<String>, default: &str) -> Result<Url> {
    let mut raw = non_empty(value).unwrap_or_else(|| default.to_string());
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|source| LinkcraftError::InvalidUrl { what, source })
}
