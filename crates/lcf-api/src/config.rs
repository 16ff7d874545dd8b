use std::{fmt, path::PathBuf};

use serde::Deserialize;

/// Prefix shared by every configuration variable
pub const ENV_PREFIX: &str = "FLASHCARDS_";

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server configuration, read from `FLASHCARDS_*` environment variables.
///
/// | Variable | Default |
/// |---|---|
/// | `FLASHCARDS_ENV` | `development` |
/// | `FLASHCARDS_HOST` | `127.0.0.1` |
/// | `FLASHCARDS_PORT` | `3000` |
/// | `FLASHCARDS_DATA_DIR` | `data` |
/// | `FLASHCARDS_SEED_SAMPLE_CARDS` | `true` |
/// | `FLASHCARDS_METRICS_ENABLED` | `true` |
/// | `FLASHCARDS_ALLOWED_ORIGINS` | `http://localhost:3000` |
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the card document
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Insert the starter deck when the collection is empty
    #[serde(default = "default_true")]
    pub seed_sample_cards: bool,
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
    /// Comma-separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

const fn default_true() -> bool {
    true
}

fn default_allowed_origins() -> String {
    "http://localhost:3000".to_string()
}

impl ApiConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Result<Self, envy::Error> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(envy::Error::Custom(format!("Failed to read .env: {e}")));
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Read the configuration from explicit `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }

    /// Allowed CORS origins, trimmed, with empty entries dropped
    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
