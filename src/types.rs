use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Top-level persisted config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub api_base_url: String,
    pub model: String,
    /// Falls back to the `GROQ_API_KEY` environment variable when unset.
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub last_question: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            last_question: None,
        }
    }
}

/// Where the current question is in its round trip to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching,
    Answered,
    Failed,
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchState::Idle => write!(f, "Ready"),
            SearchState::Searching => write!(f, "Searching the stars..."),
            SearchState::Answered => write!(f, "Answered"),
            SearchState::Failed => write!(f, "Search failed"),
        }
    }
}

/// Active modal dialog type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// Informational notice (title, body).
    Notice { title: String, body: String },
    /// A failed request, with the reason.
    Error { message: String },
    /// Help overlay.
    Help,
}
