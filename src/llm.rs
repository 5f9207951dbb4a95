use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::types::Config;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// One source and what it says about the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub source: String,
    #[serde(default)]
    pub source_details: Option<String>,
    pub info: String,
}

impl Answer {
    /// Source title with its chapter or page reference appended, if any.
    pub fn source_label(&self) -> String {
        match self.source_details.as_deref().map(str::trim) {
            Some(details) if !details.is_empty() => format!("{} ({})", self.source, details),
            _ => self.source.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Answers {
    pub responses: Vec<Answer>,
}

#[derive(Debug, Error)]
pub enum AskError {
    #[error("no API key configured; set apiKey in the config file or the GROQ_API_KEY environment variable")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("the model service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("the model returned an empty reply")]
    EmptyCompletion,
    #[error("could not read the model's answer: {0}")]
    Malformed(#[from] serde_json::Error),
}

const FORMAT_INSTRUCTIONS: &str = r#"Respond with JSON only. Each entry of "responses" is an object with these fields:
  "source": the individual source of the information, such as book title, year of publication and author name, in plain text with no quotation marks, brackets, markdown or hidden characters;
  "source_details": an optional reference to chapter, page or section if known, otherwise null;
  "info": a summary of how this source answers the question or presents relevant information.
Example: {"responses": [{"source": "Christian Astrology, 1647, William Lilly", "source_details": "Book 1, p. 57", "info": "..."}]}"#;

/// The research-assistant prompt for one question.
pub fn build_prompt(question: &str) -> String {
    format!(
        "You are AstroScholar, an Agentic LLM Research Assistant for Historical Astrology Sources.\n\
         Answer {question} as it relates to planetary correspondences from historical astrology texts.\n\
         {FORMAT_INSTRUCTIONS}\n\
         Put the entries inside a JSON object with key 'responses', where 'responses' is a list of sources and info entries.\n\
         These sources may provide conflicting information, this is fine, present all information.",
        question = question.trim(),
    )
}

fn fenced_json() -> Option<&'static Regex> {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    FENCE
        .get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").ok())
        .as_ref()
}

/// Parse the model's reply. Accepts bare JSON, a fenced code block, or an
/// object embedded in surrounding prose.
pub fn parse_answers(content: &str) -> Result<Answers, AskError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AskError::EmptyCompletion);
    }

    let direct = serde_json::from_str::<Answers>(trimmed);
    if let Ok(answers) = direct {
        return Ok(answers);
    }

    if let Some(body) = fenced_json()
        .and_then(|re| re.captures(trimmed))
        .and_then(|c| c.get(1))
    {
        if let Ok(answers) = serde_json::from_str::<Answers>(body.as_str()) {
            return Ok(answers);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return Ok(serde_json::from_str(&trimmed[start..=end])?);
        }
    }

    direct.map_err(AskError::from)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ScholarClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ScholarClient {
    pub fn from_config(config: &Config) -> Result<Self, AskError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn ask(&self, question: &str) -> Result<Answers, AskError> {
        let api_key = self.api_key.as_deref().ok_or(AskError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(question),
            }],
            response_format: ResponseFormat { kind: "json_object" },
        };

        info!(model = %self.model, "asking the model");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AskError::Status {
                status: status.as_u16(),
                body: truncate(&body, 300),
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AskError::EmptyCompletion)?;
        debug!(len = content.len(), "model replied");

        parse_answers(&content)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LILLY: &str = r#"{"responses": [
        {"source": "Christian Astrology, 1647, William Lilly", "source_details": "Book 1, p. 73", "info": "Copper is the metal of Venus."},
        {"source": "Three Books of Occult Philosophy, 1533, Agrippa", "info": "Venus rules copper and brass."}
    ]}"#;

    #[test]
    fn source_label_appends_details() {
        let answer = Answer {
            source: "Picatrix".into(),
            source_details: Some("Book II, ch. 10".into()),
            info: String::new(),
        };
        assert_eq!(answer.source_label(), "Picatrix (Book II, ch. 10)");
    }

    #[test]
    fn source_label_skips_blank_details() {
        let mut answer = Answer {
            source: "Tetrabiblos".into(),
            source_details: Some("  ".into()),
            info: String::new(),
        };
        assert_eq!(answer.source_label(), "Tetrabiblos");
        answer.source_details = None;
        assert_eq!(answer.source_label(), "Tetrabiblos");
    }

    #[test]
    fn prompt_embeds_question_and_format() {
        let prompt = build_prompt("  Metals associated with Venus ");
        assert!(prompt.contains("Answer Metals associated with Venus as it relates"));
        assert!(prompt.contains("'responses'"));
        assert!(prompt.contains("\"source_details\""));
    }

    #[test]
    fn parses_bare_json() {
        let answers = parse_answers(LILLY).unwrap();
        assert_eq!(answers.responses.len(), 2);
        assert_eq!(answers.responses[1].source_details, None);
    }

    #[test]
    fn parses_fenced_json() {
        let reply = format!("Here you go:\n```json\n{}\n```\n", LILLY);
        let answers = parse_answers(&reply).unwrap();
        assert_eq!(answers.responses[0].info, "Copper is the metal of Venus.");
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let reply = format!("Sure! {} Hope that helps.", LILLY);
        assert_eq!(parse_answers(&reply).unwrap().responses.len(), 2);
    }

    #[test]
    fn empty_reply_is_an_error() {
        assert!(matches!(parse_answers("  \n"), Err(AskError::EmptyCompletion)));
    }

    #[test]
    fn garbage_reply_is_malformed() {
        assert!(matches!(parse_answers("no json here"), Err(AskError::Malformed(_))));
        assert!(matches!(parse_answers("{\"responses\": 3}"), Err(AskError::Malformed(_))));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééééé", 2), "éé...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn config_key_wins_over_environment() {
        let cfg = Config {
            api_key: Some("from-config".into()),
            ..Config::default()
        };
        let client = ScholarClient::from_config(&cfg).unwrap();
        assert!(client.has_api_key());
        assert_eq!(client.model(), crate::types::DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn ask_without_key_fails_fast() {
        let client = ScholarClient {
            base_url: "http://127.0.0.1:9".into(),
            model: "m".into(),
            api_key: None,
            client: reqwest::Client::new(),
        };
        assert!(matches!(client.ask("Mars").await, Err(AskError::MissingApiKey)));
    }
}
