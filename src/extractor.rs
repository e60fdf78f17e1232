//! LLM-based criteria extraction with a keyword fallback.
//!
//! Sends the shopper's query to an OpenAI-compatible chat completion endpoint
//! (OpenRouter by default) and reads a JSON object of filter fields back.
//! When the API is not configured, unreachable, or answers with something that
//! is not a JSON object, the local [`KeywordParser`] is used instead.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::criteria::Criteria;
use crate::error::ExtractError;
use crate::fallback::KeywordParser;

const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.1;
const MAX_RETRIES: u32 = 3;

const SYSTEM_PROMPT: &str = r#"You are a helpful assistant that parses shopping queries into structured data.

Extract the following information from the user's query and return it as a JSON object:
- category: type of product (dress, jeans, shirt, shoes, jacket, etc.)
- color: color preference
- price_max: maximum price (extract numbers like $200, under 100, etc.)
- price_min: minimum price
- rating_min: minimum rating (if mentioned)

Rules:
1. Only include fields that are explicitly mentioned or clearly implied
2. For colors, use simple color names (red, blue, green, etc.)
3. For categories, use singular form (dress not dresses, shoe not shoes)
4. For prices, extract just the numeric value
5. If no specific criteria are mentioned, return an empty object {}

Examples:
- "Show me red dresses under $200" -> {"category": "dress", "color": "red", "price_max": 200}
- "I want blue jeans" -> {"category": "jeans", "color": "blue"}
- "Find shoes with good ratings" -> {"category": "shoes", "rating_min": 4.0}
- "Something cheap" -> {"price_max": 50}

Return only the JSON object, no other text."#;

// ─── API request/response types ─────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

// ─── Completion client ──────────────────────────────────────────

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint
pub struct CompletionClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    backoff: Duration,
}

impl CompletionClient {
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self, ExtractError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
            backoff: Duration::from_secs(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model to turn `query` into a JSON object; returns the raw reply text.
    pub fn complete(&self, query: &str) -> Result<String, ExtractError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let mut retries = 0;

        loop {
            let resp = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .header("X-Title", "Saleseer")
                .json(&request)
                .send()?;

            let status = resp.status();

            if status.is_success() {
                let body: ChatResponse = resp.json()?;
                let text = body
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default();
                if text.is_empty() {
                    return Err(ExtractError::EmptyReply);
                }
                return Ok(text);
            }

            // Retry on 429 (rate limit) or 5xx (server error)
            let should_retry = status.as_u16() == 429 || status.is_server_error();

            if should_retry && retries < MAX_RETRIES {
                retries += 1;
                let wait = self.backoff * (1 << retries); // 2s, 4s, 8s
                tracing::warn!(
                    "Completion API {} (attempt {}/{}), retrying in {:?}",
                    status,
                    retries,
                    MAX_RETRIES,
                    wait
                );
                std::thread::sleep(wait);
                continue;
            }

            let body = resp.text().unwrap_or_default();
            let msg = serde_json::from_str::<ApiError>(&body)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(ExtractError::Api(msg));
        }
    }
}

/// Turn a model reply into criteria.
///
/// The whole reply is tried as JSON first; failing that, the span from the
/// first `{` to the last `}` is parsed (covers prose or code fences around it).
pub fn parse_completion(text: &str) -> Result<Criteria, ExtractError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::EmptyReply);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => {
            let span = object_span(trimmed)
                .ok_or_else(|| ExtractError::NoJson(trimmed.chars().take(80).collect()))?;
            serde_json::from_str(span)?
        }
    };

    Criteria::from_json_value(&value)
}

fn object_span(text: &str) -> Option<&str> {
    let re = Regex::new(r"(?s)\{.*\}").ok()?;
    re.find(text).map(|m| m.as_str())
}

// ─── Extractor ──────────────────────────────────────────────────

/// Where a set of criteria came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    Model,
    Fallback,
}

impl ExtractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub criteria: Criteria,
    pub source: ExtractionSource,
}

/// Query-to-criteria front door: remote model first, keywords second
pub struct CriteriaExtractor {
    remote: Option<CompletionClient>,
    fallback: KeywordParser,
}

impl CriteriaExtractor {
    pub fn new(remote: Option<CompletionClient>) -> Self {
        Self {
            remote,
            fallback: KeywordParser::new(),
        }
    }

    /// Keyword parsing only, no network
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn from_config(config: &Config) -> Result<Self, ExtractError> {
        let remote = match config.api_key {
            Some(ref key) => Some(CompletionClient::new(key, &config.base_url, &config.model, config.timeout)?),
            None => None,
        };
        Ok(Self::new(remote))
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn extract(&self, query: &str) -> Extraction {
        let query = query.trim();
        if query.is_empty() {
            return Extraction {
                criteria: Criteria::default(),
                source: ExtractionSource::Fallback,
            };
        }

        let Some(ref remote) = self.remote else {
            return self.fallback_extraction(query);
        };

        match remote.complete(query).and_then(|text| parse_completion(&text)) {
            Ok(criteria) => {
                tracing::info!(model = remote.model(), ?criteria, "Extracted criteria");
                Extraction {
                    criteria,
                    source: ExtractionSource::Model,
                }
            }
            Err(e) => {
                tracing::warn!("Criteria extraction via {} failed, using keyword fallback: {}", remote.model(), e);
                self.fallback_extraction(query)
            }
        }
    }

    fn fallback_extraction(&self, query: &str) -> Extraction {
        Extraction {
            criteria: self.fallback.parse(query),
            source: ExtractionSource::Fallback,
        }
    }
}
