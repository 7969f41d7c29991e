//! OpenAI-backed classifier client.
//!
//! `classify` maps onto the moderations endpoint; `detect_profanity` asks
//! a chat model for a JSON profanity determination. Every request carries
//! a bounded timeout; exceeding it surfaces as `ClassifierError::Timeout`
//! and the pipeline fails closed.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::classifier::{Classification, ClassifierError, ContentClassifier, ProfanityReport};

const MODERATIONS_URL: &str = "https://api.openai.com/v1/moderations";
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const PROFANITY_MODEL: &str = "gpt-3.5-turbo";

const PROFANITY_SYSTEM_PROMPT: &str = "You are a profanity detector. Respond with JSON \
    indicating if the input contains any profanity, slurs, or offensive language. \
    Format: { \"containsProfanity\": boolean, \"reason\": string }";

/// OpenAI-backed implementation of [`ContentClassifier`].
pub struct OpenAiClassifier {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiClassifier {
    /// Build a client with the given per-request timeout.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;
        Ok(OpenAiClassifier { client, api_key })
    }

    /// Build from `OPENAI_API_KEY`, with `OPENAI_TIMEOUT_SECS` (default 10)
    /// bounding each call.
    pub fn from_env() -> Result<Self, ClassifierError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ClassifierError::Transport("OPENAI_API_KEY is not set".to_string()))?;
        let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        Self::new(api_key.trim().to_string(), Duration::from_secs(timeout_secs))
    }

    async fn post(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ClassifierError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout
                } else {
                    ClassifierError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Transport(format!(
                "{url} returned {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
    category_scores: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ProfanityAnswer {
    #[serde(rename = "containsProfanity")]
    contains_profanity: bool,
    #[serde(default)]
    reason: String,
}

#[async_trait]
impl ContentClassifier for OpenAiClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        debug!("sending moderation request");
        let raw = self
            .post(MODERATIONS_URL, json!({ "input": text }))
            .await?;

        let parsed: ModerationResponse = serde_json::from_value(raw)
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;
        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ClassifierError::Malformed("empty results array".to_string()))?;

        let category_scores = result
            .category_scores
            .into_iter()
            .filter_map(|(category, score)| score.as_f64().map(|s| (category, s)))
            .collect();

        Ok(Classification {
            flagged: result.flagged,
            category_scores,
        })
    }

    async fn detect_profanity(&self, text: &str) -> Result<ProfanityReport, ClassifierError> {
        debug!("sending profanity determination request");
        let body = json!({
            "model": PROFANITY_MODEL,
            "messages": [
                { "role": "system", "content": PROFANITY_SYSTEM_PROMPT },
                { "role": "user", "content": text }
            ],
            "response_format": { "type": "json_object" }
        });

        let raw = self.post(CHAT_COMPLETIONS_URL, body).await?;

        let content = raw["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ClassifierError::Malformed("missing message content".to_string()))?;

        let answer: ProfanityAnswer = serde_json::from_str(content)
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        Ok(ProfanityReport {
            is_profane: answer.contains_profanity,
            reason: answer.reason,
        })
    }
}
