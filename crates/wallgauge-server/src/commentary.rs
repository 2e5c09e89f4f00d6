//! Chat-completion client for the optional measurement commentary.
//!
//! Commentary is best effort: every failure is logged and reported to the
//! caller as `None`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wallgauge::{commentary_prompt, MeasurementReport, SYSTEM_PROMPT};

use crate::config::Config;

#[derive(Debug, Error)]
enum CommentaryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("reply had no text")]
    Empty,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Chat-completion client.
#[derive(Debug, Clone)]
pub struct CommentaryClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl CommentaryClient {
    /// Client for the configured service, or `None` when no API key is set.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.openai_api_key.clone()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()
            .map_err(|e| tracing::warn!(error = %e, "commentary client unavailable"))
            .ok()?;
        Some(Self {
            http,
            api_key,
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Commentary text for a report; `None` on any failure.
    pub async fn describe(&self, report: &MeasurementReport) -> Option<String> {
        match self.request(report).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "commentary unavailable");
                None
            }
        }
    }

    async fn request(&self, report: &MeasurementReport) -> Result<String, CommentaryError> {
        let prompt = commentary_prompt(report);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.2,
            max_tokens: 300,
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(CommentaryError::Status(resp.status()));
        }

        let reply: ChatResponse = resp.json().await?;
        reply_text(reply).ok_or(CommentaryError::Empty)
    }
}

fn reply_text(reply: ChatResponse) -> Option<String> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
