//! Tone-flavoured narration and follow-up answers from an OpenAI-compatible
//! chat completion endpoint.

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use tinyweather_core::{with_retry, NarrationConfig, RetryConfig};

use crate::error::ForecastError;
use crate::tone::Tone;
use crate::types::WeatherSnapshot;

const FOLLOW_UP_MAX_TOKENS: u32 = 1024;

/// Turns a snapshot into free text in a given tone.
pub trait Narrator {
    /// Whether narration can be attempted at all (e.g. credentials present)
    fn is_available(&self) -> bool {
        true
    }

    fn narrate(
        &self,
        snapshot: &WeatherSnapshot,
        tone: &Tone,
    ) -> impl Future<Output = Result<String, ForecastError>> + Send;
}

#[derive(Debug, Clone)]
pub struct NarrationClient {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl NarrationClient {
    pub fn new(config: &NarrationConfig) -> Result<Self, ForecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            api_key: config.resolved_api_key(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn narrate(&self, snapshot: &WeatherSnapshot, tone: &Tone) -> Result<String, ForecastError> {
        let prompt = narration_prompt(snapshot, tone)?;
        let text = self.complete(&prompt, self.max_tokens).await?;
        tracing::info!("Generated {} narration ({} chars)", tone.id, text.len());
        Ok(text)
    }

    /// Answer a free-form question about the weather at `location`.
    pub async fn answer_follow_up(
        &self,
        question: &str,
        snapshot: &WeatherSnapshot,
        location: &str,
    ) -> Result<String, ForecastError> {
        let prompt = follow_up_prompt(question, snapshot, location)?;
        self.complete(&prompt, FOLLOW_UP_MAX_TOKENS).await
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ForecastError> {
        let api_key = self.api_key.as_deref().ok_or(ForecastError::MissingApiKey)?;

        let body = serde_json::json!({
            "max_tokens": max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
            "model": self.model,
            "temperature": self.temperature,
            "stream": false,
        });

        let response = with_retry(&self.retry, || {
            self.client
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(&body)
                .send()
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Narration request returned status {}", status);
            return Err(ForecastError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let json: Value =
            serde_json::from_str(&text).map_err(|e| ForecastError::Parse(e.to_string()))?;
        Ok(strip_think_blocks(&completion_text(&json)))
    }
}

impl Narrator for NarrationClient {
    fn is_available(&self) -> bool {
        self.has_api_key()
    }

    async fn narrate(&self, snapshot: &WeatherSnapshot, tone: &Tone) -> Result<String, ForecastError> {
        NarrationClient::narrate(self, snapshot, tone).await
    }
}

pub fn narration_prompt(snapshot: &WeatherSnapshot, tone: &Tone) -> Result<String, ForecastError> {
    let data = serde_json::to_string(snapshot)?;
    Ok(format!(
        "Here is weather data in JSON:\n{data}\n\n\
You are a weather reporter with the tone of {id}: {prompt}.\n\
Be clear, human-readable, and concise. Do not include thinking tags, only weather data, \
keep everything concise - 3 sentences max.\n",
        id = tone.id,
        prompt = tone.prompt,
    ))
}

pub fn follow_up_prompt(
    question: &str,
    snapshot: &WeatherSnapshot,
    location: &str,
) -> Result<String, ForecastError> {
    let data = serde_json::to_string(snapshot)?;
    Ok(format!(
        "Here is the current weather data for {location}:\n{data}\n\n\
User question: \"{question}\"\n\n\
Please provide a helpful, concise answer (2-3 sentences max) based on the weather data provided. \
Be practical and actionable in your response.\n"
    ))
}

/// `output_text` if present and non-empty, else the first choice's message
fn completion_text(json: &Value) -> String {
    json.get("output_text")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| json.pointer("/choices/0/message/content").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

#[allow(clippy::expect_used)]
static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think>.*?</think>").expect("think regex should compile"));

/// Remove `<think>...</think>` blocks (tags matched case-insensitively).
/// An unclosed `<think>` is left as is.
pub fn strip_think_blocks(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").trim().to_string()
}
