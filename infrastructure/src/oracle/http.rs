//! OpenAI-compatible chat-completions oracle

use crate::config::FileOracleConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use tutor_application::{OracleError, TextOracle};
use tutor_domain::core::string::preview;

/// Oracle backed by a `POST /v1/chat/completions` endpoint
pub struct HttpOracle {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f32>,
    timeout: Duration,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl HttpOracle {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            temperature: None,
            timeout: Duration::from_secs(120),
            max_retries: 2,
        }
    }

    /// Build from `[oracle]`, reading the API key from `api_key_env`
    pub fn from_config(config: &FileOracleConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            debug!("{} is not set; sending requests without auth", config.api_key_env);
        }
        let mut oracle = Self::new(&config.endpoint, &config.model)
            .with_timeout(Duration::from_secs(config.timeout_seconds))
            .with_max_retries(config.max_retries);
        oracle.api_key = api_key;
        oracle.temperature = config.temperature;
        oracle
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    fn payload(&self, prompt: &str) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if let Some(temperature) = self.temperature {
            payload["temperature"] = serde_json::json!(temperature);
        }
        payload
    }

    async fn send_once(&self, payload: &serde_json::Value) -> Result<String, OracleError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(classify)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OracleError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                preview(&body, 200)
            )));
        }

        let body = response.text().await.map_err(classify)?;
        extract_content(&body)
    }
}

/// Pull the first choice's message content out of a response body
fn extract_content(body: &str) -> Result<String, OracleError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| OracleError::InvalidResponse(format!("{} in {}", e, preview(body, 120))))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| OracleError::InvalidResponse("response has no message content".to_string()))
}

fn classify(e: reqwest::Error) -> OracleError {
    if e.is_timeout() {
        OracleError::Timeout
    } else if e.is_connect() {
        OracleError::Connection(e.to_string())
    } else {
        OracleError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl TextOracle for HttpOracle {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let payload = self.payload(prompt);
        let mut attempt = 0;
        loop {
            match self.send_once(&payload).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Oracle request failed ({}), retry {}/{} in {:?}",
                        e, attempt, self.max_retries, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
