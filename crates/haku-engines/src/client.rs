// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for one configured engine.
//!
//! [`HttpEngine`] builds the request body for its wire protocol, sends it
//! once, and maps every failure onto a [`ProviderErrorKind`]. There are no
//! retries and no fallback text: the caller sees the failure.

use std::time::Duration;

use haku_config::{EngineConfig, EngineKind};
use haku_core::{HakuError, ProviderErrorKind};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{
    AnthropicRequest, AnthropicResponse, ApiErrorResponse, ChatCompletionRequest,
    ChatCompletionResponse, ChatMessage, GeminiContent, GeminiGenerationConfig, GeminiPart,
    GeminiRequest, GeminiResponse, OllamaOptions, OllamaRequest, OllamaResponse,
};

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Resolve an engine's API key: inline value first, then the named env var.
pub fn resolve_api_key(config: &EngineConfig) -> Option<String> {
    config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| {
            config
                .api_key_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok())
                .filter(|k| !k.trim().is_empty())
        })
}

/// A single engine reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    id: String,
    kind: EngineKind,
    model: String,
    max_tokens: u32,
    base_url: String,
    has_key: bool,
    client: reqwest::Client,
}

impl HttpEngine {
    /// Build the client for one engine.
    ///
    /// A missing API key is not an error here; calls to a hosted engine
    /// without a key fail with an authentication error instead, so a config
    /// can list engines the operator never uses.
    pub fn new(config: &EngineConfig, timeout: Duration) -> Result<Self, HakuError> {
        let api_key = resolve_api_key(config);
        let headers = auth_headers(config, api_key.as_deref())?;

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| HakuError::Provider {
                engine: config.id.clone(),
                kind: ProviderErrorKind::Transport,
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(config.kind).to_string());

        Ok(Self {
            id: config.id.clone(),
            kind: config.kind,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
            has_key: api_key.is_some(),
            client,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint the request is posted to.
    pub fn endpoint(&self) -> String {
        match self.kind {
            EngineKind::Anthropic => format!("{}/messages", self.base_url),
            EngineKind::OpenAi => format!("{}/chat/completions", self.base_url),
            EngineKind::Gemini => {
                format!("{}/models/{}:generateContent", self.base_url, self.model)
            }
            EngineKind::Ollama => format!("{}/api/generate", self.base_url),
        }
    }

    /// Send one completion request and return the response text.
    pub async fn complete(&self, system_context: &str, user_text: &str) -> Result<String, HakuError> {
        if !self.has_key && self.kind != EngineKind::Ollama {
            return Err(self.error(
                ProviderErrorKind::Authentication,
                "no API key configured (set api_key or api_key_env)",
            ));
        }

        let system = Some(system_context.to_string()).filter(|s| !s.trim().is_empty());

        match self.kind {
            EngineKind::Anthropic => {
                let body = AnthropicRequest {
                    model: self.model.clone(),
                    max_tokens: self.max_tokens,
                    system,
                    messages: vec![ChatMessage::new("user", user_text)],
                };
                let resp: AnthropicResponse = self.post(&body).await?;
                let text: String = resp
                    .content
                    .into_iter()
                    .filter(|b| b.block_type == "text")
                    .filter_map(|b| b.text)
                    .collect::<Vec<_>>()
                    .join("");
                self.non_empty(text)
            }
            EngineKind::OpenAi => {
                let mut messages = Vec::with_capacity(2);
                if let Some(system) = &system {
                    messages.push(ChatMessage::new("system", system));
                }
                messages.push(ChatMessage::new("user", user_text));
                let body = ChatCompletionRequest {
                    model: self.model.clone(),
                    max_tokens: self.max_tokens,
                    messages,
                };
                let resp: ChatCompletionResponse = self.post(&body).await?;
                let text = resp
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .unwrap_or_default();
                self.non_empty(text)
            }
            EngineKind::Gemini => {
                let body = GeminiRequest {
                    system_instruction: system.map(|text| GeminiContent {
                        role: None,
                        parts: vec![GeminiPart { text }],
                    }),
                    contents: vec![GeminiContent {
                        role: Some("user".to_string()),
                        parts: vec![GeminiPart {
                            text: user_text.to_string(),
                        }],
                    }],
                    generation_config: GeminiGenerationConfig {
                        max_output_tokens: self.max_tokens,
                    },
                };
                let resp: GeminiResponse = self.post(&body).await?;
                let text = resp
                    .candidates
                    .into_iter()
                    .next()
                    .map(|c| {
                        c.content
                            .parts
                            .into_iter()
                            .map(|p| p.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default();
                self.non_empty(text)
            }
            EngineKind::Ollama => {
                let body = OllamaRequest {
                    model: self.model.clone(),
                    prompt: user_text.to_string(),
                    system,
                    stream: false,
                    options: OllamaOptions {
                        num_predict: self.max_tokens,
                    },
                };
                let resp: OllamaResponse = self.post(&body).await?;
                self.non_empty(resp.response)
            }
        }
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, body: &B) -> Result<R, HakuError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(engine = self.id.as_str(), status = %status, "engine response received");

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => match api_err.error.type_ {
                    Some(t) => format!("{t}: {}", api_err.error.message),
                    None => api_err.error.message,
                },
                Err(_) => body,
            };
            let kind = status_kind(status);
            warn!(engine = self.id.as_str(), status = %status, kind = %kind, "engine call failed");
            return Err(self.error(kind, format!("API returned {status}: {detail}")));
        }

        serde_json::from_str(&body).map_err(|e| HakuError::Provider {
            engine: self.id.clone(),
            kind: ProviderErrorKind::Api,
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn non_empty(&self, text: String) -> Result<String, HakuError> {
        if text.trim().is_empty() {
            Err(self.error(ProviderErrorKind::Api, "response contained no text"))
        } else {
            Ok(text)
        }
    }

    fn error(&self, kind: ProviderErrorKind, message: impl Into<String>) -> HakuError {
        HakuError::provider(self.id.clone(), kind, message)
    }

    fn transport_error(&self, e: reqwest::Error) -> HakuError {
        let kind = if e.is_timeout() {
            ProviderErrorKind::Timeout
        } else {
            ProviderErrorKind::Transport
        };
        warn!(engine = self.id.as_str(), kind = %kind, error = %e, "engine request failed");
        HakuError::Provider {
            engine: self.id.clone(),
            kind,
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

fn default_base_url(kind: EngineKind) -> &'static str {
    match kind {
        EngineKind::Anthropic => ANTHROPIC_BASE_URL,
        EngineKind::OpenAi => OPENAI_BASE_URL,
        EngineKind::Gemini => GEMINI_BASE_URL,
        EngineKind::Ollama => OLLAMA_BASE_URL,
    }
}

fn auth_headers(config: &EngineConfig, api_key: Option<&str>) -> Result<HeaderMap, HakuError> {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));

    let Some(key) = api_key else {
        return Ok(headers);
    };
    let value = |raw: String| {
        let mut v = HeaderValue::from_str(&raw).map_err(|e| {
            HakuError::Config(format!("engine `{}`: invalid API key header value: {e}", config.id))
        })?;
        v.set_sensitive(true);
        Ok::<_, HakuError>(v)
    };

    match config.kind {
        EngineKind::Anthropic => {
            headers.insert("x-api-key", value(key.to_string())?);
            headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        }
        EngineKind::OpenAi | EngineKind::Ollama => {
            headers.insert("authorization", value(format!("Bearer {key}"))?);
        }
        EngineKind::Gemini => {
            headers.insert("x-goog-api-key", value(key.to_string())?);
        }
    }
    Ok(headers)
}

/// Map an HTTP status onto a provider error kind.
pub fn status_kind(status: StatusCode) -> ProviderErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderErrorKind::Authentication,
        StatusCode::TOO_MANY_REQUESTS => ProviderErrorKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderErrorKind::Timeout,
        _ => ProviderErrorKind::Api,
    }
}
