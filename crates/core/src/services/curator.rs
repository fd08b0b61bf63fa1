//! AI curator service.
//!
//! Talks to an OpenAI-compatible chat completion API to suggest comments and
//! draft artwork descriptions. The primary model is tried first, then each
//! fallback in order.

use std::time::Duration;

use atelier_common::{config::AiConfig, AppError, AppResult};
use serde::Deserialize;
use serde_json::json;

/// Service wrapping the chat completion API.
#[derive(Clone)]
pub struct CuratorService {
    config: AiConfig,
    http_client: reqwest::Client,
}

impl CuratorService {
    /// Create a new curator service.
    pub fn new(config: AiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Whether a key is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Suggest short comments a visitor could leave on an artwork.
    pub async fn suggest_comments(
        &self,
        title: &str,
        artist: &str,
        style: &str,
    ) -> AppResult<Vec<String>> {
        let prompt = format!(
            "You are a friendly art community member. Suggest 3 short, specific, \
             positive comments (under 15 words each) a visitor could leave on the \
             {style} artwork \"{title}\" by {artist}. One comment per line, no \
             numbering, no extra text."
        );

        let raw = self.complete(&prompt).await?;

        let suggestions: Vec<String> = raw
            .lines()
            .map(clean_suggestion)
            .filter(|s| !s.is_empty())
            .take(5)
            .collect();

        if suggestions.is_empty() {
            return Err(AppError::ExternalService(
                "Curator returned no suggestions".to_string(),
            ));
        }
        Ok(suggestions)
    }

    /// Draft a description for an artwork.
    pub async fn generate_description(
        &self,
        title: &str,
        style: &str,
        category: Option<&str>,
    ) -> AppResult<String> {
        let context = category.map_or_else(String::new, |c| format!(" in the {c} category"));
        let prompt = format!(
            "Write a 2-3 sentence gallery description for a {style} artwork titled \
             \"{title}\"{context}. Write only the description, no preamble."
        );

        let text = self.complete(&prompt).await?;
        Ok(text.trim().to_string())
    }

    /// Run a prompt through the configured models, first success wins.
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("AI curator is not configured".to_string()))?;

        let mut models = vec![self.config.model.as_str()];
        models.extend(self.config.fallback_models.iter().map(String::as_str));

        let mut last_err = AppError::ExternalService("No curator models configured".to_string());
        for model in models {
            match self.complete_with_model(api_key, model, prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!(model = model, error = %e, "Curator model failed, trying next");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    async fn complete_with_model(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> AppResult<String> {
        let body = json!({
            "model": model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.7,
            "max_tokens": 500,
        });

        let response = self
            .http_client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Curator request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Curator API error: {status} - {body}"
            )));
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        #[derive(Deserialize)]
        struct ChatMessage {
            content: String,
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse curator response: {e}"))
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ExternalService("No completion returned".to_string()))?
            .message
            .content;

        Ok(strip_markdown(&content))
    }
}

/// Remove code fences models sometimes wrap their answers in.
fn strip_markdown(text: &str) -> String {
    let trimmed = text.trim();
    let without_fences = trimmed
        .strip_prefix("```")
        .map(|rest| {
            // Drop an optional language tag on the opening fence
            let rest = rest.split_once('\n').map_or(rest, |(_, body)| body);
            rest.strip_suffix("```").unwrap_or(rest)
        })
        .unwrap_or(trimmed);
    without_fences.trim().to_string()
}

/// Normalize one suggestion line: drop list markers and surrounding quotes.
fn clean_suggestion(line: &str) -> String {
    line.trim()
        .trim_start_matches(|c: char| {
            c.is_ascii_digit() || matches!(c, '.' | '-' | '•' | '*' | ')' | ' ')
        })
        .trim_matches('"')
        .trim()
        .to_string()
}
