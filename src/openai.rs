//! Chat-completions summarizer
//!
//! Sends the monthly condensation of the feed to an OpenAI-compatible
//! `/chat/completions` endpoint and normalizes whatever comes back.

use crate::config::SummarizerConfig;
use crate::models::{AiInsight, DailyAggregate, UnitMode};
use crate::summarizer::{normalize_response, Summarizer, SummaryRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::env;
use tracing::{debug, info};

const SYSTEM_PROMPT: &str = "You are an energy analyst. Using the monthly energy data provided, \
reply with a JSON object {\"insights\": [...]} holding exactly 3 insights. Each insight has \
title, description, icon (one of trending_up, calendar_today, warning, lightbulb, savings, \
schedule, eco), actionItems (1-2 strings) and historicalContext.";

pub struct OpenAiSummarizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiSummarizer {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            temperature: 0.3,
            max_tokens: 1000,
        }
    }

    /// Build from configuration; the key is read from the environment variable the
    /// configuration names.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env)
            .with_context(|| format!("{} is not set", config.api_key_env))?;

        let mut summarizer = Self::new(&config.endpoint, &config.model, Some(api_key));
        summarizer.temperature = config.temperature;
        summarizer.max_tokens = config.max_tokens;
        Ok(summarizer)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, daily: &[DailyAggregate], mode: UnitMode) -> Result<Vec<AiInsight>> {
        let request = SummaryRequest::new(daily, mode);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": serde_json::to_string(&request)? },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": { "type": "json_object" },
        });

        info!(months = request.monthly_data.len(), %mode, "Requesting insights");

        let mut builder = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to reach insight service")?
            .error_for_status()
            .context("Insight service returned an error status")?;

        let payload: Value = response
            .json()
            .await
            .context("Failed to parse insight service JSON")?;

        match payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            Some(content) => Ok(normalize_response(content)),
            None => {
                debug!("Insight service reply had no message content");
                Ok(Vec::new())
            }
        }
    }
}
