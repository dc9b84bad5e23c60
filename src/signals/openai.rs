// OpenAI moderation endpoint signal producer.
//
// The endpoint returns per-category probabilities (0-1) and a boolean
// `flagged`. It has no notion of spam or misinformation, and no separate
// "toxicity" score; hateful content is the closest proxy, so `hate` feeds
// both toxicity and hate_speech.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{RawSignals, SignalProducer};
use crate::moderation::error::MalformedResponse;
use crate::moderation::models::{CategoryScores, Platform};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/moderations";

pub struct OpenAiModerationProducer {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiModerationProducer {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SignalProducer for OpenAiModerationProducer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn produce(
        &self,
        content: &str,
        _platform: Platform,
        _context: Option<&str>,
    ) -> Result<RawSignals> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&ModerationRequest { input: content })
            .send()
            .await
            .context("Failed to call OpenAI moderation API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI moderation API returned {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read OpenAI moderation response")?;
        let signals = parse_response(&body)?;

        debug!(
            flagged = ?signals.flagged,
            max_score = signals.categories.max_score(),
            "OpenAI moderation scored text"
        );

        Ok(signals)
    }
}

/// Convert a raw moderation response body into signals.
fn parse_response(body: &str) -> Result<RawSignals, MalformedResponse> {
    let parsed: ModerationResponse =
        serde_json::from_str(body).map_err(|e| MalformedResponse::new("openai", e.to_string()))?;
    let result = parsed
        .results
        .into_iter()
        .next()
        .ok_or_else(|| MalformedResponse::new("openai", "response contained no results"))?;

    let scores = result.category_scores;
    let categories = CategoryScores {
        toxicity: scores.hate * 100.0,
        harassment: scores.harassment * 100.0,
        hate_speech: scores.hate * 100.0,
        sexual_content: scores.sexual * 100.0,
        violence: scores.violence * 100.0,
        ..Default::default()
    };

    let flagged_phrases = result
        .categories
        .into_iter()
        .filter(|(_, hit)| *hit)
        .map(|(name, _)| name)
        .collect();

    Ok(RawSignals {
        categories: categories.clamped(),
        flagged_phrases,
        flagged: Some(result.flagged),
        ..Default::default()
    })
}

// --- OpenAI moderation request/response types ---

#[derive(Serialize)]
struct ModerationRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationEntry>,
}

#[derive(Deserialize)]
struct ModerationEntry {
    flagged: bool,
    /// Boolean verdict per category, keyed by OpenAI's category names.
    /// A BTreeMap keeps flagged labels in a stable order.
    #[serde(default)]
    categories: std::collections::BTreeMap<String, bool>,
    category_scores: CategoryProbabilities,
}

#[derive(Deserialize)]
struct CategoryProbabilities {
    #[serde(default)]
    hate: f64,
    #[serde(default)]
    harassment: f64,
    #[serde(default)]
    sexual: f64,
    #[serde(default)]
    violence: f64,
}
