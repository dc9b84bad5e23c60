// Google Perspective API signal producer.
//
// Perspective scores text on several attributes from 0.0 to 1.0. We request
// the ones that map onto our categories and scale them to 0-100:
//
//   TOXICITY          -> toxicity
//   IDENTITY_ATTACK   -> hate_speech
//   INSULT            -> harassment
//   THREAT            -> violence
//   SEXUALLY_EXPLICIT -> sexual_content
//
// Spam and misinformation are not covered and stay at 0. The free tier is
// rate-limited to ~1 QPS.
//
// API docs: https://developers.perspectiveapi.com/s/about-the-api-methods

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::{RawSignals, SignalProducer};
use crate::moderation::error::MalformedResponse;
use crate::moderation::models::{Category, CategoryScores, Platform};
use crate::output::truncate_chars;

const DEFAULT_ENDPOINT: &str = "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze";

/// Attributes above this (0-1 scale) are reported as flagged phrases.
const FLAG_THRESHOLD: f64 = 0.7;

/// Perspective API producer.
pub struct PerspectiveProducer {
    client: Client,
    api_key: String,
    endpoint: String,
    rate_limiter: RateLimiter,
}

impl PerspectiveProducer {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            // Perspective free tier: 1 query per second
            rate_limiter: RateLimiter::new(1.0),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SignalProducer for PerspectiveProducer {
    fn name(&self) -> &'static str {
        "perspective"
    }

    async fn produce(
        &self,
        content: &str,
        _platform: Platform,
        _context: Option<&str>,
    ) -> Result<RawSignals> {
        self.rate_limiter.acquire().await;

        let request = PerspectiveRequest {
            comment: Comment {
                text: content.to_string(),
            },
            requested_attributes: RequestedAttributes {
                toxicity: AttributeConfig {},
                identity_attack: AttributeConfig {},
                insult: AttributeConfig {},
                threat: AttributeConfig {},
                sexually_explicit: AttributeConfig {},
            },
            languages: vec!["en".to_string()],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("Failed to call Perspective API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Perspective API returned {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read Perspective API response")?;
        let parsed: PerspectiveResponse = serde_json::from_str(&body)
            .map_err(|e| MalformedResponse::new("perspective", e.to_string()))?;

        let signals = signals_from_response(&parsed);

        debug!(
            toxicity = signals.categories.toxicity,
            hate_speech = signals.categories.hate_speech,
            harassment = signals.categories.harassment,
            text_preview = %truncate_chars(content, 50),
            "Scored text"
        );

        Ok(signals)
    }
}

/// Map attribute summary scores onto categories.
fn signals_from_response(response: &PerspectiveResponse) -> RawSignals {
    let mut categories = CategoryScores::default();
    let mut flagged_phrases = Vec::new();

    for (attribute, target) in ATTRIBUTE_MAP {
        let Some(value) = extract_score(response, attribute) else {
            continue;
        };
        *categories.get_mut(target) = value * 100.0;
        if value >= FLAG_THRESHOLD {
            flagged_phrases.push(attribute.to_lowercase());
        }
    }

    let flagged = !flagged_phrases.is_empty();
    RawSignals {
        categories: categories.clamped(),
        flagged_phrases,
        flagged: Some(flagged),
        ..Default::default()
    }
}

const ATTRIBUTE_MAP: [(&str, Category); 5] = [
    ("TOXICITY", Category::Toxicity),
    ("IDENTITY_ATTACK", Category::HateSpeech),
    ("INSULT", Category::Harassment),
    ("THREAT", Category::Violence),
    ("SEXUALLY_EXPLICIT", Category::SexualContent),
];

/// Extract a specific attribute's summary score from the API response.
fn extract_score(response: &PerspectiveResponse, attribute: &str) -> Option<f64> {
    response
        .attribute_scores
        .get(attribute)
        .map(|score| score.summary_score.value)
}

// --- Perspective API request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PerspectiveRequest {
    comment: Comment,
    requested_attributes: RequestedAttributes,
    languages: Vec<String>,
}

#[derive(Serialize)]
struct Comment {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RequestedAttributes {
    toxicity: AttributeConfig,
    identity_attack: AttributeConfig,
    insult: AttributeConfig,
    threat: AttributeConfig,
    sexually_explicit: AttributeConfig,
}

#[derive(Serialize)]
struct AttributeConfig {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerspectiveResponse {
    attribute_scores: HashMap<String, AttributeScore>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeScore {
    summary_score: SummaryScore,
}

#[derive(Deserialize)]
struct SummaryScore {
    value: f64,
}
