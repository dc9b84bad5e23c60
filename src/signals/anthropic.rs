// Prompt-based signal producer backed by Anthropic's Messages API.
//
// The model is asked for a single JSON object with per-category scores,
// reasoning and flagged phrases. The prompt carries platform guidelines and
// any house rules from ModeratorConfig. The reply is scores only: the
// model's own allow/block suggestion is reduced to the `flagged` hint and
// the decision still goes through the shared engine.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{RawSignals, SignalProducer};
use crate::moderation::error::MalformedResponse;
use crate::moderation::models::{CategoryScores, Platform};

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 500;

// First '{' through last '}' across lines
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON object pattern is valid"));

pub struct AnthropicProducer {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    custom_rules: Vec<String>,
}

impl AnthropicProducer {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            custom_rules: Vec::new(),
        }
    }

    /// Extra house rules appended to the platform guidelines.
    pub fn with_custom_rules(mut self, rules: Vec<String>) -> Self {
        self.custom_rules = rules;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SignalProducer for AnthropicProducer {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn produce(
        &self,
        content: &str,
        platform: Platform,
        context: Option<&str>,
    ) -> Result<RawSignals> {
        let prompt = build_prompt(content, platform, context, &self.custom_rules);

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .context("Failed to call Anthropic Messages API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic Messages API returned {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read Anthropic response")?;
        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| MalformedResponse::new("anthropic", e.to_string()))?;

        let text = parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .unwrap_or_default();

        let signals = parse_verdict(&text)?;
        debug!(
            max_score = signals.categories.max_score(),
            flagged = ?signals.flagged,
            "Anthropic verdict parsed"
        );
        Ok(signals)
    }
}

fn platform_guidelines(platform: Platform) -> &'static str {
    match platform {
        Platform::CharacterAi => {
            "- Roleplay and fantasy content is generally acceptable\n\
             - Fictional violence in context is allowed\n\
             - Real threats or harassment are not allowed\n\
             - Consider the creative/fictional nature"
        }
        Platform::Substack => {
            "- Political discourse and criticism of ideas is allowed\n\
             - Personal attacks on individuals are not allowed\n\
             - Constructive debate is encouraged\n\
             - Distinguish between criticism and harassment"
        }
        Platform::Upwork => {
            "- Professional communication expected\n\
             - Detect spam: unrealistic pricing (like $5 for complex projects)\n\
             - Flag off-platform contact attempts (WhatsApp, etc.)\n\
             - Identify fake credentials or too-good-to-be-true claims"
        }
        Platform::Faire => {
            "- Product descriptions should be authentic\n\
             - Flag dropshipping indicators\n\
             - Detect misleading product claims\n\
             - Professional marketplace standards"
        }
        Platform::Eventbrite | Platform::General => {
            "- General community standards\n\
             - No harassment, hate speech, or explicit content\n\
             - Allow constructive discussion"
        }
    }
}

fn build_prompt(
    content: &str,
    platform: Platform,
    context: Option<&str>,
    custom_rules: &[String],
) -> String {
    let mut guidelines = platform_guidelines(platform).to_string();
    for rule in custom_rules {
        guidelines.push_str("\n- ");
        guidelines.push_str(rule);
    }

    format!(
        "You are an expert content moderator for {platform}. Analyze this content and \
         respond with ONLY a JSON object.\n\n\
         Content to analyze: \"{content}\"\n\
         Context: \"{context}\"\n\n\
         Platform-specific guidelines:\n{guidelines}\n\n\
         Respond with ONLY this JSON format:\n\
         {{\n  \"allowed\": true/false,\n  \"context_appropriate\": true/false,\n  \
         \"toxicity\": 0-100,\n  \"spam\": 0-100,\n  \
         \"harassment\": 0-100,\n  \"hate_speech\": 0-100,\n  \"sexual_content\": 0-100,\n  \
         \"violence\": 0-100,\n  \"misinformation\": 0-100,\n  \
         \"reasoning\": \"brief explanation\",\n  \
         \"flagged_phrases\": [\"phrase1\", \"phrase2\"]\n}}",
        context = context.unwrap_or(""),
    )
}

/// Pull the JSON verdict out of the model's reply text.
fn parse_verdict(text: &str) -> Result<RawSignals, MalformedResponse> {
    let json = JSON_OBJECT_RE
        .find(text)
        .ok_or_else(|| MalformedResponse::new("anthropic", "no JSON object in reply"))?;
    let verdict: Verdict = serde_json::from_str(json.as_str())
        .map_err(|e| MalformedResponse::new("anthropic", e.to_string()))?;

    Ok(RawSignals {
        categories: verdict.scores.clamped(),
        flagged_phrases: verdict.flagged_phrases,
        flagged: verdict.allowed.map(|allowed| !allowed),
        context_appropriate: verdict.context_appropriate,
        reasoning: verdict.reasoning,
        ..Default::default()
    })
}

// --- Messages API request/response types ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// The JSON object the prompt asks for. Category keys sit at the top level.
#[derive(Deserialize)]
struct Verdict {
    allowed: Option<bool>,
    /// Whether the content fits the stated context and platform norms.
    context_appropriate: Option<bool>,
    #[serde(flatten)]
    scores: CategoryScores,
    reasoning: Option<String>,
    #[serde(default)]
    flagged_phrases: Vec<String>,
}
