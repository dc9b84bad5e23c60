// Signal producer trait — the swap-ready abstraction.
//
// Every source of raw category scores (keyword heuristics, OpenAI's
// moderation endpoint, Perspective, a prompted LLM) implements this one
// trait. Platform adjustment and the allow/review/block decision live in
// `moderation` and are shared by all of them.

use anyhow::Result;
use async_trait::async_trait;

use crate::moderation::models::{CategoryScores, Platform};

/// Raw output of one signal producer for one piece of content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSignals {
    /// Scores on the 0-100 scale. Producers with 0-1 outputs scale up.
    pub categories: CategoryScores,
    /// Excerpts or labels that contributed to a score bump, in detection order.
    pub flagged_phrases: Vec<String>,
    /// The upstream's own boolean verdict, if it has one.
    pub flagged: Option<bool>,
    /// Whether the upstream judged the content appropriate for its context.
    pub context_appropriate: Option<bool>,
    /// Content carries clearly positive markers. Triggers the positive
    /// override during aggregation.
    pub positive: bool,
    /// Free-text explanation from the upstream, if any.
    pub reasoning: Option<String>,
}

impl RawSignals {
    pub fn from_scores(categories: CategoryScores) -> Self {
        Self {
            categories,
            ..Default::default()
        }
    }

    /// True when the upstream raised any concern of its own.
    pub fn raised_concern(&self) -> bool {
        self.flagged == Some(true) || self.context_appropriate == Some(false)
    }
}

/// Trait for producing raw category scores. Implementations are async
/// because most providers require HTTP API calls.
#[async_trait]
pub trait SignalProducer: Send + Sync {
    /// Short identifier used in logs and failure reasoning.
    fn name(&self) -> &'static str;

    /// Score a single piece of content.
    async fn produce(
        &self,
        content: &str,
        platform: Platform,
        context: Option<&str>,
    ) -> Result<RawSignals>;
}
