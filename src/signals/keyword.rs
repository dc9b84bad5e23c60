// Keyword signal producer — lexical fallback that needs no network.
//
// Scores come purely from substring matches on the lower-cased content.
// Platform-specific rules are not applied here; the engine runs them once
// for every producer.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::traits::{RawSignals, SignalProducer};
use crate::moderation::models::{CategoryScores, Platform};

const TOXIC_WORDS: [&str; 11] = [
    "idiot", "stupid", "garbage", "trash", "braindead", "moron", "fuck", "shit", "bitch",
    "asshole", "damn",
];

const SEVERE_PHRASES: [&str; 4] = [
    "fuck you",
    "motherfucker",
    "go fuck yourself",
    "kill yourself",
];

const HARASSMENT_PATTERNS: [&str; 3] = ["you are", "you're a", "anyone who believes"];

const VIOLENT_WORDS: [&str; 5] = ["destroy", "kill", "burn", "attack", "fight"];

const POSITIVE_MARKERS: [&str; 3] = ["great article", "thank you", "helpful"];

const TOXIC_WORD_POINTS: f64 = 30.0;
const SEVERE_TOXICITY_POINTS: f64 = 60.0;
const SEVERE_HARASSMENT_POINTS: f64 = 50.0;
const HARASSMENT_PATTERN_POINTS: f64 = 30.0;
const VIOLENT_WORD_POINTS: f64 = 20.0;

/// Keyword-list scorer. Stateless; construct with `KeywordProducer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordProducer;

impl KeywordProducer {
    /// Score content synchronously. `produce` is a thin async wrapper.
    pub fn score(&self, content: &str) -> RawSignals {
        let text = content.to_lowercase();
        let mut scores = CategoryScores::default();
        let mut flagged = Vec::new();

        for word in TOXIC_WORDS {
            if text.contains(word) {
                scores.toxicity += TOXIC_WORD_POINTS;
                flagged.push(word.to_string());
            }
        }

        for phrase in SEVERE_PHRASES {
            if text.contains(phrase) {
                scores.toxicity += SEVERE_TOXICITY_POINTS;
                scores.harassment += SEVERE_HARASSMENT_POINTS;
                flagged.push(phrase.to_string());
            }
        }

        // Second person plus an insult reads as a personal attack
        for pattern in HARASSMENT_PATTERNS {
            if text.contains(pattern) && scores.toxicity > 0.0 {
                scores.harassment += HARASSMENT_PATTERN_POINTS;
            }
        }

        for word in VIOLENT_WORDS {
            if text.contains(word) {
                scores.violence += VIOLENT_WORD_POINTS;
                flagged.push(word.to_string());
            }
        }

        let positive = POSITIVE_MARKERS.iter().any(|m| text.contains(m));

        debug!(
            toxicity = scores.toxicity,
            harassment = scores.harassment,
            violence = scores.violence,
            positive,
            hits = flagged.len(),
            "Keyword scan complete"
        );

        RawSignals {
            categories: scores.clamped(),
            flagged_phrases: flagged,
            positive,
            ..Default::default()
        }
    }
}

#[async_trait]
impl SignalProducer for KeywordProducer {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn produce(
        &self,
        content: &str,
        _platform: Platform,
        _context: Option<&str>,
    ) -> Result<RawSignals> {
        Ok(self.score(content))
    }
}
