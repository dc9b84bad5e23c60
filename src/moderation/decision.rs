// Decision aggregator.
//
// Turns final category scores into an allow/review/block decision with a
// confidence. Thresholds come from the configured strictness; roleplay
// platforms get extra headroom. Three tiers on the highest category score:
//
//   max >  threshold + 20  -> block  (high confidence)
//   max >= threshold       -> review (medium confidence)
//   otherwise              -> allow  (confidence grows with signal agreement)

use super::error::SignalFailure;
use super::models::{CategoryScores, ModerationResult, Platform, Strictness, SuggestedAction};
use crate::signals::traits::RawSignals;

/// Extra threshold headroom on roleplay platforms.
pub const ROLEPLAY_LENIENCY: f64 = 10.0;
/// Distance above the threshold at which review escalates to block.
pub const BLOCK_MARGIN: f64 = 20.0;
/// A category above this counts as an agreeing signal for confidence.
pub const SIGNAL_FLOOR: f64 = 20.0;

pub const POSITIVE_CAP: f64 = 5.0;
pub const POSITIVE_CONFIDENCE: u32 = 95;

const REASON_BLOCK: &str = "Content violates community guidelines with high confidence.";
const REASON_REVIEW: &str = "Content may violate community guidelines and requires human review.";
const REASON_MINOR: &str =
    "Content has minor concerns but appears acceptable within community standards.";
const REASON_CLEAN: &str = "Content appears constructive and appropriate for the platform.";
const REASON_POSITIVE: &str = "Content is clearly positive and constructive.";

/// Raw signals from every producer folded into one set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSignals {
    pub categories: CategoryScores,
    pub flagged_phrases: Vec<String>,
    pub raised_concern: bool,
    pub positive: bool,
    pub reasoning: Vec<String>,
}

/// Combine signal sets: the most cautious score per category wins, flagged
/// phrases are concatenated in producer order.
pub fn merge(signals: &[RawSignals]) -> MergedSignals {
    let mut merged = MergedSignals::default();
    for raw in signals {
        merged.categories = merged.categories.merge_max(&raw.categories.clamped());
        merged
            .flagged_phrases
            .extend(raw.flagged_phrases.iter().cloned());
        merged.raised_concern |= raw.raised_concern();
        merged.positive |= raw.positive;
        if let Some(reason) = raw.reasoning.as_deref().map(str::trim) {
            if !reason.is_empty() {
                merged.reasoning.push(reason.to_string());
            }
        }
    }
    merged
}

/// The effective allow threshold for a strictness/platform pair.
pub fn threshold(strictness: Strictness, platform: Platform) -> f64 {
    let base = strictness.threshold();
    if platform == Platform::CharacterAi {
        base + ROLEPLAY_LENIENCY
    } else {
        base
    }
}

/// Pick an action for `max_score` against `threshold`.
pub fn select_action(max_score: f64, threshold: f64) -> SuggestedAction {
    if max_score > threshold + BLOCK_MARGIN {
        SuggestedAction::Block
    } else if max_score >= threshold {
        SuggestedAction::Review
    } else {
        SuggestedAction::Allow
    }
}

/// Confidence for an action given how many categories carry signal.
pub fn confidence(action: SuggestedAction, signals: usize, raised_concern: bool) -> u32 {
    let signals = signals as u32;
    match action {
        SuggestedAction::Block => (90 + 2 * signals).min(98),
        SuggestedAction::Review => (70 + 5 * signals).min(80),
        SuggestedAction::Allow => {
            let base = if raised_concern { 70 } else { 85 };
            (base + 5 * signals).min(95)
        }
    }
}

/// Decide on already-adjusted scores.
///
/// `notes` are appended to the reasoning after the tier sentence. The
/// positive override runs last and wins over every other rule.
pub fn decide(
    merged: MergedSignals,
    strictness: Strictness,
    platform: Platform,
    notes: &[&str],
) -> ModerationResult {
    let mut categories = merged.categories.clamped();
    let max_score = categories.max_score();
    let signals = categories.count_above(SIGNAL_FLOOR);

    let mut action = select_action(max_score, threshold(strictness, platform));
    let mut confidence = confidence(action, signals, merged.raised_concern);
    let mut headline = match action {
        SuggestedAction::Block => REASON_BLOCK,
        SuggestedAction::Review => REASON_REVIEW,
        SuggestedAction::Allow if max_score > SIGNAL_FLOOR => REASON_MINOR,
        SuggestedAction::Allow => REASON_CLEAN,
    };

    if merged.positive {
        categories.toxicity = categories.toxicity.min(POSITIVE_CAP);
        categories.harassment = categories.harassment.min(POSITIVE_CAP);
        action = SuggestedAction::Allow;
        confidence = POSITIVE_CONFIDENCE;
        headline = REASON_POSITIVE;
    }

    let mut reasoning = String::from(headline);
    for note in notes {
        reasoning.push(' ');
        reasoning.push_str(note);
    }
    for source in &merged.reasoning {
        reasoning.push_str(" Classifier: ");
        reasoning.push_str(source);
    }

    ModerationResult {
        is_allowed: action == SuggestedAction::Allow,
        confidence,
        categories,
        reasoning,
        flagged_phrases: merged.flagged_phrases,
        suggested_action: action,
        processing_time_ms: 0,
    }
}

/// The conservative result returned when signals could not be produced.
/// Never allows; holds for human review with zero confidence.
pub fn fail_safe(failure: &SignalFailure) -> ModerationResult {
    ModerationResult {
        is_allowed: false,
        confidence: 0,
        categories: CategoryScores::default(),
        reasoning: format!("{failure}. Analysis failed - holding for human review for safety."),
        flagged_phrases: Vec::new(),
        suggested_action: SuggestedAction::Review,
        processing_time_ms: 0,
    }
}
