// Unit tests for the decision aggregator: thresholds, tiers, confidence,
// merging and the fail-safe result.

use moderationkit::moderation::decision::{
    self, confidence, fail_safe, merge, select_action, threshold, MergedSignals,
};
use moderationkit::moderation::error::SignalFailure;
use moderationkit::moderation::models::{
    Category, CategoryScores, Platform, Strictness, SuggestedAction,
};
use moderationkit::signals::traits::RawSignals;

fn with_score(category: Category, value: f64) -> CategoryScores {
    let mut scores = CategoryScores::default();
    scores.set(category, value);
    scores
}

fn merged(categories: CategoryScores) -> MergedSignals {
    MergedSignals {
        categories,
        ..Default::default()
    }
}

// ============================================================
// Thresholds
// ============================================================

#[test]
fn thresholds_by_strictness() {
    assert_eq!(threshold(Strictness::Low, Platform::General), 80.0);
    assert_eq!(threshold(Strictness::Medium, Platform::General), 60.0);
    assert_eq!(threshold(Strictness::High, Platform::General), 40.0);
}

#[test]
fn roleplay_platform_gets_ten_points_of_headroom() {
    assert_eq!(threshold(Strictness::Medium, Platform::CharacterAi), 70.0);
    assert_eq!(threshold(Strictness::High, Platform::Substack), 40.0);
}

// ============================================================
// Tier boundaries (medium: threshold 60, block above 80)
// ============================================================

#[test]
fn just_below_threshold_allows() {
    assert_eq!(select_action(59.999, 60.0), SuggestedAction::Allow);
}

#[test]
fn at_threshold_reviews() {
    assert_eq!(select_action(60.0, 60.0), SuggestedAction::Review);
}

#[test]
fn at_block_margin_still_reviews() {
    assert_eq!(select_action(80.0, 60.0), SuggestedAction::Review);
}

#[test]
fn above_block_margin_blocks() {
    assert_eq!(select_action(80.001, 60.0), SuggestedAction::Block);
}

#[test]
fn action_never_softens_as_score_rises() {
    for strictness in [Strictness::Low, Strictness::Medium, Strictness::High] {
        for platform in [Platform::General, Platform::CharacterAi] {
            let t = threshold(strictness, platform);
            let mut previous = SuggestedAction::Allow;
            for step in 0..=200 {
                let action = select_action(step as f64 * 0.5, t);
                assert!(action >= previous, "{strictness} {platform} at {step}");
                previous = action;
            }
        }
    }
}

// ============================================================
// Confidence
// ============================================================

#[test]
fn block_confidence_is_at_least_ninety() {
    for signals in 1..=7 {
        let c = confidence(SuggestedAction::Block, signals, false);
        assert!((90..=98).contains(&c), "got {c}");
    }
}

#[test]
fn review_confidence_stays_between_seventy_and_eighty() {
    for signals in 0..=7 {
        let c = confidence(SuggestedAction::Review, signals, false);
        assert!((70..=80).contains(&c), "got {c}");
    }
}

#[test]
fn allow_confidence_grows_with_agreeing_signals() {
    assert_eq!(confidence(SuggestedAction::Allow, 0, false), 85);
    assert_eq!(confidence(SuggestedAction::Allow, 1, false), 90);
    assert_eq!(confidence(SuggestedAction::Allow, 3, false), 95);
    assert_eq!(confidence(SuggestedAction::Allow, 1, true), 75);
}

// ============================================================
// decide
// ============================================================

#[test]
fn decide_blocks_and_disallows() {
    let result = decision::decide(
        merged(with_score(Category::Spam, 95.0)),
        Strictness::Medium,
        Platform::General,
        &[],
    );
    assert_eq!(result.suggested_action, SuggestedAction::Block);
    assert!(!result.is_allowed);
    assert_eq!(result.confidence, 92);
    assert_eq!(result.processing_time_ms, 0);
}

#[test]
fn decide_clean_content_allows_with_base_confidence() {
    let result = decision::decide(
        merged(CategoryScores::default()),
        Strictness::Medium,
        Platform::General,
        &[],
    );
    assert!(result.is_allowed);
    assert_eq!(result.suggested_action, SuggestedAction::Allow);
    assert_eq!(result.confidence, 85);
    assert_eq!(
        result.reasoning,
        "Content appears constructive and appropriate for the platform."
    );
}

#[test]
fn decide_appends_notes_and_classifier_reasoning() {
    let mut m = merged(with_score(Category::Violence, 10.0));
    m.reasoning.push("Fictional combat".to_string());
    let result = decision::decide(
        m,
        Strictness::Medium,
        Platform::CharacterAi,
        &["Fantasy/roleplay content context considered."],
    );
    assert!(result
        .reasoning
        .contains(" Fantasy/roleplay content context considered."));
    assert!(result.reasoning.ends_with("Classifier: Fictional combat"));
}

#[test]
fn positive_override_wins_over_high_scores() {
    let mut m = merged(CategoryScores {
        toxicity: 90.0,
        harassment: 70.0,
        spam: 30.0,
        ..Default::default()
    });
    m.positive = true;
    let result = decision::decide(m, Strictness::High, Platform::General, &[]);
    assert!(result.is_allowed);
    assert_eq!(result.suggested_action, SuggestedAction::Allow);
    assert_eq!(result.confidence, 95);
    assert_eq!(result.categories.toxicity, 5.0);
    assert_eq!(result.categories.harassment, 5.0);
    // Only toxicity and harassment are capped
    assert_eq!(result.categories.spam, 30.0);
    assert_eq!(result.reasoning, "Content is clearly positive and constructive.");
}

// ============================================================
// merge
// ============================================================

#[test]
fn merge_takes_most_cautious_score_per_category() {
    let classifier = RawSignals {
        categories: CategoryScores {
            toxicity: 40.0,
            violence: 70.0,
            ..Default::default()
        },
        flagged_phrases: vec!["violence".to_string()],
        flagged: Some(true),
        ..Default::default()
    };
    let keywords = RawSignals {
        categories: CategoryScores {
            toxicity: 60.0,
            violence: 20.0,
            ..Default::default()
        },
        flagged_phrases: vec!["idiot".to_string(), "stupid".to_string()],
        ..Default::default()
    };

    let m = merge(&[classifier, keywords]);
    assert_eq!(m.categories.toxicity, 60.0);
    assert_eq!(m.categories.violence, 70.0);
    assert_eq!(m.flagged_phrases, vec!["violence", "idiot", "stupid"]);
    assert!(m.raised_concern);
    assert!(!m.positive);
}

#[test]
fn merge_keeps_duplicate_phrases() {
    let a = RawSignals {
        flagged_phrases: vec!["idiot".to_string()],
        ..Default::default()
    };
    let m = merge(&[a.clone(), a]);
    assert_eq!(m.flagged_phrases, vec!["idiot", "idiot"]);
}

#[test]
fn merge_clamps_out_of_range_sources() {
    let wild = RawSignals::from_scores(CategoryScores {
        spam: 400.0,
        toxicity: f64::INFINITY,
        ..Default::default()
    });
    let m = merge(&[wild]);
    assert_eq!(m.categories.spam, 100.0);
    assert_eq!(m.categories.toxicity, 0.0);
}

// ============================================================
// fail_safe
// ============================================================

#[test]
fn fail_safe_is_conservative() {
    let result = fail_safe(&SignalFailure::Timeout {
        producer: "openai".to_string(),
        after_ms: 3000,
    });
    assert!(!result.is_allowed);
    assert_eq!(result.confidence, 0);
    assert_eq!(result.categories, CategoryScores::default());
    assert_eq!(result.suggested_action, SuggestedAction::Review);
    assert!(result.flagged_phrases.is_empty());
    assert!(result.reasoning.contains("timed out after 3000ms"));
}

#[test]
fn fail_safe_reasoning_names_the_failure_mode() {
    let malformed = fail_safe(&SignalFailure::Malformed {
        producer: "anthropic".to_string(),
    });
    assert!(malformed.reasoning.contains("malformed response"));

    let unavailable = fail_safe(&SignalFailure::Unavailable {
        producer: "perspective".to_string(),
    });
    assert!(unavailable.reasoning.contains("unavailable"));
}
