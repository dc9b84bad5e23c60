// Unit tests for the keyword signal producer.

use moderationkit::moderation::models::Platform;
use moderationkit::signals::keyword::KeywordProducer;
use moderationkit::signals::traits::SignalProducer;

#[test]
fn each_toxic_word_adds_thirty() {
    let signals = KeywordProducer.score("you are a stupid idiot");
    assert_eq!(signals.categories.toxicity, 60.0);
    assert_eq!(signals.flagged_phrases, vec!["idiot", "stupid"]);
}

#[test]
fn harassment_pattern_needs_toxicity() {
    let insult = KeywordProducer.score("You are a moron");
    assert_eq!(insult.categories.harassment, 30.0);

    let polite = KeywordProducer.score("You are right about this");
    assert_eq!(polite.categories.harassment, 0.0);
    assert_eq!(polite.categories.toxicity, 0.0);
}

#[test]
fn severe_phrase_hits_toxicity_and_harassment() {
    let signals = KeywordProducer.score("just go kill yourself");
    // "kill yourself" is severe; "kill" is also a violent word
    assert_eq!(signals.categories.toxicity, 60.0);
    assert_eq!(signals.categories.harassment, 50.0);
    assert_eq!(signals.categories.violence, 20.0);
    assert_eq!(signals.flagged_phrases, vec!["kill yourself", "kill"]);
}

#[test]
fn scores_are_clamped_to_one_hundred() {
    let signals = KeywordProducer.score("fuck you motherfucker, stupid idiot moron trash");
    assert_eq!(signals.categories.toxicity, 100.0);
    assert!(signals.categories.harassment <= 100.0);
}

#[test]
fn violent_words_are_platform_agnostic() {
    let signals = KeywordProducer.score("The dragon attacked the castle in our roleplay");
    assert_eq!(signals.categories.violence, 20.0);
    assert_eq!(signals.flagged_phrases, vec!["attack"]);
}

#[test]
fn positive_markers_set_the_override() {
    let signals = KeywordProducer.score("Thank you for this great article, very helpful!");
    assert!(signals.positive);
    assert_eq!(signals.categories.max_score(), 0.0);

    assert!(!KeywordProducer.score("meh").positive);
}

#[test]
fn matching_is_case_insensitive() {
    let signals = KeywordProducer.score("STUPID");
    assert_eq!(signals.categories.toxicity, 30.0);
}

#[test]
fn keyword_producer_reports_no_upstream_verdict() {
    let signals = KeywordProducer.score("idiot");
    assert_eq!(signals.flagged, None);
    assert_eq!(signals.context_appropriate, None);
    assert!(signals.reasoning.is_none());
}

#[tokio::test]
async fn produce_matches_score() {
    let text = "Contact me on WhatsApp, you idiot";
    let produced = KeywordProducer
        .produce(text, Platform::Upwork, Some("proposal"))
        .await
        .unwrap();
    assert_eq!(produced, KeywordProducer.score(text));
    // Platform rules run in the engine, not here
    assert_eq!(produced.categories.spam, 0.0);
    assert_eq!(KeywordProducer.name(), "keyword");
}
