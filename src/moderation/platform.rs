// Platform rule adjuster.
//
// Each platform has its own norms: roleplay communities tolerate fictional
// violence, newsletters host heated policy debate, freelance marketplaces
// attract off-platform payment scams. These rules reshape raw scores before
// the decision is made. Dampening is always multiplicative so a rule can
// never push a score below zero or flip its ordering with other content.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use super::models::{CategoryScores, Platform};

const FICTION_MARKERS: [&str; 5] = ["roleplay", "fantasy", "fictional", "dragon", "character"];
const FICTION_VIOLENCE_FACTOR: f64 = 0.2;
const FICTION_HATE_FACTOR: f64 = 0.3;
const FICTION_TOXICITY_FACTOR: f64 = 0.4;

const DISCOURSE_MARKERS: [&str; 3] = ["policy", "economics", "analysis"];
const DISCOURSE_TOXICITY_FACTOR: f64 = 0.7;
const DISCOURSE_HARASSMENT_FACTOR: f64 = 0.8;

const PRICING_MARKERS: [&str; 3] = ["$5", "$50", "just $"];
const PRICING_SPAM_POINTS: f64 = 40.0;
const OFF_PLATFORM_SPAM_POINTS: f64 = 50.0;
const EXPERIENCE_MARKERS: [&str; 3] = ["15+", "10+", "years experience"];
const INFLATED_CLAIM_SPAM_POINTS: f64 = 30.0;
/// Resume-style claims only count once other spam signals are present.
const INFLATED_CLAIM_SPAM_FLOOR: f64 = 30.0;

pub const FLAG_UNREALISTIC_PRICING: &str = "unrealistic pricing";
pub const FLAG_OFF_PLATFORM_CONTACT: &str = "off-platform contact";

pub const NOTE_FICTION: &str = "Fantasy/roleplay content context considered.";
pub const NOTE_DISCOURSE: &str = "Political discourse context considered.";

// "whatsapp", "whats app", "contactme", "contact   me" in any casing
static OFF_PLATFORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)whats\s*app|contact\s*me").expect("off-platform pattern is valid")
});

/// Scores after platform rules, plus anything the rules want surfaced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Adjustment {
    pub categories: CategoryScores,
    /// Labels recorded by rules that fired, in rule order.
    pub flagged_phrases: Vec<String>,
    /// Short sentences appended to the result's reasoning.
    pub notes: Vec<&'static str>,
}

/// Apply the platform's rules to `categories`. Pure; returns an adjusted copy
/// with every score clamped to [0, 100].
pub fn adjust(
    categories: &CategoryScores,
    platform: Platform,
    content: &str,
    context: Option<&str>,
) -> Adjustment {
    let content = content.to_lowercase();
    let context = context.map(str::to_lowercase).unwrap_or_default();

    let mut adjustment = Adjustment {
        categories: *categories,
        ..Default::default()
    };

    match platform {
        Platform::CharacterAi => apply_fiction_tolerance(&mut adjustment, &content, &context),
        Platform::Upwork => apply_marketplace_spam(&mut adjustment, &content),
        Platform::Substack => apply_discourse_tolerance(&mut adjustment, &content, &context),
        Platform::Faire | Platform::Eventbrite | Platform::General => {}
    }

    adjustment.categories = adjustment.categories.clamped();

    if adjustment.categories != *categories {
        debug!(
            platform = %platform,
            flags = adjustment.flagged_phrases.len(),
            "Platform rules adjusted scores"
        );
    }

    adjustment
}

fn apply_fiction_tolerance(adjustment: &mut Adjustment, content: &str, context: &str) {
    let fictional = FICTION_MARKERS
        .iter()
        .any(|m| content.contains(m) || context.contains(m));
    if !fictional {
        return;
    }

    let scores = &mut adjustment.categories;
    scores.violence *= FICTION_VIOLENCE_FACTOR;
    scores.hate_speech *= FICTION_HATE_FACTOR;
    scores.toxicity *= FICTION_TOXICITY_FACTOR;
    adjustment.notes.push(NOTE_FICTION);
}

fn apply_marketplace_spam(adjustment: &mut Adjustment, content: &str) {
    if PRICING_MARKERS.iter().any(|m| content.contains(m)) {
        adjustment.categories.spam += PRICING_SPAM_POINTS;
        adjustment
            .flagged_phrases
            .push(FLAG_UNREALISTIC_PRICING.to_string());
    }

    if OFF_PLATFORM_RE.is_match(content) {
        adjustment.categories.spam += OFF_PLATFORM_SPAM_POINTS;
        adjustment
            .flagged_phrases
            .push(FLAG_OFF_PLATFORM_CONTACT.to_string());
    }

    let inflated_claim =
        content.contains("expert") && EXPERIENCE_MARKERS.iter().any(|m| content.contains(m));
    if inflated_claim && adjustment.categories.spam > INFLATED_CLAIM_SPAM_FLOOR {
        adjustment.categories.spam += INFLATED_CLAIM_SPAM_POINTS;
    }
}

fn apply_discourse_tolerance(adjustment: &mut Adjustment, content: &str, context: &str) {
    let discourse =
        DISCOURSE_MARKERS.iter().any(|m| content.contains(m)) || context.contains("political");
    if !discourse {
        return;
    }

    let scores = &mut adjustment.categories;
    scores.toxicity *= DISCOURSE_TOXICITY_FACTOR;
    scores.harassment *= DISCOURSE_HARASSMENT_FACTOR;
    adjustment.notes.push(NOTE_DISCOURSE);
}
