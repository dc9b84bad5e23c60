// Data models — the types that flow through the moderation pipeline.
//
// Wire names follow the public ModerationKit API: request fields are camelCase
// (`userId`), category keys are snake_case, and the result mixes `isAllowed`
// with snake_case fields for compatibility with existing clients.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Maximum content length accepted at the boundary, in characters.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// The community a piece of content was posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Substack,
    CharacterAi,
    Upwork,
    Faire,
    Eventbrite,
    #[default]
    General,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Substack => "substack",
            Platform::CharacterAi => "character-ai",
            Platform::Upwork => "upwork",
            Platform::Faire => "faire",
            Platform::Eventbrite => "eventbrite",
            Platform::General => "general",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substack" => Ok(Platform::Substack),
            "character-ai" | "characterai" => Ok(Platform::CharacterAi),
            "upwork" => Ok(Platform::Upwork),
            "faire" => Ok(Platform::Faire),
            "eventbrite" => Ok(Platform::Eventbrite),
            "general" | "" => Ok(Platform::General),
            other => anyhow::bail!(
                "Unknown platform '{other}'. Expected one of: substack, character-ai, \
                 upwork, faire, eventbrite, general"
            ),
        }
    }
}

/// One moderation dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Toxicity,
    Spam,
    Harassment,
    HateSpeech,
    SexualContent,
    Violence,
    Misinformation,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Toxicity,
        Category::Spam,
        Category::Harassment,
        Category::HateSpeech,
        Category::SexualContent,
        Category::Violence,
        Category::Misinformation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Toxicity => "toxicity",
            Category::Spam => "spam",
            Category::Harassment => "harassment",
            Category::HateSpeech => "hate_speech",
            Category::SexualContent => "sexual_content",
            Category::Violence => "violence",
            Category::Misinformation => "misinformation",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-category risk scores, each from 0 (benign) to 100 (certain violation).
///
/// All seven categories are always present. Missing keys deserialize to 0
/// and unknown keys are ignored, so a producer that only knows about some
/// categories still yields a complete set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryScores {
    pub toxicity: f64,
    pub spam: f64,
    pub harassment: f64,
    pub hate_speech: f64,
    pub sexual_content: f64,
    pub violence: f64,
    pub misinformation: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Toxicity => self.toxicity,
            Category::Spam => self.spam,
            Category::Harassment => self.harassment,
            Category::HateSpeech => self.hate_speech,
            Category::SexualContent => self.sexual_content,
            Category::Violence => self.violence,
            Category::Misinformation => self.misinformation,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::Toxicity => &mut self.toxicity,
            Category::Spam => &mut self.spam,
            Category::Harassment => &mut self.harassment,
            Category::HateSpeech => &mut self.hate_speech,
            Category::SexualContent => &mut self.sexual_content,
            Category::Violence => &mut self.violence,
            Category::Misinformation => &mut self.misinformation,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        *self.get_mut(category) = value;
    }

    /// Iterate `(category, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Copy with every score forced into [0, 100]. NaN and infinities become 0.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for category in Category::ALL {
            let value = out.get(category);
            let value = if value.is_finite() {
                value.clamp(0.0, 100.0)
            } else {
                0.0
            };
            out.set(category, value);
        }
        out
    }

    /// Category-wise maximum of two score sets.
    pub fn merge_max(&self, other: &CategoryScores) -> Self {
        let mut out = *self;
        for category in Category::ALL {
            out.set(category, self.get(category).max(other.get(category)));
        }
        out
    }

    /// The largest score across all seven categories.
    pub fn max_score(&self) -> f64 {
        self.iter().map(|(_, v)| v).fold(0.0, f64::max)
    }

    /// Number of categories strictly above `threshold`.
    pub fn count_above(&self, threshold: f64) -> usize {
        self.iter().filter(|(_, v)| *v > threshold).count()
    }
}

/// Unvalidated request as it arrives on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequestBody {
    #[serde(default)]
    pub content: String,
    pub context: Option<String>,
    pub platform: Option<Platform>,
    pub user_id: Option<String>,
}

/// A validated moderation request. The only way to build one is through
/// [`ModerationRequest::new`] or `TryFrom<ModerationRequestBody>`, so content
/// reaching the engine is always non-empty and within the size limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    content: String,
    context: Option<String>,
    platform: Option<Platform>,
    user_id: Option<String>,
}

impl ModerationRequest {
    pub fn new(content: impl Into<String>) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        let len = content.chars().count();
        if len > MAX_CONTENT_CHARS {
            return Err(ValidationError::ContentTooLong {
                len,
                max: MAX_CONTENT_CHARS,
            });
        }
        Ok(Self {
            content,
            context: None,
            platform: None,
            user_id: None,
        })
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The request's platform, or `General` when none was given.
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl TryFrom<ModerationRequestBody> for ModerationRequest {
    type Error = ValidationError;

    fn try_from(body: ModerationRequestBody) -> Result<Self, Self::Error> {
        let mut request = ModerationRequest::new(body.content)?;
        request.context = body.context;
        request.platform = body.platform;
        request.user_id = body.user_id;
        Ok(request)
    }
}

/// Ternary outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedAction {
    Allow,
    Review,
    Block,
}

impl SuggestedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestedAction::Allow => "allow",
            SuggestedAction::Review => "review",
            SuggestedAction::Block => "block",
        }
    }
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The final decision for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResult {
    #[serde(rename = "isAllowed")]
    pub is_allowed: bool,
    /// 0-100
    pub confidence: u32,
    pub categories: CategoryScores,
    pub reasoning: String,
    #[serde(default)]
    pub flagged_phrases: Vec<String>,
    pub suggested_action: SuggestedAction,
    /// Wall-clock time spent in `Moderator::moderate`; 0 when the engine is
    /// called directly.
    pub processing_time_ms: u64,
}

/// How permissive the decision thresholds are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Low,
    #[default]
    Medium,
    High,
}

impl Strictness {
    /// Max score at which content stops being allowed outright.
    pub fn threshold(&self) -> f64 {
        match self {
            Strictness::Low => 80.0,
            Strictness::Medium => 60.0,
            Strictness::High => 40.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strictness::Low => "low",
            Strictness::Medium => "medium",
            Strictness::High => "high",
        }
    }
}

impl FromStr for Strictness {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Strictness::Low),
            "medium" => Ok(Strictness::Medium),
            "high" => Ok(Strictness::High),
            other => anyhow::bail!("Unknown strictness '{other}'. Expected low, medium or high"),
        }
    }
}

impl std::fmt::Display for Strictness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Engine configuration. Read-only once built and safe to share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratorConfig {
    pub strictness: Strictness,
    pub platform_specific_rules: bool,
    /// Extra house rules. Passed to prompt-based producers as guidelines.
    #[serde(default)]
    pub custom_rules: Vec<String>,
}

impl Default for ModeratorConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Medium,
            platform_specific_rules: true,
            custom_rules: Vec::new(),
        }
    }
}
