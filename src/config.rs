use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::moderation::engine::DEFAULT_SIGNAL_TIMEOUT;
use crate::moderation::models::{ModeratorConfig, Strictness};
use crate::moderation::Moderator;
use crate::signals::anthropic::{AnthropicProducer, DEFAULT_MODEL};
use crate::signals::keyword::KeywordProducer;
use crate::signals::openai::OpenAiModerationProducer;
use crate::signals::perspective::PerspectiveProducer;
use crate::signals::traits::SignalProducer;

/// Which raw signal source to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalBackend {
    /// Keyword lists (default) — no API key, no network
    Keyword,
    /// OpenAI moderation endpoint — requires OPENAI_API_KEY
    OpenAi,
    /// Google Perspective API — requires PERSPECTIVE_API_KEY, 1 QPS limit
    Perspective,
    /// Anthropic prompt-based classifier — requires ANTHROPIC_API_KEY
    Anthropic,
}

impl SignalBackend {
    fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "keyword" | "keywords" => Ok(SignalBackend::Keyword),
            "openai" => Ok(SignalBackend::OpenAi),
            "perspective" => Ok(SignalBackend::Perspective),
            "anthropic" | "claude" => Ok(SignalBackend::Anthropic),
            other => anyhow::bail!(
                "Unknown signal backend '{other}' in MODKIT_SIGNALS.\n\
                 Expected a comma-separated list of: keyword, openai, perspective, anthropic"
            ),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    pub moderator: ModeratorConfig,
    /// Signal sources, in fan-out order (default: keyword only)
    pub signals: Vec<SignalBackend>,
    /// Upper bound on each signal producer call
    pub signal_timeout: Duration,
    pub openai_api_key: String,
    pub perspective_api_key: String,
    pub anthropic_api_key: String,
    pub anthropic_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default, so an empty environment yields a working
    /// keyword-only moderator at medium strictness.
    pub fn load() -> Result<Self> {
        let strictness = match env::var("MODKIT_STRICTNESS") {
            Ok(value) => value.parse::<Strictness>()?,
            Err(_) => Strictness::default(),
        };

        let platform_specific_rules = match env::var("MODKIT_PLATFORM_RULES") {
            Ok(value) => parse_bool(&value)
                .with_context(|| format!("Invalid MODKIT_PLATFORM_RULES value '{value}'"))?,
            Err(_) => true,
        };

        let custom_rules = env::var("MODKIT_CUSTOM_RULES")
            .map(|rules| {
                rules
                    .split(';')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let signals = match env::var("MODKIT_SIGNALS") {
            Ok(list) if !list.trim().is_empty() => list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(SignalBackend::parse)
                .collect::<Result<Vec<_>>>()?,
            _ => vec![SignalBackend::Keyword],
        };

        let signal_timeout = match env::var("MODKIT_SIGNAL_TIMEOUT_MS") {
            Ok(ms) => Duration::from_millis(
                ms.trim()
                    .parse()
                    .with_context(|| format!("Invalid MODKIT_SIGNAL_TIMEOUT_MS value '{ms}'"))?,
            ),
            Err(_) => DEFAULT_SIGNAL_TIMEOUT,
        };

        Ok(Self {
            moderator: ModeratorConfig {
                strictness,
                platform_specific_rules,
                custom_rules,
            },
            signals,
            signal_timeout,
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            perspective_api_key: env::var("PERSPECTIVE_API_KEY").unwrap_or_default(),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }

    /// Validate that every selected signal backend has what it needs.
    pub fn require_signals(&self) -> Result<()> {
        for backend in &self.signals {
            let (key, var) = match backend {
                SignalBackend::Keyword => continue,
                SignalBackend::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
                SignalBackend::Perspective => (&self.perspective_api_key, "PERSPECTIVE_API_KEY"),
                SignalBackend::Anthropic => (&self.anthropic_api_key, "ANTHROPIC_API_KEY"),
            };
            if key.is_empty() {
                anyhow::bail!(
                    "{var} not set but MODKIT_SIGNALS includes {backend:?}.\n\
                     Add it to your .env file, or set MODKIT_SIGNALS=keyword \
                     to use the offline keyword scorer."
                );
            }
        }
        Ok(())
    }

    /// Build the producers named in `signals`. Call `require_signals` first.
    pub fn build_producers(&self) -> Vec<Arc<dyn SignalProducer>> {
        self.signals
            .iter()
            .map(|backend| -> Arc<dyn SignalProducer> {
                match backend {
                    SignalBackend::Keyword => Arc::new(KeywordProducer),
                    SignalBackend::OpenAi => {
                        Arc::new(OpenAiModerationProducer::new(self.openai_api_key.clone()))
                    }
                    SignalBackend::Perspective => {
                        Arc::new(PerspectiveProducer::new(self.perspective_api_key.clone()))
                    }
                    SignalBackend::Anthropic => Arc::new(
                        AnthropicProducer::new(
                            self.anthropic_api_key.clone(),
                            self.anthropic_model.clone(),
                        )
                        .with_custom_rules(self.moderator.custom_rules.clone()),
                    ),
                }
            })
            .collect()
    }

    /// Validate and assemble a ready-to-use Moderator.
    pub fn build_moderator(&self) -> Result<Moderator> {
        self.require_signals()?;
        Ok(
            Moderator::new(self.moderator.clone(), self.build_producers())
                .with_timeout(self.signal_timeout),
        )
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("expected true or false"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_are_case_insensitive() {
        assert_eq!(SignalBackend::parse(" OpenAI ").unwrap(), SignalBackend::OpenAi);
        assert_eq!(SignalBackend::parse("claude").unwrap(), SignalBackend::Anthropic);
        assert!(SignalBackend::parse("bard").is_err());
    }

    #[test]
    fn missing_key_fails_validation() {
        let config = Config {
            moderator: ModeratorConfig::default(),
            signals: vec![SignalBackend::Keyword, SignalBackend::Perspective],
            signal_timeout: DEFAULT_SIGNAL_TIMEOUT,
            openai_api_key: String::new(),
            perspective_api_key: String::new(),
            anthropic_api_key: String::new(),
            anthropic_model: DEFAULT_MODEL.to_string(),
        };
        let err = config.require_signals().unwrap_err();
        assert!(err.to_string().contains("PERSPECTIVE_API_KEY"));
    }

    #[test]
    fn producers_follow_configured_order() {
        let config = Config {
            moderator: ModeratorConfig::default(),
            signals: vec![SignalBackend::OpenAi, SignalBackend::Keyword],
            signal_timeout: DEFAULT_SIGNAL_TIMEOUT,
            openai_api_key: "sk-test".to_string(),
            perspective_api_key: String::new(),
            anthropic_api_key: String::new(),
            anthropic_model: DEFAULT_MODEL.to_string(),
        };
        let moderator = config.build_moderator().unwrap();
        assert_eq!(moderator.producer_names(), vec!["openai", "keyword"]);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
