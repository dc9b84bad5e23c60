// Decision engine and the Moderator that feeds it.
//
// DecisionEngine::evaluate is the synchronous core: raw signals in, one
// ModerationResult out, no I/O. Moderator wraps it with the async part:
// fan out to every configured producer, bound each call by a timeout, and
// fall back to the fail-safe result when anything goes wrong.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{info, warn};

use super::decision;
use super::error::SignalFailure;
use super::models::{ModerationRequest, ModerationResult, ModeratorConfig};
use super::platform;
use crate::signals::traits::{RawSignals, SignalProducer};

/// Default upper bound on a single producer call.
pub const DEFAULT_SIGNAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Stateless decision core. Cheap to clone and share between tasks.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: ModeratorConfig,
}

impl DecisionEngine {
    pub fn new(config: ModeratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModeratorConfig {
        &self.config
    }

    /// Combine raw signals for `request` into a decision.
    ///
    /// Signals are merged category-wise (max), platform rules are applied to
    /// the merged scores once, then the decision tiers run. An empty signal
    /// list yields the fail-safe result.
    pub fn evaluate(&self, request: &ModerationRequest, signals: &[RawSignals]) -> ModerationResult {
        if signals.is_empty() {
            return decision::fail_safe(&SignalFailure::NoSignals);
        }

        let platform = request.platform();
        let mut merged = decision::merge(signals);

        let notes = if self.config.platform_specific_rules {
            let adjustment = platform::adjust(
                &merged.categories,
                platform,
                request.content(),
                request.context(),
            );
            merged.categories = adjustment.categories;
            merged.flagged_phrases.extend(adjustment.flagged_phrases);
            adjustment.notes
        } else {
            Vec::new()
        };

        decision::decide(merged, self.config.strictness, platform, &notes)
    }
}

/// A DecisionEngine plus the producers that feed it.
///
/// Producers are chosen by the caller; nothing here inspects the
/// environment.
#[derive(Clone)]
pub struct Moderator {
    engine: DecisionEngine,
    producers: Vec<Arc<dyn SignalProducer>>,
    timeout: Duration,
}

impl Moderator {
    pub fn new(config: ModeratorConfig, producers: Vec<Arc<dyn SignalProducer>>) -> Self {
        Self {
            engine: DecisionEngine::new(config),
            producers,
            timeout: DEFAULT_SIGNAL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Names of the configured producers, in fan-out order.
    pub fn producer_names(&self) -> Vec<&'static str> {
        self.producers.iter().map(|p| p.name()).collect()
    }

    /// Moderate one request. Never fails: producer errors and timeouts
    /// become the fail-safe result.
    pub async fn moderate(&self, request: &ModerationRequest) -> ModerationResult {
        let start = Instant::now();

        let mut result = match self.collect_signals(request).await {
            Ok(signals) => self.engine.evaluate(request, &signals),
            Err(failure) => {
                warn!(failure = %failure, "Falling back to fail-safe result");
                decision::fail_safe(&failure)
            }
        };

        result.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            action = %result.suggested_action,
            confidence = result.confidence,
            platform = %request.platform(),
            elapsed_ms = result.processing_time_ms,
            "Moderation completed"
        );

        result
    }

    async fn collect_signals(
        &self,
        request: &ModerationRequest,
    ) -> Result<Vec<RawSignals>, SignalFailure> {
        if self.producers.is_empty() {
            return Err(SignalFailure::NoSignals);
        }

        let platform = request.platform();
        let calls = self.producers.iter().map(|producer| async move {
            let call = producer.produce(request.content(), platform, request.context());
            (producer.name(), tokio::time::timeout(self.timeout, call).await)
        });

        let mut signals = Vec::with_capacity(self.producers.len());
        for (name, outcome) in join_all(calls).await {
            match outcome {
                Ok(Ok(raw)) => signals.push(raw),
                Ok(Err(e)) => {
                    warn!(producer = name, error = %e, "Signal producer failed");
                    return Err(SignalFailure::from_producer_error(name, &e));
                }
                Err(_) => {
                    let after_ms = self.timeout.as_millis() as u64;
                    warn!(producer = name, after_ms, "Signal producer timed out");
                    return Err(SignalFailure::Timeout {
                        producer: name.to_string(),
                        after_ms,
                    });
                }
            }
        }

        Ok(signals)
    }
}
