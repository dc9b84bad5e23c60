// Batch moderation: run many items through one Moderator.
//
// Items are moderated with bounded concurrency. Each evaluation is
// independent, so the only shared state is the Moderator itself (read-only)
// and the progress bar. Results come back in input order.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::moderation::error::ValidationError;
use crate::moderation::models::{
    ModerationRequest, ModerationResult, Platform, SuggestedAction,
};
use crate::moderation::Moderator;

/// Outcome for one input item.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Position in the input, zero-based
    pub index: usize,
    pub content: String,
    /// `Err` when the item was rejected at validation and never moderated
    pub result: Result<ModerationResult, ValidationError>,
}

/// Counts per outcome across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub allowed: usize,
    pub review: usize,
    pub blocked: usize,
    pub rejected: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let mut summary = BatchSummary::default();
        for outcome in outcomes {
            match &outcome.result {
                Ok(r) => match r.suggested_action {
                    SuggestedAction::Allow => summary.allowed += 1,
                    SuggestedAction::Review => summary.review += 1,
                    SuggestedAction::Block => summary.blocked += 1,
                },
                Err(_) => summary.rejected += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.allowed + self.review + self.blocked + self.rejected
    }
}

/// Moderate every item. Blank items are skipped entirely; oversized ones are
/// reported as rejected.
pub async fn run(
    moderator: &Moderator,
    items: Vec<String>,
    platform: Platform,
    context: Option<&str>,
    concurrency: usize,
    show_progress: bool,
) -> Vec<BatchOutcome> {
    let items: Vec<(usize, String)> = items
        .into_iter()
        .enumerate()
        .filter(|(_, item)| !item.trim().is_empty())
        .collect();

    let pb = if show_progress {
        let pb = ProgressBar::new(items.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  Moderating [{bar:30}] {pos}/{len} ({eta})")
        {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let pb_ref = &pb;
    let mut outcomes: Vec<BatchOutcome> =
        stream::iter(items.into_iter().map(|(index, content)| async move {
            let request = ModerationRequest::new(content.clone()).map(|r| {
                let r = r.with_platform(platform);
                match context {
                    Some(ctx) => r.with_context(ctx),
                    None => r,
                }
            });

            let result = match request {
                Ok(request) => Ok(moderator.moderate(&request).await),
                Err(e) => {
                    warn!(index, error = %e, "Skipping invalid batch item");
                    Err(e)
                }
            };
            pb_ref.inc(1);

            BatchOutcome {
                index,
                content,
                result,
            }
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    pb.finish_and_clear();
    outcomes.sort_by_key(|o| o.index);

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        total = summary.total(),
        allowed = summary.allowed,
        review = summary.review,
        blocked = summary.blocked,
        rejected = summary.rejected,
        "Batch complete"
    );

    outcomes
}
