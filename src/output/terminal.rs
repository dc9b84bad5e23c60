// Colored terminal output for moderation results.
//
// main.rs delegates all human-readable formatting here; `--json` output
// bypasses this module entirely.

use colored::Colorize;

use crate::moderation::models::{ModerationResult, SuggestedAction};
use crate::pipeline::batch::{BatchOutcome, BatchSummary};

/// Display one result in detail.
pub fn display_result(content: &str, result: &ModerationResult) {
    println!("\n{}", "=== Moderation Result ===".bold());
    println!("  Content: {}", super::truncate_chars(content, 120).dimmed());
    println!(
        "  Action: {}  (confidence {}%, {}ms)",
        colorize_action(result.suggested_action),
        result.confidence,
        result.processing_time_ms,
    );
    println!(
        "  Allowed: {}",
        if result.is_allowed {
            "yes".green()
        } else {
            "no".red()
        }
    );

    println!("\n  Categories:");
    for (category, score) in result.categories.iter() {
        let line = format!("    {:<16} {:>5.1}", category.as_str(), score);
        if score > 60.0 {
            println!("{}", line.red());
        } else if score > 20.0 {
            println!("{}", line.yellow());
        } else {
            println!("{}", line.dimmed());
        }
    }

    if !result.flagged_phrases.is_empty() {
        println!("\n  Flagged: {}", result.flagged_phrases.join(", ").yellow());
    }

    println!("\n  {}", result.reasoning);
}

/// Display one line per batch item followed by the summary.
pub fn display_batch(outcomes: &[BatchOutcome]) {
    if outcomes.is_empty() {
        println!("No content to moderate.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Batch Results ({} items) ===", outcomes.len()).bold()
    );
    println!();
    println!(
        "  {:>5}  {:<8} {:>5}  {}",
        "Line".dimmed(),
        "Action".dimmed(),
        "Conf".dimmed(),
        "Content".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for outcome in outcomes {
        let preview = super::truncate_chars(&outcome.content, 56);
        match &outcome.result {
            Ok(result) => println!(
                "  {:>5}  {:<8} {:>4}%  {}",
                outcome.index + 1,
                colorize_action(result.suggested_action),
                result.confidence,
                preview,
            ),
            Err(e) => println!(
                "  {:>5}  {:<8} {:>5}  {}",
                outcome.index + 1,
                "rejected".dimmed(),
                "-",
                e.to_string().dimmed(),
            ),
        }
    }

    println!();
    display_summary(&BatchSummary::from_outcomes(outcomes));
}

fn display_summary(summary: &BatchSummary) {
    if summary.blocked > 0 {
        println!("  {} {} blocked", "!!".red().bold(), summary.blocked);
    }
    if summary.review > 0 {
        println!("  {} {} need review", "!".yellow(), summary.review);
    }
    println!("  {} {} allowed", "ok".green(), summary.allowed);
    if summary.rejected > 0 {
        println!("  {} {} rejected as invalid", "-".dimmed(), summary.rejected);
    }
}

/// Colorize an action label.
fn colorize_action(action: SuggestedAction) -> colored::ColoredString {
    match action {
        SuggestedAction::Block => action.as_str().red().bold(),
        SuggestedAction::Review => action.as_str().yellow(),
        SuggestedAction::Allow => action.as_str().green(),
    }
}
