use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use moderationkit::config::Config;
use moderationkit::moderation::models::{ModerationRequest, Platform, Strictness};
use moderationkit::moderation::Moderator;

/// ModerationKit: platform-aware content moderation.
///
/// Scores text for toxicity, spam, harassment, hate speech, sexual content,
/// violence and misinformation, then suggests allow, review or block.
#[derive(Parser)]
#[command(name = "moderationkit", version, about)]
struct Cli {
    /// Override MODKIT_STRICTNESS (low, medium, high)
    #[arg(long, global = true)]
    strictness: Option<Strictness>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Moderate a single piece of text
    Moderate {
        /// The text to moderate
        content: String,

        /// Platform the text was posted to (e.g. substack, character-ai, upwork)
        #[arg(long, default_value = "general")]
        platform: Platform,

        /// Free-text context (e.g. "roleplay", "political newsletter")
        #[arg(long)]
        context: Option<String>,

        /// Print the raw result as JSON instead of a formatted summary
        #[arg(long)]
        json: bool,
    },

    /// Moderate a file with one item per line
    Batch {
        /// Path to the input file
        file: PathBuf,

        #[arg(long, default_value = "general")]
        platform: Platform,

        #[arg(long)]
        context: Option<String>,

        /// Number of items to moderate in parallel (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: u32,
    },

    /// Run the HTTP API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 3000)
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("moderationkit=info")),
        )
        .init();

    let cli = Cli::parse();
    let moderator = build_moderator(cli.strictness)?;

    match cli.command {
        Commands::Moderate {
            content,
            platform,
            context,
            json,
        } => {
            let mut request = ModerationRequest::new(content)?.with_platform(platform);
            if let Some(context) = context {
                request = request.with_context(context);
            }

            let result = moderator.moderate(&request).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                moderationkit::output::terminal::display_result(request.content(), &result);
            }
        }

        Commands::Batch {
            file,
            platform,
            context,
            concurrency,
        } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let items: Vec<String> = text.lines().map(String::from).collect();

            println!(
                "Moderating {} lines from {} ({} concurrent)...",
                items.len(),
                file.display(),
                concurrency
            );

            let outcomes = moderationkit::pipeline::batch::run(
                &moderator,
                items,
                platform,
                context.as_deref(),
                concurrency as usize,
                true,
            )
            .await;

            moderationkit::output::terminal::display_batch(&outcomes);
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            println!(
                "{}",
                format!("ModerationKit API starting on http://{bind}:{port}").bold()
            );
            println!("  Health check: http://{bind}:{port}/health");
            moderationkit::web::run_server(moderator, port, &bind).await?;
        }
    }

    Ok(())
}

/// Composition root: read config, apply CLI overrides, wire producers.
fn build_moderator(strictness: Option<Strictness>) -> Result<Moderator> {
    let mut config = Config::load()?;
    if let Some(strictness) = strictness {
        config.moderator.strictness = strictness;
    }

    info!(
        strictness = %config.moderator.strictness,
        platform_rules = config.moderator.platform_specific_rules,
        signals = ?config.signals,
        "Configuration loaded"
    );

    config.build_moderator()
}
