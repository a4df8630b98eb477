#![warn(clippy::all)]
#![allow(clippy::pedantic)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use review_common::logging::init_logging_with_exclusions;
use review_common::util::parse_duration;
use review_common::{Config, Validate};
use review_moderation::export::{export_results_as, export_summary, write_summary_json, ExportFormat};
use review_moderation::{
    build_analyzer, moderate_batch, open_reviews, DisabledAnalyzer, EngineOptions, ImportFormat,
    ModerationEngine, Review, SemanticAnalyzer, SummaryReport,
};

/// Moderate and tag hotel reviews.
#[derive(Parser, Debug)]
#[command(name = "review-moderation")]
#[command(version)]
#[command(about = "Publish/reject decisions and tags for hotel reviews.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.reviewmod/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip the semantic analyzer; every review uses fallback analysis
    #[arg(long, global = true)]
    offline: bool,

    /// Per-review analyzer timeout (e.g. 500ms, 30s)
    #[arg(long, global = true, value_parser = parse_duration)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Moderate a single review and print the result as JSON
    Analyze {
        #[arg(long)]
        hotel_id: String,

        /// Star rating (1-5)
        #[arg(long)]
        rating: u8,

        #[arg(long)]
        text: String,

        /// Review identifier (generated when omitted)
        #[arg(long)]
        review_id: Option<String>,
    },

    /// Moderate every review in a file
    Bulk {
        /// Input file of reviews
        #[arg(short, long)]
        input: PathBuf,

        /// Input format: jsonl, json or csv (default: from the file extension)
        #[arg(long)]
        format: Option<ImportFormat>,

        /// Use this hotel id for every review in the file
        #[arg(long)]
        hotel_id: Option<String>,

        /// Write per-review results here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Results format: jsonl or csv (default: from the output extension)
        #[arg(long)]
        output_format: Option<ExportFormat>,

        /// Write the summary report here as JSON
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Maximum reviews analyzed at once
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_with_env(cli.config.as_deref())?;
    if let Some(timeout) = cli.timeout {
        config.analyzer.timeout_secs = timeout.as_secs().max(1);
    }
    config.validate().context("Invalid configuration")?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    let analyzer: Arc<dyn SemanticAnalyzer> = if cli.offline {
        info!("Offline mode, semantic analyzer disabled");
        Arc::new(DisabledAnalyzer)
    } else {
        build_analyzer(&config.analyzer)
    };

    let mut options = EngineOptions::from_config(&config);
    if let Some(timeout) = cli.timeout {
        options.timeout = timeout;
    }
    let engine = ModerationEngine::new(analyzer).with_options(options);

    match cli.command {
        Commands::Analyze {
            hotel_id,
            rating,
            text,
            review_id,
        } => {
            let review_id = review_id.unwrap_or_else(|| Review::generate_id(&hotel_id));
            let review = Review::new(review_id, hotel_id, rating, text);
            review.validate()?;

            let result = engine.moderate(&review).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }

        Commands::Bulk {
            input,
            format,
            hotel_id,
            output,
            output_format,
            summary,
            concurrency,
        } => {
            let format = format.unwrap_or_else(|| ImportFormat::from_path(&input));
            let concurrency = concurrency.unwrap_or(config.moderation.batch_concurrency);
            if concurrency == 0 {
                bail!("--concurrency must be greater than 0");
            }

            let stream = open_reviews(&input, format, hotel_id)
                .with_context(|| format!("Failed to open {}", input.display()))?;

            let mut skipped = 0_usize;
            let reviews = stream.filter_map(|item| match item {
                Ok(review) => Some(review),
                Err(e) => {
                    warn!(error = %e, "Skipping review");
                    skipped += 1;
                    None
                }
            });

            let report = moderate_batch(Arc::new(engine), reviews, concurrency).await;
            let totals = SummaryReport::from_results(&report.results);

            info!(
                run_id = %report.run_id,
                moderated = report.results.len(),
                skipped,
                failed = report.counts.failed,
                "Bulk moderation complete"
            );

            if let Some(path) = output {
                let format = output_format.unwrap_or_else(|| ExportFormat::from_path(&path));
                export_results_as(&path, &report.results, format)?;
            }
            if let Some(path) = summary {
                export_summary(&path, &totals)?;
            }

            let stdout = std::io::stdout();
            write_summary_json(stdout.lock(), &totals)?;
            std::io::stdout().flush()?;

            if report.counts.failed > 0 {
                bail!("{} review(s) could not be moderated", report.counts.failed);
            }
            Ok(())
        }
    }
}
