//! Impression
//!
//! Aspect-based impression analysis of customer reviews.

use anyhow::Result;
use clap::{Parser, Subcommand};
use impression_cli::{
    analyze_review, build_cache, check_complex, reanalyze, AppConfig, ReanalyzeOptions,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "impression")]
#[command(about = "Review impression analysis", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "impression.yaml", env = "IMPRESSION_CONFIG")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print Prometheus metrics after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse one review and print the result as JSON
    Analyze {
        /// Star rating (1-5)
        #[arg(short, long)]
        rating: u8,

        /// Ignore any cached result
        #[arg(long)]
        refresh: bool,

        /// Review text
        text: String,
    },

    /// Check whether a set of tags contradicts the rating
    Complex {
        #[arg(short, long)]
        rating: u8,

        /// JSON array of {category, subcategory, sentiment}
        #[arg(short, long)]
        tags: String,
    },

    /// Re-analyse stored reviews from a JSON-lines file
    Reanalyze {
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only re-analyse reviews with this rating
        #[arg(short, long)]
        rating: Option<u8>,

        /// Report changes without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Reviews analysed at once
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    let metrics_handle = if cli.metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    match cli.command {
        Command::Complex { rating, tags } => {
            let complex = check_complex(rating, &tags)?;
            println!("{}", serde_json::json!({ "tags_complex": complex }));
        }
        Command::Analyze {
            rating,
            refresh,
            text,
        } => {
            let config = AppConfig::load(&cli.config)?;
            let cache = build_cache(&config)?;
            let output = analyze_review(&cache, &text, rating, refresh).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Reanalyze {
            input,
            output,
            rating,
            dry_run,
            concurrency,
        } => {
            let config = AppConfig::load(&cli.config)?;
            let cache = build_cache(&config)?;

            let mut options = ReanalyzeOptions::new(input);
            options.output = output;
            options.rating = rating;
            options.dry_run = dry_run;
            if let Some(concurrency) = concurrency {
                options.concurrency = concurrency;
            }

            info!("Re-analysing {}", options.input.display());
            let report = reanalyze(cache, &options).await?;
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("impression=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("impression=info"))
    };

    // Logs go to stderr; stdout carries JSON output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Install the Prometheus recorder and return a handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "impression_analyses_total",
        "Reviews analysed, by path (empty or text)"
    );
    metrics::describe_counter!(
        "impression_ml_fallback_total",
        "ML classifier fallbacks to a neutral prediction, by reason"
    );
    metrics::describe_counter!(
        "impression_cache_requests_total",
        "Analysis cache lookups by outcome"
    );

    info!("Metrics recorder initialized");
    Ok(handle)
}
