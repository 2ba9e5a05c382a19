use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use happiness_index::chi::ChiClient;
use happiness_index::config::AppConfig;
use happiness_index::models::{FeedbackItem, FeedbackType};
use happiness_index::sentiment::{self, KeywordClassifier};
use happiness_index::{db, happiness, loader, query, report, trend};

#[derive(Parser)]
#[command(name = "happiness-index")]
#[command(about = "Customer happiness scoring for support feedback", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Feedback JSON fixture to read instead of the configured one
    #[arg(long, conflicts_with = "db")]
    fixture: Option<PathBuf>,
    /// Read feedback from Postgres (DATABASE_URL)
    #[arg(long)]
    db: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Technical,
    Feedback,
}

impl From<KindArg> for FeedbackType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Technical => FeedbackType::Technical,
            KindArg::Feedback => FeedbackType::Feedback,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load the bundled feedback fixture into the database
    Seed,
    /// Import feedback from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Score happiness per product, worst first
    Score {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print the scores as JSON
        #[arg(long)]
        json: bool,
    },
    /// List feedback for one product
    Feedback {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        product: String,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Overlay quarterly CHI scores from the external service
    Trend {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: SourceArgs,
        /// Restrict the report to one product
        #[arg(long)]
        product: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn load_items(
    source: &SourceArgs,
    config: &AppConfig,
    product: Option<&str>,
) -> anyhow::Result<Vec<FeedbackItem>> {
    if source.db {
        let pool = connect().await?;
        return db::fetch_feedback(&pool, product).await;
    }

    let items = match source.fixture.as_ref().or(config.source.fixture.as_ref()) {
        Some(path) => loader::load_feedback_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => loader::bundled_feedback().context("bundled fixture is invalid")?,
    };

    Ok(match product {
        Some(name) => query::feedback_for_product(&items, name)
            .into_iter()
            .cloned()
            .collect(),
        None => items,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load();
    let baselines = config.baselines();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect().await?;
            let inserted = db::seed(&pool).await?;
            println!("Seed data inserted ({inserted} new records).");
        }
        Commands::Import { csv } => {
            let pool = connect().await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} feedback records from {}.", csv.display());
        }
        Commands::Score {
            source,
            limit,
            json,
        } => {
            let items = load_items(&source, &config, None).await?;
            let scores = happiness::compute_happiness_with(&items, &KeywordClassifier, &baselines);

            if json {
                println!("{}", serde_json::to_string_pretty(&scores)?);
                return Ok(());
            }
            if scores.is_empty() {
                println!("No feedback found.");
                return Ok(());
            }

            println!("Products by happiness (worst first):");
            for score in scores.iter().take(limit) {
                println!(
                    "- {} (#{}) {}% ({:+} since yesterday) across {} records, {} technical, {} positive",
                    score.product,
                    score.product_id,
                    score.happiness_score,
                    score.daily_change,
                    score.total_feedback,
                    score.technical_issues,
                    score.positive_count
                );
            }
        }
        Commands::Feedback {
            source,
            product,
            kind,
        } => {
            let items = load_items(&source, &config, Some(product.as_str())).await?;
            let found = match kind {
                Some(kind) => query::by_kind(&items, &product, kind.into()),
                None => query::feedback_for_product(&items, &product),
            };

            if found.is_empty() {
                println!("No feedback found for {product}.");
                return Ok(());
            }

            for item in found {
                println!(
                    "- #{} [{}] ({:?}) {}",
                    item.id,
                    item.kind,
                    sentiment::classify(&item.transcript),
                    item.transcript
                );
            }
        }
        Commands::Trend { source, json } => {
            let items = load_items(&source, &config, None).await?;
            let scores = happiness::compute_happiness_with(&items, &KeywordClassifier, &baselines);
            let ids = trend::tracked_product_ids(&scores, &config.chi.product_ids);

            let client = ChiClient::new(&config.chi)?;
            let quarterly = client.quarterly_for(&ids).await;
            let trends = trend::apply_quarterly(&scores, &quarterly);

            if json {
                println!("{}", serde_json::to_string_pretty(&trends)?);
                return Ok(());
            }

            for entry in &trends {
                let period = if entry.quarterly { "last quarter" } else { "yesterday" };
                println!(
                    "- {} {}% ({:+} since {}){}",
                    entry.product,
                    entry.happiness_score,
                    entry.change,
                    period,
                    if entry.chi_loaded { " [CHI]" } else { "" }
                );
            }
        }
        Commands::Report {
            source,
            product,
            out,
        } => {
            let items = load_items(&source, &config, product.as_deref()).await?;
            let report = report::build_report(
                product.as_deref(),
                chrono::Utc::now(),
                &items,
                &KeywordClassifier,
                &baselines,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
