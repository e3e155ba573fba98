mod report;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use darazscout_core::{FunnelStage, LlmModel, SortKey};
use tracing_subscriber::EnvFilter;

use crate::scrape::{ScrapeCommand, TargetSource};

#[derive(Debug, Parser)]
#[command(name = "darazscout")]
#[command(about = "Daraz.lk product scraper with model-driven extraction")]
struct Cli {
    /// Completion model; overrides DARAZSCOUT_MODEL.
    #[arg(long, global = true)]
    model: Option<LlmModel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print search-result targets for a query, one tab-delimited line each.
    Generate {
        #[arg(long)]
        query: String,

        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=50))]
        pages: u32,
    },
    /// Parse target lines (file or stdin) and list what was recognised.
    Targets {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Scrape targets and report the products found.
    Scrape {
        /// Target lines file; stdin when neither this nor --query is given.
        #[arg(long, conflicts_with = "query")]
        input: Option<PathBuf>,

        /// Generate targets from a search query instead of reading input.
        #[arg(long)]
        query: Option<String>,

        #[arg(
            long,
            default_value_t = 3,
            requires = "query",
            value_parser = clap::value_parser!(u32).range(1..=50)
        )]
        pages: u32,

        /// score, sold, reviews, rating, or priceValue.
        #[arg(long, default_value = "score")]
        sort: SortKey,

        /// Funnel stages to list; SCRAPED when omitted.
        #[arg(long = "stage")]
        stages: Vec<FunnelStage>,

        #[arg(long, default_value_t = 50)]
        limit: usize,

        #[arg(long, conflicts_with = "export_dir")]
        csv: Option<PathBuf>,

        /// Write `daraz_scrape_<timestamp>.csv` into this directory.
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Question to ask about the results; repeatable.
        #[arg(long = "ask")]
        questions: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let mut config = darazscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(model) = cli.model {
        config.model = model;
    }

    match cli.command {
        Commands::Generate { query, pages } => scrape::run_generate(&config, &query, pages),
        Commands::Targets { input } => scrape::run_targets(input.as_deref())?,
        Commands::Scrape {
            input,
            query,
            pages,
            sort,
            stages,
            limit,
            csv,
            export_dir,
            questions,
        } => {
            let source = match query {
                Some(query) => TargetSource::Query { query, pages },
                None => TargetSource::Input(input),
            };
            scrape::run_scrape_command(
                &config,
                ScrapeCommand {
                    source,
                    sort,
                    stages,
                    limit,
                    csv,
                    export_dir,
                    questions,
                },
            )
            .await?;
        }
    }

    Ok(())
}
