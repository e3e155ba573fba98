//! Command handlers for `generate`, `targets`, and `scrape`.
//!
//! These are called from `main` once config is loaded. Per-target scrape
//! failures are reported and tallied rather than propagated, so one bad
//! page never aborts the run.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use darazscout_core::{filter_by_stages, sort_products, AppConfig, FunnelStage, SessionState, SortKey};
use darazscout_scraper::{ScrapeOptions, ScrapeTarget};

use crate::report;

/// Where the `scrape` command gets its targets.
#[derive(Debug)]
pub(crate) enum TargetSource {
    Query { query: String, pages: u32 },
    /// A file, or stdin when `None`.
    Input(Option<PathBuf>),
}

/// Listing, export, and chat options for the `scrape` command.
#[derive(Debug)]
pub(crate) struct ScrapeCommand {
    pub(crate) source: TargetSource,
    pub(crate) sort: SortKey,
    pub(crate) stages: Vec<FunnelStage>,
    pub(crate) limit: usize,
    pub(crate) csv: Option<PathBuf>,
    pub(crate) export_dir: Option<PathBuf>,
    pub(crate) questions: Vec<String>,
}

/// Prints generated search targets as tab-delimited input lines.
///
/// A comma in `query` ends up in each label, and the input parser splits on
/// the first comma, so those lines will not read back as the same targets.
pub(crate) fn run_generate(config: &AppConfig, query: &str, pages: u32) {
    if query.contains(',') {
        tracing::warn!(
            query,
            "query contains a comma; generated lines will not parse back as these targets, use `scrape --query` instead"
        );
    }
    let targets =
        darazscout_scraper::generate_search_urls_with_endpoint(&config.search_endpoint, query, pages);
    for target in &targets {
        println!("{}", target.to_input_line());
    }
    tracing::info!(query, pages, "generated search targets");
}

/// Parses input lines and lists the targets found.
pub(crate) fn run_targets(input: Option<&Path>) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let parsed = darazscout_scraper::parse_input_detailed(&text);
    if parsed.skipped > 0 {
        tracing::warn!(skipped = parsed.skipped, "dropped unrecognised input lines");
    }
    for (idx, target) in parsed.targets.iter().enumerate() {
        println!("{:>3}. {} -> {}", idx + 1, target.category, target.url);
    }
    println!(
        "{} targets ({} lines skipped)",
        parsed.targets.len(),
        parsed.skipped
    );
    Ok(())
}

/// Resolves the target list for a scrape run.
pub(crate) fn resolve_targets(
    config: &AppConfig,
    source: &TargetSource,
) -> anyhow::Result<Vec<ScrapeTarget>> {
    match source {
        TargetSource::Query { query, pages } => Ok(
            darazscout_scraper::generate_search_urls_with_endpoint(
                &config.search_endpoint,
                query,
                *pages,
            ),
        ),
        TargetSource::Input(path) => {
            let text = read_input(path.as_deref())?;
            let parsed = darazscout_scraper::parse_input_detailed(&text);
            if parsed.skipped > 0 {
                tracing::warn!(skipped = parsed.skipped, "dropped unrecognised input lines");
            }
            Ok(parsed.targets)
        }
    }
}

/// Runs a full scrape batch and prints the results.
///
/// # Errors
///
/// Returns an error if the API key is missing, no valid targets are found,
/// the HTTP clients cannot be built, the CSV cannot be written, or a chat
/// question fails. Per-target scrape failures are not errors.
pub(crate) async fn run_scrape_command(
    config: &AppConfig,
    command: ScrapeCommand,
) -> anyhow::Result<()> {
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| darazscout_core::ConfigError::MissingEnvVar("OPENAI_API_KEY".to_owned()))?;

    let targets = resolve_targets(config, &command.source)?;
    if targets.is_empty() {
        anyhow::bail!("no valid targets found; check the input format");
    }

    let pages = darazscout_scraper::PageClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        &config.cors_proxy,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build page client: {e}"))?;
    let llm = darazscout_scraper::LlmClient::with_base_url(
        api_key,
        &config.llm_base_url,
        config.llm_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build completion client: {e}"))?;
    let options = ScrapeOptions::from_config(config);

    let mut session = SessionState::new();

    tracing::info!(
        targets = targets.len(),
        model = %options.model,
        "starting scrape"
    );
    let summary =
        darazscout_scraper::run_scrape(&pages, &llm, &options, &targets, &mut session).await;

    print!("{}", report::render_outcomes(&summary));
    println!();
    print!("{}", report::render_stats(&session.stats, session.products.len()));

    if session.products.is_empty() {
        println!("\nNo data available.");
    } else {
        let mut sorted = session.products.clone();
        sort_products(&mut sorted, command.sort);
        let stages = if command.stages.is_empty() {
            vec![FunnelStage::Scraped]
        } else {
            command.stages.clone()
        };
        let shown: Vec<_> = filter_by_stages(&sorted, &stages)
            .into_iter()
            .take(command.limit)
            .collect();

        println!("\nProducts (sorted by {})", command.sort);
        print!("{}", report::render_listing(&shown));
        println!();
        print!("{}", report::render_analytics(&session));
    }

    if let Some(path) = export_path(command.csv.as_deref(), command.export_dir.as_deref()) {
        export_csv(&session, &path)?;
        println!("\nExported {} products to {}", session.products.len(), path.display());
    }

    for question in &command.questions {
        let answer = darazscout_scraper::ask_about_products(&llm, &options.model, &mut session, question)
            .await
            .with_context(|| format!("chat question failed: {question}"))?;
        println!("\nQ: {question}\nA: {answer}");
    }

    Ok(())
}

/// `--csv` wins; otherwise `--export-dir` gets a timestamped file name.
pub(crate) fn export_path(csv: Option<&Path>, export_dir: Option<&Path>) -> Option<PathBuf> {
    match (csv, export_dir) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(dir)) => Some(dir.join(darazscout_scraper::export_filename(chrono::Utc::now()))),
        (None, None) => None,
    }
}

fn export_csv(session: &SessionState, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let rows = darazscout_scraper::write_products_csv(&session.products, file)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(rows, path = %path.display(), "wrote CSV export");
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read targets from stdin")?;
            Ok(text)
        }
    }
}
