//! One digest run: resolve points, run the pipeline, print, deliver.

use localbirds_core::{AppConfig, ObservationResult, QueryPoint};
use localbirds_digest::{
    build_query_plan, filter_description, render_html, render_markdown, EmailNotifier, IpLocator,
    PipelineError, TelegramNotifier,
};
use localbirds_ebird::{EbirdClient, SpeciesTable};

/// Everything a run needs that is fixed for the lifetime of the process.
///
/// Points are resolved once here, so a long-running `watch` keeps measuring
/// from the same origin even if the host's network location changes.
pub(crate) struct DigestContext {
    pub config: AppConfig,
    pub client: EbirdClient,
    pub points: Vec<QueryPoint>,
    pub species: SpeciesTable,
}

impl DigestContext {
    pub(crate) async fn prepare(config: AppConfig) -> anyhow::Result<Self> {
        let points = resolve_points(&config).await?;
        let species = match &config.species_names_path {
            Some(path) => SpeciesTable::load(path)?,
            None => SpeciesTable::builtin(),
        };
        let client = EbirdClient::new(
            &config.ebird_api_key,
            config.request_timeout_secs,
            &config.user_agent,
        )?;

        Ok(Self {
            config,
            client,
            points,
            species,
        })
    }
}

/// Configured points, or the IP-derived current location when none are set.
pub(crate) async fn resolve_points(config: &AppConfig) -> anyhow::Result<Vec<QueryPoint>> {
    if !config.locations.is_empty() {
        return Ok(config.locations.clone());
    }

    tracing::info!("no locations configured; resolving current location");
    let locator = IpLocator::new(config.request_timeout_secs, &config.user_agent)?;
    let point = locator.resolve().await?;
    Ok(vec![point])
}

pub(crate) fn print_plan(config: &AppConfig, points: &[QueryPoint]) {
    let plan = build_query_plan(config, points);

    println!("{}", filter_description(config, points));
    println!();
    if plan.is_empty() {
        println!("no queries planned");
        return;
    }
    for (idx, query) in plan.iter().enumerate() {
        println!("{:>3}. {query}", idx + 1);
    }
    println!();
    println!(
        "{} queries, radius {} km, {} day(s) back, on error: {}",
        plan.len(),
        config.max_distance_km(),
        config.days_back,
        config.on_error
    );
}

/// Runs the pipeline once, prints the digest, and delivers it unless
/// `dry_run` is set.
pub(crate) async fn run_once(ctx: &DigestContext, dry_run: bool, json: bool) -> anyhow::Result<()> {
    let run = localbirds_digest::run(&ctx.client, &ctx.config, &ctx.points, &ctx.species).await?;
    let failed_queries = run
        .failures
        .iter()
        .filter(|f| matches!(f, PipelineError::SourceFetch { .. }))
        .count();
    if run.planned_queries > 0 && failed_queries == run.planned_queries {
        anyhow::bail!("all {failed_queries} eBird queries failed");
    }

    let description = filter_description(&ctx.config, &ctx.points);

    if json {
        println!("{}", serde_json::to_string_pretty(&run.results)?);
    } else {
        print!("{}", render_markdown(&run.results, &description));
    }

    tracing::info!(
        results = run.results.len(),
        failures = run.failures.len(),
        queries = run.planned_queries,
        "digest ready"
    );

    if dry_run {
        tracing::info!("dry run: skipping delivery");
        return Ok(());
    }
    deliver(&ctx.config, &run.results, &description).await
}

/// Sends the digest on every enabled channel.
///
/// A failing channel does not stop the other one; the run fails afterwards
/// if any channel failed.
async fn deliver(
    config: &AppConfig,
    results: &[ObservationResult],
    description: &str,
) -> anyhow::Result<()> {
    if config.email.is_none() && config.telegram.is_none() {
        tracing::info!("no delivery channels enabled");
        return Ok(());
    }

    let mut failed: Vec<&str> = Vec::new();

    if let Some(email) = &config.email {
        let html = render_html(results, description);
        let outcome = match EmailNotifier::new(email, config.request_timeout_secs) {
            Ok(notifier) => notifier.send(&html, &email.subject, &email.recipients).await,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            tracing::error!(error = %e, "email delivery failed");
            failed.push("email");
        }
    }

    if let Some(telegram) = &config.telegram {
        let markdown = render_markdown(results, description);
        let outcome = match TelegramNotifier::new(telegram, config.request_timeout_secs) {
            Ok(notifier) => notifier.send(&markdown).await,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            tracing::error!(error = %e, "telegram delivery failed");
            failed.push("telegram");
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("delivery failed for: {}", failed.join(", "));
    }
    Ok(())
}
