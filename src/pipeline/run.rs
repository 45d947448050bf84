//! Pipeline entry points for the CLI commands.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{Config, Session};
use crate::pipeline::analytics;
use crate::pipeline::filter::FilterCriteria;
use crate::pipeline::ingest::{IngestMode, IngestOptions, ingest};
use crate::pipeline::ledger::{CustomerLedger, LogNotifier, Notifier};
use crate::pipeline::refresh::{self, RefreshContext};
use crate::pipeline::score::score_post;
use crate::services::{ContactLookup, FeedGateway, FeedSource};
use crate::storage::{ReportWriter, files};
use crate::utils::format_countdown;

/// Operator-supplied session inputs.
struct Inputs {
    token: String,
    groups: Vec<String>,
    keywords: Vec<String>,
    excludes: Vec<String>,
}

async fn load_inputs(config: &Config) -> Result<Inputs> {
    let token = files::load_token(Path::new(&config.paths.token_file)).await?;
    let groups = files::load_group_ids(Path::new(&config.paths.groups_file)).await?;
    if groups.is_empty() {
        return Err(AppError::validation("group list is empty"));
    }

    let keywords = match &config.paths.keywords_file {
        Some(path) => files::load_keywords(Path::new(path)).await?,
        None => Vec::new(),
    };
    let excludes = match &config.paths.exclude_keywords_file {
        Some(path) => files::load_keywords(Path::new(path)).await?,
        None => Vec::new(),
    };

    log::info!(
        "Loaded {} groups and {} keywords ({} excluded)",
        groups.len(),
        keywords.len(),
        excludes.len()
    );
    Ok(Inputs {
        token,
        groups,
        keywords,
        excludes,
    })
}

/// Validate the access token against the caller's own profile.
pub async fn run_test(config: &Config) -> Result<()> {
    let token = files::load_token(Path::new(&config.paths.token_file)).await?;
    let gateway = FeedGateway::new(&config.gateway, &token)?;

    let profile = gateway.validate_token().await?;
    let who = profile
        .name
        .or(profile.id)
        .unwrap_or_else(|| "unknown profile".to_string());
    log::info!("Token is valid: {who}");
    Ok(())
}

/// One full ingestion, optional older pages, optional contact resolution,
/// then reports.
pub async fn run_fetch(config: &Config, pages: u32, resolve: bool) -> Result<()> {
    let inputs = load_inputs(config).await?;
    let gateway = FeedGateway::new(&config.gateway, &inputs.token)?;

    let mut session = Session::default();
    let mut ledger = CustomerLedger::new(config.scoring.alert_threshold);
    let notifier = LogNotifier;

    fetch_into(&gateway, config, &inputs, &mut session, pages).await;
    if resolve || config.lookup.auto_resolve {
        resolve_contacts(config, &inputs, &mut session, &mut ledger, &notifier).await;
    }
    report(config, &inputs, &session, &ledger).await
}

/// Like `fetch`, then keep refreshing automatically until Ctrl-C.
pub async fn run_watch(config: &Config, resolve: bool) -> Result<()> {
    let inputs = load_inputs(config).await?;
    let gateway = Arc::new(FeedGateway::new(&config.gateway, &inputs.token)?);

    let mut session = Session::default();
    let mut ledger = CustomerLedger::new(config.scoring.alert_threshold);
    let notifier = Arc::new(LogNotifier);

    fetch_into(gateway.as_ref(), config, &inputs, &mut session, 0).await;
    if resolve || config.lookup.auto_resolve {
        resolve_contacts(config, &inputs, &mut session, &mut ledger, notifier.as_ref()).await;
    }
    report(config, &inputs, &session, &ledger).await?;

    if session.posts.is_empty() {
        log::warn!("No posts ingested; auto-refresh not started");
        return Ok(());
    }

    let shared = Arc::new(Mutex::new(session));
    let context = RefreshContext {
        source: gateway as Arc<dyn FeedSource>,
        session: Arc::clone(&shared),
        notifier: notifier as Arc<dyn Notifier>,
        groups: inputs.groups.clone(),
        keywords: inputs.keywords.clone(),
        scoring: config.scoring.clone(),
        no_cursor_policy: config.refresh.no_cursor_policy,
        request_delay_ms: config.gateway.request_delay_ms,
    };
    let handle = refresh::spawn(context, config.refresh.period_secs);
    log::info!(
        "Auto-refresh enabled; next run in {}. Press Ctrl-C to stop.",
        format_countdown(handle.remaining_secs())
    );

    tokio::signal::ctrl_c().await?;
    handle.cancel();
    log::info!("Auto-refresh stopped");

    let session = shared.lock().await;
    report(config, &inputs, &session, &ledger).await
}

/// Resolve a single author identifier against the mapping file.
pub async fn run_resolve(config: &Config, author_id: &str) -> Result<()> {
    let Some(mapping) = &config.paths.mapping_file else {
        return Err(AppError::config("paths.mapping_file is not set"));
    };

    let lookup = ContactLookup::new(config.lookup.chunk_size);
    match lookup.resolve(author_id, Path::new(mapping)).await {
        Some(contact) => log::info!("{author_id} -> {contact}"),
        None => log::info!("{author_id} -> unresolved"),
    }
    Ok(())
}

/// Validate configuration and operator files without touching the gateway.
pub async fn run_validate(config: &Config) -> Result<()> {
    config.validate()?;

    files::load_token(Path::new(&config.paths.token_file)).await?;
    log::info!("Token file OK");

    let groups = files::load_group_ids(Path::new(&config.paths.groups_file)).await?;
    log::info!("Group list OK: {} groups", groups.len());

    if let Some(path) = &config.paths.keywords_file {
        let keywords = files::load_keywords(Path::new(path)).await?;
        log::info!("Keyword list OK: {} keywords", keywords.len());
    }
    if let Some(path) = &config.paths.exclude_keywords_file {
        let excludes = files::load_keywords(Path::new(path)).await?;
        log::info!("Exclude list OK: {} keywords", excludes.len());
    }
    if let Some(path) = &config.paths.mapping_file {
        match tokio::fs::metadata(path).await {
            Ok(meta) => log::info!("Mapping file OK: {} bytes", meta.len()),
            Err(error) => log::warn!("Mapping file {path} is not readable: {error}"),
        }
    }

    log::info!("Configuration OK");
    Ok(())
}

async fn fetch_into(
    source: &dyn FeedSource,
    config: &Config,
    inputs: &Inputs,
    session: &mut Session,
    pages: u32,
) {
    let options = IngestOptions {
        mode: IngestMode::Full,
        auto: false,
        no_cursor_policy: config.refresh.no_cursor_policy,
        request_delay_ms: config.gateway.request_delay_ms,
    };
    let outcome = ingest(source, &inputs.groups, &session.cursors, &options).await;
    outcome.merge_into(session, IngestMode::Full);

    for page in 0..pages {
        if session.cursors.is_empty() {
            log::info!("No continuation cursors left after page {page}; stopping");
            break;
        }
        let options = IngestOptions {
            mode: IngestMode::Incremental,
            ..options.clone()
        };
        let cursors = session.cursors.clone();
        let outcome = ingest(source, &inputs.groups, &cursors, &options).await;
        outcome.merge_into(session, IngestMode::Incremental);
    }
}

async fn resolve_contacts(
    config: &Config,
    inputs: &Inputs,
    session: &mut Session,
    ledger: &mut CustomerLedger,
    notifier: &dyn Notifier,
) {
    let Some(mapping) = &config.paths.mapping_file else {
        log::warn!("No mapping file configured; skipping contact resolution");
        return;
    };
    let mapping = Path::new(mapping);
    let lookup = ContactLookup::new(config.lookup.chunk_size);

    for author_id in session.distinct_post_authors() {
        if session.contacts.is_resolved(&author_id) || !session.contacts.begin(&author_id) {
            continue;
        }

        let contact = lookup.resolve(&author_id, mapping).await;
        session.contacts.complete(&author_id, contact.clone());

        match contact {
            Some(contact) => {
                log::info!("Resolved contact for author {author_id}");
                for post in session
                    .posts
                    .iter()
                    .filter(|post| post.author_id() == Some(author_id.as_str()))
                {
                    let score = score_post(post, &inputs.keywords, &config.scoring);
                    ledger.upsert(post, score, Some(&contact), notifier);
                }
            }
            None => log::debug!("No contact found for author {author_id}"),
        }
    }

    log::info!(
        "Contact resolution complete: {} identifiers looked up, {} customers on the ledger",
        session.contacts.resolved_count(),
        ledger.len()
    );
}

async fn report(
    config: &Config,
    inputs: &Inputs,
    session: &Session,
    ledger: &CustomerLedger,
) -> Result<()> {
    let now = Utc::now();
    let criteria = FilterCriteria::build(
        &config.filter,
        inputs.keywords.clone(),
        inputs.excludes.clone(),
        config.scoring.clone(),
    );
    let visible = session
        .posts
        .iter()
        .filter(|post| criteria.include(post, now))
        .count();
    log::info!(
        "{visible} of {} posts match the active filters",
        session.posts.len()
    );

    let summary = analytics::summarize(session, ledger, &inputs.keywords, &config.scoring, now);
    log::info!(
        "Summary: {} posts ({} with images, {} high-scoring, {} today), {} comments",
        summary.total_posts,
        summary.posts_with_images,
        summary.high_score_posts,
        summary.today_posts,
        summary.total_comments
    );
    for (keyword, count) in summary.keyword_stats.iter().take(10) {
        log::info!("    keyword '{keyword}': {count} posts");
    }
    log::info!(
        "Customers: {} total, {} interested",
        summary.total_customers,
        summary.interested_customers
    );

    let writer = ReportWriter::new(&config.paths.output_dir);
    let posts_path = writer
        .write_posts_csv(session, &inputs.keywords, &config.scoring)
        .await?;
    log::info!("Post report written to {}", posts_path.display());

    let customers_path = writer.write_customers_csv(ledger).await?;
    log::info!("Customer report written to {}", customers_path.display());

    if !inputs.keywords.is_empty() {
        let keywords_path = writer.export_keywords(&inputs.keywords).await?;
        log::info!("Keyword list exported to {}", keywords_path.display());
    }

    Ok(())
}
