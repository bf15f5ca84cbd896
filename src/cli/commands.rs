//! Command implementations

use crate::check::{CheckOutcome, HttpResponse, Sentinel};
use crate::config::Config;
use crate::extract::TextExtractor;
use crate::fetch::{HttpFetcher, PageSource};
use crate::notify::{Notifier, SlackNotifier};
use crate::storage::{Database, FingerprintRecord, FingerprintStore};
use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;

/// Sentinel wired to the real page, database and webhook
pub type LiveSentinel = Sentinel<HttpFetcher, Database, SlackNotifier>;

/// Build a sentinel from a validated configuration
pub fn build_sentinel(config: &Config) -> Result<LiveSentinel> {
    config.validate().context("Invalid configuration")?;

    let extractor = TextExtractor::new(&config.selector)?;
    let db = open_database(config)?;

    Ok(Sentinel::new(
        &config.webpage_uri,
        extractor,
        HttpFetcher::new(),
        db,
        SlackNotifier::from_config(config),
    ))
}

fn open_database(config: &Config) -> Result<Database> {
    Database::open(&config.database, &config.table)
        .with_context(|| format!("Failed to open fingerprint database {:?}", config.database))
}

/// Run a single check
pub async fn check(config: &Config) -> Result<CheckOutcome> {
    let sentinel = build_sentinel(config)?;
    let outcome = sentinel.check().await.context("Check failed")?;
    Ok(outcome)
}

/// Check on a fixed interval until interrupted with Ctrl+C
pub async fn watch(config: &Config, interval: Duration, json: bool) -> Result<()> {
    let sentinel = build_sentinel(config)?;

    println!("Watching {} every {}s", sentinel.uri(), interval.as_secs());
    println!("Press Ctrl+C to stop.\n");

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let checks = watch_until(&sentinel, interval, json, interrupted).await?;
    println!("\nStopping after {} check(s).", checks);

    Ok(())
}

/// Check on a fixed interval until `shutdown` completes, returning the number
/// of checks run
///
/// Checks never overlap: the next tick waits for the current check. A failed
/// check is logged and the loop carries on.
pub async fn watch_until<P, S, N, F>(
    sentinel: &Sentinel<P, S, N>,
    interval: Duration,
    json: bool,
    shutdown: F,
) -> Result<usize>
where
    P: PageSource,
    S: FingerprintStore,
    N: Notifier,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    tokio::pin!(shutdown);
    let mut checks = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                checks += 1;
                match sentinel.check().await {
                    Ok(outcome) if json => print_outcome_json(&outcome)?,
                    Ok(outcome) => print_outcome_text(&outcome),
                    Err(e) => {
                        let err = anyhow::Error::new(e);
                        tracing::error!("Check failed: {:#}", err);
                    }
                }
            }
        }
    }

    Ok(checks)
}

/// Stored records for the configured page, or all of them
pub fn status(config: &Config, all: bool) -> Result<Vec<FingerprintRecord>> {
    let db = open_database(config)?;

    if all {
        return Ok(db.records()?);
    }

    if config.webpage_uri.is_empty() {
        anyhow::bail!("No page configured. Set WEBPAGE_URI or use --all.");
    }

    Ok(db.record(&config.webpage_uri)?.into_iter().collect())
}

/// Delete the stored record for `uri` (or the configured page)
pub fn forget(config: &Config, uri: Option<&str>) -> Result<bool> {
    let uri = match uri {
        Some(uri) => uri,
        None if !config.webpage_uri.is_empty() => config.webpage_uri.as_str(),
        None => anyhow::bail!("No page configured. Set WEBPAGE_URI or pass a URI."),
    };

    let db = open_database(config)?;
    let removed = db.forget(uri)?;

    if removed {
        tracing::info!("Forgot fingerprint for {}", uri);
    }

    Ok(removed)
}

/// Print a check outcome as the `{ statusCode, body }` envelope
pub fn print_outcome_json(outcome: &CheckOutcome) -> Result<()> {
    let response = HttpResponse::ok(outcome)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Print a check outcome for humans
pub fn print_outcome_text(outcome: &CheckOutcome) {
    if outcome.is_different {
        println!("⚠ Change detected on {}", outcome.webpage_uri);
        println!(
            "  Hash: {} → {}",
            display_hash(&outcome.cached_hash),
            outcome.live_hash
        );
        println!("  Notification sent\n");
        for line in outcome.live_text.lines() {
            println!("  │ {}", line);
        }
    } else {
        println!("✓ No change on {}", outcome.webpage_uri);
        println!("  Hash: {}", outcome.live_hash);
    }
}

/// Print stored records as JSON
pub fn print_records_json(records: &[FingerprintRecord]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

/// Print stored records for humans
pub fn print_records_text(records: &[FingerprintRecord]) {
    if records.is_empty() {
        println!("No fingerprints stored.");
        return;
    }

    for record in records {
        println!("{}", record.uri);
        println!("  Hash: {}", display_hash(&record.hash));
        println!("  Updated: {}", format_millis(record.updated_at));
    }
}

/// Print the effective configuration with secrets masked
pub fn print_config(config: &Config) {
    println!("PageSentinel Configuration");
    println!("==========================\n");

    println!("Page: {}", or_unset(&config.webpage_uri));
    println!("Selector: {}", config.selector);
    println!("Database: {:?}", config.database);
    println!("Table: {}", config.table);

    println!("\nSlack webhook: {}", config.masked_webhook());
    println!("Slack channel: {}", or_unset(&config.slack.channel));
    println!("Slack username: {}", or_unset(&config.slack.username));
    println!("Slack avatar: {}", or_unset(&config.slack.avatar));
    println!("Button: {} → {}", config.slack.action_text, or_unset(config.action_url()));

    if let Err(e) = config.validate() {
        println!("\n⚠ {}", e);
    }
}

fn display_hash(hash: &str) -> &str {
    if hash.is_empty() {
        "(none)"
    } else {
        hash
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
