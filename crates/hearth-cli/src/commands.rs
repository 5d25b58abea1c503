//! Command handlers wiring configuration to the engine jobs.

use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};

use hearth_config::{HearthConfig, StoreConfig};
use hearth_engine::review::{ReviewConfig, run_daily_review};
use hearth_engine::rollover::{RolloverConfig, run_weekly_rollover};
use hearth_engine::{LlmSummarizer, NoSummarizer};
use hearth_store::StoreClient;

pub async fn rollover(config: &HearthConfig, now: Option<&str>) -> anyhow::Result<()> {
    let anchor = resolve_anchor(now)?;
    let store = build_store(&config.store);
    let job = RolloverConfig {
        template_db: config.store.template_db_id.clone(),
        active_db: config.store.active_db_id.clone(),
    };

    if !config.summarizer.is_configured() {
        tracing::debug!("summarizer not configured, instances get no history digest");
    }
    let report = if config.summarizer.is_configured() {
        let summarizer = LlmSummarizer::new(
            &config.summarizer.base_url,
            &config.summarizer.api_key,
            &config.summarizer.model,
        );
        run_weekly_rollover(&store, &summarizer, &job, anchor).await?
    } else {
        run_weekly_rollover(&store, &NoSummarizer, &job, anchor).await?
    };

    println!(
        "rollover: {} templates, {} created, {} skipped, {} completions absorbed",
        report.templates, report.created, report.skipped, report.last_completed_updates
    );
    Ok(())
}

pub async fn review(config: &HearthConfig, now: Option<&str>) -> anyhow::Result<()> {
    let today = resolve_anchor(now)?.date_naive();
    let store = build_store(&config.store);
    let job = ReviewConfig {
        active_db: config.store.active_db_id.clone(),
    };

    let report = run_daily_review(&store, &job, today).await?;
    println!(
        "review: {} dated, {} categorized, {} rescheduled",
        report.missing_date.updated, report.missing_category.updated, report.overdue.updated
    );
    Ok(())
}

fn build_store(config: &StoreConfig) -> StoreClient {
    StoreClient::new(
        &config.base_url,
        &config.token,
        Duration::from_millis(config.min_call_interval_ms),
    )
}

/// Parse a `--now` override, or fall back to the wall clock.
fn resolve_anchor(now: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match now {
        Some(raw) => hearth_core::time::parse_utc(raw)
            .with_context(|| format!("invalid --now value '{raw}'")),
        None => Ok(Utc::now()),
    }
}
