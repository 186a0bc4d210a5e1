//! `collect` command: fetch today's snapshot and fold it into the dataset.
//!
//! Every fetch finishes before the dataset file is touched, so a failed run
//! leaves the previous dataset as it was.

use chanstats_core::{AppConfig, VideoRecord};
use chanstats_dataset::SnapshotOutcome;
use chanstats_youtube::{normalize_video, YoutubeClient};
use chrono::NaiveDate;

/// Fetches the channel's newest uploads and stamps them with `today`.
///
/// # Errors
///
/// Returns an error if any API call fails or an item cannot be normalized.
pub(crate) async fn fetch_snapshot(
    client: &YoutubeClient,
    channel_id: &str,
    max_results: u32,
    today: NaiveDate,
) -> anyhow::Result<Vec<VideoRecord>> {
    let items = client
        .fetch_recent_videos(channel_id, max_results)
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch uploads for channel {channel_id}: {e}"))?;

    let records = items
        .into_iter()
        .map(|item| normalize_video(item, today))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Builds the API client from the configured key, timeout and user agent.
///
/// # Errors
///
/// Returns an error if `YOUTUBE_API_KEY` is not configured or the HTTP client
/// cannot be constructed.
pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<YoutubeClient> {
    let api_key = config.require_api_key()?;
    YoutubeClient::new(api_key, config.request_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build YouTube client: {e}"))
}

/// Runs one collection cycle for `today` against the configured channel and
/// dataset.
///
/// When `dry_run` is `true` the merged dataset is summarized on stdout and
/// the dataset file is left untouched.
///
/// # Errors
///
/// Returns an error if the channel id is not configured, any fetch fails,
/// the existing dataset cannot be parsed, or the write fails.
pub(crate) async fn run_collect(
    config: &AppConfig,
    client: &YoutubeClient,
    today: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<()> {
    let channel_id = config.require_channel_id()?;

    let fresh = fetch_snapshot(client, channel_id, config.max_results, today).await?;
    tracing::info!(%channel_id, %today, fetched = fresh.len(), "snapshot fetched");

    let existing = chanstats_dataset::load_or_empty(&config.dataset_path)?;
    let outcome = chanstats_dataset::apply_snapshot(existing, fresh, today, config.retention_days);

    if dry_run {
        println!("dry-run: {}", summarize(&outcome, today));
        return Ok(());
    }

    chanstats_dataset::save(&config.dataset_path, &outcome.records)?;
    tracing::info!(
        path = %config.dataset_path.display(),
        records = outcome.records.len(),
        replaced = outcome.replaced,
        pruned = outcome.pruned,
        excluded_same_day = outcome.excluded_same_day.len(),
        "dataset updated"
    );
    println!(
        "updated {}: {}",
        config.dataset_path.display(),
        summarize(&outcome, today)
    );
    Ok(())
}

fn summarize(outcome: &SnapshotOutcome, today: NaiveDate) -> String {
    let collected_today = outcome
        .records
        .iter()
        .filter(|r| r.collected_at == today)
        .count();
    format!(
        "{collected_today} videos for {today}, {} records total ({} replaced, {} pruned, {} published today skipped)",
        outcome.records.len(),
        outcome.replaced,
        outcome.pruned,
        outcome.excluded_same_day.len()
    )
}
