//! `report` command: render the day-over-day comparison as static HTML.

use chanstats_core::{AppConfig, VideoRecord};
use chanstats_dataset::DatasetError;
use chanstats_report::ReportOptions;

/// Builds the report document from already-loaded records.
///
/// # Errors
///
/// Returns an error if `records` is empty.
pub(crate) fn build_report(records: &[VideoRecord], options: &ReportOptions) -> anyhow::Result<String> {
    let diff = chanstats_dataset::day_over_day(records)?;
    tracing::info!(
        latest = %diff.latest_date,
        previous = %diff.prev_date,
        rows = diff.rows.len(),
        has_prior = diff.has_prior,
        "comparison computed"
    );
    Ok(chanstats_report::render_html(&diff, options))
}

/// Loads the dataset, renders the report and writes it (or prints it when
/// `to_stdout` is set).
///
/// # Errors
///
/// Returns an error if the dataset is missing, unparseable or empty, or the
/// report cannot be written.
pub(crate) fn run_report(config: &AppConfig, to_stdout: bool) -> anyhow::Result<()> {
    let records = match chanstats_dataset::load(&config.dataset_path) {
        Err(DatasetError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            anyhow::bail!(
                "dataset {} not found; run `chanstats collect` first",
                config.dataset_path.display()
            );
        }
        other => other?,
    };

    let options = ReportOptions {
        title: config.report_title.clone(),
        generated_at: config
            .report_timestamp
            .then(|| chrono::Local::now().naive_local()),
        date_style: config.report_date_style,
    };
    let html = build_report(&records, &options)?;

    if to_stdout {
        print!("{html}");
        return Ok(());
    }

    chanstats_report::write_report(&config.report_path, &html)?;
    println!("wrote {}", config.report_path.display());
    Ok(())
}
