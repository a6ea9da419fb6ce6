//! `webassess history` command handler

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tracing::info;
use webassess_core::config::AssessConfig;
use webassess_core::history::{HistoryStore, JsonlHistoryStore};
use webassess_core::types::JobRecord;

use crate::cli::HistoryArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `history` command.
pub async fn execute(
    args: HistoryArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = AssessConfig::load_or_default(config_path).await?;
    let store = JsonlHistoryStore::new(&config.history.path);
    info!(path = %store.path().display(), "reading job history");

    let records = store.read_all().await?;
    let report = HistoryReport::new(store.path().display().to_string(), records, &args);
    writer.render(&report)?;
    Ok(())
}

/// Recorded runs, oldest first.
#[derive(Serialize)]
pub struct HistoryReport {
    pub source: String,
    pub records: Vec<JobRecord>,
}

impl HistoryReport {
    /// Apply the project filter, then keep the `limit` most recent runs.
    pub fn new(source: String, records: Vec<JobRecord>, args: &HistoryArgs) -> Self {
        let mut records: Vec<JobRecord> = records
            .into_iter()
            .filter(|r| args.project_id.as_ref().is_none_or(|p| &r.project_id == p))
            .collect();
        if let Some(limit) = args.limit {
            let skip = records.len().saturating_sub(limit);
            records.drain(..skip);
        }
        Self { source, records }
    }
}

impl Render for HistoryReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Job History (source: {})", self.source.bold())?;
        if self.records.is_empty() {
            writeln!(w, "  No assessment runs recorded.")?;
            return Ok(());
        }

        writeln!(
            w,
            "{:<10} {:<24} {:>6} {:>10} {:>8}  {}",
            "RUN", "PROJECT", "RATING", "COST", "SCORE", "MESSAGE"
        )?;
        writeln!(w, "{}", "-".repeat(80))?;
        for record in &self.records {
            let run_id = record.run_id.to_string();
            writeln!(
                w,
                "{:<10} {:<24} {:>6} {:>10.2} {:>8}  {}",
                &run_id[..8],
                record.project_id,
                record.availability_rating.value(),
                record.total_cost,
                record.score,
                record.message
            )?;
        }
        Ok(())
    }
}
