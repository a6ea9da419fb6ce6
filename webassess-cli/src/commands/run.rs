//! `webassess run` command handler
//!
//! Full assessment: architecture rating and cost, then the benchmark, then the
//! final score. A job record is written on every path, including failures.

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use tracing::{info, warn};
use webassess_architecture::ArchitectureReport;
use webassess_benchmark::{BenchmarkRunner, HttpBenchmarkRunner};
use webassess_core::config::AssessConfig;
use webassess_core::error::BenchmarkError;
use webassess_core::history::{HistoryStore, JsonlHistoryStore};
use webassess_core::types::JobRecord;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, rating_label};

/// Message recorded when every stage succeeded.
pub const SUCCESS_MESSAGE: &str = "Successfully your assessment was completed.";

/// Execute the `run` command.
pub async fn execute(
    args: RunArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = AssessConfig::load_or_default(config_path).await?;
    args.apply(&mut config.target);
    config.target.validate()?;

    let target = &config.target;
    info!(
        project_id = %target.project_id,
        endpoint = %target.endpoint,
        "assessment started"
    );

    let mut record = JobRecord::new(target.user_key.as_str(), target.project_id.as_str());
    let assessment = super::assess_target(&config).await;
    let benchmark = (config.benchmark.enabled && !args.skip_benchmark)
        .then(|| HttpBenchmarkRunner::new(config.benchmark.clone()));

    let result = score(&mut record, assessment, benchmark, &target.endpoint).await;

    if config.history.enabled {
        let store = JsonlHistoryStore::new(&config.history.path);
        record_history(&store, &record).await;
    }

    writer.render(&record)?;
    result
}

/// Fill `record` from the assessment and the benchmark.
///
/// The benchmark only runs once the architecture has been rated. Without a
/// benchmark the performance stays 0.
async fn score<B: BenchmarkRunner>(
    record: &mut JobRecord,
    assessment: Result<ArchitectureReport, CliError>,
    benchmark: Option<Result<B, BenchmarkError>>,
    endpoint: &str,
) -> Result<(), CliError> {
    let report = match assessment {
        Ok(report) => report,
        Err(e) => {
            record.message = format!("Failed to get availability rate: {e}");
            return Err(e);
        }
    };
    record.availability_rating = report.availability_rating;
    record.total_cost = report.total_cost;
    info!(
        availability_rating = record.availability_rating.value(),
        total_cost = record.total_cost,
        "architecture rated"
    );

    if let Some(runner) = benchmark {
        let performance = match runner {
            Ok(runner) => runner.run(endpoint).await,
            Err(e) => Err(e),
        };
        match performance {
            Ok(performance) => record.apply_performance(performance),
            Err(e) => {
                record.message = format!("Failed to get benchmark score: {e}");
                return Err(e.into());
            }
        }
    }

    record.message = SUCCESS_MESSAGE.to_owned();
    info!(
        run_id = %record.run_id,
        performance = record.performance,
        score = record.score,
        "assessment completed"
    );
    Ok(())
}

/// A history write failure is logged and does not fail the run.
async fn record_history<H: HistoryStore>(store: &H, record: &JobRecord) {
    if let Err(e) = store.append(record).await {
        warn!(error = %e, run_id = %record.run_id, "failed to write job history");
    }
}

impl Render for JobRecord {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Assessment {}", self.run_id.to_string().bold())?;
        writeln!(w, "  Project:       {}", self.project_id)?;
        writeln!(
            w,
            "  Availability:  {}",
            rating_label(self.availability_rating)
        )?;
        writeln!(w, "  Total cost:    {:.2}", self.total_cost)?;
        writeln!(w, "  Performance:   {}", self.performance)?;
        writeln!(w, "  Score:         {}", self.score)?;
        writeln!(w, "  Score by cost: {:.4}", self.score_by_cost)?;
        let message = if self.message == SUCCESS_MESSAGE {
            self.message.green()
        } else {
            self.message.red()
        };
        writeln!(w, "  Result:        {message}")?;
        Ok(())
    }
}
