//! `webassess resolve` command handler

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use tracing::info;
use webassess_architecture::{ArchitectureReport, CloudResource, ComputingResource};
use webassess_core::config::AssessConfig;

use crate::cli::TargetArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, rating_label};

/// Execute the `resolve` command.
///
/// Resolves the architecture behind the endpoint and prints it with its
/// availability rating and total cost. No benchmark is run and nothing is
/// recorded in the job history.
pub async fn execute(
    args: TargetArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = AssessConfig::load_or_default(config_path).await?;
    args.apply(&mut config.target);
    config.target.validate()?;

    info!(
        project_id = %config.target.project_id,
        endpoint = %config.target.endpoint,
        "resolving architecture"
    );
    let report = super::assess_target(&config).await?;
    writer.render(&report)?;
    Ok(())
}

fn location(app: &ComputingResource) -> &str {
    [app.zone(), app.region()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("-")
}

impl Render for ArchitectureReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let arch = &self.architecture;

        writeln!(
            w,
            "Architecture: {} ({})",
            self.project_id.bold(),
            self.endpoint
        )?;
        writeln!(w, "  Front door:   {}", arch.front_door().unwrap_or("-"))?;
        writeln!(w, "  Computing:")?;
        for app in arch.apps() {
            writeln!(
                w,
                "    {:<16} {:<20} {:>10.2}  {}",
                app.platform_name(),
                location(app),
                app.cost(),
                app.id()
            )?;
        }
        let db = arch.db();
        writeln!(
            w,
            "  Database:     {} {} ({:.2})",
            db.platform_name(),
            db.id(),
            db.cost()
        )?;
        writeln!(
            w,
            "  Availability: {}",
            rating_label(self.availability_rating)
        )?;
        writeln!(w, "  Total cost:   {:.2}", self.total_cost)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;

    #[test]
    fn test_report_render_text_lists_every_resource() {
        let report = fixtures::report();
        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("shop-prod"));
        assert!(output.contains("Front door:   shop-lb"));
        assert!(output.contains("us-central1-a"));
        assert!(output.contains("instances/web-2"));
        assert!(output.contains("Cloud SQL shop-prod:orders (4.00)"));
        assert!(output.contains("2 (multi zone)"));
        assert!(output.contains("Total cost:   10.00"));
    }

    #[test]
    fn test_report_json_carries_rating_and_resources() {
        let report = fixtures::report();
        let json = serde_json::to_value(&report).expect("report should serialize");

        assert_eq!(json["availability_rating"].as_u64(), Some(2));
        assert_eq!(json["total_cost"].as_f64(), Some(10.0));
        assert_eq!(json["architecture"]["front_door"].as_str(), Some("shop-lb"));
        let apps = json["architecture"]["apps"]
            .as_array()
            .expect("apps should be an array");
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0]["kind"].as_str(), Some("virtual_machine"));
        assert_eq!(
            json["architecture"]["db"]["kind"].as_str(),
            Some("relational")
        );
    }

    #[test]
    fn test_location_prefers_zone_then_region() {
        let report = fixtures::report();
        assert_eq!(location(&report.architecture.apps()[0]), "us-central1-a");

        let serverless = ComputingResource::Serverless(webassess_architecture::ServerlessService {
            id: "apps/shop".to_owned(),
            platform: webassess_architecture::ServerlessPlatform::AppEngine,
            region: String::new(),
            cost: 0.0,
        });
        assert_eq!(location(&serverless), "-");
    }
}
