//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no I/O happens here. Target overrides are applied to
//! the loaded configuration through [`TargetArgs::apply`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use webassess_core::config::TargetConfig;

/// webassess -- cloud architecture assessment.
///
/// Use `webassess <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "webassess", version, about, long_about = None)]
pub struct Cli {
    /// Path to the webassess.toml configuration file.
    #[arg(short, long, default_value = "webassess.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full assessment: architecture, availability, cost and benchmark.
    Run(RunArgs),

    /// Resolve the architecture behind an endpoint without benchmarking it.
    Resolve(TargetArgs),

    /// List recorded assessment runs.
    History(HistoryArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- target ----

/// Assessment target overrides (take precedence over file and env).
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Cloud project that hosts the application.
    #[arg(long)]
    pub project_id: Option<String>,

    /// Public endpoint URL of the application.
    #[arg(long)]
    pub endpoint: Option<String>,
}

impl TargetArgs {
    /// Overwrite the configured target with any flags that were given.
    pub fn apply(&self, target: &mut TargetConfig) {
        if let Some(project_id) = &self.project_id {
            target.project_id = project_id.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            target.endpoint = endpoint.clone();
        }
    }
}

// ---- run ----

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// User key recorded with the run.
    #[arg(long)]
    pub user_key: Option<String>,

    /// Skip the benchmark and score the architecture only.
    #[arg(long)]
    pub skip_benchmark: bool,
}

impl RunArgs {
    pub fn apply(&self, target: &mut TargetConfig) {
        self.target.apply(target);
        if let Some(user_key) = &self.user_key {
            target.user_key = user_key.clone();
        }
    }
}

// ---- history ----

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only show runs for this project.
    #[arg(long)]
    pub project_id: Option<String>,

    /// Show at most this many of the most recent runs.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

// ---- config ----

/// Manage webassess configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, target, gcp, pricing, benchmark, history).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["webassess", "run"]).expect("should parse 'run'");
        match cli.command {
            Commands::Run(args) => {
                assert!(args.target.project_id.is_none());
                assert!(args.target.endpoint.is_none());
                assert!(args.user_key.is_none());
                assert!(!args.skip_benchmark);
            }
            other => panic!("expected Run command, got {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("webassess.toml"));
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_cli_parse_run_with_target() {
        let cli = Cli::try_parse_from([
            "webassess",
            "run",
            "--project-id",
            "shop-prod",
            "--endpoint",
            "https://shop.example.com",
            "--user-key",
            "team-7",
            "--skip-benchmark",
        ])
        .expect("should parse run with target flags");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.target.project_id.as_deref(), Some("shop-prod"));
                assert_eq!(
                    args.target.endpoint.as_deref(),
                    Some("https://shop.example.com")
                );
                assert_eq!(args.user_key.as_deref(), Some("team-7"));
                assert!(args.skip_benchmark);
            }
            other => panic!("expected Run command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_resolve() {
        let cli = Cli::try_parse_from(["webassess", "resolve", "--project-id", "p1"])
            .expect("should parse 'resolve'");
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.project_id.as_deref(), Some("p1"));
                assert!(args.endpoint.is_none());
            }
            other => panic!("expected Resolve command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_history_limit() {
        let cli = Cli::try_parse_from(["webassess", "history", "-n", "5"])
            .expect("should parse 'history -n 5'");
        match cli.command {
            Commands::History(args) => {
                assert_eq!(args.limit, Some(5));
                assert!(args.project_id.is_none());
            }
            other => panic!("expected History command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["webassess", "config", "show", "--section", "pricing"])
            .expect("should parse config show with section");
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show { section },
            }) => assert_eq!(section.as_deref(), Some("pricing")),
            other => panic!("expected Config Show, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["webassess", "config", "validate"])
            .expect("should parse config validate");
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Validate
            })
        ));
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "webassess",
            "-c",
            "/etc/webassess.toml",
            "history",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("global flags should be accepted after the subcommand");
        assert_eq!(cli.config, PathBuf::from("/etc/webassess.toml"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_parse_invalid_output_fails() {
        let args = Cli::try_parse_from(["webassess", "--output", "yaml", "history"]);
        assert!(args.is_err(), "unknown output format should be rejected");
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["webassess"]).is_err());
    }

    #[test]
    fn test_target_args_override_only_given_fields() {
        let mut target = TargetConfig {
            project_id: "from-file".to_owned(),
            endpoint: "https://file.example".to_owned(),
            user_key: "file-key".to_owned(),
        };
        let args = RunArgs {
            target: TargetArgs {
                project_id: None,
                endpoint: Some("https://flag.example".to_owned()),
            },
            user_key: Some("flag-key".to_owned()),
            skip_benchmark: false,
        };

        args.apply(&mut target);

        assert_eq!(target.project_id, "from-file");
        assert_eq!(target.endpoint, "https://flag.example");
        assert_eq!(target.user_key, "flag-key");
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "webassess");
        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for expected in ["run", "resolve", "history", "config"] {
            assert!(
                subcommands.contains(&expected),
                "should have '{expected}' subcommand"
            );
        }
        cmd.debug_assert();
    }
}
