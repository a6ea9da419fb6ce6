//! CLI-specific error types and exit code mapping

use webassess_core::error::{
    AssessError, BenchmarkError, ConfigError, ResolutionError, StorageError,
};

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The architecture behind the endpoint could not be resolved.
    #[error("{0}")]
    Resolution(#[from] ResolutionError),

    /// Cloud provider access failed before resolution could start.
    #[error("provider error: {0}")]
    Provider(String),

    /// The benchmark run failed.
    #[error("{0}")]
    Benchmark(#[from] BenchmarkError),

    /// Job history could not be read or written.
    #[error("history error: {0}")]
    Storage(#[from] StorageError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command error         |
    /// | 2    | Configuration error             |
    /// | 3    | Architecture resolution failure |
    /// | 4    | Benchmark failure               |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Resolution(_) => 3,
            Self::Benchmark(_) => 4,
            Self::Io(_) => 10,
            Self::Command(_) | Self::Provider(_) | Self::Storage(_) | Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<AssessError> for CliError {
    fn from(e: AssessError) -> Self {
        match e {
            AssessError::Config(e) => e.into(),
            AssessError::Resolution(e) => Self::Resolution(e),
            AssessError::Provider(e) => Self::Provider(e.to_string()),
            AssessError::Benchmark(e) => Self::Benchmark(e),
            AssessError::Storage(e) => Self::Storage(e),
            AssessError::Io(e) => Self::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webassess_core::error::ProviderError;
    use webassess_core::types::ResourceKind;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("bad value".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_resolution_error() {
        let err = CliError::Resolution(ResolutionError::ResourceNotFound {
            kind: ResourceKind::Database,
        });
        assert_eq!(err.exit_code(), 3, "resolution should return exit code 3");
    }

    #[test]
    fn test_exit_code_benchmark_error() {
        let err = CliError::Benchmark(BenchmarkError::UnexpectedResponse {
            method: "GET".to_owned(),
            path: "/products".to_owned(),
        });
        assert_eq!(err.exit_code(), 4, "benchmark should return exit code 4");
    }

    #[test]
    fn test_exit_code_io_error() {
        let err = CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_general_errors() {
        assert_eq!(CliError::Command("x".to_owned()).exit_code(), 1);
        assert_eq!(CliError::Provider("x".to_owned()).exit_code(), 1);
        assert_eq!(
            CliError::Storage(StorageError::Write("disk full".to_owned())).exit_code(),
            1
        );
    }

    #[test]
    fn test_from_assess_error_keeps_category() {
        let config: CliError = AssessError::Config(ConfigError::InvalidValue {
            field: "gcp.probe_timeout_secs".to_owned(),
            reason: "must be 1-300".to_owned(),
        })
        .into();
        assert_eq!(config.exit_code(), 2);
        assert!(config.to_string().contains("gcp.probe_timeout_secs"));

        let provider: CliError =
            AssessError::Provider(ProviderError::Auth("no token".to_owned())).into();
        match provider {
            CliError::Provider(reason) => assert!(reason.contains("no token")),
            other => panic!("expected Provider variant, got {other:?}"),
        }

        let resolution: CliError = AssessError::Resolution(ResolutionError::ResourceNotFound {
            kind: ResourceKind::Computing,
        })
        .into();
        assert_eq!(resolution.exit_code(), 3);
    }

    #[test]
    fn test_resolution_display_is_unwrapped() {
        let err = CliError::Resolution(ResolutionError::ResourceNotFound {
            kind: ResourceKind::Computing,
        });
        assert_eq!(err.to_string(), "computing resource was not found");
    }
}
