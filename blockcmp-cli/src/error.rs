//! CLI-specific error types and exit code mapping

use blockcmp_core::error::BlockcmpError;
use blockcmp_log_pipeline::LogPipelineError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from blockcmp-core.
    #[error("{0}")]
    Core(#[from] BlockcmpError),

    /// Log pipeline domain error (reading, extraction, profiles).
    #[error("{0}")]
    Pipeline(#[from] LogPipelineError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                        |
    /// |------|--------------------------------|
    /// | 0    | Success                        |
    /// | 1    | General / command error        |
    /// | 2    | Configuration error            |
    /// | 10   | IO error (including log reads) |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Core(BlockcmpError::Config(_)) => 2,
            Self::Pipeline(LogPipelineError::Config { .. }) => 2,
            Self::Io(_) => 10,
            Self::Core(BlockcmpError::Io(_)) => 10,
            Self::Pipeline(LogPipelineError::Collector { .. } | LogPipelineError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) | Self::Pipeline(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockcmp_core::error::ConfigError;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err = CliError::from(BlockcmpError::Config(ConfigError::FileNotFound {
            path: "blockcmp.toml".to_owned(),
        }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_pipeline_config_error() {
        let err = CliError::from(LogPipelineError::Config {
            field: "tail_lines".to_owned(),
            reason: "must be 1-1000000".to_owned(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_unreadable_log() {
        let err = CliError::from(LogPipelineError::Collector {
            path: "/root/.bitcoin/debug.log".to_owned(),
            reason: "permission denied".to_owned(),
        });
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_exit_code_extraction_error() {
        let err = CliError::from(LogPipelineError::MissingField {
            profile: "bitcrust".to_owned(),
            field: "bc_done".to_owned(),
        });
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("bc_done"));
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(
            err.exit_code(),
            1,
            "command error should return exit code 1"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CliError::from(json_err);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("json output error"));
    }
}
