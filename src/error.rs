//! Top-level error types and their exit codes.
//!
//! Every failure reaches [`crate::cli::run`] as a [`PackagerError`], which
//! prints it and maps it to a distinct process exit code so calling build
//! pipelines can tell a missing bundle from a failed image build.

use crate::bundler;
use thiserror::Error;

/// Result type alias for packager operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Exit code for a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failures without a more specific code.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the application bundle (or another source) is missing.
pub const EXIT_SOURCE_MISSING: i32 = 2;
/// Exit code when the disk image facility failed.
pub const EXIT_ASSEMBLY_FAILURE: i32 = 3;
/// Exit code for invalid arguments or layout configuration.
pub const EXIT_INVALID_INPUT: i32 = 4;

/// Main error type for all packager operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundler errors
    #[error("{0}")]
    Bundler(#[from] bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl PackagerError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PackagerError::Bundler(bundler::Error::SourceMissing(_)) => EXIT_SOURCE_MISSING,
            PackagerError::Bundler(bundler::Error::AssemblyFailure(_)) => EXIT_ASSEMBLY_FAILURE,
            PackagerError::Bundler(
                bundler::Error::InvalidVolumeName { .. } | bundler::Error::InvalidSpec(_),
            )
            | PackagerError::Cli(CliError::InvalidArguments { .. })
            | PackagerError::Toml(_) => EXIT_INVALID_INPUT,
            _ => EXIT_FAILURE,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PackagerError::Bundler(bundler::Error::SourceMissing(path))
                if path.extension().is_some_and(|ext| ext == "app") =>
            {
                vec!["Please build the .app file first using your Xcode build script.".to_string()]
            }
            PackagerError::Bundler(bundler::Error::SourceMissing(_)) => {
                vec!["Check the paths listed in dmg.toml".to_string()]
            }
            PackagerError::Bundler(bundler::Error::AssemblyFailure(msg))
                if msg.contains("insufficient capacity") =>
            {
                vec!["Increase `size` in dmg.toml".to_string()]
            }
            PackagerError::Bundler(bundler::Error::AssemblyFailure(msg))
                if msg.contains("not found in PATH") =>
            {
                vec!["Disk images must be built on macOS with hdiutil available".to_string()]
            }
            PackagerError::Bundler(bundler::Error::OutputDirectoryMissing(_)) => {
                vec!["Create the output directory or pass a different --output".to_string()]
            }
            PackagerError::Cli(CliError::ExecutionFailed { command, .. })
                if command.starts_with("git") =>
            {
                vec!["Run from inside the project checkout or pass --root".to_string()]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_error_kinds() {
        let missing = PackagerError::from(bundler::Error::SourceMissing("/b/App.app".into()));
        let failed = PackagerError::from(bundler::Error::AssemblyFailure("disk full".into()));
        let volume = PackagerError::from(bundler::Error::InvalidVolumeName {
            name: String::new(),
            reason: "empty".into(),
        });
        let io = PackagerError::from(std::io::Error::other("boom"));

        assert_eq!(missing.exit_code(), EXIT_SOURCE_MISSING);
        assert_eq!(failed.exit_code(), EXIT_ASSEMBLY_FAILURE);
        assert_eq!(volume.exit_code(), EXIT_INVALID_INPUT);
        assert_eq!(io.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn missing_app_suggests_building_it() {
        let err = PackagerError::from(bundler::Error::SourceMissing("/b/App.app".into()));
        assert_eq!(
            err.recovery_suggestions(),
            ["Please build the .app file first using your Xcode build script."]
        );
    }
}
