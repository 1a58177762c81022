//! Error types emitted by the SA2 CLI.
//!
//! Keep this error type reasonably small, as most CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sa2_scorer::ScoringError;
use thiserror::Error;

/// Errors emitted by the SA2 CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option name.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option name.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option name.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the input bundle failed.
    #[error("failed to open input bundle at {path:?}: {source}")]
    OpenBundle {
        /// Bundle path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The input bundle is not valid JSON or has the wrong shape.
    #[error("failed to parse input bundle JSON at {path:?}: {source}")]
    ParseBundle {
        /// Bundle path.
        path: Utf8PathBuf,
        /// Decode error.
        #[source]
        source: serde_json::Error,
    },
    /// The scoring run aborted.
    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),
    /// Creating the output file failed.
    #[error("failed to create output file {path:?}: {source}")]
    CreateOutput {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Serialising the table to JSON failed.
    #[error("failed to serialise score table: {0}")]
    SerialiseTable(#[source] serde_json::Error),
    /// Writing a CSV record failed.
    #[error("failed to write CSV output: {0}")]
    WriteCsv(#[source] csv::Error),
    /// Writing the output failed.
    #[error("failed to write score output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
