//! Error taxonomy for the acceptance pipeline.
//!
//! Every variant is terminal: the pipeline never retries or recovers. The
//! binary renders the message to stderr and exits non-zero.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures that terminate an acceptance run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Invalid input, detected before any external command runs.
    #[error("usage: {0}")]
    Usage(String),

    /// An external command produced stdout that is not valid UTF-8.
    #[error("{command} produced non-UTF-8 output")]
    BadEncoding { command: String },

    /// Metadata output still contained a line break after trimming.
    #[error("{command} returned {output:?}")]
    MultilineFlags { command: String, output: String },

    /// Metadata output could not be split into shell words.
    #[error("{command} returned unparsable output {output:?}")]
    UnparsableFlags { command: String, output: String },

    /// A build artifact was already present before the step that creates it.
    #[error("did not expect {} to exist", .path.display())]
    StaleArtifact { path: PathBuf },

    /// An external command exited non-zero.
    #[error("{command} failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    /// A build step ran but its artifact is missing or not a regular file.
    #[error("{command} did not create the {} file", .path.display())]
    MissingArtifact { command: String, path: PathBuf },

    /// The linked program is not executable by the current user.
    #[error("not an executable file: {}", .path.display())]
    NotExecutable { path: PathBuf },

    /// I/O failure while managing scratch files or reading artifacts.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
