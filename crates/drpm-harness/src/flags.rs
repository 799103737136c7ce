//! Compiler and linker flag discovery through pkg-config.
//!
//! Both queries run before the first compiler invocation, so a misconfigured
//! metadata file fails the run while the scratch directory is still empty.

use crate::config::RunConfig;
use crate::error::HarnessError;
use crate::exec::Invocation;

/// Library whose build metadata the probe program needs.
pub const LIBRARY: &str = "drpm";

/// Compiler and linker flags reported by pkg-config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFlags {
    /// Tokens from `pkg-config --cflags`.
    pub cflags: Vec<String>,
    /// Tokens from `pkg-config --libs`.
    pub libs: Vec<String>,
}

impl LibraryFlags {
    /// Query both flag sets for [`LIBRARY`].
    pub fn discover(cfg: &RunConfig) -> Result<Self, HarnessError> {
        eprintln!("Fetching the C compiler flags for {LIBRARY}");
        let cflags = query(cfg, "--cflags")?;
        eprintln!("Fetching the C linker flags and libraries for {LIBRARY}");
        let libs = query(cfg, "--libs")?;
        Ok(Self { cflags, libs })
    }
}

/// Run one pkg-config query and tokenize its single-line answer.
fn query(cfg: &RunConfig, request: &str) -> Result<Vec<String>, HarnessError> {
    let inv = Invocation::new(&cfg.pkg_config).arg(request).arg(LIBRARY);
    let rendered = inv.render();
    let text = inv.capture_text(&cfg.env)?;
    let line = trim_flag_output(&text);
    ensure_single_line(&rendered, line)?;
    split_words(&rendered, line)
}

/// Strip trailing carriage returns and line feeds from a metadata answer.
fn trim_flag_output(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}

/// Reject metadata output that still contains a line break after trimming.
fn ensure_single_line(command: &str, line: &str) -> Result<(), HarnessError> {
    if line.contains(['\r', '\n']) {
        return Err(HarnessError::MultilineFlags {
            command: command.to_string(),
            output: line.to_string(),
        });
    }
    Ok(())
}

/// Split one line of flags using shell-word rules.
fn split_words(command: &str, line: &str) -> Result<Vec<String>, HarnessError> {
    shlex::split(line).ok_or_else(|| HarnessError::UnparsableFlags {
        command: command.to_string(),
        output: line.to_string(),
    })
}
