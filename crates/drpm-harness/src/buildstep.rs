//! Compile and link the probe program.
//!
//! Each step is bracketed by artifact guards: the target must not exist
//! before the command runs and must exist as a regular file afterwards, so a
//! stale artifact can never masquerade as a build product.

use std::path::Path;

use crate::config::RunConfig;
use crate::error::HarnessError;
use crate::exec::Invocation;
use crate::flags::LibraryFlags;

/// Warning flags every compile runs with; warnings are errors.
const WARNING_FLAGS: [&str; 4] = ["-Wall", "-W", "-Wextra", "-Werror"];

/// Compile the probe source to the configured object path.
pub fn compile(cfg: &RunConfig, flags: &LibraryFlags) -> Result<(), HarnessError> {
    ensure_absent(&cfg.object)?;
    let inv = Invocation::new(&cfg.cc)
        .arg("-c")
        .arg("-o")
        .arg(&cfg.object)
        .args(WARNING_FLAGS)
        .args(&flags.cflags)
        .arg(&cfg.source);
    eprintln!("Running {}", inv.render());
    inv.run(&cfg.env)?;
    ensure_regular_file(&inv, &cfg.object)
}

/// Link the object file into the configured executable path.
pub fn link(cfg: &RunConfig, flags: &LibraryFlags) -> Result<(), HarnessError> {
    ensure_absent(&cfg.program)?;
    let inv = Invocation::new(&cfg.cc)
        .arg("-o")
        .arg(&cfg.program)
        .arg(&cfg.object)
        .args(&flags.libs);
    eprintln!("Running {}", inv.render());
    inv.run(&cfg.env)?;
    ensure_regular_file(&inv, &cfg.program)?;
    ensure_executable(&cfg.program)
}

/// Stale-artifact guard: the target must not exist before the step runs.
fn ensure_absent(path: &Path) -> Result<(), HarnessError> {
    if path.exists() {
        return Err(HarnessError::StaleArtifact {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// The step's command must have left a regular file behind.
fn ensure_regular_file(inv: &Invocation, path: &Path) -> Result<(), HarnessError> {
    if !path.is_file() {
        return Err(HarnessError::MissingArtifact {
            command: inv.render(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// The linked program must carry an execute bit.
fn ensure_executable(path: &Path) -> Result<(), HarnessError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)?.permissions().mode();
        if mode & 0o111 == 0 {
            return Err(HarnessError::NotExecutable {
                path: path.to_path_buf(),
            });
        }
    }
    let _ = path;
    Ok(())
}
