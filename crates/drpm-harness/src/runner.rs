//! Execute the built probe program and capture its checkpoint output.

use crate::config::RunConfig;
use crate::error::HarnessError;
use crate::exec::Invocation;

/// Fixture consumed as the "old" package archive.
pub const OLD_FIXTURE: &str = "cmocka-old.rpm";
/// Fixture consumed as the "new" package archive.
pub const NEW_FIXTURE: &str = "cmocka-new.rpm";

/// Run the probe program against the fixture archives.
///
/// The probe's calling convention is three positional arguments: the old
/// archive, the new archive, and a scratch directory it may write delta
/// files into. Returns its stdout split into lines.
pub fn run_probe(cfg: &RunConfig) -> Result<Vec<String>, HarnessError> {
    let inv = Invocation::new(&cfg.program)
        .arg(cfg.testdir.join(OLD_FIXTURE))
        .arg(cfg.testdir.join(NEW_FIXTURE))
        .arg(&cfg.scratch);
    eprintln!("Running {}", inv.render());
    let text = inv.capture_text(&cfg.env)?;
    Ok(text.lines().map(str::to_string).collect())
}
