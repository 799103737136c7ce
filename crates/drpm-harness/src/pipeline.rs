//! Sequential acceptance pipeline.
//!
//! Stages run strictly in order: resolve-config, discover-flags, compile,
//! link, run, verify. Each stage gates the next; the first failure ends the
//! run. The scratch directory lives for exactly one run and is removed on
//! every exit path.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;

use crate::buildstep;
use crate::config::RunConfig;
use crate::error::HarnessError;
use crate::flags::{LIBRARY, LibraryFlags};
use crate::report::{AcceptanceReport, StageRecord};
use crate::runner;
use crate::structured_log::{ArtifactRecord, LogEmitter, LogEntry, LogLevel, Outcome, now_utc};
use crate::verify;

/// Run the full acceptance pipeline for one source/fixture pair.
///
/// The returned report carries the verification verdict (pass or fail);
/// failures in earlier stages surface as errors. The scratch directory and
/// everything in it are gone before this function returns, success or not.
pub fn run_acceptance(
    source: PathBuf,
    testdir: PathBuf,
    log: &mut LogEmitter,
) -> Result<AcceptanceReport, HarnessError> {
    let scratch = TempDir::new()?;
    let outcome = run_stages(source, testdir, scratch.path(), log);
    let cleanup = scratch.close();
    let report = outcome?;
    cleanup?;
    Ok(report)
}

fn run_stages(
    source: PathBuf,
    testdir: PathBuf,
    scratch: &Path,
    log: &mut LogEmitter,
) -> Result<AcceptanceReport, HarnessError> {
    let mut stages = Vec::new();

    let cfg = observe(log, &mut stages, "resolve-config", || {
        RunConfig::resolve(source, testdir, scratch)
    })?;
    let flags = observe(log, &mut stages, "discover-flags", || {
        LibraryFlags::discover(&cfg)
    })?;
    observe(log, &mut stages, "compile", || {
        buildstep::compile(&cfg, &flags)
    })?;
    observe(log, &mut stages, "link", || buildstep::link(&cfg, &flags))?;
    eprintln!("Looks like we got {}", cfg.program.display());

    let artifact = ArtifactRecord::from_file(&cfg.program, "probe-executable")?;
    log.emit_entry(
        LogEntry::new("", LogLevel::Info, "probe linked")
            .with_artifacts(vec![artifact.path.clone()])
            .with_details(serde_json::json!({
                "sha256": artifact.sha256,
                "size_bytes": artifact.size_bytes,
            })),
    )?;

    let lines = observe(log, &mut stages, "run", || runner::run_probe(&cfg))?;
    eprintln!("Got {lines:?}");

    let started = Instant::now();
    let verification = verify::verify_lines(&lines);
    let duration_ms = elapsed_ms(started);
    let outcome = if verification.passed {
        Outcome::Pass
    } else {
        Outcome::Fail
    };
    stages.push(StageRecord {
        stage: String::from("verify"),
        outcome,
        duration_ms,
    });
    log.emit_entry(
        LogEntry::new("", level_for(outcome), "stage completed")
            .with_stage("verify")
            .with_outcome(outcome)
            .with_duration_ms(duration_ms)
            .with_details(serde_json::json!({
                "expected": &verification.expected,
                "actual": &verification.actual,
            })),
    )?;

    Ok(AcceptanceReport {
        title: String::from("drpm acceptance report"),
        library: String::from(LIBRARY),
        timestamp: now_utc(),
        stages,
        artifact: Some(artifact),
        verification,
    })
}

/// Run one gated stage, recording its duration and outcome.
fn observe<T>(
    log: &mut LogEmitter,
    stages: &mut Vec<StageRecord>,
    stage: &str,
    step: impl FnOnce() -> Result<T, HarnessError>,
) -> Result<T, HarnessError> {
    let started = Instant::now();
    let result = step();
    let duration_ms = elapsed_ms(started);
    let outcome = if result.is_ok() {
        Outcome::Pass
    } else {
        Outcome::Error
    };
    stages.push(StageRecord {
        stage: stage.to_string(),
        outcome,
        duration_ms,
    });
    log.emit_entry(
        LogEntry::new("", level_for(outcome), "stage completed")
            .with_stage(stage)
            .with_outcome(outcome)
            .with_duration_ms(duration_ms),
    )?;
    result
}

fn level_for(outcome: Outcome) -> LogLevel {
    match outcome {
        Outcome::Pass => LogLevel::Info,
        Outcome::Fail | Outcome::Error => LogLevel::Error,
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
