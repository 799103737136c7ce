//! CLI entrypoint for the drpm acceptance harness.

use std::path::PathBuf;

use clap::Parser;

use drpm_harness::pipeline;
use drpm_harness::structured_log::LogEmitter;

/// Build the probe program against the installed drpm library and verify
/// its checkpoint output.
#[derive(Debug, Parser)]
#[command(name = "harness")]
#[command(about = "Acceptance testing harness for the drpm library")]
struct Cli {
    /// Path to the C source file to compile.
    #[arg(short, long)]
    source: PathBuf,

    /// Path to the directory containing the fixture RPM packages.
    #[arg(short, long)]
    testdir: PathBuf,

    /// Optional markdown report path (a JSON twin lands next to it).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Optional structured JSONL log path.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let run_id = format!("acceptance-{}", std::process::id());
    let mut log = match &cli.log {
        Some(path) => LogEmitter::to_file(path, &run_id)?,
        None => LogEmitter::to_sink(&run_id),
    };

    let report = pipeline::run_acceptance(cli.source, cli.testdir, &mut log)
        .map_err(|err| format!("acceptance run failed: {err}"))?;
    log.flush()?;

    if let Some(report_path) = &cli.report {
        std::fs::write(report_path, report.to_markdown())?;
        let json_path = report_path.with_extension("json");
        std::fs::write(&json_path, report.to_json())?;
        eprintln!(
            "Wrote report to {} and {}",
            report_path.display(),
            json_path.display()
        );
    }

    if !report.passed() {
        let verification = &report.verification;
        eprintln!(
            "The probe program output {:?} instead of {:?}",
            verification.actual, verification.expected
        );
        if let Some(diff) = &verification.diff {
            eprintln!("{diff}");
        }
        return Err("the probe program output did not match the expected checkpoints".into());
    }

    println!("Seems fine!");
    Ok(())
}
