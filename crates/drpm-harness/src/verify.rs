//! Checkpoint comparison for the probe program's output.

use serde::{Deserialize, Serialize};

use crate::diff;

/// Checkpoint lines the probe program must print, in order.
///
/// The probe builds a standard delta, reads it back, builds an rpm-only
/// delta, reads that back, and prints `fine` last.
pub const EXPECTED_OUTPUT: [&str; 8] = [
    "make standard",
    "read standard",
    "standard",
    "make options",
    "make rpm-only",
    "read rpm-only",
    "rpm-only",
    "fine",
];

/// Result of comparing captured output against the checkpoint sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the captured lines matched exactly.
    pub passed: bool,
    /// The checkpoint sequence the probe must print.
    pub expected: Vec<String>,
    /// The lines the probe actually printed.
    pub actual: Vec<String>,
    /// Rendered diff when the comparison failed.
    pub diff: Option<String>,
}

/// Compare captured lines element-wise and length-wise.
#[must_use]
pub fn verify_lines(actual: &[String]) -> VerificationResult {
    let expected: Vec<String> = EXPECTED_OUTPUT.iter().map(|s| (*s).to_string()).collect();
    let passed = expected.as_slice() == actual;
    let diff = if passed {
        None
    } else {
        Some(diff::render_line_diff(&expected, actual))
    };
    VerificationResult {
        passed,
        expected,
        actual: actual.to_vec(),
        diff,
    }
}
