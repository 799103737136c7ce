//! Report generation for acceptance results.

use serde::{Deserialize, Serialize};

use crate::structured_log::{ArtifactRecord, Outcome};
use crate::verify::VerificationResult;

/// One completed pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage name.
    pub stage: String,
    /// Stage outcome.
    pub outcome: Outcome,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// An acceptance report combining stage history and the final verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptanceReport {
    /// Report title.
    pub title: String,
    /// Library under test.
    pub library: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// Stage history in execution order.
    pub stages: Vec<StageRecord>,
    /// Digest of the linked probe executable.
    pub artifact: Option<ArtifactRecord>,
    /// Output verification verdict.
    pub verification: VerificationResult,
}

impl AcceptanceReport {
    /// Whether the run verified successfully.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verification.passed
    }

    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Library: {}\n", self.library));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!(
            "- Verdict: {}\n\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        out.push_str("| Stage | Outcome | Duration (ms) |\n");
        out.push_str("|-------|---------|---------------|\n");
        for stage in &self.stages {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                stage.stage,
                stage.outcome.label(),
                stage.duration_ms
            ));
        }

        if let Some(artifact) = &self.artifact {
            out.push_str(&format!(
                "\nProbe executable: `{}` (sha256 {}, {} bytes)\n",
                artifact.path, artifact.sha256, artifact.size_bytes
            ));
        }

        if let Some(diff) = &self.verification.diff {
            out.push_str("\n## Output mismatch\n\n```\n");
            out.push_str(diff);
            out.push_str("```\n");
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}
