//! Diff rendering for checkpoint comparison.

/// Render a unified-style diff between expected and actual line sequences.
///
/// Pairs are compared positionally; lines present on only one side are
/// rendered as pure removals or additions, so length mismatches stay
/// visible.
#[must_use]
pub fn render_line_diff(expected: &[String], actual: &[String]) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let common = expected.len().min(actual.len());
    for i in 0..common {
        if expected[i] != actual[i] {
            out.push_str(&format!("@@ line {} @@\n", i + 1));
            out.push_str(&format!("-{}\n", expected[i]));
            out.push_str(&format!("+{}\n", actual[i]));
        }
    }
    for (i, line) in expected.iter().enumerate().skip(common) {
        out.push_str(&format!("@@ line {} @@\n", i + 1));
        out.push_str(&format!("-{line}\n"));
    }
    for (i, line) in actual.iter().enumerate().skip(common) {
        out.push_str(&format!("@@ line {} @@\n", i + 1));
        out.push_str(&format!("+{line}\n"));
    }
    out
}
