//! Human-readable summary of comparison results

use crate::diff::model::{CommandVerdict, ComparisonResult, DiffStatus, Verdict};
use crate::model::FieldValue;

/// Render a Markdown summary of a run's comparison results
///
/// Informational only; the structured results are the contract.
pub fn render_human_summary(results: &[ComparisonResult]) -> String {
    let mut sorted: Vec<&ComparisonResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.device_id.cmp(&b.device_id));

    let mut out = String::new();
    out.push_str("## Upgrade Validation\n\n");

    if sorted.is_empty() {
        out.push_str("_No devices compared._\n");
        return out;
    }

    out.push_str("| Device | Verdict | Added | Removed | Changed | Missing | Failures |\n");
    out.push_str("|---|---|---|---|---|---|---|\n");
    for result in &sorted {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            result.device_id,
            verdict_label(result.verdict),
            result.count(DiffStatus::Added),
            result.count(DiffStatus::Removed),
            result.count(DiffStatus::Changed),
            result.count(DiffStatus::CommandMissing),
            result.failures.len(),
        ));
    }
    out.push('\n');

    for result in sorted {
        let deltas: Vec<_> = result
            .entries
            .iter()
            .filter(|e| e.status.is_failing())
            .collect();
        let unvalidated: Vec<_> = result
            .commands
            .iter()
            .filter(|c| c.verdict == CommandVerdict::Unvalidated)
            .collect();
        if deltas.is_empty() && unvalidated.is_empty() && result.failures.is_empty() {
            continue;
        }

        out.push_str(&format!("### {}\n\n", result.device_id));
        for entry in deltas {
            let key = entry
                .key
                .as_ref()
                .map(|k| format!(" `{}`", k))
                .unwrap_or_default();
            match entry.status {
                DiffStatus::Changed => {
                    for change in &entry.changes {
                        out.push_str(&format!(
                            "- `{}`{}: {} `{}` -> `{}`\n",
                            entry.command,
                            key,
                            change.field,
                            show(change.pre.as_ref()),
                            show(change.post.as_ref()),
                        ));
                    }
                }
                DiffStatus::CommandMissing => {
                    let phase = entry
                        .missing_in
                        .map(|p| p.to_string())
                        .unwrap_or_default();
                    out.push_str(&format!(
                        "- `{}`: not captured in {} phase\n",
                        entry.command, phase
                    ));
                }
                status => {
                    out.push_str(&format!("- `{}`{}: {}\n", entry.command, key, status));
                }
            }
        }
        for command in unvalidated {
            out.push_str(&format!("- `{}`: could not be validated\n", command.command));
        }
        for failure in &result.failures {
            let phase = failure
                .phase
                .map(|p| format!(" ({})", p))
                .unwrap_or_default();
            let command = failure
                .command
                .as_ref()
                .map(|c| format!(" `{}`", c))
                .unwrap_or_default();
            out.push_str(&format!(
                "- [{}]{}{}: {}\n",
                failure.code(),
                phase,
                command,
                failure.message
            ));
        }
        out.push('\n');
    }

    out
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "PASS",
        Verdict::Fail => "FAIL",
    }
}

fn show(value: Option<&FieldValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
