//! Plain-text rendering of a monthly report.

use std::fmt::Write as _;

use feedback_core::MonthlyReport;

/// Render the report as an aligned table followed by the action plan.
pub(crate) fn render_report(report: &MonthlyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Month {} (from {})", report.month, report.start);

    if report.projects.is_empty() {
        let _ = writeln!(out, "no feedback recorded for this month");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<25}{:>6}{:>8}{:>8}{:>8}{:>8}{:>8}",
        "PROJECT", "N", "REACT", "DEADL", "DELIV", "PROF", "TOTAL"
    );
    for p in &report.projects {
        let _ = writeln!(
            out,
            "{:<25}{:>6}{:>8.2}{:>8.2}{:>8.2}{:>8.2}{:>8.2}",
            p.project,
            p.responses,
            p.avg_reactivity,
            p.avg_deadlines,
            p.avg_deliverables,
            p.avg_professionalism,
            p.avg_total
        );
    }

    if report.action_plan.is_empty() {
        let _ = writeln!(out, "\nno action needed");
        return out;
    }

    let _ = writeln!(out, "\nAction plan");
    for entry in &report.action_plan {
        let _ = writeln!(out, "  {}", entry.project);
        for rec in &entry.recommendations {
            let _ = writeln!(out, "    - {rec}");
        }
    }

    out
}
