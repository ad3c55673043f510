use crate::engine::RunReport;
use crate::model::Worker;
use chrono::NaiveDate;

/// Permet de customiser le rendu du rapport (texte, mail, etc.).
pub trait SummaryRenderer {
    fn render(&self, workers: &[Worker], report: &RunReport, week_start: NaiveDate) -> String;
}

/// Rendu texte simple destiné à l'administrateur.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSummary;

impl SummaryRenderer for TextSummary {
    fn render(&self, workers: &[Worker], report: &RunReport, week_start: NaiveDate) -> String {
        let mut out = String::new();
        let total: usize = report.assignments.values().map(Vec::len).sum();
        out.push_str(&format!(
            "week of {week_start}: {total} shift(s) assigned\n"
        ));

        for worker in workers {
            let Some(shifts) = report.assignments.get(&worker.id) else {
                continue;
            };
            if shifts.is_empty() {
                continue;
            }
            out.push_str(&format!(
                "- {} ({}): {} shift(s)\n",
                worker.display_name,
                worker.handle,
                shifts.len()
            ));
            for s in shifts {
                out.push_str(&format!(
                    "    {} | {} | {}-{}\n",
                    s.date,
                    s.post_id.as_str(),
                    s.start_time.format("%H:%M"),
                    s.end_time.format("%H:%M")
                ));
            }
        }

        if !report.errors.is_empty() {
            out.push_str(&format!("errors ({}):\n", report.errors.len()));
            for e in &report.errors {
                out.push_str(&format!("  {e}\n"));
            }
        }
        if !report.warnings.is_empty() {
            out.push_str(&format!("warnings ({}):\n", report.warnings.len()));
            for w in &report.warnings {
                out.push_str(&format!("  {w}\n"));
            }
        }
        out
    }
}
