use crate::engine::RunReport;
use crate::model::{DayAvailability, Worker};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Ligne de préférences importée, rattachée à un garde par son handle.
#[derive(Debug, Clone)]
pub struct AvailabilityRow {
    pub handle: String,
    pub day: DayAvailability,
}

/// Import de préférences depuis CSV : header
/// `handle,date,morning,afternoon,night`, cellules tri-état
/// (`yes`/`no`/vide).
pub fn import_availability_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<AvailabilityRow>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        let date = rec.get(1).context("missing date")?.trim();
        if handle.is_empty() || date.is_empty() {
            bail!("invalid availability row (empty)");
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("invalid date for handle {handle}"))?;
        let mut statuses = Vec::with_capacity(3);
        for idx in 2..5 {
            let cell = rec.get(idx).unwrap_or("").trim();
            statuses.push(
                parse_tristate(cell)
                    .with_context(|| format!("invalid status for handle {handle}"))?,
            );
        }
        out.push(AvailabilityRow {
            handle: handle.to_owned(),
            day: DayAvailability { date, statuses },
        });
    }
    Ok(out)
}

fn parse_tristate(s: &str) -> anyhow::Result<Option<bool>> {
    match s.to_ascii_lowercase().as_str() {
        "" | "-" => Ok(None),
        "true" | "1" | "yes" | "y" | "oui" => Ok(Some(true)),
        "false" | "0" | "no" | "n" | "non" => Ok(Some(false)),
        _ => bail!("expected yes/no/empty"),
    }
}

/// Fusionne des lignes importées dans l'équipe ; une ligne remplace le
/// dépôt existant du garde pour la même date.
pub fn apply_availability(
    workers: &mut [Worker],
    rows: Vec<AvailabilityRow>,
) -> anyhow::Result<()> {
    for row in rows {
        let Some(worker) = workers.iter_mut().find(|w| w.handle == row.handle) else {
            bail!("unknown worker handle: {}", row.handle);
        };
        worker.availability.retain(|a| a.date != row.day.date);
        worker.availability.push(row.day);
    }
    Ok(())
}

/// Export JSON du rapport (jolie mise en forme)
pub fn export_report_json<P: AsRef<Path>>(path: P, report: &RunReport) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(report)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des affectations : header
/// `worker,post,date,period,start,end`
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    workers: &[Worker],
    report: &RunReport,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["worker", "post", "date", "period", "start", "end"])?;
    for (worker_id, shifts) in &report.assignments {
        let handle = workers
            .iter()
            .find(|wk| &wk.id == worker_id)
            .map(|wk| wk.handle.as_str())
            .unwrap_or(worker_id.as_str());
        for s in shifts {
            let date = s.date.to_string();
            let period = s.period.to_string();
            let start = s.start_time.format("%H:%M").to_string();
            let end = s.end_time.format("%H:%M").to_string();
            w.write_record([
                handle,
                s.post_id.as_str(),
                date.as_str(),
                period.as_str(),
                start.as_str(),
                end.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
