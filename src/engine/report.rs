//! Agrégation finale : erreurs pour les créneaux restés vides, audit
//! Shabbat a posteriori, signature déterministe des affectations.

use crate::model::Worker;
use chrono::NaiveDate;

use super::constraints::sabbath_streak;
use super::types::{RunReport, RunState};

pub(crate) fn finalize(state: RunState, workers: &[Worker], week_start: NaiveDate) -> RunReport {
    let RunState {
        history,
        assigned,
        mut warnings,
        unfilled,
    } = state;

    let errors: Vec<String> = unfilled
        .iter()
        .map(|slot| {
            format!(
                "no worker available for post \"{}\" on {} ({})",
                slot.post.title, slot.date, slot.post.period
            )
        })
        .collect();

    // Audit informatif : l'exécution n'est jamais annulée.
    for worker in workers {
        let new_shifts = assigned.get(&worker.id).map_or(&[][..], Vec::as_slice);
        if new_shifts.is_empty() {
            continue;
        }
        let dates = history
            .get(&worker.id)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .chain(new_shifts.iter())
            .map(|s| s.date);
        if let Some((from, to)) = sabbath_streak(dates, week_start) {
            warnings.push(format!(
                "{} works the Sabbath four weeks in a row ({} to {})",
                worker.display_name, from, to
            ));
        }
    }

    let success = assigned.values().any(|shifts| !shifts.is_empty());

    RunReport {
        success,
        assignments: assigned,
        errors,
        warnings,
    }
}

/// Signature triée `post|date|garde` d'un rapport : deux exécutions aux
/// entrées et graine identiques doivent produire la même chaîne.
pub fn assignment_signature(report: &RunReport) -> String {
    signature_entries(report).join(";")
}

pub(crate) fn signature_entries(report: &RunReport) -> Vec<String> {
    let mut entries: Vec<String> = report
        .assignments
        .iter()
        .flat_map(|(worker, shifts)| {
            shifts
                .iter()
                .map(move |s| format!("{}|{}|{}", s.post_id.as_str(), s.date, worker.as_str()))
        })
        .collect();
    entries.sort();
    entries
}

/// Compare les signatures de deux exécutions et décrit la divergence.
pub(crate) fn consistency_warning(first: &RunReport, second: &RunReport) -> Option<String> {
    let a = signature_entries(first);
    let b = signature_entries(second);
    if a == b {
        return None;
    }
    let only_first = a.iter().filter(|e| !b.contains(e)).count();
    let only_second = b.iter().filter(|e| !a.contains(e)).count();
    Some(format!(
        "consistency check failed: {only_first} assignment(s) only in first run, {only_second} only in second"
    ))
}
