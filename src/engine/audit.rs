//! Audits a posteriori sur les vacations déjà enregistrées d'une équipe.

use crate::model::{Worker, WorkerId};
use crate::time::rest_ok;
use chrono::NaiveDate;

use super::constraints::{sabbath_streak, MIN_REST_HOURS};

/// Paire de vacations d'un même garde en défaut de repos minimal.
#[derive(Debug, Clone)]
pub struct RestFinding {
    pub worker: WorkerId,
    pub first: NaiveDate,
    pub second: NaiveDate,
}

/// Balaye toutes les paires de vacations de chaque garde et relève les
/// battements inférieurs au repos minimal.
pub fn audit_rest(workers: &[Worker]) -> Vec<RestFinding> {
    let mut findings = Vec::new();
    for worker in workers {
        let mut shifts: Vec<_> = worker.shifts.iter().collect();
        shifts.sort_by_key(|s| s.instants().0);
        for (idx, a) in shifts.iter().enumerate() {
            for b in shifts.iter().skip(idx + 1) {
                if !rest_ok(a.instants(), b.instants(), MIN_REST_HOURS) {
                    findings.push(RestFinding {
                        worker: worker.id.clone(),
                        first: a.date,
                        second: b.date,
                    });
                }
            }
        }
    }
    findings
}

/// Relève les gardes en infraction Shabbat sur la fenêtre glissante
/// ancrée à la semaine cible.
pub fn audit_sabbath(workers: &[Worker], week_start: NaiveDate) -> Vec<String> {
    let mut findings = Vec::new();
    for worker in workers {
        let dates = worker.shifts.iter().map(|s| s.date);
        if let Some((from, to)) = sabbath_streak(dates, week_start) {
            findings.push(format!(
                "{} works the Sabbath four weeks in a row ({} to {})",
                worker.display_name, from, to
            ));
        }
    }
    findings
}
