use crate::model::{ShiftAssignment, Worker, WorkerId};
use crate::time::week_anchor;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::demand::DemandSlot;

/// Options d'une génération
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Émet les événements de score et de rejet vers le collecteur.
    pub debug: bool,
    /// Ignore l'historique des gardes (simulation sur semaine vierge).
    pub force_fresh: bool,
    /// Graine du bruit de départage ; sans graine, une base aléatoire est
    /// tirée à chaque exécution et la reproductibilité n'est pas garantie.
    pub seed: Option<u64>,
    /// Active le bruit de départage (±10 points).
    pub jitter: bool,
    /// Restreint les événements de debug à un seul garde.
    pub debug_worker: Option<WorkerId>,
    /// Rejoue toute la génération et compare les signatures (diagnostic,
    /// double le coût d'exécution).
    pub self_check: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            debug: false,
            force_fresh: false,
            seed: None,
            jitter: true,
            debug_worker: None,
            self_check: false,
        }
    }
}

/// Résultat d'une génération : uniquement les vacations nouvelles, les
/// existantes restent chez l'appelant qui fusionne.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub success: bool,
    pub assignments: BTreeMap<WorkerId, Vec<ShiftAssignment>>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Motif de disqualification d'un couple (garde, créneau).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    SameDay,
    RestConflict { with: NaiveDate },
    ConsecutiveDays { run: u32 },
    SabbathStreak { from: NaiveDate, to: NaiveDate },
    NightQuota { limit: u32 },
    ConsecutiveNights { run: u32 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::SameDay => write!(f, "already assigned that day"),
            RejectReason::RestConflict { with } => {
                write!(f, "less than minimum rest near shift of {with}")
            }
            RejectReason::ConsecutiveDays { run } => {
                write!(f, "would reach {run} consecutive working days")
            }
            RejectReason::SabbathStreak { from, to } => {
                write!(f, "would work the Sabbath four weeks in a row ({from} to {to})")
            }
            RejectReason::NightQuota { limit } => {
                write!(f, "weekly night quota reached ({limit})")
            }
            RejectReason::ConsecutiveNights { run } => {
                write!(f, "would reach {run} consecutive nights")
            }
        }
    }
}

/// État d'une exécution : instantané historique immuable d'un côté,
/// accumulateur des vacations commises de l'autre. Jamais aliasé avec
/// l'entrée.
#[derive(Debug)]
pub(crate) struct RunState {
    pub history: BTreeMap<WorkerId, Vec<ShiftAssignment>>,
    pub assigned: BTreeMap<WorkerId, Vec<ShiftAssignment>>,
    pub warnings: Vec<String>,
    pub unfilled: Vec<DemandSlot>,
}

impl RunState {
    pub fn new(workers: &[Worker], force_fresh: bool) -> Self {
        let mut history = BTreeMap::new();
        let mut assigned = BTreeMap::new();
        for w in workers {
            let snapshot = if force_fresh {
                Vec::new()
            } else {
                w.shifts.clone()
            };
            history.insert(w.id.clone(), snapshot);
            assigned.insert(w.id.clone(), Vec::new());
        }
        Self {
            history,
            assigned,
            warnings: Vec::new(),
            unfilled: Vec::new(),
        }
    }

    pub fn history_of(&self, id: &WorkerId) -> &[ShiftAssignment] {
        self.history.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn assigned_of(&self, id: &WorkerId) -> &[ShiftAssignment] {
        self.assigned.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn commit(&mut self, id: &WorkerId, shift: ShiftAssignment) {
        self.assigned.entry(id.clone()).or_default().push(shift);
    }

    /// Vacations commises pendant l'exécution, dans la semaine cible.
    pub fn assigned_in_week(&self, id: &WorkerId, week_start: NaiveDate) -> usize {
        let anchor = week_anchor(week_start);
        self.assigned_of(id)
            .iter()
            .filter(|s| week_anchor(s.date) == anchor)
            .count()
    }

    /// Historique + commis, dans la semaine cible (plafond hebdomadaire).
    pub fn week_total(&self, id: &WorkerId, week_start: NaiveDate) -> usize {
        let anchor = week_anchor(week_start);
        let existing = self
            .history_of(id)
            .iter()
            .filter(|s| week_anchor(s.date) == anchor)
            .count();
        existing + self.assigned_in_week(id, week_start)
    }
}
